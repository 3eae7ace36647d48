use crate::core::app::{ActiveBlock, App};
use crate::tui::event::Key;

pub fn handler(key: Key, app: &mut App) {
  match key {
    k if k == app.user_config.keys.paste => app.paste_from_clipboard(),
    Key::Esc => app.focus_input(ActiveBlock::Transport),
    Key::Enter => app.submit_input(),
    Key::Ctrl('u') => {
      app.input.clear();
      app.input_cursor_position = 0;
    }
    Key::Backspace | Key::Ctrl('h') => {
      let position = app.input_cursor_position;
      if position > 0 && position <= app.input.len() {
        app.input.remove(position - 1);
        app.input_cursor_position -= 1;
      }
    }
    Key::Delete | Key::Ctrl('d') => {
      let position = app.input_cursor_position;
      if position < app.input.len() {
        app.input.remove(position);
      }
    }
    Key::Left | Key::Ctrl('b') => {
      app.input_cursor_position = app.input_cursor_position.saturating_sub(1);
    }
    Key::Right | Key::Ctrl('f') => {
      if app.input_cursor_position < app.input.len() {
        app.input_cursor_position += 1;
      }
    }
    Key::Home | Key::Ctrl('a') => {
      app.input_cursor_position = 0;
    }
    Key::End | Key::Ctrl('e') => {
      app.input_cursor_position = app.input.len();
    }
    Key::Char(c) => {
      let mut buffer = [0u8; 4];
      app.insert_input(c.encode_utf8(&mut buffer));
    }
    _ => {}
  }
}
