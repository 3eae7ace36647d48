pub mod login;
pub mod player;
pub mod search;
pub mod util;

use crate::core::app::{App, View};
use ratatui::Frame;

pub use self::login::draw_login;
pub use self::player::draw_playback;

pub fn draw_main_layout(f: &mut Frame<'_>, app: &App) {
  match app.view() {
    View::Login => draw_login(f, app),
    View::Playback => draw_playback(f, app),
  }
}

#[cfg(test)]
pub(crate) mod test_util {
  use ratatui::{backend::TestBackend, buffer::Buffer, style::Style, Terminal};

  pub fn render(width: u16, height: u16, draw: impl FnOnce(&mut ratatui::Frame<'_>)) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(draw).unwrap();
    terminal.backend().buffer().clone()
  }

  pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
      for x in area.left()..area.right() {
        text.push_str(buffer[(x, y)].symbol());
      }
      text.push('\n');
    }
    text
  }

  /// Style of the first cell where `needle` starts.
  pub fn style_at(buffer: &Buffer, needle: &str) -> Option<Style> {
    let needle: Vec<String> = needle.chars().map(String::from).collect();
    let area = buffer.area;
    for y in area.top()..area.bottom() {
      let row: Vec<&str> = (area.left()..area.right())
        .map(|x| buffer[(x, y)].symbol())
        .collect();
      let found = row
        .windows(needle.len())
        .position(|window| window.iter().copied().eq(needle.iter().map(String::as_str)));
      if let Some(offset) = found {
        return Some(buffer[(area.left() + offset as u16, y)].style());
      }
    }
    None
  }
}
