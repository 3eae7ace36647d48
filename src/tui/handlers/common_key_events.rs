use crate::tui::event::Key;

pub fn down_event(key: Key) -> bool {
  matches!(key, Key::Down | Key::Char('j') | Key::Ctrl('n'))
}

pub fn up_event(key: Key) -> bool {
  matches!(key, Key::Up | Key::Char('k') | Key::Ctrl('p'))
}

pub fn left_event(key: Key) -> bool {
  matches!(key, Key::Left | Key::Char('h'))
}

pub fn right_event(key: Key) -> bool {
  matches!(key, Key::Right | Key::Char('l'))
}

pub fn on_down_press_handler<T>(selection_data: &[T], selection_index: Option<usize>) -> usize {
  match selection_index {
    Some(index) if !selection_data.is_empty() => (index + 1) % selection_data.len(),
    _ => 0,
  }
}

pub fn on_up_press_handler<T>(selection_data: &[T], selection_index: Option<usize>) -> usize {
  match selection_index {
    Some(0) | None => selection_data.len().saturating_sub(1),
    Some(index) => index - 1,
  }
}
