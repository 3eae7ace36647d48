use crate::core::app::App;
use crate::core::user_config::Theme;
use ratatui::{
  layout::Rect,
  style::Style,
  text::{Line, Span},
};

pub const TRANSPORT_HEIGHT: u16 = 3;
const TRANSPORT_BUTTON_WIDTH: u16 = 9;
const TRANSPORT_BUTTON_GAP: u16 = 2;

pub fn get_color((is_active, is_hovered): (bool, bool), theme: Theme) -> Style {
  match (is_active, is_hovered) {
    (true, _) => Style::default().fg(theme.selected).bg(theme.background),
    (false, true) => Style::default().fg(theme.hovered).bg(theme.background),
    _ => Style::default().fg(theme.inactive).bg(theme.background),
  }
}

/// A block title followed by the current status message, if any.
pub fn title_with_status(title: String, title_style: Style, app: &App) -> Line<'static> {
  let mut spans = vec![Span::styled(title, title_style)];
  if let Some(message) = &app.status_message {
    let message_style = if app.status_is_error {
      Style::default().fg(app.user_config.theme.error_text)
    } else {
      title_style
    };
    spans.push(Span::styled(" | ", title_style));
    spans.push(Span::styled(message.clone(), message_style));
  }
  Line::from(spans)
}

/// Cuts `text` to `max_chars` characters and marks the cut with "...".
pub fn truncate_text(text: &str, max_chars: usize) -> String {
  match text.char_indices().nth(max_chars) {
    Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
    None => text.to_string(),
  }
}

/// Areas of the previous, play/pause and next buttons, centered in `area`.
/// Drawing and mouse hit-testing both go through here.
pub fn transport_button_areas(area: Rect) -> [Rect; 3] {
  let total = TRANSPORT_BUTTON_WIDTH * 3 + TRANSPORT_BUTTON_GAP * 2;
  let left = area.x + area.width.saturating_sub(total) / 2;
  let height = TRANSPORT_HEIGHT.min(area.height);
  [0, 1, 2].map(|i| {
    let x = left + i * (TRANSPORT_BUTTON_WIDTH + TRANSPORT_BUTTON_GAP);
    Rect::new(x, area.y, TRANSPORT_BUTTON_WIDTH, height).intersection(area)
  })
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
  column >= area.x
    && column < area.x.saturating_add(area.width)
    && row >= area.y
    && row < area.y.saturating_add(area.height)
}
