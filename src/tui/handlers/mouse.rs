use super::{login, search_results};
use crate::core::app::{ActiveBlock, App, TransportButton, View};
use crate::tui::event::Key;
use crate::tui::ui::player::PlaybackLayout;
use crate::tui::ui::util::{contains, transport_button_areas};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

const BUTTONS: [TransportButton; 3] = [
  TransportButton::Previous,
  TransportButton::TogglePlay,
  TransportButton::Next,
];

pub fn handler(mouse: MouseEvent, app: &mut App) {
  if app.view() == View::Login {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
      login::open_login_page(app);
    }
    return;
  }

  let area = Rect::new(0, 0, app.size.width, app.size.height);
  let layout = PlaybackLayout::for_app(area, app);

  let button = button_at(layout.transport, mouse.column, mouse.row);
  match mouse.kind {
    MouseEventKind::Moved => {
      app.hovered_button = button;
    }
    MouseEventKind::Down(MouseButton::Left) => {
      if let Some(button) = button {
        app.hovered_button = Some(button);
        app.press_button(button);
      } else if contains(layout.input, mouse.column, mouse.row)
        && app.active_block != ActiveBlock::UrlInput
        && app.active_block != ActiveBlock::SearchInput
      {
        app.focus_input(ActiveBlock::UrlInput);
      } else if let Some(results_area) = layout.search_results {
        if contains(results_area, mouse.column, mouse.row) {
          select_result_at(app, results_area, mouse.row);
        }
      }
    }
    MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
      if let Some(results_area) = layout.search_results {
        if contains(results_area, mouse.column, mouse.row) {
          app.active_block = ActiveBlock::SearchResults;
          let key = if mouse.kind == MouseEventKind::ScrollDown {
            Key::Down
          } else {
            Key::Up
          };
          search_results::handler(key, app);
        }
      }
    }
    _ => {}
  }
}

fn button_at(transport_area: Rect, column: u16, row: u16) -> Option<TransportButton> {
  transport_button_areas(transport_area)
    .into_iter()
    .zip(BUTTONS)
    .find(|(area, _)| contains(*area, column, row))
    .map(|(_, button)| button)
}

fn select_result_at(app: &mut App, results_area: Rect, row: u16) {
  app.active_block = ActiveBlock::SearchResults;
  let inner_height = results_area.height.saturating_sub(2) as usize;
  // Rows only map to items while the whole list is on screen
  if app.search_results.len() > inner_height || row <= results_area.y {
    return;
  }
  let index = (row - results_area.y - 1) as usize;
  if index < app.search_results.len() {
    app.selected_search_index = Some(index);
  }
}
