use super::common_key_events;
use crate::core::app::{ActiveBlock, App};
use crate::tui::event::Key;

pub fn handler(key: Key, app: &mut App) {
  match key {
    Key::Esc | Key::Tab => app.active_block = ActiveBlock::Transport,
    k if k == app.user_config.keys.back => app.active_block = ActiveBlock::Transport,
    k if k == app.user_config.keys.search => app.focus_input(ActiveBlock::SearchInput),
    k if common_key_events::down_event(k) => {
      if !app.search_results.is_empty() {
        app.selected_search_index = Some(common_key_events::on_down_press_handler(
          &app.search_results,
          app.selected_search_index,
        ));
      }
    }
    k if common_key_events::up_event(k) => {
      if !app.search_results.is_empty() {
        app.selected_search_index = Some(common_key_events::on_up_press_handler(
          &app.search_results,
          app.selected_search_index,
        ));
      }
    }
    _ => {}
  }
}
