mod common_key_events;
mod input;
mod login;
pub mod mouse;
mod search_results;
mod transport;

use crate::core::app::{ActiveBlock, App, View};
use crate::tui::event::Key;

pub fn handle_app(key: Key, app: &mut App) {
  match app.view() {
    View::Login => login::handler(key, app),
    View::Playback => match app.active_block {
      ActiveBlock::Transport => transport::handler(key, app),
      ActiveBlock::UrlInput | ActiveBlock::SearchInput => input::handler(key, app),
      ActiveBlock::SearchResults => search_results::handler(key, app),
    },
  }
}

/// Whether `key` should end the program from the current screen.
pub fn is_quit_key(key: Key, app: &App) -> bool {
  if key == Key::Ctrl('c') {
    return true;
  }
  // In an input box the back key is just text
  key == app.user_config.keys.back
    && (app.view() == View::Login || app.active_block == ActiveBlock::Transport)
}
