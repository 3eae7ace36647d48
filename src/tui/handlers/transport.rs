use super::common_key_events;
use crate::core::app::{ActiveBlock, App, TransportButton};
use crate::infra::network::IoEvent;
use crate::tui::event::Key;

pub fn handler(key: Key, app: &mut App) {
  let keys = app.user_config.keys.clone();
  match key {
    k if k == keys.toggle_playback => app.toggle_playback(),
    k if k == keys.next_track => app.next_track(),
    k if k == keys.previous_track => app.previous_track(),
    k if k == keys.play_url => app.focus_input(ActiveBlock::UrlInput),
    k if k == keys.search => app.focus_input(ActiveBlock::SearchInput),
    k if k == keys.refresh_token => app.dispatch(IoEvent::FetchToken),
    k if common_key_events::left_event(k) => {
      app.hovered_button = Some(match app.hovered_button {
        Some(TransportButton::Next) => TransportButton::TogglePlay,
        Some(TransportButton::TogglePlay) | Some(TransportButton::Previous) | None => {
          TransportButton::Previous
        }
      });
    }
    k if common_key_events::right_event(k) => {
      app.hovered_button = Some(match app.hovered_button {
        Some(TransportButton::Previous) => TransportButton::TogglePlay,
        Some(TransportButton::TogglePlay) | Some(TransportButton::Next) | None => {
          TransportButton::Next
        }
      });
    }
    Key::Enter => {
      if let Some(button) = app.hovered_button {
        app.press_button(button);
      }
    }
    Key::Tab if !app.search_results.is_empty() => {
      app.active_block = ActiveBlock::SearchResults;
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infra::player::{DeviceEvent, PlaybackDevice};
  use std::sync::{Arc, Mutex};

  #[derive(Default)]
  struct RecordingDevice {
    calls: Mutex<Vec<&'static str>>,
  }

  impl PlaybackDevice for RecordingDevice {
    fn previous_track(&self) {
      self.calls.lock().unwrap().push("previous");
    }
    fn toggle_play(&self) {
      self.calls.lock().unwrap().push("toggle");
    }
    fn next_track(&self) {
      self.calls.lock().unwrap().push("next");
    }
    fn disconnect(&self) {}
  }

  fn ready_app() -> (App, Arc<RecordingDevice>) {
    let mut app = App::default();
    app.set_token("abc".to_string());
    let device = Arc::new(RecordingDevice::default());
    app.attach_device(device.clone());
    app.apply_device_event(DeviceEvent::Ready {
      device_id: "dev1".to_string(),
    });
    (app, device)
  }

  #[test]
  fn key_bindings_drive_the_device() {
    let (mut app, device) = ready_app();

    handler(Key::Char('p'), &mut app);
    handler(Key::Char(' '), &mut app);
    handler(Key::Char('n'), &mut app);

    assert_eq!(
      *device.calls.lock().unwrap(),
      vec!["previous", "toggle", "next"]
    );
  }

  #[test]
  fn arrows_move_hover_and_enter_presses() {
    let (mut app, device) = ready_app();

    handler(Key::Right, &mut app);
    assert_eq!(app.hovered_button, Some(TransportButton::Next));
    handler(Key::Left, &mut app);
    assert_eq!(app.hovered_button, Some(TransportButton::TogglePlay));
    handler(Key::Enter, &mut app);

    assert_eq!(*device.calls.lock().unwrap(), vec!["toggle"]);
  }

  #[test]
  fn disabled_until_ready() {
    let mut app = App::default();
    app.set_token("abc".to_string());
    let device = Arc::new(RecordingDevice::default());
    app.attach_device(device.clone());

    handler(Key::Char('n'), &mut app);

    assert!(device.calls.lock().unwrap().is_empty());
    assert_eq!(
      app.status_message.as_deref(),
      Some("No playback device ready")
    );
  }

  #[test]
  fn opens_input_modes() {
    let (mut app, _) = ready_app();
    handler(Key::Char('u'), &mut app);
    assert_eq!(app.active_block, ActiveBlock::UrlInput);

    app.active_block = ActiveBlock::Transport;
    handler(Key::Char('/'), &mut app);
    assert_eq!(app.active_block, ActiveBlock::SearchInput);
  }
}
