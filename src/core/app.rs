use crate::core::config::ClientConfig;
use crate::core::model::{PlaybackState, SearchResultItem, Track};
use crate::core::session::SessionToken;
use crate::core::user_config::UserConfig;
use crate::infra::network::IoEvent;
use crate::infra::player::{DeviceEvent, DeviceHandle};
use anyhow::anyhow;
use arboard::Clipboard;
use log::{error, info, warn};
use ratatui::layout::Size;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

const DEFAULT_STATUS_TTL_SECS: u64 = 5;

/// Top-level screen, derived from whether a token is present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
  Login,
  Playback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveBlock {
  Transport,
  UrlInput,
  SearchInput,
  SearchResults,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportButton {
  Previous,
  TogglePlay,
  Next,
}

/// Mirror of the external device's lifecycle; only notifications move it forward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DeviceStatus {
  #[default]
  Uninitialized,
  Connecting,
  ReadyInactive {
    device_id: String,
  },
  ReadyActive {
    device_id: String,
  },
  Offline {
    device_id: String,
  },
}

impl DeviceStatus {
  pub fn is_ready(&self) -> bool {
    matches!(
      self,
      DeviceStatus::ReadyInactive { .. } | DeviceStatus::ReadyActive { .. }
    )
  }

  pub fn label(&self) -> &'static str {
    match self {
      DeviceStatus::Uninitialized => "No device",
      DeviceStatus::Connecting => "Connecting",
      DeviceStatus::ReadyInactive { .. } => "Ready",
      DeviceStatus::ReadyActive { .. } => "Active",
      DeviceStatus::Offline { .. } => "Offline",
    }
  }
}

pub struct App {
  io_tx: Option<UnboundedSender<IoEvent>>,
  pub user_config: UserConfig,
  pub client_config: ClientConfig,
  pub token: SessionToken,
  pub is_loading: bool,
  pub device: Option<DeviceHandle>,
  pub device_id: Option<String>,
  pub device_status: DeviceStatus,
  pub current_track: Option<Track>,
  pub is_paused: bool,
  pub active_block: ActiveBlock,
  pub input: Vec<char>,
  pub input_cursor_position: usize,
  pub search_results: Vec<SearchResultItem>,
  pub selected_search_index: Option<usize>,
  pub hovered_button: Option<TransportButton>,
  pub status_message: Option<String>,
  pub status_is_error: bool,
  pub status_message_expires_at: Option<Instant>,
  pub size: Size,
  pub clipboard: Option<Clipboard>,
}

impl Default for App {
  fn default() -> Self {
    App {
      io_tx: None,
      user_config: UserConfig::new(),
      client_config: ClientConfig::new(),
      token: SessionToken::new(),
      is_loading: false,
      device: None,
      device_id: None,
      device_status: DeviceStatus::Uninitialized,
      current_track: None,
      is_paused: false,
      active_block: ActiveBlock::Transport,
      input: vec![],
      input_cursor_position: 0,
      search_results: vec![],
      selected_search_index: None,
      hovered_button: None,
      status_message: None,
      status_is_error: false,
      status_message_expires_at: None,
      size: Size::default(),
      clipboard: None,
    }
  }
}

impl App {
  pub fn new(
    io_tx: UnboundedSender<IoEvent>,
    user_config: UserConfig,
    client_config: ClientConfig,
  ) -> App {
    App {
      io_tx: Some(io_tx),
      user_config,
      client_config,
      clipboard: Clipboard::new().ok(),
      ..App::default()
    }
  }

  pub fn dispatch(&mut self, action: IoEvent) {
    // `is_loading` will be set to false again after the async action has finished
    self.is_loading = true;
    if let Some(io_tx) = &self.io_tx {
      if let Err(e) = io_tx.send(action) {
        self.is_loading = false;
        error!("failed to dispatch network event: {}", e);
      };
    }
  }

  // Close the IO channel to allow the network task to exit gracefully
  pub fn close_io_channel(&mut self) {
    self.io_tx = None;
  }

  pub fn view(&self) -> View {
    if self.token.is_present() {
      View::Playback
    } else {
      View::Login
    }
  }

  pub fn set_token(&mut self, token: String) {
    if token.is_empty() {
      info!("backend has no access token yet");
      self.token.clear();
    } else {
      info!("access token received");
      self.token.set(token);
    }
  }

  /// Applies a device notification; last notification wins.
  pub fn apply_device_event(&mut self, event: DeviceEvent) {
    match event {
      DeviceEvent::Ready { device_id } => {
        info!("device ready with id {}", device_id);
        self.device_id = Some(device_id.clone());
        self.device_status = DeviceStatus::ReadyInactive { device_id };
      }
      DeviceEvent::NotReady { device_id } => {
        warn!("device offline {}", device_id);
        self.device_status = DeviceStatus::Offline { device_id };
      }
      DeviceEvent::StateChanged(None) => {}
      DeviceEvent::StateChanged(Some(PlaybackState {
        paused,
        track_window,
      })) => {
        self.current_track = Some(track_window.current_track);
        self.is_paused = paused;
        // Only a ready device becomes active; offline waits for the next ready
        if let DeviceStatus::ReadyInactive { device_id } = &self.device_status {
          self.device_status = DeviceStatus::ReadyActive {
            device_id: device_id.clone(),
          };
        }
      }
    }
  }

  pub fn begin_device_connection(&mut self) {
    self.device_status = DeviceStatus::Connecting;
  }

  pub fn attach_device(&mut self, device: DeviceHandle) {
    self.device = Some(device);
  }

  /// Forgets everything the previous device reported.
  pub fn detach_device(&mut self) {
    self.device = None;
    self.device_id = None;
    self.device_status = DeviceStatus::Uninitialized;
    self.current_track = None;
    self.is_paused = false;
  }

  pub fn transport_enabled(&self) -> bool {
    self.device.is_some() && self.device_status.is_ready()
  }

  fn with_ready_device(&mut self, command: impl FnOnce(&DeviceHandle)) {
    let ready = self.device_status.is_ready();
    match self.device.clone() {
      Some(device) if ready => command(&device),
      _ => self.set_status_message("No playback device ready".to_string(), 3),
    }
  }

  pub fn previous_track(&mut self) {
    self.with_ready_device(|device| device.previous_track());
  }

  pub fn toggle_playback(&mut self) {
    self.with_ready_device(|device| device.toggle_play());
  }

  pub fn next_track(&mut self) {
    self.with_ready_device(|device| device.next_track());
  }

  pub fn press_button(&mut self, button: TransportButton) {
    match button {
      TransportButton::Previous => self.previous_track(),
      TransportButton::TogglePlay => self.toggle_playback(),
      TransportButton::Next => self.next_track(),
    }
  }

  pub fn set_status_message(&mut self, message: String, ttl_secs: u64) {
    self.status_message = Some(message);
    self.status_is_error = false;
    self.status_message_expires_at = Some(Instant::now() + Duration::from_secs(ttl_secs));
  }

  /// Errors are logged and surfaced in the status line; none of them are fatal.
  pub fn handle_error(&mut self, e: anyhow::Error) {
    error!("{:#}", e);
    self.set_status_message(format!("{}", e), DEFAULT_STATUS_TTL_SECS);
    self.status_is_error = true;
  }

  pub fn update_on_tick(&mut self) {
    if let Some(expires_at) = self.status_message_expires_at {
      if Instant::now() >= expires_at {
        self.status_message = None;
        self.status_is_error = false;
        self.status_message_expires_at = None;
      }
    }
  }

  pub fn set_search_results(&mut self, results: Vec<SearchResultItem>) {
    self.selected_search_index = if results.is_empty() { None } else { Some(0) };
    self.search_results = results;
  }

  pub fn focus_input(&mut self, block: ActiveBlock) {
    self.active_block = block;
    self.input.clear();
    self.input_cursor_position = 0;
  }

  pub fn input_string(&self) -> String {
    self.input.iter().collect()
  }

  pub fn insert_input(&mut self, text: &str) {
    for c in text.chars().filter(|c| !c.is_control()) {
      let position = self.input_cursor_position.min(self.input.len());
      self.input.insert(position, c);
      self.input_cursor_position = position + 1;
    }
  }

  pub fn paste_from_clipboard(&mut self) {
    let pasted = match &mut self.clipboard {
      Some(clipboard) => clipboard.get_text(),
      None => {
        self.set_status_message("Clipboard is not available".to_string(), 3);
        return;
      }
    };
    match pasted {
      Ok(text) => self.insert_input(&text),
      Err(e) => self.handle_error(anyhow!("failed to read clipboard content: {}", e)),
    }
  }

  /// Sends the current input to the backend and returns to the transport controls.
  pub fn submit_input(&mut self) {
    let input = self.input_string().trim().to_string();
    let block = self.active_block;
    self.focus_input(ActiveBlock::Transport);

    if input.is_empty() {
      return;
    }

    match block {
      ActiveBlock::UrlInput => self.dispatch(IoEvent::PlayByUrl(input)),
      ActiveBlock::SearchInput => {
        self.active_block = ActiveBlock::SearchResults;
        self.dispatch(IoEvent::Search(input));
      }
      ActiveBlock::Transport | ActiveBlock::SearchResults => {}
    }
  }
}
