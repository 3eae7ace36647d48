//! Remote device driven through the Web API player endpoints.
//!
//! The terminal has no audio output of its own here, so the device mirrors the
//! account's active Spotify Connect device by polling `GET /me/player`.

use super::{DeviceConfig, DeviceEvent, DeviceFactory, DeviceHandle, PlaybackDevice};
use crate::core::model::PlaybackState;
use crate::core::session::SessionToken;
use crate::infra::network::web_api::PlayerSnapshot;
use crate::infra::network::{WebApi, WebApiClient};
use anyhow::Result;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub struct ConnectFactory<W: WebApi = WebApiClient> {
  web_api: Arc<W>,
  poll_interval: Duration,
}

impl<W: WebApi> ConnectFactory<W> {
  pub fn new(web_api: Arc<W>, poll_interval: Duration) -> Self {
    ConnectFactory {
      web_api,
      poll_interval,
    }
  }
}

impl<W: WebApi> DeviceFactory for ConnectFactory<W> {
  async fn create(
    &self,
    config: DeviceConfig,
    events: UnboundedSender<DeviceEvent>,
  ) -> Result<DeviceHandle> {
    info!("mirroring the active Spotify device as '{}'", config.name);
    let runtime = Handle::current();
    let paused = Arc::new(AtomicBool::new(false));

    let poller = runtime.spawn(poll_player(
      Arc::clone(&self.web_api),
      config.token.clone(),
      config.volume_percent,
      Arc::clone(&paused),
      events,
      self.poll_interval,
    ));

    Ok(Arc::new(ConnectDevice {
      web_api: Arc::clone(&self.web_api),
      token: config.token,
      runtime,
      paused,
      disconnected: AtomicBool::new(false),
      poller: Mutex::new(Some(poller)),
    }))
  }
}

/// Turns successive player snapshots into device notifications.
#[derive(Debug, Default)]
struct PlayerTracker {
  device_id: Option<String>,
  paused: bool,
}

impl PlayerTracker {
  fn observe(&mut self, snapshot: Option<PlayerSnapshot>) -> Vec<DeviceEvent> {
    let mut events = vec![];

    let Some(snapshot) = snapshot else {
      events.push(DeviceEvent::StateChanged(None));
      if let Some(device_id) = self.device_id.take() {
        events.push(DeviceEvent::NotReady { device_id });
      }
      return events;
    };

    self.paused = !snapshot.is_playing;
    let device_id = snapshot.device.and_then(|device| device.id);
    if let Some(device_id) = device_id {
      if self.device_id.as_deref() != Some(device_id.as_str()) {
        self.device_id = Some(device_id.clone());
        events.push(DeviceEvent::Ready { device_id });
      }
    }

    match snapshot.item {
      Some(track) => {
        events.push(DeviceEvent::StateChanged(Some(PlaybackState::new(
          track,
          self.paused,
        ))));
      }
      None => events.push(DeviceEvent::StateChanged(None)),
    }
    events
  }
}

async fn poll_player<W: WebApi>(
  web_api: Arc<W>,
  token: SessionToken,
  volume_percent: u8,
  paused: Arc<AtomicBool>,
  events: UnboundedSender<DeviceEvent>,
  interval: Duration,
) {
  let mut tracker = PlayerTracker::default();
  let mut volume_applied = false;
  let mut ticker = tokio::time::interval(interval);

  loop {
    ticker.tick().await;
    let access_token = token.latest();
    if access_token.is_empty() {
      continue;
    }

    let snapshot = match web_api.current_playback(&access_token).await {
      Ok(snapshot) => snapshot,
      Err(e) => {
        warn!("failed to poll player state: {:#}", e);
        continue;
      }
    };

    // Only a player report overrides a locally flipped toggle
    let reported = snapshot.is_some();
    let events_batch = tracker.observe(snapshot);
    if reported {
      paused.store(tracker.paused, Ordering::SeqCst);
    }

    for event in events_batch {
      if matches!(event, DeviceEvent::Ready { .. }) && !volume_applied {
        volume_applied = true;
        if let Err(e) = web_api.set_volume(&access_token, volume_percent).await {
          warn!("failed to set initial volume: {:#}", e);
        }
      }
      if events.send(event).is_err() {
        return;
      }
    }
  }
}

#[derive(Clone, Copy, Debug)]
enum Command {
  Previous,
  Pause,
  Resume,
  Next,
}

pub struct ConnectDevice<W: WebApi> {
  web_api: Arc<W>,
  token: SessionToken,
  runtime: Handle,
  paused: Arc<AtomicBool>,
  disconnected: AtomicBool,
  poller: Mutex<Option<JoinHandle<()>>>,
}

impl<W: WebApi> ConnectDevice<W> {
  fn send(&self, command: Command) {
    if self.disconnected.load(Ordering::SeqCst) {
      return;
    }
    let web_api = Arc::clone(&self.web_api);
    let token = self.token.latest();
    self.runtime.spawn(async move {
      let result = match command {
        Command::Previous => web_api.previous_track(&token).await,
        Command::Pause => web_api.pause(&token).await,
        Command::Resume => web_api.resume(&token).await,
        Command::Next => web_api.next_track(&token).await,
      };
      if let Err(e) = result {
        warn!("{:?} failed: {:#}", command, e);
      }
    });
  }
}

impl<W: WebApi> PlaybackDevice for ConnectDevice<W> {
  fn previous_track(&self) {
    self.send(Command::Previous);
  }

  fn toggle_play(&self) {
    // Flipped locally until the next poll reports the real state
    let was_paused = self.paused.fetch_xor(true, Ordering::SeqCst);
    self.send(if was_paused {
      Command::Resume
    } else {
      Command::Pause
    });
  }

  fn next_track(&self) {
    self.send(Command::Next);
  }

  fn disconnect(&self) {
    self.disconnected.store(true, Ordering::SeqCst);
    let poller = match self.poller.lock() {
      Ok(mut guard) => guard.take(),
      Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(poller) = poller {
      poller.abort();
    }
  }
}
