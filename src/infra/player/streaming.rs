//! Local Spotify Connect device backed by librespot.
//!
//! The terminal itself becomes a Connect device with its own audio output and
//! shows up in the Spotify apps under the configured name.

use super::{DeviceConfig, DeviceEvent, DeviceFactory, DeviceHandle, PlaybackDevice};
use crate::core::model::{Album, Artist, Image, PlaybackState, Track};
use anyhow::{anyhow, Context, Result};
use librespot_connect::{ConnectConfig, Spirc};
use librespot_core::{
  authentication::Credentials,
  config::{DeviceType, SessionConfig},
  session::Session,
};
use librespot_metadata::audio::{AudioItem, UniqueFields};
use librespot_playback::{
  audio_backend,
  config::{AudioFormat, Bitrate, PlayerConfig},
  convert::Converter,
  decoder::AudioPacket,
  mixer::{softmixer::SoftMixer, Mixer, MixerConfig},
  player::{Player, PlayerEvent, PlayerEventChannel},
};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

const INIT_TIMEOUT_SECS: u64 = 30;

#[derive(Default)]
struct NullSink;

impl audio_backend::Open for NullSink {
  fn open(_: Option<String>, _: AudioFormat) -> Self {
    Self
  }
}

impl audio_backend::Sink for NullSink {
  fn write(&mut self, _: AudioPacket, _: &mut Converter) -> audio_backend::SinkResult<()> {
    Ok(())
  }
}

pub struct StreamingFactory {
  bitrate: u16,
}

impl StreamingFactory {
  pub fn new(bitrate: u16) -> Self {
    StreamingFactory { bitrate }
  }
}

fn volume_to_mixer(volume_percent: u8) -> u16 {
  (f64::from(volume_percent.min(100)) / 100.0 * 65535.0).round() as u16
}

fn bitrate(kbps: u16) -> Bitrate {
  match kbps {
    96 => Bitrate::Bitrate96,
    160 => Bitrate::Bitrate160,
    _ => Bitrate::Bitrate320,
  }
}

impl DeviceFactory for StreamingFactory {
  fn load_sdk(&self) {
    let backends = audio_backend::BACKENDS
      .iter()
      .map(|(name, _)| *name)
      .collect::<Vec<_>>()
      .join(", ");
    info!("librespot audio backends: {}", backends);
  }

  async fn create(
    &self,
    config: DeviceConfig,
    events: UnboundedSender<DeviceEvent>,
  ) -> Result<DeviceHandle> {
    let access_token = config.token.latest();
    if access_token.is_empty() {
      return Err(anyhow!("No access token for the streaming device"));
    }
    let credentials = Credentials::with_access_token(access_token);
    let session = Session::new(SessionConfig::default(), None);

    let player_config = PlayerConfig {
      bitrate: bitrate(self.bitrate),
      ..Default::default()
    };

    let mixer =
      Arc::new(SoftMixer::open(MixerConfig::default()).context("Failed to open SoftMixer")?);
    let volume = volume_to_mixer(config.volume_percent);
    mixer.set_volume(volume);

    let backend = audio_backend::find(None).ok_or_else(|| anyhow!("No audio backend available"))?;
    let player = Player::new(
      player_config,
      session.clone(),
      mixer.get_soft_volume(),
      move || {
        match std::panic::catch_unwind(|| backend(None, AudioFormat::default())) {
          Ok(sink) => sink,
          Err(_) => {
            warn!("audio output unavailable, playing into a null sink");
            Box::new(NullSink)
          }
        }
      },
    );

    let connect_config = ConnectConfig {
      name: config.name.clone(),
      device_type: DeviceType::Computer,
      initial_volume: volume,
      is_group: false,
      disable_volume: false,
      volume_steps: 64,
    };

    let device_id = session.device_id().to_string();
    info!("starting Spirc as '{}' with device_id={}", config.name, device_id);

    let spirc_new = Spirc::new(
      connect_config,
      session.clone(),
      credentials,
      player.clone(),
      mixer.clone(),
    );
    let (spirc, spirc_task) = match timeout(Duration::from_secs(INIT_TIMEOUT_SECS), spirc_new).await
    {
      Ok(Ok(result)) => result,
      Ok(Err(e)) => return Err(anyhow!("Failed to create Spirc: {:?}", e)),
      Err(_) => {
        return Err(anyhow!(
          "Spirc initialization timed out after {}s",
          INIT_TIMEOUT_SECS
        ))
      }
    };
    tokio::spawn(spirc_task);

    let relay = tokio::spawn(relay_player_events(
      player.get_player_event_channel(),
      device_id,
      events,
    ));

    Ok(Arc::new(StreamingDevice {
      spirc,
      relay: Mutex::new(Some(relay)),
    }))
  }
}

fn track_from_audio_item(audio_item: &AudioItem) -> Track {
  let artists = match &audio_item.unique_fields {
    UniqueFields::Track { artists, .. } => artists.0.iter().map(|a| a.name.clone()).collect(),
    UniqueFields::Episode { show_name, .. } => vec![show_name.clone()],
    UniqueFields::Local { artists, .. } => artists.iter().cloned().collect(),
  };

  Track {
    name: audio_item.name.clone(),
    album: Album {
      images: audio_item
        .covers
        .first()
        .map(|cover| Image {
          url: cover.url.clone(),
        })
        .into_iter()
        .collect(),
    },
    artists: artists.into_iter().map(|name| Artist { name }).collect(),
    preview_url: None,
  }
}

async fn relay_player_events(
  mut event_rx: PlayerEventChannel,
  device_id: String,
  events: UnboundedSender<DeviceEvent>,
) {
  let mut current: Option<Track> = None;
  let mut paused = true;

  if events
    .send(DeviceEvent::Ready {
      device_id: device_id.clone(),
    })
    .is_err()
  {
    return;
  }

  while let Some(event) = event_rx.recv().await {
    let state = match event {
      PlayerEvent::TrackChanged { audio_item } => {
        current = Some(track_from_audio_item(&audio_item));
        current.clone().map(|track| PlaybackState::new(track, paused))
      }
      PlayerEvent::Playing { .. } => {
        paused = false;
        current.clone().map(|track| PlaybackState::new(track, paused))
      }
      PlayerEvent::Paused { .. } => {
        paused = true;
        current.clone().map(|track| PlaybackState::new(track, paused))
      }
      PlayerEvent::Stopped { .. } => {
        current = None;
        None
      }
      _ => continue,
    };
    if events.send(DeviceEvent::StateChanged(state)).is_err() {
      return;
    }
  }

  let _ = events.send(DeviceEvent::NotReady { device_id });
}

pub struct StreamingDevice {
  spirc: Spirc,
  relay: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackDevice for StreamingDevice {
  fn previous_track(&self) {
    let _ = self.spirc.prev();
  }

  fn toggle_play(&self) {
    let _ = self.spirc.play_pause();
  }

  fn next_track(&self) {
    let _ = self.spirc.next();
  }

  fn disconnect(&self) {
    let _ = self.spirc.shutdown();
    let relay = match self.relay.lock() {
      Ok(mut guard) => guard.take(),
      Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(relay) = relay {
      relay.abort();
    }
  }
}
