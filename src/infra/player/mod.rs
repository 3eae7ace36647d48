//! Playback devices and the adapter that relays their notifications to the app.
//!
//! A device is created by a [`DeviceFactory`] after the factory's one-time runtime
//! setup has run through the process-wide [`SdkLoader`]. The rest of the crate only
//! ever talks to [`PlaybackDevice`].

mod adapter;
mod connect;
mod loader;
#[cfg(feature = "streaming")]
mod streaming;

pub use adapter::PlaybackAdapter;
pub use connect::ConnectFactory;
pub use loader::{SdkLoader, SDK};
#[cfg(feature = "streaming")]
pub use streaming::StreamingFactory;

use crate::core::config::ClientConfig;
use crate::core::model::PlaybackState;
use crate::core::session::SessionToken;
use crate::infra::network::WebApiClient;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Notifications pushed by a device.
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
  Ready { device_id: String },
  NotReady { device_id: String },
  /// `None` means the device has no active playback, not an error.
  StateChanged(Option<PlaybackState>),
}

/// Fire-and-forget transport over an external playback device.
pub trait PlaybackDevice: Send + Sync {
  fn previous_track(&self);
  fn toggle_play(&self);
  fn next_track(&self);
  fn disconnect(&self);
}

pub type DeviceHandle = Arc<dyn PlaybackDevice>;

#[derive(Clone, Debug)]
pub struct DeviceConfig {
  pub name: String,
  pub volume_percent: u8,
  /// Read on every use, so it always yields the latest fetched token.
  pub token: SessionToken,
}

pub trait DeviceFactory: Send + Sync + 'static {
  /// Runtime setup that must happen once per process, before any device exists.
  fn load_sdk(&self) {}

  fn create(
    &self,
    config: DeviceConfig,
    events: UnboundedSender<DeviceEvent>,
  ) -> impl Future<Output = Result<DeviceHandle>> + Send;
}

/// The device implementation picked from the client config at startup.
pub enum DeviceBackend {
  Connect(ConnectFactory),
  #[cfg(feature = "streaming")]
  Streaming(StreamingFactory),
}

impl DeviceBackend {
  pub fn from_config(client_config: &ClientConfig) -> Result<DeviceBackend> {
    #[cfg(feature = "streaming")]
    if client_config.enable_streaming {
      return Ok(DeviceBackend::Streaming(StreamingFactory::new(
        client_config.streaming_bitrate,
      )));
    }
    #[cfg(not(feature = "streaming"))]
    if client_config.enable_streaming {
      log::warn!("enable_streaming is set but this build has no streaming support");
    }

    Ok(DeviceBackend::Connect(ConnectFactory::new(
      Arc::new(WebApiClient::new()),
      Duration::from_millis(client_config.poll_interval_ms),
    )))
  }

  pub fn name(&self) -> &'static str {
    match self {
      DeviceBackend::Connect(_) => "connect",
      #[cfg(feature = "streaming")]
      DeviceBackend::Streaming(_) => "streaming",
    }
  }
}

impl DeviceFactory for DeviceBackend {
  fn load_sdk(&self) {
    match self {
      DeviceBackend::Connect(factory) => factory.load_sdk(),
      #[cfg(feature = "streaming")]
      DeviceBackend::Streaming(factory) => factory.load_sdk(),
    }
  }

  async fn create(
    &self,
    config: DeviceConfig,
    events: UnboundedSender<DeviceEvent>,
  ) -> Result<DeviceHandle> {
    match self {
      DeviceBackend::Connect(factory) => factory.create(config, events).await,
      #[cfg(feature = "streaming")]
      DeviceBackend::Streaming(factory) => factory.create(config, events).await,
    }
  }
}
