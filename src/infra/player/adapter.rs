use super::{DeviceConfig, DeviceFactory, DeviceHandle, SdkLoader};
use crate::core::app::App;
use log::{debug, info};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Owns one playback device for as long as the playback view is shown.
///
/// Mounting runs the factory's one-time setup, creates the device in the
/// background and relays its notifications into [`App`]. Dropping the adapter
/// disconnects the device and stops the relay.
pub struct PlaybackAdapter {
  device: Arc<StdMutex<Option<DeviceHandle>>>,
  relay: JoinHandle<()>,
}

impl PlaybackAdapter {
  /// Must be called from within a tokio runtime.
  pub fn mount<F: DeviceFactory>(
    loader: &'static SdkLoader,
    factory: Arc<F>,
    config: DeviceConfig,
    app: Arc<Mutex<App>>,
  ) -> PlaybackAdapter {
    if loader.load_once(|| factory.load_sdk()) {
      info!("player runtime loaded");
    }

    let device = Arc::new(StdMutex::new(None));
    let slot = Arc::clone(&device);
    let relay = tokio::spawn(async move {
      app.lock().await.begin_device_connection();

      let (events_tx, mut events_rx) = unbounded_channel();
      let handle = match factory.create(config, events_tx).await {
        Ok(handle) => handle,
        Err(e) => {
          let mut app = app.lock().await;
          app.detach_device();
          app.handle_error(e.context("Could not create playback device"));
          return;
        }
      };
      // Stored before the next await so an unmount always finds it
      store_device(&slot, Some(handle.clone()));
      app.lock().await.attach_device(handle);

      while let Some(event) = events_rx.recv().await {
        debug!("device event {:?}", event);
        app.lock().await.apply_device_event(event);
      }
      debug!("device event channel closed");
    });

    PlaybackAdapter { device, relay }
  }

  /// Tears the device down and forgets everything it reported.
  pub fn unmount(self, app: &mut App) {
    app.detach_device();
    drop(self);
  }
}

fn store_device(slot: &StdMutex<Option<DeviceHandle>>, device: Option<DeviceHandle>) -> Option<DeviceHandle> {
  match slot.lock() {
    Ok(mut guard) => std::mem::replace(&mut *guard, device),
    Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), device),
  }
}

impl Drop for PlaybackAdapter {
  fn drop(&mut self) {
    self.relay.abort();
    if let Some(device) = store_device(&self.device, None) {
      info!("disconnecting playback device");
      device.disconnect();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::app::{DeviceStatus, TransportButton};
  use crate::core::model::{PlaybackState, Track};
  use crate::core::session::SessionToken;
  use crate::infra::player::{DeviceEvent, PlaybackDevice};
  use anyhow::{anyhow, Result};
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::time::Duration;
  use tokio::sync::mpsc::UnboundedSender;

  #[derive(Default)]
  struct FakeDevice {
    calls: StdMutex<Vec<&'static str>>,
  }

  impl PlaybackDevice for FakeDevice {
    fn previous_track(&self) {
      self.calls.lock().unwrap().push("previous");
    }
    fn toggle_play(&self) {
      self.calls.lock().unwrap().push("toggle");
    }
    fn next_track(&self) {
      self.calls.lock().unwrap().push("next");
    }
    fn disconnect(&self) {
      self.calls.lock().unwrap().push("disconnect");
    }
  }

  #[derive(Default)]
  struct FakeFactory {
    loads: AtomicUsize,
    fail: bool,
    devices: StdMutex<Vec<Arc<FakeDevice>>>,
    names: StdMutex<Vec<String>>,
    events: StdMutex<Option<UnboundedSender<DeviceEvent>>>,
  }

  impl FakeFactory {
    fn emit(&self, event: DeviceEvent) {
      if let Some(tx) = self.events.lock().unwrap().as_ref() {
        tx.send(event).unwrap();
      }
    }

    fn device(&self, index: usize) -> Arc<FakeDevice> {
      Arc::clone(&self.devices.lock().unwrap()[index])
    }
  }

  impl DeviceFactory for FakeFactory {
    fn load_sdk(&self) {
      self.loads.fetch_add(1, Ordering::SeqCst);
    }

    async fn create(
      &self,
      config: DeviceConfig,
      events: UnboundedSender<DeviceEvent>,
    ) -> Result<DeviceHandle> {
      if self.fail {
        return Err(anyhow!("no audio output"));
      }
      let device = Arc::new(FakeDevice::default());
      self.names.lock().unwrap().push(config.name);
      self.devices.lock().unwrap().push(Arc::clone(&device));
      *self.events.lock().unwrap() = Some(events);
      Ok(device)
    }
  }

  fn config(token: &SessionToken) -> DeviceConfig {
    DeviceConfig {
      name: "Web Playback Device".to_string(),
      volume_percent: 10,
      token: token.clone(),
    }
  }

  fn track(name: &str, artist: &str) -> Track {
    serde_json::from_value(serde_json::json!({
      "name": name,
      "artists": [{ "name": artist }],
      "album": { "images": [{ "url": "img" }] }
    }))
    .unwrap()
  }

  async fn eventually(app: &Arc<Mutex<App>>, check: impl Fn(&App) -> bool) {
    for _ in 0..200 {
      if check(&*app.lock().await) {
        return;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
  }

  #[tokio::test]
  async fn runtime_loads_once_across_remounts() {
    static LOADER: SdkLoader = SdkLoader::new();
    let app = Arc::new(Mutex::new(App::default()));
    let factory = Arc::new(FakeFactory::default());
    let token = SessionToken::new();

    let first = PlaybackAdapter::mount(&LOADER, Arc::clone(&factory), config(&token), Arc::clone(&app));
    eventually(&app, |app| app.device.is_some()).await;
    first.unmount(&mut *app.lock().await);

    let second = PlaybackAdapter::mount(&LOADER, Arc::clone(&factory), config(&token), Arc::clone(&app));
    eventually(&app, |app| app.device.is_some()).await;

    assert_eq!(factory.loads.load(Ordering::SeqCst), 1);
    assert_eq!(LOADER.injections(), 1);
    assert_eq!(factory.devices.lock().unwrap().len(), 2);
    assert_eq!(*factory.device(0).calls.lock().unwrap(), vec!["disconnect"]);
    drop(second);
  }

  #[tokio::test]
  async fn relays_events_and_forwards_commands() {
    static LOADER: SdkLoader = SdkLoader::new();
    let app = Arc::new(Mutex::new(App::default()));
    app.lock().await.set_token("abc".to_string());
    let factory = Arc::new(FakeFactory::default());
    let token = app.lock().await.token.clone();

    let adapter = PlaybackAdapter::mount(&LOADER, Arc::clone(&factory), config(&token), Arc::clone(&app));
    eventually(&app, |app| app.device.is_some()).await;
    assert_eq!(
      *factory.names.lock().unwrap(),
      vec!["Web Playback Device".to_string()]
    );

    factory.emit(DeviceEvent::Ready {
      device_id: "dev1".to_string(),
    });
    factory.emit(DeviceEvent::StateChanged(Some(PlaybackState::new(
      track("X", "Y"),
      false,
    ))));
    eventually(&app, |app| app.current_track.is_some()).await;

    {
      let mut app = app.lock().await;
      assert_eq!(app.device_id.as_deref(), Some("dev1"));
      assert_eq!(
        app.device_status,
        DeviceStatus::ReadyActive {
          device_id: "dev1".to_string()
        }
      );
      assert!(!app.is_paused);
      app.press_button(TransportButton::TogglePlay);
    }
    assert_eq!(*factory.device(0).calls.lock().unwrap(), vec!["toggle"]);

    adapter.unmount(&mut *app.lock().await);
    assert_eq!(
      *factory.device(0).calls.lock().unwrap(),
      vec!["toggle", "disconnect"]
    );
    let app = app.lock().await;
    assert!(app.device.is_none());
    assert!(app.current_track.is_none());
  }

  #[tokio::test]
  async fn creation_failure_is_reported() {
    static LOADER: SdkLoader = SdkLoader::new();
    let app = Arc::new(Mutex::new(App::default()));
    let factory = Arc::new(FakeFactory {
      fail: true,
      ..Default::default()
    });

    let _adapter = PlaybackAdapter::mount(
      &LOADER,
      Arc::clone(&factory),
      config(&SessionToken::new()),
      Arc::clone(&app),
    );
    eventually(&app, |app| app.status_message.is_some()).await;

    let app = app.lock().await;
    assert!(app.device.is_none());
    assert_eq!(app.device_status, DeviceStatus::Uninitialized);
    assert!(app
      .status_message
      .as_deref()
      .is_some_and(|m| m.starts_with("Could not create playback device")));
  }
}
