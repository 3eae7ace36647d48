use super::web_api::normalize_track_uri;
use super::{BackendApi, Network, WebApi};
use anyhow::{anyhow, Result};
use log::info;

pub trait PlaybackNetwork {
  async fn play_by_url(&mut self, url: String);
}

impl<B: BackendApi, W: WebApi> Network<B, W> {
  async fn start_shared_link(&self, url: &str) -> Result<String> {
    let track_uri = self.backend.play_by_url(url).await?;
    let track_uri = normalize_track_uri(&track_uri)?;

    let (token, device_id) = {
      let app = self.app.lock().await;
      (app.token.latest(), app.device_id.clone())
    };
    if token.is_empty() {
      return Err(anyhow!("Log in before playing a link"));
    }

    self
      .web_api
      .start_playback(&token, device_id.as_deref(), &[track_uri.clone()])
      .await?;
    Ok(track_uri)
  }
}

impl<B: BackendApi, W: WebApi> PlaybackNetwork for Network<B, W> {
  async fn play_by_url(&mut self, url: String) {
    match self.start_shared_link(&url).await {
      Ok(track_uri) => {
        info!("started {} from {}", track_uri, url);
        self.show_status_message(format!("Playing {}", track_uri), 3).await;
      }
      Err(e) => {
        self.handle_error(e.context("Could not play link")).await;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::super::fakes::{FakeBackend, FakeWebApi};
  use super::*;
  use crate::core::app::App;
  use crate::infra::player::DeviceEvent;
  use std::sync::Arc;
  use tokio::sync::Mutex;

  const URI: &str = "spotify:track:4uLU6hMCjMI75M1A2tKUQC";

  fn setup(
    track_uri: Option<&str>,
    web_api: FakeWebApi,
  ) -> (Network<FakeBackend, FakeWebApi>, Arc<Mutex<App>>) {
    let app = Arc::new(Mutex::new(App::default()));
    let backend = FakeBackend {
      track_uri: track_uri.map(str::to_string),
      ..Default::default()
    };
    (Network::new(backend, web_api, &app), app)
  }

  #[tokio::test]
  async fn starts_resolved_track_on_own_device() {
    let (mut network, app) = setup(Some(URI), FakeWebApi::default());
    {
      let mut app = app.lock().await;
      app.set_token("abc".to_string());
      app.apply_device_event(DeviceEvent::Ready {
        device_id: "dev1".to_string(),
      });
    }

    network
      .play_by_url("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC".to_string())
      .await;

    assert_eq!(
      *network.web_api.calls.lock().unwrap(),
      vec![(
        "play".to_string(),
        "abc".to_string(),
        format!("dev1|{}", URI)
      )]
    );
    assert_eq!(
      app.lock().await.status_message.as_deref(),
      Some("Playing spotify:track:4uLU6hMCjMI75M1A2tKUQC")
    );
  }

  #[tokio::test]
  async fn rejects_non_track_uri() {
    let (mut network, app) = setup(Some("spotify:album:4uLU6hMCjMI75M1A2tKUQC"), FakeWebApi::default());
    app.lock().await.set_token("abc".to_string());

    network.play_by_url("https://open.spotify.com/album/x".to_string()).await;

    assert!(network.web_api.calls.lock().unwrap().is_empty());
    assert!(app
      .lock()
      .await
      .status_message
      .as_deref()
      .is_some_and(|m| m.starts_with("Could not play link")));
  }

  #[tokio::test]
  async fn needs_a_token() {
    let (mut network, app) = setup(Some(URI), FakeWebApi::default());

    network.play_by_url("https://open.spotify.com/track/x".to_string()).await;

    assert!(network.web_api.calls.lock().unwrap().is_empty());
    assert!(app.lock().await.status_message.is_some());
  }

  #[tokio::test]
  async fn success_replaces_an_earlier_error() {
    let (mut network, app) = setup(Some(URI), FakeWebApi::default());
    {
      let mut app = app.lock().await;
      app.set_token("abc".to_string());
      app.handle_error(anyhow!("Search failed"));
    }

    network.play_by_url("https://open.spotify.com/track/x".to_string()).await;

    let app = app.lock().await;
    assert_eq!(
      app.status_message.as_deref(),
      Some("Playing spotify:track:4uLU6hMCjMI75M1A2tKUQC")
    );
    assert!(!app.status_is_error);
    assert!(app.status_message_expires_at.is_some());
  }

  #[tokio::test]
  async fn reports_web_api_failure() {
    let web_api = FakeWebApi {
      fail: true,
      ..Default::default()
    };
    let (mut network, app) = setup(Some(URI), web_api);
    app.lock().await.set_token("abc".to_string());

    network.play_by_url("https://open.spotify.com/track/x".to_string()).await;

    assert_eq!(network.web_api.endpoints(), vec!["play".to_string()]);
    assert!(app
      .lock()
      .await
      .status_message
      .as_deref()
      .is_some_and(|m| m.starts_with("Could not play link")));
  }
}
