pub mod auth;
pub mod backend;
pub mod playback;
pub mod search;
pub mod web_api;

use crate::core::app::App;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use self::backend::{BackendApi, BackendClient};
pub use self::web_api::{WebApi, WebApiClient};

use self::auth::AuthNetwork;
use self::playback::PlaybackNetwork;
use self::search::SearchNetwork;

#[derive(Debug)]
pub enum IoEvent {
  /// Ask the backend for the current access token.
  FetchToken,
  Search(String),
  /// Resolve a shared link through the backend and start it on our device.
  PlayByUrl(String),
}

pub struct Network<B: BackendApi, W: WebApi> {
  pub backend: B,
  pub web_api: W,
  pub app: Arc<Mutex<App>>,
}

impl<B: BackendApi, W: WebApi> Network<B, W> {
  pub fn new(backend: B, web_api: W, app: &Arc<Mutex<App>>) -> Self {
    Network {
      backend,
      web_api,
      app: Arc::clone(app),
    }
  }

  pub async fn handle_network_event(&mut self, io_event: IoEvent) {
    match io_event {
      IoEvent::FetchToken => {
        self.fetch_token().await;
      }
      IoEvent::Search(query) => {
        self.search(query).await;
      }
      IoEvent::PlayByUrl(url) => {
        self.play_by_url(url).await;
      }
    };

    {
      let mut app = self.app.lock().await;
      app.is_loading = false;
    }
  }

  async fn handle_error(&mut self, e: anyhow::Error) {
    let mut app = self.app.lock().await;
    app.handle_error(e);
  }

  async fn show_status_message(&self, message: String, ttl_secs: u64) {
    self.app.lock().await.set_status_message(message, ttl_secs);
  }
}
