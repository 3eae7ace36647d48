use super::{BackendApi, Network, WebApi};
use log::info;

pub trait AuthNetwork {
  async fn fetch_token(&mut self);
}

impl<B: BackendApi, W: WebApi> AuthNetwork for Network<B, W> {
  async fn fetch_token(&mut self) {
    match self.backend.fetch_token().await {
      Ok(token) => {
        let logged_in = !token.is_empty();
        let mut app = self.app.lock().await;
        app.set_token(token);
        if logged_in {
          app.set_status_message("Logged in".to_string(), 3);
        } else {
          let key = app.user_config.keys.open_login;
          info!("no token yet, waiting for login");
          app.set_status_message(format!("Not logged in yet. Press {} to log in", key), 5);
        }
      }
      // The current token, if any, stays in place
      Err(e) => {
        self.handle_error(e.context("Could not fetch access token")).await;
      }
    }
  }
}
