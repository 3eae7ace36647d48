use crate::core::app::App;
use crate::infra::network::IoEvent;
use crate::tui::event::Key;
use anyhow::anyhow;
use log::info;

pub fn handler(key: Key, app: &mut App) {
  match key {
    k if k == app.user_config.keys.open_login => open_login_page(app),
    k if k == app.user_config.keys.refresh_token => app.dispatch(IoEvent::FetchToken),
    _ => {}
  }
}

pub fn open_login_page(app: &mut App) {
  let url = app.client_config.login_url();
  info!("opening {}", url);
  match open::that(&url) {
    Ok(()) => app.set_status_message(
      format!(
        "Finish logging in, then press {}",
        app.user_config.keys.refresh_token
      ),
      10,
    ),
    Err(e) => app.handle_error(anyhow!("failed to open {}: {}", url, e)),
  }
}
