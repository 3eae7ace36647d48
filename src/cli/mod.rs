//! Non-interactive subcommands that talk to the backend and the Web API directly.

mod clap;
mod util;

pub use self::clap::{play_subcommand, playback_subcommand, search_subcommand, token_subcommand};

use self::util::{format_output, Format, JumpDirection, PlaybackAction};
use crate::core::config::ClientConfig;
use crate::core::user_config::UserConfig;
use crate::infra::network::web_api::normalize_track_uri;
use crate::infra::network::{BackendApi, WebApi};
use ::clap::ArgMatches;
use anyhow::{anyhow, Result};
use log::info;

pub struct CliApp<B: BackendApi, W: WebApi> {
  pub backend: B,
  pub web_api: W,
  pub user_config: UserConfig,
  pub client_config: ClientConfig,
}

impl<B: BackendApi, W: WebApi> CliApp<B, W> {
  pub fn new(backend: B, web_api: W, user_config: UserConfig, client_config: ClientConfig) -> Self {
    CliApp {
      backend,
      web_api,
      user_config,
      client_config,
    }
  }

  async fn require_token(&self) -> Result<String> {
    let token = self.backend.fetch_token().await?;
    if token.is_empty() {
      Err(anyhow!(
        "Not logged in. Open {} in a browser first",
        self.client_config.login_url()
      ))
    } else {
      Ok(token)
    }
  }

  pub async fn token_status(&self) -> Result<String> {
    let token = self.backend.fetch_token().await?;
    Ok(if token.is_empty() {
      format!("Not logged in ({})", self.client_config.login_url())
    } else {
      "Logged in".to_string()
    })
  }

  pub async fn search(&self, query: &str) -> Result<String> {
    self.require_token().await?;
    let results = self.backend.search(query).await?;
    if results.is_empty() {
      return Ok(format!("No results for '{}'", query));
    }
    Ok(
      results
        .iter()
        .map(|item| item.label())
        .collect::<Vec<String>>()
        .join("\n"),
    )
  }

  pub async fn play_url(&self, url: &str) -> Result<String> {
    let token = self.require_token().await?;
    let track_uri = normalize_track_uri(&self.backend.play_by_url(url).await?)?;
    self
      .web_api
      .start_playback(&token, None, std::slice::from_ref(&track_uri))
      .await?;
    Ok(track_uri)
  }

  pub async fn playback(&self, action: PlaybackAction, format: &str) -> Result<String> {
    let token = self.require_token().await?;
    match action {
      PlaybackAction::Status => {}
      PlaybackAction::Toggle => {
        let playing = self
          .web_api
          .current_playback(&token)
          .await?
          .is_some_and(|snapshot| snapshot.is_playing);
        if playing {
          self.web_api.pause(&token).await?;
        } else {
          self.web_api.resume(&token).await?;
        }
      }
      PlaybackAction::Jump(JumpDirection::Next) => self.web_api.next_track(&token).await?,
      PlaybackAction::Jump(JumpDirection::Previous) => self.web_api.previous_track(&token).await?,
    }

    match self.web_api.current_playback(&token).await? {
      Some(snapshot) => Ok(format_output(
        format.to_string(),
        Format::from_snapshot(&snapshot),
        &self.user_config,
      )),
      None => Err(anyhow!("No active Spotify device")),
    }
  }
}

pub async fn handle_matches<B: BackendApi, W: WebApi>(
  matches: &ArgMatches,
  cmd: &str,
  cli: CliApp<B, W>,
) -> Result<String> {
  info!("running subcommand {}", cmd);
  match cmd {
    "token" => cli.token_status().await,
    "search" => {
      // Enforced by clap
      let query = matches
        .get_one::<String>("search")
        .ok_or_else(|| anyhow!("missing search query"))?;
      cli.search(query).await
    }
    "play" => {
      let url = matches
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("missing url"))?;
      cli.play_url(url).await
    }
    "playback" => {
      let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("%s %t - %a");
      cli
        .playback(PlaybackAction::from_matches(matches), format)
        .await
    }
    _ => Err(anyhow!("unknown subcommand '{}'", cmd)),
  }
}
