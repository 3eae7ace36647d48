//! Spotify Web API calls made with the session's bearer token.

use crate::core::model::{Album, Artist, Image, Track};
use anyhow::{anyhow, Result};
use chrono::{TimeDelta, Utc};
use rspotify::model::{
  AdditionalType, CurrentPlaybackContext, Device, PlayableId, PlayableItem, TrackId,
};
use rspotify::prelude::*;
use rspotify::{AuthCodeSpotify, Token};
use std::future::Future;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerDevice {
  pub id: Option<String>,
  pub name: String,
  pub volume_percent: Option<u32>,
}

impl From<Device> for PlayerDevice {
  fn from(device: Device) -> Self {
    PlayerDevice {
      id: device.id,
      name: device.name,
      volume_percent: device.volume_percent,
    }
  }
}

/// The subset of `GET /me/player` the remote device needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerSnapshot {
  pub device: Option<PlayerDevice>,
  pub is_playing: bool,
  pub item: Option<Track>,
}

impl From<CurrentPlaybackContext> for PlayerSnapshot {
  fn from(context: CurrentPlaybackContext) -> Self {
    PlayerSnapshot {
      device: Some(context.device.into()),
      is_playing: context.is_playing,
      item: context.item.map(track_from_item),
    }
  }
}

fn images(images: Vec<rspotify::model::Image>) -> Vec<Image> {
  images.into_iter().map(|image| Image { url: image.url }).collect()
}

fn track_from_item(item: PlayableItem) -> Track {
  match item {
    PlayableItem::Track(track) => Track {
      name: track.name,
      album: Album {
        images: images(track.album.images),
      },
      artists: track
        .artists
        .into_iter()
        .map(|artist| Artist { name: artist.name })
        .collect(),
      preview_url: track.preview_url,
    },
    // Episodes show the podcast where a track shows its artists
    PlayableItem::Episode(episode) => Track {
      name: episode.name,
      album: Album {
        images: images(episode.images),
      },
      artists: vec![Artist {
        name: episode.show.name,
      }],
      preview_url: episode.audio_preview_url,
    },
  }
}

pub trait WebApi: Send + Sync + 'static {
  /// `PUT /me/player/play` with `{ "uris": [..] }`.
  fn start_playback(
    &self,
    token: &str,
    device_id: Option<&str>,
    uris: &[String],
  ) -> impl Future<Output = Result<()>> + Send;

  /// `None` when there is no active device.
  fn current_playback(&self, token: &str)
    -> impl Future<Output = Result<Option<PlayerSnapshot>>> + Send;

  fn pause(&self, token: &str) -> impl Future<Output = Result<()>> + Send;

  fn resume(&self, token: &str) -> impl Future<Output = Result<()>> + Send;

  fn next_track(&self, token: &str) -> impl Future<Output = Result<()>> + Send;

  fn previous_track(&self, token: &str) -> impl Future<Output = Result<()>> + Send;

  fn set_volume(&self, token: &str, volume_percent: u8) -> impl Future<Output = Result<()>> + Send;
}

/// Accepts a base62 id or a `spotify:track:` uri and returns the canonical uri.
pub fn normalize_track_uri(id_or_uri: &str) -> Result<String> {
  let track_id = TrackId::from_id_or_uri(id_or_uri.trim())
    .map_err(|e| anyhow!("'{}' is not a Spotify track: {}", id_or_uri, e))?;
  Ok(track_id.uri())
}

/// A bearer token from the backend, without a refresh token, valid for an hour.
fn session_token(access_token: &str) -> Token {
  let lifetime = TimeDelta::seconds(3600);
  Token {
    access_token: access_token.to_string(),
    expires_in: lifetime,
    expires_at: Some(Utc::now() + lifetime),
    ..Default::default()
  }
}

#[derive(Clone, Debug, Default)]
pub struct WebApiClient;

impl WebApiClient {
  pub fn new() -> Self {
    WebApiClient
  }

  fn spotify(&self, token: &str) -> Result<AuthCodeSpotify> {
    if token.is_empty() {
      return Err(anyhow!("No access token available"));
    }
    Ok(AuthCodeSpotify::from_token(session_token(token)))
  }
}

impl WebApi for WebApiClient {
  async fn start_playback(
    &self,
    token: &str,
    device_id: Option<&str>,
    uris: &[String],
  ) -> Result<()> {
    let spotify = self.spotify(token)?;
    let tracks = uris
      .iter()
      .map(|uri| {
        TrackId::from_id_or_uri(uri)
          .map(PlayableId::Track)
          .map_err(|e| anyhow!("'{}' is not a Spotify track: {}", uri, e))
      })
      .collect::<Result<Vec<PlayableId>>>()?;
    spotify
      .start_uris_playback(tracks, device_id, None, None)
      .await?;
    Ok(())
  }

  async fn current_playback(&self, token: &str) -> Result<Option<PlayerSnapshot>> {
    let context = self
      .spotify(token)?
      .current_playback(
        None,
        Some(&[AdditionalType::Episode, AdditionalType::Track]),
      )
      .await?;
    Ok(context.map(PlayerSnapshot::from))
  }

  async fn pause(&self, token: &str) -> Result<()> {
    self.spotify(token)?.pause_playback(None).await?;
    Ok(())
  }

  async fn resume(&self, token: &str) -> Result<()> {
    self.spotify(token)?.resume_playback(None, None).await?;
    Ok(())
  }

  async fn next_track(&self, token: &str) -> Result<()> {
    self.spotify(token)?.next_track(None).await?;
    Ok(())
  }

  async fn previous_track(&self, token: &str) -> Result<()> {
    self.spotify(token)?.previous_track(None).await?;
    Ok(())
  }

  async fn set_volume(&self, token: &str, volume_percent: u8) -> Result<()> {
    self
      .spotify(token)?
      .volume(volume_percent.min(100), None)
      .await?;
    Ok(())
  }
}
