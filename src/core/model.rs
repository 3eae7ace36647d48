//! Display-only projections of the entities the external player owns.
//!
//! These deserialize the SDK's `current_track` payload directly. Web API responses
//! arrive as rspotify models and are mapped onto the same types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Image {
  pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Album {
  #[serde(default)]
  pub images: Vec<Image>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Artist {
  pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Track {
  pub name: String,
  #[serde(default)]
  pub album: Album,
  #[serde(default)]
  pub artists: Vec<Artist>,
  #[serde(default)]
  pub preview_url: Option<String>,
}

impl Track {
  pub fn artists_display(&self) -> String {
    self
      .artists
      .iter()
      .map(|artist| artist.name.as_str())
      .collect::<Vec<&str>>()
      .join(", ")
  }

  pub fn album_cover_url(&self) -> Option<&str> {
    self.album.images.first().map(|image| image.url.as_str())
  }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TrackWindow {
  pub current_track: Track,
}

/// Payload of a state-changed notification.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PlaybackState {
  pub paused: bool,
  pub track_window: TrackWindow,
}

impl PlaybackState {
  pub fn new(track: Track, paused: bool) -> Self {
    PlaybackState {
      paused,
      track_window: TrackWindow {
        current_track: track,
      },
    }
  }
}

/// Opaque record returned by the backend search proxy.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct SearchResultItem(pub Value);

impl SearchResultItem {
  pub fn label(&self) -> String {
    let name = self.0.get("name").and_then(Value::as_str);
    let artists = self
      .0
      .get("artists")
      .and_then(Value::as_array)
      .map(|artists| {
        artists
          .iter()
          .filter_map(|artist| artist.get("name").and_then(Value::as_str))
          .collect::<Vec<&str>>()
          .join(", ")
      })
      .filter(|artists| !artists.is_empty());

    match (name, artists) {
      (Some(name), Some(artists)) => format!("{} - {}", name, artists),
      (Some(name), None) => name.to_string(),
      _ => self.0.to_string(),
    }
  }
}
