use crate::core::user_config::UserConfig;
use crate::infra::network::web_api::PlayerSnapshot;
use clap::ArgMatches;

// Possible directions to jump to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpDirection {
  Next,
  Previous,
}

// What `playback` should do before printing the state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackAction {
  Status,
  Toggle,
  Jump(JumpDirection),
}

impl PlaybackAction {
  pub fn from_matches(m: &ArgMatches) -> Self {
    if m.get_flag("toggle") {
      Self::Toggle
    } else if m.get_flag("next") {
      Self::Jump(JumpDirection::Next)
    } else if m.get_flag("previous") {
      Self::Jump(JumpDirection::Previous)
    } else {
      Self::Status
    }
  }
}

// Types that can be formatted (-f / --format flag)
#[derive(Clone, Debug)]
pub enum Format {
  Artist(String),
  Track(String),
  Device(String),
  Playing(bool),
}

impl Format {
  pub fn from_snapshot(snapshot: &PlayerSnapshot) -> Vec<Self> {
    let mut formats = vec![Self::Playing(snapshot.is_playing)];
    if let Some(device) = &snapshot.device {
      formats.push(Self::Device(device.name.clone()));
    }
    if let Some(track) = &snapshot.item {
      formats.push(Self::Track(track.name.clone()));
      formats.push(Self::Artist(track.artists_display()));
    }
    formats
  }

  pub fn inner(&self, conf: &UserConfig) -> String {
    match self {
      Self::Artist(s) | Self::Track(s) | Self::Device(s) => s.clone(),
      Self::Playing(playing) => {
        if *playing {
          conf.behavior.playing_icon.clone()
        } else {
          conf.behavior.paused_icon.clone()
        }
      }
    }
  }

  pub fn get_placeholder(&self) -> &str {
    match self {
      Self::Artist(_) => "%a",
      Self::Track(_) => "%t",
      Self::Device(_) => "%d",
      Self::Playing(_) => "%s",
    }
  }
}

/// Fills in the placeholders of `format`; those without a value are dropped.
pub fn format_output(mut format: String, values: Vec<Format>, conf: &UserConfig) -> String {
  for val in values {
    format = format.replace(val.get_placeholder(), &val.inner(conf));
  }
  // Placeholders with no value
  for placeholder in ["%a", "%t", "%d"] {
    format = format.replace(placeholder, "");
  }
  format.trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::model::{Artist, Track};
  use crate::infra::network::web_api::PlayerDevice;

  fn snapshot(is_playing: bool) -> PlayerSnapshot {
    PlayerSnapshot {
      device: Some(PlayerDevice {
        id: Some("dev1".to_string()),
        name: "Kitchen".to_string(),
        volume_percent: Some(40),
      }),
      is_playing,
      item: Some(Track {
        name: "One More Time".to_string(),
        artists: vec![Artist {
          name: "Daft Punk".to_string(),
        }],
        ..Default::default()
      }),
    }
  }

  #[test]
  fn formats_playback_state() {
    let conf = UserConfig::new();
    let out = format_output(
      "%s %t - %a on %d".to_string(),
      Format::from_snapshot(&snapshot(true)),
      &conf,
    );
    assert_eq!(out, "▶ One More Time - Daft Punk on Kitchen");
  }

  #[test]
  fn paused_icon_when_not_playing() {
    let conf = UserConfig::new();
    let out = format_output(
      "%s %t".to_string(),
      Format::from_snapshot(&snapshot(false)),
      &conf,
    );
    assert_eq!(out, "⏸ One More Time");
  }

  #[test]
  fn missing_values_become_empty() {
    let conf = UserConfig::new();
    let out = format_output("%d %t".to_string(), vec![Format::Track("A".to_string())], &conf);
    assert_eq!(out, "A");
  }
}
