use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
  fs,
  path::{Path, PathBuf},
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_DEVICE_NAME: &str = "Web Playback Device";
// It gets very loud otherwise
pub const DEFAULT_VOLUME_PERCENT: u8 = 10;
pub const DEFAULT_TRUNCATE_LENGTH: usize = 12;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const MIN_POLL_INTERVAL_MS: u64 = 200;

const FILE_NAME: &str = "client.yml";
pub const CONFIG_DIR: &str = ".config";
pub const APP_CONFIG_DIR: &str = "webplayback";

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfigString {
  pub backend_url: Option<String>,
  pub device_name: Option<String>,
  pub volume_percent: Option<u8>,
  pub truncate_length: Option<usize>,
  pub poll_interval_ms: Option<u64>,
  pub enable_streaming: Option<bool>,
  pub streaming_bitrate: Option<u16>,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
  pub backend_url: String,
  pub device_name: String,
  pub volume_percent: u8,
  pub truncate_length: usize,
  pub poll_interval_ms: u64,
  pub enable_streaming: bool,
  pub streaming_bitrate: u16,
  pub config_path: Option<PathBuf>,
}

impl Default for ClientConfig {
  fn default() -> Self {
    ClientConfig {
      backend_url: DEFAULT_BACKEND_URL.to_string(),
      device_name: DEFAULT_DEVICE_NAME.to_string(),
      volume_percent: DEFAULT_VOLUME_PERCENT,
      truncate_length: DEFAULT_TRUNCATE_LENGTH,
      poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
      enable_streaming: false,
      streaming_bitrate: 320,
      config_path: None,
    }
  }
}

/// `~/.config/webplayback`, created on demand.
pub fn app_config_dir() -> Result<PathBuf> {
  let home = dirs::home_dir().ok_or_else(|| anyhow!("No $HOME directory found for config"))?;
  let app_config_dir = home.join(CONFIG_DIR).join(APP_CONFIG_DIR);
  if !app_config_dir.exists() {
    fs::create_dir_all(&app_config_dir)?;
  }
  Ok(app_config_dir)
}

impl ClientConfig {
  pub fn new() -> ClientConfig {
    ClientConfig::default()
  }

  pub fn get_or_build_paths(&mut self) -> Result<PathBuf> {
    if let Some(path) = &self.config_path {
      return Ok(path.clone());
    }
    let path = app_config_dir()?.join(FILE_NAME);
    self.config_path = Some(path.clone());
    Ok(path)
  }

  pub fn load_config(&mut self) -> Result<()> {
    let path = self.get_or_build_paths()?;
    self.load_from_path(&path)
  }

  pub fn load_from_path(&mut self, path: &Path) -> Result<()> {
    if !path.exists() {
      return Ok(());
    }

    let config_string = fs::read_to_string(path)?;
    // serde fails if file is empty
    if config_string.trim().is_empty() {
      return Ok(());
    }

    let config_yml: ClientConfigString = serde_yaml::from_str(&config_string)
      .with_context(|| format!("Failed to parse {}", path.display()))?;
    self.apply(config_yml)
  }

  pub fn apply(&mut self, config: ClientConfigString) -> Result<()> {
    if let Some(backend_url) = config.backend_url {
      self.set_backend_url(&backend_url)?;
    }

    if let Some(device_name) = config.device_name {
      if device_name.trim().is_empty() {
        return Err(anyhow!("device_name must not be empty"));
      }
      self.device_name = device_name;
    }

    if let Some(volume) = config.volume_percent {
      self.volume_percent = volume.min(100);
    }

    if let Some(truncate_length) = config.truncate_length {
      if truncate_length == 0 {
        return Err(anyhow!("truncate_length must be at least 1"));
      }
      self.truncate_length = truncate_length;
    }

    if let Some(poll_interval) = config.poll_interval_ms {
      self.poll_interval_ms = poll_interval.max(MIN_POLL_INTERVAL_MS);
    }

    if let Some(enable_streaming) = config.enable_streaming {
      self.enable_streaming = enable_streaming;
    }

    if let Some(bitrate) = config.streaming_bitrate {
      match bitrate {
        96 | 160 | 320 => self.streaming_bitrate = bitrate,
        other => {
          return Err(anyhow!(
            "streaming_bitrate must be one of 96, 160 or 320, is {}",
            other
          ))
        }
      }
    }

    Ok(())
  }

  pub fn set_backend_url(&mut self, backend_url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(backend_url)
      .with_context(|| format!("Invalid backend_url '{}'", backend_url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
      return Err(anyhow!(
        "backend_url must be an http(s) url, got '{}'",
        backend_url
      ));
    }
    self.backend_url = backend_url.trim_end_matches('/').to_string();
    Ok(())
  }

  pub fn login_url(&self) -> String {
    format!("{}/auth/login", self.backend_url)
  }
}
