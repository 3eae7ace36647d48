//! Client for the auth backend that owns the OAuth flow and privileged lookups.

use crate::core::model::SearchResultItem;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
  #[serde(default)]
  pub results: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
pub struct PlayByUrlResponse {
  pub track_uri: String,
}

pub trait BackendApi: Send + Sync + 'static {
  /// `GET /auth/token`. An empty string means nobody has logged in yet.
  fn fetch_token(&self) -> impl Future<Output = Result<String>> + Send;

  /// `GET /auth/search?query=..`
  fn search(&self, query: &str) -> impl Future<Output = Result<Vec<SearchResultItem>>> + Send;

  /// `GET /auth/play_by_url?url=..`, resolves a shared link to a track uri.
  fn play_by_url(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Clone)]
pub struct BackendClient {
  base_url: reqwest::Url,
  http: reqwest::Client,
}

impl BackendClient {
  pub fn new(backend_url: &str) -> Result<Self> {
    // A trailing slash makes `join` append instead of replacing the last segment
    let base_url = reqwest::Url::parse(&format!("{}/", backend_url.trim_end_matches('/')))
      .with_context(|| format!("Invalid backend url '{}'", backend_url))?;
    Ok(BackendClient {
      base_url,
      http: reqwest::Client::new(),
    })
  }

  pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<reqwest::Url> {
    let mut url = self.base_url.join(path)?;
    if !query.is_empty() {
      let mut pairs = url.query_pairs_mut();
      for (k, v) in query {
        pairs.append_pair(k, v);
      }
    }
    Ok(url)
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
    let url = self.endpoint(path, query)?;
    let response = self
      .http
      .get(url.clone())
      .send()
      .await
      .map_err(|e| anyhow!("Backend request to {} failed: {}", url.path(), e))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(anyhow!("Backend {} failed: {} {}", url.path(), status, body));
    }

    response
      .json::<T>()
      .await
      .with_context(|| format!("Unexpected response from {}", url.path()))
  }
}

impl BackendApi for BackendClient {
  async fn fetch_token(&self) -> Result<String> {
    let response: TokenResponse = self.get_json("auth/token", &[]).await?;
    Ok(response.access_token)
  }

  async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>> {
    let response: SearchResponse = self.get_json("auth/search", &[("query", query)]).await?;
    Ok(response.results)
  }

  async fn play_by_url(&self, url: &str) -> Result<String> {
    let response: PlayByUrlResponse = self.get_json("auth/play_by_url", &[("url", url)]).await?;
    Ok(response.track_uri)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn builds_endpoints_under_base_path() {
    let client = BackendClient::new("http://localhost:5000/").unwrap();
    assert_eq!(
      client.endpoint("auth/token", &[]).unwrap().as_str(),
      "http://localhost:5000/auth/token"
    );

    let proxied = BackendClient::new("https://example.com/api").unwrap();
    assert_eq!(
      proxied
        .endpoint("auth/play_by_url", &[("url", "https://open.spotify.com/track/1?si=x&y=z")])
        .unwrap()
        .as_str(),
      "https://example.com/api/auth/play_by_url?url=https%3A%2F%2Fopen.spotify.com%2Ftrack%2F1%3Fsi%3Dx%26y%3Dz"
    );
  }

  #[test]
  fn rejects_invalid_base_url() {
    assert!(BackendClient::new("localhost 5000").is_err());
  }

  #[test]
  fn parses_backend_payloads() {
    let token: TokenResponse = serde_json::from_value(json!({ "access_token": "abc" })).unwrap();
    assert_eq!(token.access_token, "abc");

    let search: SearchResponse =
      serde_json::from_value(json!({ "results": [{ "name": "Song" }, 3] })).unwrap();
    assert_eq!(search.results.len(), 2);

    let empty: SearchResponse = serde_json::from_value(json!({})).unwrap();
    assert!(empty.results.is_empty());

    let play: PlayByUrlResponse =
      serde_json::from_value(json!({ "track_uri": "spotify:track:4uLU6hMCjMI75M1A2tKUQC" }))
        .unwrap();
    assert_eq!(play.track_uri, "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
  }
}
