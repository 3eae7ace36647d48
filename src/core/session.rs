use std::sync::{Arc, RwLock};

/// In-memory access token shared between the app state and the playback device.
///
/// Cloning shares the same slot, so a device holding a clone always reads the
/// latest token the fetcher stored. Nothing here refreshes or persists it.
#[derive(Clone, Default, Debug)]
pub struct SessionToken {
  inner: Arc<RwLock<String>>,
}

impl SessionToken {
  pub fn new() -> Self {
    SessionToken::default()
  }

  pub fn set(&self, token: impl Into<String>) {
    let token = token.into();
    match self.inner.write() {
      Ok(mut slot) => *slot = token,
      Err(poisoned) => *poisoned.into_inner() = token,
    }
  }

  pub fn clear(&self) {
    self.set(String::new());
  }

  pub fn latest(&self) -> String {
    match self.inner.read() {
      Ok(slot) => slot.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }

  pub fn is_present(&self) -> bool {
    match self.inner.read() {
      Ok(slot) => !slot.is_empty(),
      Err(poisoned) => !poisoned.into_inner().is_empty(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_observe_updates() {
    let token = SessionToken::new();
    let device_copy = token.clone();
    assert!(!device_copy.is_present());

    token.set("abc");
    assert_eq!(device_copy.latest(), "abc");

    token.set("def");
    assert_eq!(device_copy.latest(), "def");

    token.clear();
    assert!(!device_copy.is_present());
  }
}
