use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Process-wide slot for the player runtime, loaded at most once.
pub static SDK: SdkLoader = SdkLoader::new();

pub struct SdkLoader {
  loaded: OnceLock<()>,
  injections: AtomicUsize,
}

impl SdkLoader {
  pub const fn new() -> Self {
    SdkLoader {
      loaded: OnceLock::new(),
      injections: AtomicUsize::new(0),
    }
  }

  /// Runs `inject` unless a previous call already did. Returns whether this call
  /// performed the injection; concurrent callers block until it has finished.
  pub fn load_once(&self, inject: impl FnOnce()) -> bool {
    let mut injected = false;
    self.loaded.get_or_init(|| {
      inject();
      self.injections.fetch_add(1, Ordering::SeqCst);
      injected = true;
    });
    injected
  }

  #[cfg(test)]
  pub fn is_loaded(&self) -> bool {
    self.loaded.get().is_some()
  }

  #[cfg(test)]
  pub fn injections(&self) -> usize {
    self.injections.load(Ordering::SeqCst)
  }
}
