use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::shared::CacheShared;

/// The background thread that periodically compresses resident entries.
///
/// Spawned by the builder when compression is enabled. The first sweep runs
/// one full interval after spawn; each sweep yields the region lock around
/// every codec invocation so reads and writes interleave freely.
pub(crate) struct Sweeper {
  _handle: JoinHandle<()>,
  stop_flag: Arc<AtomicBool>,
}

impl Sweeper {
  pub(crate) fn spawn(shared: Arc<CacheShared>, interval: Duration, batch: usize) -> Self {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop = stop_flag.clone();

    let handle = thread::spawn(move || loop {
      thread::sleep(interval);
      if stop.load(Ordering::Relaxed) {
        break;
      }
      shared.compress_sweep(batch);
    });

    Self {
      _handle: handle,
      stop_flag,
    }
  }

  /// Signals the sweeper thread to stop at its next tick.
  pub(crate) fn stop(self) {
    self.stop_flag.store(true, Ordering::Relaxed);
  }
}
