use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::builder::CacheBuilder;
use crate::key::CacheKey;
use crate::metrics::MetricsSnapshot;
use crate::shared::CacheShared;
use crate::task::sweeper::Sweeper;

/// A size-bounded in-memory object cache with the CLFUS replacement policy.
///
/// One instance covers one region; independent regions get independent
/// caches. All operations are answered from memory under the region lock
/// and never surface an error: lookups hit or miss, writes are stored or
/// not stored.
pub struct RamCache {
  shared: Arc<CacheShared>,
  sweeper: Option<Sweeper>,
}

impl RamCache {
  pub(crate) fn new(shared: Arc<CacheShared>, sweeper: Option<Sweeper>) -> Self {
    Self { shared, sweeper }
  }

  /// Starts configuring a cache.
  pub fn builder() -> CacheBuilder {
    CacheBuilder::new()
  }

  /// Looks up a payload by full identity (digest plus both aux keys).
  ///
  /// A hit refreshes the entry's queue position and hit count, transparently
  /// decompressing entries the background sweep shrank. A ghost hit counts
  /// as a miss but keeps the ghost warm.
  pub fn get(&self, key: &CacheKey, auxkey1: u32, auxkey2: u32) -> Option<Bytes> {
    self.shared.get(key, auxkey1, auxkey2)
  }

  /// Offers a payload for admission. Returns `true` when the payload is
  /// resident on return.
  ///
  /// With `copy = false` the cache shares the given buffer; with
  /// `copy = true` it stores a private copy and `get` hands out fresh
  /// copies. A rejected put may still start the key's history so a repeat
  /// offer can win the admission contest.
  pub fn put(&self, key: &CacheKey, data: Bytes, copy: bool, auxkey1: u32, auxkey2: u32) -> bool {
    self.shared.put(key, data, copy, auxkey1, auxkey2)
  }

  /// Rewrites an entry's aux keys in place without touching its payload,
  /// hit count, or queue position. Returns `true` when the full old
  /// identity was found.
  pub fn fixup(
    &self,
    key: &CacheKey,
    old_auxkey1: u32,
    old_auxkey2: u32,
    new_auxkey1: u32,
    new_auxkey2: u32,
  ) -> bool {
    self
      .shared
      .fixup(key, old_auxkey1, old_auxkey2, new_auxkey1, new_auxkey2)
  }

  /// Runs one compression pass by hand, examining at most `max_entries`
  /// candidates. The background sweeper calls this on its own schedule; the
  /// method exists so hosts with their own timers can drive it instead.
  pub fn compress_sweep(&self, max_entries: usize) {
    self.shared.compress_sweep(max_entries);
  }

  /// A point-in-time snapshot of the cache's counters.
  pub fn metrics(&self) -> MetricsSnapshot {
    let mut snap = self.shared.metrics.snapshot();
    let state = self.shared.state.lock();
    snap.objects = state.objects;
    snap.history = state.history;
    snap
  }

  /// The configured byte budget. Zero means the cache is disabled.
  pub fn max_bytes(&self) -> u64 {
    self.shared.config.max_bytes
  }
}

impl fmt::Debug for RamCache {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RamCache")
      .field("max_bytes", &self.shared.config.max_bytes)
      .field("metrics", &self.shared.metrics.snapshot())
      .finish_non_exhaustive()
  }
}

impl Drop for RamCache {
  fn drop(&mut self) {
    if let Some(sweeper) = self.sweeper.take() {
      sweeper.stop();
    }
  }
}
