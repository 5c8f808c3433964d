use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// Lock-free counters for the cache, updated in lockstep with the engine's
/// accounting. The `bytes` gauge mirrors the engine's byte budget exactly.
#[derive(Debug, Default)]
pub struct Metrics {
  pub(crate) hits: CachePadded<AtomicU64>,
  pub(crate) misses: CachePadded<AtomicU64>,
  pub(crate) puts_stored: CachePadded<AtomicU64>,
  pub(crate) puts_rejected: CachePadded<AtomicU64>,
  pub(crate) victimizations: CachePadded<AtomicU64>,
  pub(crate) ghosts_retired: CachePadded<AtomicU64>,
  pub(crate) entries_compressed: CachePadded<AtomicU64>,
  pub(crate) decompress_failures: CachePadded<AtomicU64>,
  pub(crate) bytes: CachePadded<AtomicU64>,
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub(crate) fn add_bytes(&self, n: u64) {
    self.bytes.fetch_add(n, Ordering::Relaxed);
  }

  #[inline]
  pub(crate) fn sub_bytes(&self, n: u64) {
    self.bytes.fetch_sub(n, Ordering::Relaxed);
  }

  /// A point-in-time copy of the counters. `objects` and `history` are
  /// filled in by the cache handle, which reads them under the region lock.
  pub(crate) fn snapshot(&self) -> MetricsSnapshot {
    let hits = self.hits.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let lookups = hits + misses;
    MetricsSnapshot {
      hits,
      misses,
      hit_ratio: if lookups == 0 {
        0.0
      } else {
        hits as f64 / lookups as f64
      },
      puts_stored: self.puts_stored.load(Ordering::Relaxed),
      puts_rejected: self.puts_rejected.load(Ordering::Relaxed),
      victimizations: self.victimizations.load(Ordering::Relaxed),
      ghosts_retired: self.ghosts_retired.load(Ordering::Relaxed),
      entries_compressed: self.entries_compressed.load(Ordering::Relaxed),
      decompress_failures: self.decompress_failures.load(Ordering::Relaxed),
      bytes: self.bytes.load(Ordering::Relaxed),
      objects: 0,
      history: 0,
    }
  }
}

/// A public, point-in-time snapshot of the cache's counters.
#[derive(Clone)]
pub struct MetricsSnapshot {
  /// Lookups answered from the resident queue.
  pub hits: u64,
  /// Lookups that missed, including ghost hits.
  pub misses: u64,
  /// hits / (hits + misses).
  pub hit_ratio: f64,
  /// Puts that installed or updated a resident entry.
  pub puts_stored: u64,
  /// Puts rejected by the seen filter, the value contest, or capacity.
  pub puts_rejected: u64,
  /// Resident entries demoted to ghosts.
  pub victimizations: u64,
  /// Ghosts retired by the history clock.
  pub ghosts_retired: u64,
  /// Entries compressed by the background sweep.
  pub entries_compressed: u64,
  /// Entries destroyed because their payload failed to decompress.
  pub decompress_failures: u64,
  /// Bytes currently charged against the budget, entry overhead included.
  pub bytes: u64,
  /// Entries on the resident queue.
  pub objects: u64,
  /// Ghosts on the history queue.
  pub history: u64,
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("hit_ratio", &format!("{:.2}%", self.hit_ratio * 100.0))
      .field("puts_stored", &self.puts_stored)
      .field("puts_rejected", &self.puts_rejected)
      .field("victimizations", &self.victimizations)
      .field("ghosts_retired", &self.ghosts_retired)
      .field("entries_compressed", &self.entries_compressed)
      .field("decompress_failures", &self.decompress_failures)
      .field("bytes", &self.bytes)
      .field("objects", &self.objects)
      .field("history", &self.history)
      .finish()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn snapshot_computes_the_hit_ratio() {
    let metrics = Metrics::new();
    assert_eq!(metrics.snapshot().hit_ratio, 0.0);

    metrics.hits.store(3, Ordering::Relaxed);
    metrics.misses.store(1, Ordering::Relaxed);
    let snap = metrics.snapshot();
    assert_eq!(snap.hits, 3);
    assert_eq!(snap.misses, 1);
    assert!((snap.hit_ratio - 0.75).abs() < f64::EPSILON);
  }

  #[test]
  fn bytes_gauge_moves_both_ways() {
    let metrics = Metrics::new();
    metrics.add_bytes(500);
    metrics.sub_bytes(120);
    assert_eq!(metrics.snapshot().bytes, 380);
  }
}
