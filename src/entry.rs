use bytes::Bytes;
use generational_arena::Index;

use crate::compression::CompressionAlgorithm;
use crate::key::CacheKey;

/// Intrusive prev/next pair threaded through the entry arena.
///
/// Each entry carries two of these: one for the queue it lives on and one for
/// its hash-chain membership.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Links {
  pub(crate) prev: Option<Index>,
  pub(crate) next: Option<Index>,
}

/// The unit stored in the resident and history queues.
///
/// An entry is resident (payload in memory, on the resident queue) or a ghost
/// (metadata only, on the history queue); `in_history` and `data` must agree
/// at all times.
#[derive(Debug)]
pub(crate) struct Entry {
  pub(crate) key: CacheKey,
  pub(crate) auxkey1: u32,
  pub(crate) auxkey2: u32,
  /// Incremented on every hit, halved by the clock.
  pub(crate) hits: u64,
  /// Bytes charged against the cache budget; tracks the compressed form.
  pub(crate) size: u64,
  /// Uncompressed payload length.
  pub(crate) len: u64,
  pub(crate) compressed_len: u64,
  pub(crate) compressed: Option<CompressionAlgorithm>,
  /// Sticky: a prior compression attempt did not pay off.
  pub(crate) incompressible: bool,
  pub(crate) in_history: bool,
  /// When set, the cache owns a private copy and hands out fresh copies.
  pub(crate) copy: bool,
  /// `None` exactly while the entry is a ghost.
  pub(crate) data: Option<Bytes>,
  pub(crate) lru: Links,
  pub(crate) chain: Links,
}

impl Entry {
  /// A bare entry with identity only; the caller fills in payload and
  /// accounting before it reaches a queue.
  pub(crate) fn new(key: CacheKey, auxkey1: u32, auxkey2: u32) -> Self {
    Self {
      key,
      auxkey1,
      auxkey2,
      hits: 1,
      size: 0,
      len: 0,
      compressed_len: 0,
      compressed: None,
      incompressible: false,
      in_history: false,
      copy: false,
      data: None,
      lru: Links::default(),
      chain: Links::default(),
    }
  }

  /// Size-weighted replacement score. Higher is more valuable to keep.
  #[inline]
  pub(crate) fn value(&self, entry_overhead: u64) -> f64 {
    (self.hits + 1) as f64 / (self.size + entry_overhead) as f64
  }

  /// Clears the per-admission flags before an entry (re)enters the resident
  /// queue.
  pub(crate) fn reset_flags(&mut self) {
    self.compressed = None;
    self.incompressible = false;
    self.in_history = false;
    self.copy = false;
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn value_prefers_hits_and_penalizes_size() {
    let mut hot = Entry::new(CacheKey::from_words([0; 4]), 0, 0);
    hot.hits = 9;
    hot.size = 100;
    let mut cold = Entry::new(CacheKey::from_words([0; 4]), 0, 0);
    cold.hits = 0;
    cold.size = 100;
    assert!(hot.value(256) > cold.value(256));

    let mut large = Entry::new(CacheKey::from_words([0; 4]), 0, 0);
    large.hits = 9;
    large.size = 10_000;
    assert!(hot.value(256) > large.value(256));
  }

  #[test]
  fn reset_flags_clears_admission_state() {
    let mut e = Entry::new(CacheKey::from_words([0; 4]), 0, 0);
    e.compressed = Some(CompressionAlgorithm::Lz4);
    e.incompressible = true;
    e.in_history = true;
    e.copy = true;
    e.reset_flags();
    assert!(e.compressed.is_none());
    assert!(!e.incompressible);
    assert!(!e.in_history);
    assert!(!e.copy);
  }
}
