use generational_arena::{Arena, Index};
use tracing::debug;

use crate::entry::Entry;
use crate::key::CacheKey;

/// Bucket counts, each the largest prime below the next power of two.
const BUCKET_SIZES: [usize; 25] = [
  127,
  251,
  509,
  1021,
  2039,
  4093,
  8191,
  16381,
  32749,
  65521,
  131_071,
  262_139,
  524_287,
  1_048_573,
  2_097_143,
  4_194_301,
  8_388_593,
  16_777_213,
  33_554_393,
  67_108_859,
  134_217_689,
  268_435_399,
  536_870_909,
  1_073_741_789,
  2_147_483_647,
];

/// Chained hash index from key digest to arena slot, plus the seen filter.
///
/// Chains are threaded through each entry's `chain` links; the index itself
/// only stores bucket heads. The seen filter is an array of 16-bit key
/// fingerprints sized to the bucket count, so both grow together: when
/// `objects` exceeds the bucket count the table is rebuilt at the next prime
/// and the filter is cleared.
#[derive(Debug)]
pub(crate) struct HashIndex {
  buckets: Vec<Option<Index>>,
  seen: Vec<u16>,
  ibuckets: usize,
}

impl HashIndex {
  pub(crate) fn new() -> Self {
    let nbuckets = BUCKET_SIZES[0];
    Self {
      buckets: vec![None; nbuckets],
      seen: vec![0; nbuckets],
      ibuckets: 0,
    }
  }

  #[inline]
  pub(crate) fn nbuckets(&self) -> usize {
    self.buckets.len()
  }

  #[inline]
  pub(crate) fn bucket_of(&self, key: &CacheKey) -> usize {
    key.hash_word() as usize % self.buckets.len()
  }

  #[inline]
  pub(crate) fn head(&self, bucket: usize) -> Option<Index> {
    self.buckets[bucket]
  }

  /// Links `idx` at the head of its key's chain.
  pub(crate) fn push(&mut self, arena: &mut Arena<Entry>, idx: Index) {
    let bucket = self.bucket_of(&arena[idx].key);
    let old_head = self.buckets[bucket];
    {
      let e = &mut arena[idx];
      e.chain.prev = None;
      e.chain.next = old_head;
    }
    if let Some(h) = old_head {
      arena[h].chain.prev = Some(idx);
    }
    self.buckets[bucket] = Some(idx);
  }

  /// Unlinks `idx` from its chain.
  pub(crate) fn unlink(&mut self, arena: &mut Arena<Entry>, idx: Index) {
    let (bucket, prev, next) = {
      let e = &arena[idx];
      (self.bucket_of(&e.key), e.chain.prev, e.chain.next)
    };
    match prev {
      Some(p) => arena[p].chain.next = next,
      None => self.buckets[bucket] = next,
    }
    if let Some(n) = next {
      arena[n].chain.prev = prev;
    }
    let e = &mut arena[idx];
    e.chain.prev = None;
    e.chain.next = None;
  }

  /// Rebuilds the table at the next prime size and clears the seen filter.
  /// Every live entry is re-chained; queue links are untouched.
  pub(crate) fn grow(&mut self, arena: &mut Arena<Entry>) {
    if self.ibuckets + 1 >= BUCKET_SIZES.len() {
      return;
    }
    self.ibuckets += 1;
    let nbuckets = BUCKET_SIZES[self.ibuckets];
    debug!(target: "clfus", nbuckets, "resizing hash index");
    self.buckets = vec![None; nbuckets];
    self.seen = vec![0; nbuckets];
    let live: Vec<Index> = arena.iter().map(|(idx, _)| idx).collect();
    for idx in live {
      let e = &mut arena[idx];
      e.chain.prev = None;
      e.chain.next = None;
      self.push(arena, idx);
    }
  }

  /// Records the key's fingerprint and reports whether the same fingerprint
  /// was already present, i.e. whether this key was plausibly seen before.
  pub(crate) fn mark_seen(&mut self, key: &CacheKey) -> bool {
    let word = key.hash_word();
    let slot = word as usize % self.seen.len();
    let fingerprint = (word >> 16) as u16;
    let previous = self.seen[slot];
    self.seen[slot] = fingerprint;
    previous == fingerprint
  }
}
