use std::sync::Arc;
use std::time::Duration;

use crate::cache::RamCache;
use crate::compression::CompressionAlgorithm;
use crate::error::BuildError;
use crate::shared::CacheShared;
use crate::task::sweeper::Sweeper;

/// Per-entry bookkeeping cost charged on top of each payload.
pub const DEFAULT_ENTRY_OVERHEAD: u64 = 256;
/// Slack allowed in the history queue beyond the resident count.
pub const DEFAULT_HISTORY_HYSTERIA: u64 = 10;
/// Compressed output above this fraction of the payload marks the entry
/// incompressible.
pub const DEFAULT_REQUIRED_COMPRESSION: f64 = 0.9;
/// Compressed output above this fraction of the charged size is not worth a
/// reallocation.
pub const DEFAULT_REQUIRED_SHRINK: f64 = 0.8;

/// Resolved configuration consumed by the engine and the sweeper.
#[derive(Debug, Clone)]
pub(crate) struct Config {
  pub(crate) max_bytes: u64,
  pub(crate) compression: Option<CompressionAlgorithm>,
  pub(crate) compress_percent: u8,
  pub(crate) sweep_interval: Duration,
  pub(crate) sweep_batch: usize,
  pub(crate) entry_overhead: u64,
  pub(crate) history_hysteria: u64,
  pub(crate) required_compression: f64,
  pub(crate) required_shrink: f64,
}

/// A builder for [`RamCache`] instances.
///
/// A cache built without [`max_bytes`](Self::max_bytes) has a zero byte
/// budget and is disabled: every operation is a no-op miss.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
  max_bytes: u64,
  compression: Option<CompressionAlgorithm>,
  compress_percent: u8,
  sweep_interval: Duration,
  sweep_batch: usize,
  entry_overhead: u64,
  history_hysteria: u64,
  required_compression: f64,
  required_shrink: f64,
}

impl Default for CacheBuilder {
  fn default() -> Self {
    Self {
      max_bytes: 0,
      compression: None,
      compress_percent: 90,
      sweep_interval: Duration::from_secs(1),
      sweep_batch: usize::MAX,
      entry_overhead: DEFAULT_ENTRY_OVERHEAD,
      history_hysteria: DEFAULT_HISTORY_HYSTERIA,
      required_compression: DEFAULT_REQUIRED_COMPRESSION,
      required_shrink: DEFAULT_REQUIRED_SHRINK,
    }
  }
}

impl CacheBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the byte budget. Zero disables the cache entirely.
  pub fn max_bytes(mut self, max_bytes: u64) -> Self {
    self.max_bytes = max_bytes;
    self
  }

  /// Enables the background compression sweep with the given codec.
  pub fn compression(mut self, algorithm: CompressionAlgorithm) -> Self {
    self.compression = Some(algorithm);
    self
  }

  /// Target percentage of resident entries kept compressed per sweep cycle.
  pub fn compress_percent(mut self, percent: u8) -> Self {
    self.compress_percent = percent;
    self
  }

  /// Period of the background sweep thread.
  pub fn sweep_interval(mut self, interval: Duration) -> Self {
    self.sweep_interval = interval;
    self
  }

  /// Maximum number of candidates examined per sweep pass.
  pub fn sweep_batch(mut self, batch: usize) -> Self {
    self.sweep_batch = batch;
    self
  }

  /// Per-entry bookkeeping cost charged on top of each payload and baked
  /// into the replacement value function.
  pub fn entry_overhead(mut self, overhead: u64) -> Self {
    self.entry_overhead = overhead;
    self
  }

  /// Slack allowed in the history queue beyond the resident count before
  /// the clock retires decayed ghosts.
  pub fn history_hysteria(mut self, hysteria: u64) -> Self {
    self.history_hysteria = hysteria;
    self
  }

  /// Compression must reach this fraction of the payload length or the
  /// entry is marked incompressible.
  pub fn required_compression(mut self, ratio: f64) -> Self {
    self.required_compression = ratio;
    self
  }

  /// Compression must reach this fraction of the charged size or the result
  /// is discarded as not worth a reallocation.
  pub fn required_shrink(mut self, ratio: f64) -> Self {
    self.required_shrink = ratio;
    self
  }

  /// Validates the configuration and builds the cache, spawning the
  /// background sweeper when compression is enabled.
  pub fn build(self) -> Result<RamCache, BuildError> {
    if self.compress_percent > 100 {
      return Err(BuildError::CompressPercentOutOfRange(self.compress_percent));
    }
    for (name, ratio) in [
      ("required_compression", self.required_compression),
      ("required_shrink", self.required_shrink),
    ] {
      if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(BuildError::InvalidThreshold(name));
      }
    }
    if self.sweep_batch == 0 {
      return Err(BuildError::ZeroSweepBatch);
    }

    let config = Config {
      max_bytes: self.max_bytes,
      compression: self.compression,
      compress_percent: self.compress_percent,
      sweep_interval: self.sweep_interval,
      sweep_batch: self.sweep_batch,
      entry_overhead: self.entry_overhead,
      history_hysteria: self.history_hysteria,
      required_compression: self.required_compression,
      required_shrink: self.required_shrink,
    };
    let sweep = config.max_bytes > 0 && config.compression.is_some() && config.compress_percent > 0;
    let shared = Arc::new(CacheShared::new(config));
    let sweeper = sweep.then(|| {
      Sweeper::spawn(
        shared.clone(),
        shared.config.sweep_interval,
        shared.config.sweep_batch,
      )
    });
    Ok(RamCache::new(shared, sweeper))
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn rejects_out_of_range_knobs() {
    assert_eq!(
      CacheBuilder::new().compress_percent(101).build().unwrap_err(),
      BuildError::CompressPercentOutOfRange(101)
    );
    assert_eq!(
      CacheBuilder::new().required_shrink(0.0).build().unwrap_err(),
      BuildError::InvalidThreshold("required_shrink"),
    );
    assert_eq!(
      CacheBuilder::new().sweep_batch(0).build().unwrap_err(),
      BuildError::ZeroSweepBatch
    );
  }

  #[test]
  fn default_build_is_a_disabled_cache() {
    let cache = CacheBuilder::new().build().unwrap();
    let key = crate::key::CacheKey::digest(b"anything");
    assert!(!cache.put(&key, bytes::Bytes::from_static(b"x"), false, 0, 0));
    assert!(cache.get(&key, 0, 0).is_none());
  }
}
