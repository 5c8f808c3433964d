use std::fmt;

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
  /// `compress_percent` is a percentage of the resident queue and must be
  /// at most 100.
  CompressPercentOutOfRange(u8),
  /// The compression thresholds are ratios in `(0, 1]`.
  InvalidThreshold(&'static str),
  /// A sweep batch of zero entries would make the background sweep a no-op.
  ZeroSweepBatch,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::CompressPercentOutOfRange(p) => {
        write!(f, "compress_percent must be at most 100, got {}", p)
      }
      BuildError::InvalidThreshold(which) => {
        write!(f, "{} must be a ratio in (0, 1]", which)
      }
      BuildError::ZeroSweepBatch => write!(f, "sweep batch cannot be zero"),
    }
  }
}

impl std::error::Error for BuildError {}
