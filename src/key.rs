use sha2::{Digest, Sha256};

/// A 128-bit object digest, stored as four 32-bit words.
///
/// The key is the cache's primary identity; the two auxiliary keys passed
/// alongside it on every operation express generation/version and must also
/// match for a lookup to hit. Word 3 seeds the bucket index and the seen
/// filter, so keys are expected to be uniformly distributed digests rather
/// than sequential values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
  words: [u32; 4],
}

impl CacheKey {
  /// Builds a key from four digest words computed elsewhere.
  pub fn from_words(words: [u32; 4]) -> Self {
    Self { words }
  }

  /// Derives a key from arbitrary bytes by truncating a SHA-256 digest.
  ///
  /// Convenience for callers that do not already carry a digest of the
  /// object name.
  pub fn digest(data: &[u8]) -> Self {
    let hash = Sha256::digest(data);
    let mut words = [0u32; 4];
    for (i, word) in words.iter_mut().enumerate() {
      let mut bytes = [0u8; 4];
      bytes.copy_from_slice(&hash[i * 4..i * 4 + 4]);
      *word = u32::from_le_bytes(bytes);
    }
    Self { words }
  }

  /// The word used for bucket selection and the seen filter.
  #[inline]
  pub(crate) fn hash_word(&self) -> u32 {
    self.words[3]
  }
}
