use clfus_cache::{Bytes, CacheKey};

pub fn key(name: &str) -> CacheKey {
  CacheKey::digest(name.as_bytes())
}

pub fn payload(len: usize, fill: u8) -> Bytes {
  Bytes::from(vec![fill; len])
}

/// A repetitive payload every codec can shrink substantially.
#[allow(dead_code)]
pub fn compressible_payload(len: usize) -> Bytes {
  let text: Vec<u8> = b"the quick brown fox jumps over the lazy dog "
    .iter()
    .copied()
    .cycle()
    .take(len)
    .collect();
  Bytes::from(text)
}

/// Deterministic high-entropy bytes that defeat every codec.
#[allow(dead_code)]
pub fn incompressible_payload(len: usize) -> Bytes {
  let mut state = 0x9e37_79b9_7f4a_7c15u64;
  let mut out = Vec::with_capacity(len);
  while out.len() < len {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    out.extend_from_slice(&state.to_le_bytes());
  }
  out.truncate(len);
  Bytes::from(out)
}
