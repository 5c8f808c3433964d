use std::fmt;
use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Payload codecs available to the background compression sweep.
///
/// Compression is a capacity tool, not a storage format: a compressed entry
/// never leaves the cache in compressed form, so the choice of codec only
/// trades sweep CPU against resident bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlgorithm {
  /// LZ4 block format. Cheapest pass; refuses very small inputs.
  Lz4,
  /// zlib deflate at the default level.
  Deflate,
  /// Zstandard at a balanced level; best ratio of the three.
  Zstd,
}

/// Inputs shorter than this never pay for an LZ4 pass.
pub(crate) const MIN_LZ4_LEN: usize = 16;

const ZSTD_LEVEL: i32 = 3;

#[derive(Debug)]
pub(crate) enum CompressionError {
  /// Input too small for the selected codec.
  TooShort,
  /// The codec itself failed.
  Codec(String),
  /// Decompressed output did not match the recorded payload length.
  LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for CompressionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CompressionError::TooShort => write!(f, "input too short to compress"),
      CompressionError::Codec(msg) => write!(f, "codec error: {}", msg),
      CompressionError::LengthMismatch { expected, actual } => {
        write!(f, "decompressed {} bytes, expected {}", actual, expected)
      }
    }
  }
}

pub(crate) fn compress(
  data: &[u8],
  algo: CompressionAlgorithm,
) -> Result<Vec<u8>, CompressionError> {
  match algo {
    CompressionAlgorithm::Lz4 => {
      if data.len() < MIN_LZ4_LEN {
        return Err(CompressionError::TooShort);
      }
      Ok(lz4_flex::block::compress(data))
    }
    CompressionAlgorithm::Deflate => {
      let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
      encoder
        .write_all(data)
        .map_err(|e| CompressionError::Codec(e.to_string()))?;
      encoder
        .finish()
        .map_err(|e| CompressionError::Codec(e.to_string()))
    }
    CompressionAlgorithm::Zstd => {
      zstd::encode_all(data, ZSTD_LEVEL).map_err(|e| CompressionError::Codec(e.to_string()))
    }
  }
}

/// Decompresses `data` into a fresh buffer, verifying it restores exactly
/// `len` bytes. Any mismatch is an error so the caller can discard the entry.
pub(crate) fn decompress(
  data: &[u8],
  len: usize,
  algo: CompressionAlgorithm,
) -> Result<Vec<u8>, CompressionError> {
  let out = match algo {
    CompressionAlgorithm::Lz4 => {
      lz4_flex::block::decompress(data, len).map_err(|e| CompressionError::Codec(e.to_string()))?
    }
    CompressionAlgorithm::Deflate => {
      let mut out = Vec::with_capacity(len);
      ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| CompressionError::Codec(e.to_string()))?;
      out
    }
    CompressionAlgorithm::Zstd => {
      zstd::decode_all(data).map_err(|e| CompressionError::Codec(e.to_string()))?
    }
  };
  if out.len() != len {
    return Err(CompressionError::LengthMismatch {
      expected: len,
      actual: out.len(),
    });
  }
  Ok(out)
}
