//! Size-bounded in-memory object cache using the CLFUS replacement policy.
//!
//! CLFUS (Clocked Least Frequently Used by Size) keeps the byte-valuable
//! objects resident under a tight memory budget. Admission is earned: a key
//! must survive a probabilistic seen filter and, once it has history, win a
//! size-weighted value contest against the entries it would displace. Evicted
//! entries linger as payload-free ghosts whose hit counts decay under a
//! clock, and a background sweep opportunistically compresses resident
//! entries to stretch capacity.
//!
//! ```
//! use clfus_cache::{Bytes, CacheBuilder, CacheKey};
//!
//! let cache = CacheBuilder::new().max_bytes(64 * 1024).build().unwrap();
//! let key = CacheKey::digest(b"object-1");
//! cache.put(&key, Bytes::from_static(b"payload"), false, 0, 0);
//! assert_eq!(cache.get(&key, 0, 0).as_deref(), Some(&b"payload"[..]));
//! ```

pub mod builder;
pub mod compression;
pub mod error;
pub mod metrics;

mod cache;
mod entry;
mod index;
mod key;
mod list;
mod shared;
mod task;

pub use builder::CacheBuilder;
pub use cache::RamCache;
pub use compression::CompressionAlgorithm;
pub use error::BuildError;
pub use key::CacheKey;
pub use metrics::MetricsSnapshot;

// Payload buffers are shared by reference count; re-exported so callers can
// name the type without a separate dependency.
pub use bytes::Bytes;
