mod common;

use clfus_cache::{Bytes, CacheBuilder};
use common::{key, payload};

#[test]
fn test_put_then_get_round_trips() {
  let cache = CacheBuilder::new().max_bytes(64 * 1024).build().unwrap();
  let k = key("alpha");
  let v = payload(100, b'a');

  assert!(cache.put(&k, v.clone(), false, 3, 7));
  assert_eq!(cache.get(&k, 3, 7), Some(v));

  let snap = cache.metrics();
  assert_eq!(snap.puts_stored, 1);
  assert_eq!(snap.hits, 1);
  assert_eq!(snap.objects, 1);
}

#[test]
fn test_lookup_requires_all_three_identity_parts() {
  let cache = CacheBuilder::new().max_bytes(64 * 1024).build().unwrap();
  let k = key("alpha");
  assert!(cache.put(&k, payload(64, b'a'), false, 1, 1));

  assert!(cache.get(&k, 1, 2).is_none(), "aux mismatch must miss");
  assert!(cache.get(&k, 2, 1).is_none(), "aux mismatch must miss");
  assert!(cache.get(&key("beta"), 1, 1).is_none(), "digest mismatch must miss");
  assert!(cache.get(&k, 1, 1).is_some());
}

#[test]
fn test_copy_mode_hands_out_equal_bytes() {
  let cache = CacheBuilder::new().max_bytes(64 * 1024).build().unwrap();
  let k = key("copied");
  let v = payload(256, b'c');

  assert!(cache.put(&k, v.clone(), true, 0, 0));
  let first = cache.get(&k, 0, 0).unwrap();
  let second = cache.get(&k, 0, 0).unwrap();
  assert_eq!(first, v);
  assert_eq!(second, v);
}

#[test]
fn test_aux_conflict_destroys_the_stale_entry() {
  let cache = CacheBuilder::new().max_bytes(64 * 1024).build().unwrap();
  let k = key("versioned");
  let v1 = payload(100, b'1');
  let v2 = payload(100, b'2');

  assert!(cache.put(&k, v1, false, 1, 1));
  assert!(cache.put(&k, v2.clone(), false, 2, 2));

  assert!(cache.get(&k, 1, 1).is_none(), "stale generation must be gone");
  assert_eq!(cache.get(&k, 2, 2), Some(v2));
  assert_eq!(cache.metrics().objects, 1);
}

#[test]
fn test_update_in_place_replaces_payload_and_accounting() {
  let cache = CacheBuilder::new()
    .max_bytes(64 * 1024)
    .entry_overhead(256)
    .build()
    .unwrap();
  let k = key("update");

  assert!(cache.put(&k, payload(800, b'x'), false, 0, 0));
  assert_eq!(cache.metrics().bytes, 800 + 256);

  assert!(cache.put(&k, payload(300, b'y'), false, 0, 0));
  let snap = cache.metrics();
  assert_eq!(snap.bytes, 300 + 256, "shrinking update must release bytes");
  assert_eq!(snap.objects, 1);
  assert_eq!(cache.get(&k, 0, 0), Some(payload(300, b'y')));
}

#[test]
fn test_fixup_rewrites_aux_keys_without_touching_the_payload() {
  let cache = CacheBuilder::new().max_bytes(64 * 1024).build().unwrap();
  let k = key("fixup");
  let v = payload(128, b'f');
  assert!(cache.put(&k, v.clone(), false, 1, 1));

  assert!(cache.fixup(&k, 1, 1, 7, 7));
  assert!(cache.get(&k, 1, 1).is_none(), "old generation must miss");
  assert_eq!(cache.get(&k, 7, 7), Some(v), "payload survives the fixup");
}

#[test]
fn test_fixup_misses_on_unknown_identity() {
  let cache = CacheBuilder::new().max_bytes(64 * 1024).build().unwrap();
  let k = key("fixup-miss");
  assert!(!cache.fixup(&k, 1, 1, 2, 2));

  assert!(cache.put(&k, payload(32, b'm'), false, 1, 1));
  assert!(!cache.fixup(&k, 9, 9, 2, 2), "old aux keys must match");
}

#[test]
fn test_zero_budget_disables_every_operation() {
  let cache = CacheBuilder::new().build().unwrap();
  let k = key("disabled");

  assert!(!cache.put(&k, payload(10, b'd'), false, 0, 0));
  assert!(cache.get(&k, 0, 0).is_none());
  assert!(!cache.fixup(&k, 0, 0, 1, 1));
  cache.compress_sweep(16);

  let snap = cache.metrics();
  assert_eq!(snap.bytes, 0);
  assert_eq!(snap.objects, 0);
  assert_eq!(snap.hits, 0);
  assert_eq!(snap.misses, 0, "disabled cache records nothing");
}

#[test]
fn test_empty_payloads_are_cacheable() {
  let cache = CacheBuilder::new().max_bytes(4096).build().unwrap();
  let k = key("empty");
  assert!(cache.put(&k, Bytes::new(), false, 0, 0));
  assert_eq!(cache.get(&k, 0, 0), Some(Bytes::new()));
}
