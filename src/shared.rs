use std::sync::atomic::Ordering;

use bytes::Bytes;
use generational_arena::{Arena, Index};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::builder::Config;
use crate::compression;
use crate::entry::Entry;
use crate::index::HashIndex;
use crate::key::CacheKey;
use crate::list::EntryQueue;
use crate::metrics::Metrics;

const RESIDENT: usize = 0;
const HISTORY: usize = 1;

/// The thread-safe core of the cache: configuration, counters, and the
/// region state behind a single mutex.
pub(crate) struct CacheShared {
  pub(crate) config: Config,
  pub(crate) metrics: Metrics,
  pub(crate) state: Mutex<CacheState>,
}

/// Everything the region mutex protects.
///
/// All entries live in the arena; the two queues and the hash chains are
/// threaded through them by arena index. `bytes` charges each resident
/// entry's size plus the configured per-entry overhead; ghosts charge
/// nothing.
pub(crate) struct CacheState {
  pub(crate) arena: Arena<Entry>,
  pub(crate) lru: [EntryQueue; 2],
  pub(crate) index: HashIndex,
  pub(crate) bytes: u64,
  pub(crate) objects: u64,
  pub(crate) history: u64,
  /// Sweep position: the next resident entry the compressor will examine.
  pub(crate) cursor: Option<Index>,
  /// Entries at or before the cursor already handled this cycle.
  pub(crate) ncompressed: u64,
}

impl CacheShared {
  pub(crate) fn new(config: Config) -> Self {
    Self {
      config,
      metrics: Metrics::new(),
      state: Mutex::new(CacheState {
        arena: Arena::new(),
        lru: [EntryQueue::new(), EntryQueue::new()],
        index: HashIndex::new(),
        bytes: 0,
        objects: 0,
        history: 0,
        cursor: None,
        ncompressed: 0,
      }),
    }
  }

  pub(crate) fn get(&self, key: &CacheKey, auxkey1: u32, auxkey2: u32) -> Option<Bytes> {
    if self.config.max_bytes == 0 {
      return None;
    }
    let cfg = &self.config;
    let metrics = &self.metrics;
    let mut guard = self.state.lock();
    let st = &mut *guard;

    let bucket = st.index.bucket_of(key);
    let mut cur = st.index.head(bucket);
    while let Some(idx) = cur {
      {
        let e = &st.arena[idx];
        cur = e.chain.next;
        if !(e.key == *key && e.auxkey1 == auxkey1 && e.auxkey2 == auxkey2) {
          continue;
        }
      }

      // Refresh the queue position; ghosts stay warm at the back of history.
      st.cursor_skip(idx);
      let qi = st.arena[idx].in_history as usize;
      st.lru[qi].remove(&mut st.arena, idx);
      st.lru[qi].enqueue(&mut st.arena, idx);

      if qi == HISTORY {
        metrics.misses.fetch_add(1, Ordering::Relaxed);
        debug!(target: "clfus", key = key.hash_word(), auxkey1, auxkey2, "get: history");
        return None;
      }

      st.arena[idx].hits += 1;
      let (algo, copy) = {
        let e = &st.arena[idx];
        (e.compressed, e.copy)
      };

      let Some(algo) = algo else {
        let e = &st.arena[idx];
        let data = e.data.as_ref().expect("resident entry has a payload");
        let out = if copy {
          Bytes::copy_from_slice(data)
        } else {
          data.clone()
        };
        metrics.hits.fetch_add(1, Ordering::Relaxed);
        debug!(target: "clfus", key = key.hash_word(), auxkey1, auxkey2, size = e.size, "get: hit");
        return Some(out);
      };

      // Decompress into a fresh buffer; a corrupt entry is destroyed.
      let (packed, len, compressed_len) = {
        let e = &st.arena[idx];
        (
          e.data.clone().expect("resident entry has a payload"),
          e.len as usize,
          e.compressed_len,
        )
      };
      match compression::decompress(&packed, len, algo) {
        Err(err) => {
          warn!(target: "clfus", key = key.hash_word(), %err, "get: destroying corrupt entry");
          st.destroy(idx, cfg, metrics);
          metrics.decompress_failures.fetch_add(1, Ordering::Relaxed);
          metrics.misses.fetch_add(1, Ordering::Relaxed);
          return None;
        }
        Ok(buf) => {
          let out = Bytes::from(buf);
          if !copy {
            // Keep the decompressed form resident and account its full
            // length; the shared handle is the entry's new payload.
            let grow = {
              let e = &mut st.arena[idx];
              let grow = e.len - e.size;
              e.size = e.len;
              e.compressed = None;
              e.compressed_len = 0;
              e.data = Some(out.clone());
              grow
            };
            st.bytes += grow;
            metrics.add_bytes(grow);
            st.check_accounting(cfg);
          }
          metrics.hits.fetch_add(1, Ordering::Relaxed);
          debug!(
            target: "clfus",
            key = key.hash_word(),
            auxkey1,
            auxkey2,
            compressed_len,
            "get: hit (decompressed)"
          );
          return Some(out);
        }
      }
    }

    metrics.misses.fetch_add(1, Ordering::Relaxed);
    debug!(target: "clfus", key = key.hash_word(), auxkey1, auxkey2, "get: miss");
    None
  }

  pub(crate) fn put(
    &self,
    key: &CacheKey,
    data: Bytes,
    copy: bool,
    auxkey1: u32,
    auxkey2: u32,
  ) -> bool {
    if self.config.max_bytes == 0 {
      return false;
    }
    let cfg = &self.config;
    let metrics = &self.metrics;
    let size = data.len() as u64;
    let mut guard = self.state.lock();
    let st = &mut *guard;

    // Walk the chain; entries with this digest but conflicting aux keys are
    // stale and destroyed on the spot.
    let mut found: Option<Index> = None;
    let bucket = st.index.bucket_of(key);
    let mut cur = st.index.head(bucket);
    while let Some(idx) = cur {
      let e = &st.arena[idx];
      let next = e.chain.next;
      if e.key == *key {
        if e.auxkey1 == auxkey1 && e.auxkey2 == auxkey2 {
          found = Some(idx);
          break;
        }
        st.destroy(idx, cfg, metrics);
      }
      cur = next;
    }

    let mut from_history: Option<Index> = None;
    if let Some(idx) = found {
      st.arena[idx].hits += 1;
      if !st.arena[idx].in_history {
        return st.update_resident(idx, key, data, size, copy, cfg, metrics);
      }
      // A known ghost contends for readmission below.
      st.lru[HISTORY].remove(&mut st.arena, idx);
      from_history = Some(idx);
    }

    // Initial fill: admit directly while there is no history to consult.
    if st.lru[HISTORY].is_empty() && st.bytes + size + cfg.entry_overhead <= cfg.max_bytes {
      return st.install(
        from_history,
        key,
        auxkey1,
        auxkey2,
        data,
        size,
        copy,
        Vec::new(),
        cfg,
        metrics,
      );
    }

    // A key with no history must have been seen before to contend at all.
    if from_history.is_none() {
      let seen = st.index.mark_seen(key);
      if st.history >= st.objects && !seen {
        debug!(target: "clfus", key = key.hash_word(), auxkey1, auxkey2, size, "put: unseen");
        metrics.puts_rejected.fetch_add(1, Ordering::Relaxed);
        return false;
      }
    }

    let mut victims: Vec<Index> = Vec::new();
    loop {
      let Some(vidx) = st.lru[RESIDENT].dequeue(&mut st.arena) else {
        // Resident queue exhausted.
        if st.bytes + size + cfg.entry_overhead <= cfg.max_bytes {
          return st.install(
            from_history,
            key,
            auxkey1,
            auxkey2,
            data,
            size,
            copy,
            victims,
            cfg,
            metrics,
          );
        }
        if let Some(eidx) = from_history {
          st.lru[HISTORY].enqueue(&mut st.arena, eidx);
        }
        st.requeue_victims(victims, cfg, metrics);
        debug!(target: "clfus", key = key.hash_word(), auxkey1, auxkey2, "put: no victim");
        metrics.puts_rejected.fetch_add(1, Ordering::Relaxed);
        return false;
      };

      let vsize = st.arena[vidx].size;
      st.bytes -= vsize + cfg.entry_overhead;
      metrics.sub_bytes(vsize + cfg.entry_overhead);
      if st.cursor == Some(vidx) {
        st.cursor = None;
      } else {
        st.ncompressed = st.ncompressed.saturating_sub(1);
      }
      st.arena[vidx].hits >>= 1;
      victims.push(vidx);
      st.tick(cfg, metrics);

      match from_history {
        None => {
          // A legitimate newcomer starts its history instead of evicting
          // proven residents.
          st.requeue_victims(victims, cfg, metrics);
          st.insert_ghost(key, auxkey1, auxkey2, size);
          metrics.puts_rejected.fetch_add(1, Ordering::Relaxed);
          return false;
        }
        Some(eidx) => {
          let victim_value = st.arena[vidx].value(cfg.entry_overhead);
          let entry_value = st.arena[eidx].value(cfg.entry_overhead);
          let both = st.bytes + vsize + size + 2 * cfg.entry_overhead;
          if both > cfg.max_bytes && victim_value > entry_value {
            // The resident set is worth more per byte than the contender.
            st.requeue_victims(victims, cfg, metrics);
            st.lru[HISTORY].enqueue(&mut st.arena, eidx);
            debug!(
              target: "clfus",
              key = key.hash_word(),
              auxkey1,
              auxkey2,
              size,
              "put: lost the value contest"
            );
            metrics.puts_rejected.fetch_add(1, Ordering::Relaxed);
            return false;
          }
        }
      }

      if st.bytes + size + cfg.entry_overhead <= cfg.max_bytes {
        return st.install(
          from_history,
          key,
          auxkey1,
          auxkey2,
          data,
          size,
          copy,
          victims,
          cfg,
          metrics,
        );
      }
    }
  }

  pub(crate) fn fixup(
    &self,
    key: &CacheKey,
    old_auxkey1: u32,
    old_auxkey2: u32,
    new_auxkey1: u32,
    new_auxkey2: u32,
  ) -> bool {
    if self.config.max_bytes == 0 {
      return false;
    }
    let mut guard = self.state.lock();
    let st = &mut *guard;
    let bucket = st.index.bucket_of(key);
    let mut cur = st.index.head(bucket);
    while let Some(idx) = cur {
      let e = &mut st.arena[idx];
      if e.key == *key && e.auxkey1 == old_auxkey1 && e.auxkey2 == old_auxkey2 {
        e.auxkey1 = new_auxkey1;
        e.auxkey2 = new_auxkey2;
        return true;
      }
      cur = e.chain.next;
    }
    false
  }

  /// One compression pass over the resident queue, oldest first.
  ///
  /// The lock is released around each codec invocation; the candidate is
  /// revalidated by arena slot, key, and payload identity before committing,
  /// and abandoned on any mismatch.
  pub(crate) fn compress_sweep(&self, max_entries: usize) {
    let Some(algo) = self.config.compression else {
      return;
    };
    if self.config.compress_percent == 0 {
      return;
    }
    let cfg = &self.config;
    let metrics = &self.metrics;
    let mut guard = self.state.lock();
    if guard.cursor.is_none() {
      guard.cursor = guard.lru[RESIDENT].head();
      guard.ncompressed = 0;
    }
    let target = (cfg.compress_percent as f64 / 100.0) * guard.objects as f64;
    let mut examined = 0usize;

    while let Some(idx) = guard.cursor {
      if guard.ncompressed as f64 >= target {
        break;
      }
      let skip = {
        let e = &guard.arena[idx];
        e.incompressible || e.compressed.is_some()
      };
      if skip {
        if !guard.advance_cursor() {
          break;
        }
        continue;
      }
      examined += 1;
      if examined > max_entries {
        break;
      }

      // Snapshot under the lock, compress without it.
      let (snapshot, key) = {
        let e = &guard.arena[idx];
        match e.data.clone() {
          Some(d) => (d, e.key),
          None => {
            if guard.cursor == Some(idx) && !guard.advance_cursor() {
              break;
            }
            continue;
          }
        }
      };
      drop(guard);
      let result = compression::compress(&snapshot, algo);
      guard = self.state.lock();

      // The entry may have been destroyed or replaced while unlocked.
      let intact = guard.arena.get(idx).map_or(false, |e| {
        e.key == key
          && e
            .data
            .as_ref()
            .map_or(false, |d| d.as_ptr() == snapshot.as_ptr())
      });
      if !intact {
        // An update or destroy of this entry already moved the cursor off it
        // via cursor_skip; advancing again would skip the entry the cursor
        // now points at without ever examining it.
        if guard.cursor == Some(idx) && !guard.advance_cursor() {
          break;
        }
        continue;
      }

      match result {
        Err(compression::CompressionError::TooShort) => {
          debug!(target: "clfus", key = key.hash_word(), "sweep: too short to compress");
          guard.arena[idx].incompressible = true;
        }
        Err(err) => {
          warn!(target: "clfus", key = key.hash_word(), %err, "sweep: codec failed");
          guard.arena[idx].incompressible = true;
        }
        Ok(packed) => {
          let compressed_len = packed.len() as u64;
          let (elen, esize) = {
            let e = &guard.arena[idx];
            (e.len, e.size)
          };
          if compressed_len as f64 > cfg.required_compression * elen as f64 {
            guard.arena[idx].incompressible = true;
          } else if compressed_len as f64 > cfg.required_shrink * esize as f64 {
            // Not enough savings to justify a reallocation.
          } else if compressed_len < elen {
            let st = &mut *guard;
            let saved = esize - compressed_len;
            st.bytes -= saved;
            metrics.sub_bytes(saved);
            {
              let e = &mut st.arena[idx];
              e.compressed = Some(algo);
              e.compressed_len = compressed_len;
              e.size = compressed_len;
              e.data = Some(Bytes::from(packed));
            }
            metrics.entries_compressed.fetch_add(1, Ordering::Relaxed);
            debug!(
              target: "clfus",
              key = key.hash_word(),
              len = elen,
              compressed_len,
              "sweep: compressed"
            );
            st.check_accounting(cfg);
          }
        }
      }

      // Advance from the entry just examined; park at the tail end.
      let next = guard.arena[idx].lru.next;
      match next {
        Some(next) => {
          guard.cursor = Some(next);
          guard.ncompressed += 1;
        }
        None => break,
      }
    }
  }
}

impl CacheState {
  /// Replaces a resident entry's payload in place and refreshes its queue
  /// position. Growth past the budget sheds cold residents, never the entry
  /// just stored.
  fn update_resident(
    &mut self,
    idx: Index,
    key: &CacheKey,
    data: Bytes,
    size: u64,
    copy: bool,
    cfg: &Config,
    metrics: &Metrics,
  ) -> bool {
    self.cursor_skip(idx);
    self.lru[RESIDENT].remove(&mut self.arena, idx);
    self.lru[RESIDENT].enqueue(&mut self.arena, idx);

    let old_size = self.arena[idx].size;
    self.bytes -= old_size;
    metrics.sub_bytes(old_size);
    self.bytes += size;
    metrics.add_bytes(size);
    {
      let e = &mut self.arena[idx];
      e.data = Some(if copy {
        Bytes::copy_from_slice(&data)
      } else {
        data
      });
      e.copy = copy;
      e.size = size;
      e.len = size;
      e.compressed = None;
      e.compressed_len = 0;
      e.incompressible = false;
    }

    while self.bytes > cfg.max_bytes {
      let Some(vidx) = self.lru[RESIDENT].head() else {
        break;
      };
      if vidx == idx {
        break;
      }
      self.lru[RESIDENT].remove(&mut self.arena, vidx);
      let vsize = self.arena[vidx].size;
      self.bytes -= vsize + cfg.entry_overhead;
      metrics.sub_bytes(vsize + cfg.entry_overhead);
      if self.cursor == Some(vidx) {
        self.cursor = None;
      } else {
        self.ncompressed = self.ncompressed.saturating_sub(1);
      }
      self.arena[vidx].hits >>= 1;
      self.tick(cfg, metrics);
      self.victimize(vidx, metrics);
    }

    self.check_accounting(cfg);
    metrics.puts_stored.fetch_add(1, Ordering::Relaxed);
    debug!(target: "clfus", key = key.hash_word(), size, "put: updated in place");
    true
  }

  /// Commits an admission: settles the victims list, then installs the
  /// winning entry at the hot end of the resident queue.
  fn install(
    &mut self,
    from_history: Option<Index>,
    key: &CacheKey,
    auxkey1: u32,
    auxkey2: u32,
    data: Bytes,
    size: u64,
    copy: bool,
    victims: Vec<Index>,
    cfg: &Config,
    metrics: &Metrics,
  ) -> bool {
    for vidx in victims {
      let vsize = self.arena[vidx].size;
      if self.bytes + size + vsize + 2 * cfg.entry_overhead <= cfg.max_bytes {
        // Still room for this victim beside the new entry.
        self.bytes += vsize + cfg.entry_overhead;
        metrics.add_bytes(vsize + cfg.entry_overhead);
        let v = &mut self.arena[vidx];
        v.hits = v.hits.min(1);
        self.lru[RESIDENT].enqueue(&mut self.arena, vidx);
      } else {
        // The clock already ticked once per victim at extraction; settling
        // placement must not age history a second time.
        self.victimize(vidx, metrics);
      }
    }

    let eidx = match from_history {
      Some(idx) => {
        self.history -= 1;
        idx
      }
      None => {
        let idx = self.arena.insert(Entry::new(*key, auxkey1, auxkey2));
        self.index.push(&mut self.arena, idx);
        if self.objects > self.index.nbuckets() as u64 {
          self.index.grow(&mut self.arena);
        }
        idx
      }
    };
    {
      let e = &mut self.arena[eidx];
      e.reset_flags();
      e.data = Some(if copy {
        Bytes::copy_from_slice(&data)
      } else {
        data
      });
      e.copy = copy;
      e.size = size;
      e.len = size;
      e.compressed_len = 0;
    }
    self.bytes += size + cfg.entry_overhead;
    metrics.add_bytes(size + cfg.entry_overhead);
    self.objects += 1;
    self.lru[RESIDENT].enqueue(&mut self.arena, eidx);

    self.check_accounting(cfg);
    metrics.puts_stored.fetch_add(1, Ordering::Relaxed);
    debug!(target: "clfus", key = key.hash_word(), auxkey1, auxkey2, size, "put: inserted");
    true
  }

  /// Starts history for a key that passed the seen filter but has not yet
  /// earned residency.
  fn insert_ghost(&mut self, key: &CacheKey, auxkey1: u32, auxkey2: u32, size: u64) {
    let mut e = Entry::new(*key, auxkey1, auxkey2);
    e.size = size;
    e.len = size;
    e.in_history = true;
    let idx = self.arena.insert(e);
    self.index.push(&mut self.arena, idx);
    self.lru[HISTORY].enqueue(&mut self.arena, idx);
    self.history += 1;
    debug!(target: "clfus", key = key.hash_word(), auxkey1, auxkey2, size, "put: history started");
  }

  /// Restores rejected victims to the cold end of the resident queue in
  /// their original order, hit counts floored to one.
  fn requeue_victims(&mut self, victims: Vec<Index>, cfg: &Config, metrics: &Metrics) {
    for idx in victims.into_iter().rev() {
      let size = {
        let e = &mut self.arena[idx];
        e.hits = e.hits.min(1);
        e.size
      };
      self.bytes += size + cfg.entry_overhead;
      metrics.add_bytes(size + cfg.entry_overhead);
      self.lru[RESIDENT].push_front(&mut self.arena, idx);
    }
  }

  /// Advances the history clock: ages the oldest ghost and retires ghosts
  /// whose hits decayed to zero, or the next oldest when history is
  /// overlong.
  fn tick(&mut self, cfg: &Config, metrics: &Metrics) {
    let Some(idx) = self.lru[HISTORY].dequeue(&mut self.arena) else {
      return;
    };
    let hits = {
      let e = &mut self.arena[idx];
      e.hits >>= 1;
      e.hits
    };
    if hits == 0 {
      self.retire_ghost(idx, metrics);
      return;
    }
    self.arena[idx].hits = 1;
    self.lru[HISTORY].enqueue(&mut self.arena, idx);
    if self.history <= self.objects + cfg.history_hysteria {
      return;
    }
    if let Some(old) = self.lru[HISTORY].dequeue(&mut self.arena) {
      self.retire_ghost(old, metrics);
    }
  }

  /// Frees a ghost that the clock has already unlinked from its queue.
  fn retire_ghost(&mut self, idx: Index, metrics: &Metrics) {
    self.history -= 1;
    self.index.unlink(&mut self.arena, idx);
    if let Some(e) = self.arena.remove(idx) {
      debug!(
        target: "clfus",
        key = e.key.hash_word(),
        auxkey1 = e.auxkey1,
        auxkey2 = e.auxkey2,
        "history: ghost retired"
      );
    }
    metrics.ghosts_retired.fetch_add(1, Ordering::Relaxed);
  }

  /// Demotes a resident entry (already unlinked and uncharged) to a ghost.
  fn victimize(&mut self, idx: Index, metrics: &Metrics) {
    self.objects -= 1;
    {
      let e = &mut self.arena[idx];
      debug!(
        target: "clfus",
        key = e.key.hash_word(),
        auxkey1 = e.auxkey1,
        auxkey2 = e.auxkey2,
        size = e.size,
        "put: victimized"
      );
      e.data = None;
      e.in_history = true;
    }
    self.lru[HISTORY].enqueue(&mut self.arena, idx);
    self.history += 1;
    metrics.victimizations.fetch_add(1, Ordering::Relaxed);
  }

  /// Removes an entry completely: queue, accounting, index, arena.
  fn destroy(&mut self, idx: Index, cfg: &Config, metrics: &Metrics) {
    self.cursor_skip(idx);
    let in_history = self.arena[idx].in_history;
    self.lru[in_history as usize].remove(&mut self.arena, idx);
    if in_history {
      self.history -= 1;
    } else {
      let size = self.arena[idx].size;
      self.objects -= 1;
      self.bytes -= size + cfg.entry_overhead;
      metrics.sub_bytes(size + cfg.entry_overhead);
    }
    self.index.unlink(&mut self.arena, idx);
    if let Some(e) = self.arena.remove(idx) {
      debug!(
        target: "clfus",
        key = e.key.hash_word(),
        auxkey1 = e.auxkey1,
        auxkey2 = e.auxkey2,
        "entry destroyed"
      );
    }
  }

  /// Moves the sweep cursor off `idx` before the entry moves or dies.
  fn cursor_skip(&mut self, idx: Index) {
    if self.cursor != Some(idx) {
      return;
    }
    let e = &self.arena[idx];
    if e.lru.next.is_some() {
      self.cursor = e.lru.next;
    } else {
      self.ncompressed = self.ncompressed.saturating_sub(1);
      self.cursor = e.lru.prev;
    }
  }

  /// Advances the sweep cursor one step along the resident queue. Returns
  /// false when there is nothing beyond the current position.
  fn advance_cursor(&mut self) -> bool {
    let Some(idx) = self.cursor else {
      return false;
    };
    match self.arena[idx].lru.next {
      Some(next) => {
        self.cursor = Some(next);
        self.ncompressed += 1;
        true
      }
      None => false,
    }
  }

  /// Recomputes queue-derived accounting and asserts it against the
  /// counters. Compiled out of release builds.
  #[cfg(debug_assertions)]
  pub(crate) fn check_accounting(&self, cfg: &Config) {
    let mut objects = 0u64;
    let mut bytes = 0u64;
    for idx in self.lru[RESIDENT].iter(&self.arena) {
      let e = &self.arena[idx];
      assert!(!e.in_history, "resident entry flagged as history");
      assert!(e.data.is_some(), "resident entry without a payload");
      match e.compressed {
        Some(_) => assert_eq!(e.compressed_len, e.size),
        None => assert_eq!(e.compressed_len, 0),
      }
      objects += 1;
      bytes += e.size + cfg.entry_overhead;
    }
    assert_eq!(objects, self.objects);
    assert_eq!(bytes, self.bytes);
    assert_eq!(self.lru[RESIDENT].len(), self.objects);

    let mut history = 0u64;
    for idx in self.lru[HISTORY].iter(&self.arena) {
      let e = &self.arena[idx];
      assert!(e.in_history, "ghost not flagged as history");
      assert!(e.data.is_none(), "ghost holding a payload");
      history += 1;
    }
    assert_eq!(history, self.history);
    assert_eq!(self.lru[HISTORY].len(), self.history);

    // Every entry is chained in the bucket its digest selects.
    let mut indexed = 0u64;
    for bucket in 0..self.index.nbuckets() {
      let mut cur = self.index.head(bucket);
      while let Some(idx) = cur {
        let e = &self.arena[idx];
        assert_eq!(self.index.bucket_of(&e.key), bucket);
        indexed += 1;
        cur = e.chain.next;
      }
    }
    assert_eq!(indexed, self.objects + self.history);
  }

  #[cfg(not(debug_assertions))]
  pub(crate) fn check_accounting(&self, _cfg: &Config) {}
}
