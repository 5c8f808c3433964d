use generational_arena::{Arena, Index};

use crate::entry::Entry;

/// A doubly-linked queue threaded through the shared entry arena.
///
/// The head is the oldest (next victim) position and the tail the most
/// recently enqueued. The queue stores no nodes of its own; it only
/// manipulates the `lru` links inside each entry, so an entry can migrate
/// between queues without moving in memory.
#[derive(Debug, Default)]
pub(crate) struct EntryQueue {
  head: Option<Index>,
  tail: Option<Index>,
  len: u64,
}

impl EntryQueue {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub(crate) fn head(&self) -> Option<Index> {
    self.head
  }

  #[inline]
  pub(crate) fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  #[cfg(any(test, debug_assertions))]
  pub(crate) fn len(&self) -> u64 {
    self.len
  }

  /// Appends at the tail (most recently used position).
  pub(crate) fn enqueue(&mut self, arena: &mut Arena<Entry>, idx: Index) {
    let old_tail = self.tail;
    {
      let e = &mut arena[idx];
      e.lru.prev = old_tail;
      e.lru.next = None;
    }
    match old_tail {
      Some(t) => arena[t].lru.next = Some(idx),
      None => self.head = Some(idx),
    }
    self.tail = Some(idx);
    self.len += 1;
  }

  /// Prepends at the head (next victim position).
  pub(crate) fn push_front(&mut self, arena: &mut Arena<Entry>, idx: Index) {
    let old_head = self.head;
    {
      let e = &mut arena[idx];
      e.lru.prev = None;
      e.lru.next = old_head;
    }
    match old_head {
      Some(h) => arena[h].lru.prev = Some(idx),
      None => self.tail = Some(idx),
    }
    self.head = Some(idx);
    self.len += 1;
  }

  /// Detaches and returns the oldest entry.
  pub(crate) fn dequeue(&mut self, arena: &mut Arena<Entry>) -> Option<Index> {
    let idx = self.head?;
    self.remove(arena, idx);
    Some(idx)
  }

  /// Unlinks `idx`, which must currently be on this queue.
  pub(crate) fn remove(&mut self, arena: &mut Arena<Entry>, idx: Index) {
    let (prev, next) = {
      let e = &arena[idx];
      (e.lru.prev, e.lru.next)
    };
    match prev {
      Some(p) => arena[p].lru.next = next,
      None => self.head = next,
    }
    match next {
      Some(n) => arena[n].lru.prev = prev,
      None => self.tail = prev,
    }
    let e = &mut arena[idx];
    e.lru.prev = None;
    e.lru.next = None;
    self.len -= 1;
  }

  /// Head-to-tail order, for tests and accounting checks.
  #[cfg(any(test, debug_assertions))]
  pub(crate) fn iter<'a>(&self, arena: &'a Arena<Entry>) -> QueueIter<'a> {
    QueueIter {
      arena,
      cursor: self.head,
    }
  }
}

#[cfg(any(test, debug_assertions))]
pub(crate) struct QueueIter<'a> {
  arena: &'a Arena<Entry>,
  cursor: Option<Index>,
}

#[cfg(any(test, debug_assertions))]
impl<'a> Iterator for QueueIter<'a> {
  type Item = Index;

  fn next(&mut self) -> Option<Index> {
    let idx = self.cursor?;
    self.cursor = self.arena[idx].lru.next;
    Some(idx)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::key::CacheKey;

  fn entry(tag: u32) -> Entry {
    Entry::new(CacheKey::from_words([tag, 0, 0, tag]), 0, 0)
  }

  fn order(q: &EntryQueue, arena: &Arena<Entry>) -> Vec<u32> {
    q.iter(arena)
      .map(|idx| arena[idx].key.hash_word())
      .collect()
  }

  #[test]
  fn enqueue_preserves_fifo_order() {
    let mut arena = Arena::new();
    let mut q = EntryQueue::new();
    for tag in 1..=3 {
      let idx = arena.insert(entry(tag));
      q.enqueue(&mut arena, idx);
    }
    assert_eq!(order(&q, &arena), vec![1, 2, 3], "head should be the oldest");
    assert_eq!(q.len(), 3);
  }

  #[test]
  fn dequeue_returns_the_oldest_first() {
    let mut arena = Arena::new();
    let mut q = EntryQueue::new();
    let a = arena.insert(entry(1));
    let b = arena.insert(entry(2));
    q.enqueue(&mut arena, a);
    q.enqueue(&mut arena, b);

    assert_eq!(q.dequeue(&mut arena), Some(a));
    assert_eq!(q.dequeue(&mut arena), Some(b));
    assert_eq!(q.dequeue(&mut arena), None);
    assert!(q.is_empty());
  }

  #[test]
  fn remove_from_the_middle_relinks_neighbors() {
    let mut arena = Arena::new();
    let mut q = EntryQueue::new();
    let a = arena.insert(entry(1));
    let b = arena.insert(entry(2));
    let c = arena.insert(entry(3));
    for idx in [a, b, c] {
      q.enqueue(&mut arena, idx);
    }

    q.remove(&mut arena, b);
    assert_eq!(order(&q, &arena), vec![1, 3]);
    assert!(arena[b].lru.prev.is_none() && arena[b].lru.next.is_none());

    q.remove(&mut arena, a);
    q.remove(&mut arena, c);
    assert!(q.is_empty());
    assert_eq!(q.len(), 0);
  }

  #[test]
  fn push_front_restores_victim_order() {
    let mut arena = Arena::new();
    let mut q = EntryQueue::new();
    let victims: Vec<Index> = (1..=3).map(|tag| arena.insert(entry(tag))).collect();
    for &idx in &victims {
      q.enqueue(&mut arena, idx);
    }

    // Drain the queue, then restore it exactly by pushing in reverse order.
    let drained: Vec<Index> = std::iter::from_fn(|| q.dequeue(&mut arena)).collect();
    assert_eq!(drained, victims);
    for &idx in drained.iter().rev() {
      q.push_front(&mut arena, idx);
    }
    assert_eq!(order(&q, &arena), vec![1, 2, 3]);
  }

  #[test]
  fn entries_migrate_between_queues_without_reinsertion() {
    let mut arena = Arena::new();
    let mut resident = EntryQueue::new();
    let mut history = EntryQueue::new();
    let idx = arena.insert(entry(7));

    resident.enqueue(&mut arena, idx);
    resident.remove(&mut arena, idx);
    history.enqueue(&mut arena, idx);

    assert!(resident.is_empty());
    assert_eq!(history.dequeue(&mut arena), Some(idx));
  }
}
