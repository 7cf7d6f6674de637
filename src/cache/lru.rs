//! LRU List Module
//!
//! Recency ordering for a shard, stored as a doubly linked list inside a
//! vector and addressed by slot index.

// == Slot ==
#[derive(Debug)]
struct Slot {
    key: Option<String>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Tracks access order for LRU eviction.
///
/// - Front (head) = Most recently used
/// - Back (tail) = Least recently used
///
/// Every operation is O(1). Freed slots are recycled through a free list, so
/// a slot index handed out by [`push_front`](Self::push_front) stays valid
/// until that key is removed.
#[derive(Debug, Default)]
pub struct LruList {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl LruList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Front ==
    /// Inserts a key at the most recently used position and returns its slot.
    pub fn push_front(&mut self, key: String) -> usize {
        let slot = Slot {
            key: Some(key),
            prev: None,
            next: self.head,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => self.slots[old_head].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks the key in `idx` as most recently used.
    ///
    /// Returns false if the slot is not occupied.
    pub fn move_to_front(&mut self, idx: usize) -> bool {
        if !self.is_occupied(idx) {
            return false;
        }
        if self.head == Some(idx) {
            return true;
        }

        self.unlink(idx);
        let slot = &mut self.slots[idx];
        slot.prev = None;
        slot.next = self.head;
        if let Some(old_head) = self.head {
            self.slots[old_head].prev = Some(idx);
        }
        self.head = Some(idx);
        true
    }

    // == Remove ==
    /// Removes the slot and returns its key.
    pub fn remove(&mut self, idx: usize) -> Option<String> {
        if !self.is_occupied(idx) {
            return None;
        }

        self.unlink(idx);
        let slot = &mut self.slots[idx];
        slot.prev = None;
        slot.next = None;
        let key = slot.key.take();
        self.free.push(idx);
        self.len -= 1;
        key
    }

    // == Pop Back ==
    /// Removes and returns the least recently used key.
    pub fn pop_back(&mut self) -> Option<String> {
        self.tail.and_then(|idx| self.remove(idx))
    }

    // == Peek Back ==
    /// Returns the least recently used key without removing it.
    pub fn back(&self) -> Option<&str> {
        self.tail.and_then(|idx| self.slots[idx].key.as_deref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the key stored at `idx`, if the slot is occupied.
    pub fn key(&self, idx: usize) -> Option<&str> {
        self.slots.get(idx).and_then(|slot| slot.key.as_deref())
    }

    /// Iterates keys from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let slot = &self.slots[idx];
            cursor = slot.next;
            slot.key.as_deref()
        })
    }

    fn is_occupied(&self, idx: usize) -> bool {
        self.slots.get(idx).is_some_and(|slot| slot.key.is_some())
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = &self.slots[idx];
            (slot.prev, slot.next)
        };

        match prev {
            Some(prev_idx) => self.slots[prev_idx].next = next,
            None => self.head = next,
        }
        match next {
            Some(next_idx) => self.slots[next_idx].prev = prev,
            None => self.tail = prev,
        }
    }
}
