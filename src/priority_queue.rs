//! Binary min-heap with handles.
//!
//! Items are dense `usize` ids (node indices, for the solver): the handle table
//! is indexed by item, so its length follows the largest id ever inserted.
//! Alongside the heap array the queue keeps an item -> slot map, the item's handle, so
//! `decrease_priority` finds its element in O(1) and restores the heap in
//! O(log n). `None` is the "not in the queue" handle.
//!
//! An element only moves up past a parent of strictly greater priority. When
//! sifting down, children of equal priority are ordered by the stamp of their
//! `insert` call, so elements inserted with equal priority leave in the order
//! they came in.

use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeapEntry {
    pub item: usize,
    pub priority: f64,
    stamp: u64,
}

impl HeapEntry {
    fn precedes(&self, other: &HeapEntry) -> bool {
        self.priority < other.priority
            || (self.priority == other.priority && self.stamp < other.stamp)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MinPriorityQueue {
    heap: Vec<HeapEntry>,
    // item -> slot in `heap`
    handles: Vec<Option<usize>>,
    next_stamp: u64,
}

impl MinPriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue sized for items `0..items` without reallocating.
    pub fn with_capacity(items: usize) -> Self {
        Self {
            heap: Vec::with_capacity(items),
            handles: vec![None; items],
            next_stamp: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every entry. Handles of the dropped items are forgotten too.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.handles.clear();
        self.next_stamp = 0;
    }

    /// Current slot of `item`, or `None` if it is not queued.
    pub fn handle_of(&self, item: usize) -> Option<usize> {
        self.handles.get(item).copied().flatten()
    }

    pub fn contains(&self, item: usize) -> bool {
        self.handle_of(item).is_some()
    }

    pub fn priority_of(&self, item: usize) -> Option<f64> {
        self.handle_of(item).map(|slot| self.heap[slot].priority)
    }

    /// The heap array in slot order.
    pub fn entries(&self) -> &[HeapEntry] {
        &self.heap
    }

    pub fn insert(&mut self, item: usize, priority: f64) -> Result<()> {
        if priority.is_nan() {
            return Err(Error::InvalidPriority);
        }
        if self.contains(item) {
            return Err(Error::AlreadyQueued { item });
        }
        if item >= self.handles.len() {
            let len = item.checked_add(1).ok_or(Error::ItemTooLarge { item })?;
            self.handles.resize(len, None);
        }

        let slot = self.heap.len();
        self.heap.push(HeapEntry {
            item,
            priority,
            stamp: self.next_stamp,
        });
        self.next_stamp += 1;
        self.handles[item] = Some(slot);
        self.sift_up(slot);
        Ok(())
    }

    pub fn minimum(&self) -> Result<HeapEntry> {
        self.heap.first().copied().ok_or(Error::EmptyQueue)
    }

    pub fn extract_minimum(&mut self) -> Result<HeapEntry> {
        if self.heap.is_empty() {
            return Err(Error::EmptyQueue);
        }
        let min = self.heap.swap_remove(0);
        self.handles[min.item] = None;
        if let Some(moved) = self.heap.first() {
            self.handles[moved.item] = Some(0);
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Lowers the priority of a queued item.
    ///
    /// Fails with [`Error::NotInQueue`] if `item` is not queued and with
    /// [`Error::PriorityNotDecreased`] unless `priority` is strictly below the
    /// current one; the queue is untouched on failure.
    pub fn decrease_priority(&mut self, item: usize, priority: f64) -> Result<()> {
        let slot = self.handle_of(item).ok_or(Error::NotInQueue { item })?;
        debug_assert_eq!(self.heap[slot].item, item);

        let current = self.heap[slot].priority;
        // also rejects NaN
        if !(priority < current) {
            return Err(Error::PriorityNotDecreased {
                current,
                requested: priority,
            });
        }
        self.heap[slot].priority = priority;
        self.sift_up(slot);
        Ok(())
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].priority < self.heap[parent].priority {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;

            if left < len && self.heap[left].precedes(&self.heap[smallest]) {
                smallest = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[smallest]) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.handles[self.heap[a].item] = Some(a);
        self.handles[self.heap[b].item] = Some(b);
    }
}
