//! A priority queue backed by a binary min-heap.
//!
//! Smaller priorities are served first, and elements enqueued with the same priority come out in
//! the order they went in.
//!
//! # Examples
//!
//! ```
//! use avlg::priority_queue::MinHeapPriorityQueue;
//!
//! let mut queue = MinHeapPriorityQueue::new();
//! queue.enqueue("second", 2).unwrap();
//! queue.enqueue("first", 1).unwrap();
//! queue.enqueue("third", 2).unwrap();
//!
//! assert_eq!(queue.dequeue(), Ok("first"));
//! assert_eq!(queue.dequeue(), Ok("second"));
//! assert_eq!(queue.dequeue(), Ok("third"));
//! assert!(queue.is_empty());
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::debug;

use crate::error::{QueueError, Result};

/// A queue where each element carries an integer priority of at least 1.
#[derive(Debug, Clone)]
pub struct MinHeapPriorityQueue<T> {
    // `BinaryHeap` is a max-heap so we flip the ordering.
    heap: BinaryHeap<Reverse<Entry<T>>>,
    /// Stamped onto each entry to break priority ties in insertion order.
    order_counter: u64,
}

impl<T> Default for MinHeapPriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinHeapPriorityQueue<T> {
    /// Generate a new, empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            order_counter: 0,
        }
    }

    /// Adds `value` to the queue.
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidPriority`] if `priority` is less than 1. The queue is unchanged.
    pub fn enqueue(&mut self, value: T, priority: i64) -> Result<(), QueueError> {
        if priority < 1 {
            return Err(QueueError::InvalidPriority(priority));
        }

        let order = self.order_counter;
        self.order_counter += 1;
        self.heap.push(Reverse(Entry {
            priority,
            order,
            value,
        }));
        Ok(())
    }

    /// Removes and returns the element with the smallest priority, oldest first among equals.
    ///
    /// # Errors
    ///
    /// [`QueueError::EmptyQueue`] if there is nothing to dequeue.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        self.heap
            .pop()
            .map(|Reverse(entry)| entry.value)
            .ok_or(QueueError::EmptyQueue)
    }

    /// The element [`MinHeapPriorityQueue::dequeue`] would return next.
    ///
    /// # Errors
    ///
    /// [`QueueError::EmptyQueue`] if the queue is empty.
    pub fn first(&self) -> Result<&T, QueueError> {
        self.heap
            .peek()
            .map(|Reverse(entry)| &entry.value)
            .ok_or(QueueError::EmptyQueue)
    }

    /// The number of queued elements.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue has no elements.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every element and restarts the insertion order.
    pub fn clear(&mut self) {
        debug!("clearing priority queue of {} elements", self.heap.len());
        self.heap.clear();
        self.order_counter = 0;
    }

    /// Visits the elements in the order they would be dequeued without removing them.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg::priority_queue::MinHeapPriorityQueue;
    ///
    /// let mut queue = MinHeapPriorityQueue::new();
    /// queue.enqueue('b', 3).unwrap();
    /// queue.enqueue('a', 1).unwrap();
    ///
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), vec![&'a', &'b']);
    /// assert_eq!(queue.len(), 2);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let mut entries: Vec<&Entry<T>> = self.heap.iter().map(|Reverse(entry)| entry).collect();
        entries.sort_unstable();
        entries.into_iter().map(|entry| &entry.value)
    }
}

/// A queued value keyed by its priority and then by when it was enqueued. The value itself never
/// takes part in comparisons.
#[derive(Debug, Clone)]
struct Entry<T> {
    priority: i64,
    order: u64,
    value: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (i64, u64) {
        (self.priority, self.order)
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
