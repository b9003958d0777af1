//! Retry queue
//!
//! Records fetches that failed so a user-triggered retry re-issues exactly
//! that fetch. Failures are not coalesced: two failures queue two retries.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A fetch that can be re-issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PendingOperation {
    ListBreeds,
    ListImages { breed: String },
}

impl fmt::Display for PendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingOperation::ListBreeds => write!(f, "list breeds"),
            PendingOperation::ListImages { breed } => write!(f, "list images of {breed}"),
        }
    }
}

/// FIFO of pending operations
#[derive(Debug, Default, Clone)]
pub struct RetryQueue {
    ops: VecDeque<PendingOperation>,
}

impl RetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail
    pub fn enqueue(&mut self, op: PendingOperation) {
        self.ops.push_back(op);
    }

    /// Remove the head
    pub fn dequeue(&mut self) -> Option<PendingOperation> {
        self.ops.pop_front()
    }

    /// Remove the head and hand it to `run`
    ///
    /// Returns false (and does not call `run`) when the queue is empty.
    pub fn dequeue_and_run<F: FnOnce(PendingOperation)>(&mut self, run: F) -> bool {
        match self.dequeue() {
            Some(op) => {
                run(op);
                true
            }
            None => false,
        }
    }

    /// Next operation to run, without removing it
    pub fn front(&self) -> Option<&PendingOperation> {
        self.ops.front()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingOperation> {
        self.ops.iter()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Keep only the operations matching `keep`, preserving order
    pub fn retain<F: FnMut(&PendingOperation) -> bool>(&mut self, keep: F) {
        self.ops.retain(keep);
    }
}
