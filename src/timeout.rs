//! Deadline-ordered set of pending operation timeouts.
//!
//! The worker polls this set once per cycle with the current time from the
//! session clock. Entries are ordered soonest-deadline-first; cancelling a
//! kind with no pending entry is a silent no-op.

use std::{cmp::Ordering, collections::BinaryHeap};

/// Operations guarded by a deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutKind {
    /// Login handshake awaiting the end-of-MOTD numeric.
    Login,
}

#[derive(Debug)]
struct Entry {
    deadline: f64,
    kind: TimeoutKind,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Entry {
    // Reversed so the BinaryHeap surfaces the soonest deadline first.
    fn cmp(&self, other: &Self) -> Ordering { other.deadline.total_cmp(&self.deadline) }
}

/// Pending timeouts, ordered soonest-deadline-first.
#[derive(Debug, Default)]
pub struct PendingTimeouts {
    entries: BinaryHeap<Entry>,
}

impl PendingTimeouts {
    /// Construct an empty set.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Schedule `kind` to expire at the absolute `deadline`.
    ///
    /// A pending entry of the same kind is replaced, so an operation never
    /// has two live deadlines at once.
    pub fn schedule(&mut self, kind: TimeoutKind, deadline: f64) {
        self.cancel(kind);
        self.entries.push(Entry { deadline, kind });
    }

    /// Remove any pending entry of `kind`. Absent kinds are a silent no-op.
    pub fn cancel(&mut self, kind: TimeoutKind) {
        self.entries.retain(|entry| entry.kind != kind);
    }

    /// Remove and return every entry whose deadline is at or before `now`,
    /// earliest first.
    pub fn poll_expired(&mut self, now: f64) -> Vec<TimeoutKind> {
        let mut expired = Vec::new();
        while self.entries.peek().is_some_and(|entry| entry.deadline <= now) {
            if let Some(entry) = self.entries.pop() {
                expired.push(entry.kind);
            }
        }
        expired
    }

    /// The soonest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.entries.peek().map(|entry| entry.deadline)
    }

    /// Whether no timeouts are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
