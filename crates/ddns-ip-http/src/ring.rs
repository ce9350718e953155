//! Round-robin ring of interchangeable members

use std::sync::atomic::{AtomicU32, Ordering};

/// Fixed, ordered pool selected in round-robin order
///
/// Members are set at construction and never change. The only shared
/// mutable state is the selection counter, which is advanced atomically, so
/// concurrent callers never block each other and over any `len()`
/// consecutive selections every member is picked exactly once.
#[derive(Debug)]
pub struct Ring<T> {
    members: Vec<T>,
    counter: AtomicU32,
}

impl<T> Ring<T> {
    /// Build a ring; returns `None` when `members` is empty
    pub fn new(members: Vec<T>) -> Option<Self> {
        Self::starting_at(members, 0)
    }

    fn starting_at(members: Vec<T>, counter: u32) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        Some(Self {
            members,
            counter: AtomicU32::new(counter),
        })
    }

    /// Select the next member
    ///
    /// The counter wraps at `u32::MAX`; the index is always reduced modulo
    /// the ring length, so it stays in range across the wrap.
    pub fn next(&self) -> &T {
        let ticket = self.counter.fetch_add(1, Ordering::Relaxed);
        let index = ticket as usize % self.members.len();
        &self.members[index]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; an empty ring cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in rotation order
    pub fn members(&self) -> &[T] {
        &self.members
    }
}
