//! `WakeQueue`: pending process wake-ups ordered by `(time, insertion order)`.
//!
//! A process that suspends registers the instant it must resume.  The
//! scheduler always pops the earliest instant; processes due at the same
//! instant come out in the order they were pushed, which makes replay of a
//! run deterministic.
//!
//! `BTreeMap` gives O(log W) push and pop where W is the number of distinct
//! pending instants.

use std::collections::{BTreeMap, VecDeque};

use fleet_core::{ProcessId, SimTime};

/// A priority queue mapping simulated instants to the processes due then.
#[derive(Default, Debug)]
pub struct WakeQueue {
    inner: BTreeMap<SimTime, VecDeque<ProcessId>>,
    /// Cached entry count for O(1) `len()`.
    total: usize,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `pid` to resume at `at`, after everything already queued
    /// for that instant.
    pub fn push(&mut self, at: SimTime, pid: ProcessId) {
        self.inner.entry(at).or_default().push_back(pid);
        self.total += 1;
    }

    /// Remove and return the earliest wake-up.
    pub fn pop(&mut self) -> Option<(SimTime, ProcessId)> {
        let mut entry = self.inner.first_entry()?;
        let at = *entry.key();
        let pid = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        let pid = pid?;
        self.total -= 1;
        Some((at, pid))
    }

    /// The earliest instant with a queued process, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Total number of queued wake-ups.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future instants with at least one queued process.
    pub fn time_count(&self) -> usize {
        self.inner.len()
    }
}
