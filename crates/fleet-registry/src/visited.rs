//! Per-phase record of candidates already tried.
//!
//! A visited set stops a selection loop from picking the same station twice
//! within one phase.  It is cleared between independent phases (start-station
//! search vs. end-station search, one recharge episode vs. the next).

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashSet;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashSet as HashSet;

/// Candidates already selected in the current phase, in selection order.
#[derive(Clone, Debug)]
pub struct VisitedSet<I> {
    seen:  HashSet<I>,
    order: Vec<I>,
}

impl<I> Default for VisitedSet<I> {
    fn default() -> Self {
        Self { seen: HashSet::default(), order: Vec::new() }
    }
}

impl<I: Copy + Eq + std::hash::Hash> VisitedSet<I> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, id: I) -> bool {
        self.seen.contains(&id)
    }

    /// Record `id`.  Returns `false` if it was already present.
    pub fn insert(&mut self, id: I) -> bool {
        if self.seen.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }

    /// Visited ids in selection order.
    pub fn as_slice(&self) -> &[I] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
