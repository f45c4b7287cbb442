//! Exhaustive exploration loop over a `StateSet`.
//!
//! The set supplies deduplication and the worklist; the caller supplies
//! successor generation. Seed the set with the initial states, then call
//! `explore`.

use crate::compare::Compare;
use crate::state_set::{Insertion, StateSet};

/// Buffer the expansion callback fills with `(key, payload)` successors.
#[derive(Debug)]
pub struct Successors<T> {
    buf: Vec<(u64, T)>,
}

impl<T> Default for Successors<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Successors<T> {
    type Item = (u64, T);
    type IntoIter = std::vec::IntoIter<(u64, T)>;
    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<T> Successors<T> {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Record a successor state with its precomputed key.
    pub fn push(&mut self, key: u64, payload: T) {
        self.buf.push((key, payload));
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Counters from one `explore` run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExploreStats {
    /// States popped and handed to the expansion callback.
    pub expanded: usize,
    /// Successors that were new.
    pub admitted: usize,
    /// Successors already present in the set.
    pub duplicates: usize,
}

/// Pop states until the frontier is empty, expanding each one and
/// inserting every successor. Duplicate successors are dropped.
///
/// Order is last-in-first-out, so the walk is depth-first-like; the set
/// deduplicates against everything admitted so far, not only the current
/// path.
pub fn explore<T, C, F>(set: &mut StateSet<T, C>, mut expand: F) -> ExploreStats
where
    C: Compare<T>,
    F: FnMut(&T, &mut Successors<T>),
{
    let mut stats = ExploreStats::default();
    let mut next = Successors::new();

    while let Some(h) = set.pop() {
        let Some(state) = set.payload(h) else {
            break;
        };
        expand(state, &mut next);
        stats.expanded += 1;
        log::trace!(
            "expanded state #{} into {} successors ({} pending)",
            stats.expanded,
            next.len(),
            set.pending()
        );

        for (key, payload) in next.buf.drain(..) {
            match set.insert(key, payload) {
                Insertion::Admitted(_) => stats.admitted += 1,
                Insertion::Duplicate(..) => stats.duplicates += 1,
            }
        }
    }

    log::debug!(
        "exploration done: {} states, {} expanded, {} duplicate successors, {} buckets",
        set.len(),
        stats.expanded,
        stats.duplicates,
        set.bucket_count()
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: a cyclic graph is explored once per state.
    #[test]
    fn cycle_is_expanded_once_per_state() {
        let mut set: StateSet<u32> = StateSet::new();
        set.insert(0, 0);
        let stats = explore(&mut set, |&s, next| {
            let t = (s + 1) % 10;
            next.push(u64::from(t), t);
        });
        assert_eq!(stats.expanded, 10);
        assert_eq!(stats.admitted, 9);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(set.len(), 10);
        assert_eq!(set.pending(), 0);
    }

    #[test]
    fn empty_frontier_does_nothing() {
        let mut set: StateSet<u32> = StateSet::new();
        let stats = explore(&mut set, |_, _| unreachable!("nothing to expand"));
        assert_eq!(stats, ExploreStats::default());
    }
}
