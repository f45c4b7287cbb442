//! StateSet: deduplicating set of explored states with a built-in LIFO
//! frontier of states not yet handed out for expansion.

use crate::bucket_table::{BucketTable, Probe, MIN_BUCKETS};
use crate::compare::{Compare, OrdCompare};
use crate::config::StateSetConfig;
use crate::entry::{Arena, Entry};
use crate::error::Error;
use crate::frontier::{Frontier, Queued};
use slotmap::DefaultKey;

/// Stable identity of an admitted state.
///
/// Handles stay valid for the whole life of the set that issued them,
/// since entries are never removed. A handle is only meaningful for that
/// set; looking it up in another set may yield `None` or an unrelated
/// entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }

    pub fn payload<'a, T, C>(&self, set: &'a StateSet<T, C>) -> Option<&'a T> {
        set.payload(*self)
    }

    pub fn key<T, C>(&self, set: &StateSet<T, C>) -> Option<u64> {
        set.key(*self)
    }

    pub fn is_queued<T, C>(&self, set: &StateSet<T, C>) -> Option<bool> {
        set.is_queued(*self)
    }
}

/// Outcome of `StateSet::insert`.
#[derive(Debug)]
pub enum Insertion<T> {
    /// The state was new. It is now in the set and at the frontier head.
    Admitted(Handle),
    /// An equal state was already admitted. Carries its handle and gives
    /// the rejected candidate payload back to the caller.
    Duplicate(Handle, T),
}

impl<T> Insertion<T> {
    /// Handle of the admitted entry equal to the candidate, old or new.
    pub fn handle(&self) -> Handle {
        match self {
            Insertion::Admitted(h) | Insertion::Duplicate(h, _) => *h,
        }
    }

    pub fn is_admitted(&self) -> bool {
        matches!(self, Insertion::Admitted(_))
    }

    /// The rejected candidate, if this was a duplicate.
    pub fn into_rejected(self) -> Option<T> {
        match self {
            Insertion::Admitted(_) => None,
            Insertion::Duplicate(_, payload) => Some(payload),
        }
    }
}

/// Deduplicating state container for exhaustive exploration.
///
/// Each state is inserted with a caller-computed `u64` key. States with
/// equal keys share a bucket chain kept in ascending comparator order, so
/// lookups stop at the first greater entry. Every newly admitted state is
/// also pushed on the frontier, which `pop` drains most-recent-first.
pub struct StateSet<T, C = OrdCompare> {
    cmp: C,
    table: BucketTable,
    frontier: Frontier,
    slots: Arena<T>,
}

impl<T: Ord> StateSet<T> {
    pub fn new() -> Self {
        Self::with_comparator(OrdCompare)
    }
}

impl<T: Ord> Default for StateSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over every admitted entry, in arena order.
pub struct Iter<'a, T> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Handle, u64, &'a T);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, e)| (Handle::new(k), e.key, &e.payload))
    }
}

/// Iterator over queued entries in the order `pop` would return them.
pub struct FrontierIter<'a, T> {
    queued: Queued<'a, T>,
    slots: &'a Arena<T>,
}

impl<'a, T> Iterator for FrontierIter<'a, T> {
    type Item = (Handle, u64, &'a T);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.queued.next()?;
        let e = &self.slots[k];
        Some((Handle::new(k), e.key, &e.payload))
    }
}

impl<T, C> StateSet<T, C> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of admitted states not yet popped.
    pub fn pending(&self) -> usize {
        self.frontier.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// How many times the bucket array has doubled.
    pub fn grow_count(&self) -> usize {
        self.table.grow_count()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    /// Length of the longest bucket chain. Scans the whole table; meant for
    /// judging key quality, not for hot paths.
    pub fn longest_chain(&self) -> usize {
        (0..self.table.bucket_count())
            .map(|i| self.table.chain(&self.slots, i).count())
            .max()
            .unwrap_or(0)
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn payload(&self, h: Handle) -> Option<&T> {
        self.slots.get(h.raw_handle()).map(|e| &e.payload)
    }

    pub fn key(&self, h: Handle) -> Option<u64> {
        self.slots.get(h.raw_handle()).map(|e| e.key)
    }

    /// `Some(true)` while the entry waits on the frontier, `Some(false)`
    /// once popped.
    pub fn is_queued(&self, h: Handle) -> Option<bool> {
        self.slots.get(h.raw_handle()).map(|e| e.queued)
    }

    /// Take the most recently admitted state that has not been popped yet.
    /// The state stays in the set.
    pub fn pop(&mut self) -> Option<Handle> {
        self.frontier.pop(&mut self.slots).map(Handle::new)
    }

    /// The state `pop` would return next.
    pub fn peek(&self) -> Option<Handle> {
        self.frontier.peek().map(Handle::new)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn frontier(&self) -> FrontierIter<'_, T> {
        FrontierIter {
            queued: self.frontier.iter(&self.slots),
            slots: &self.slots,
        }
    }
}

impl<T, C> StateSet<T, C>
where
    C: Compare<T>,
{
    /// Empty set with `MIN_BUCKETS` buckets ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            cmp,
            table: BucketTable::with_buckets(MIN_BUCKETS),
            frontier: Frontier::new(),
            slots: Arena::new(),
        }
    }

    /// Empty set sized by `config`. Fails on an invalid bucket count or if
    /// the bucket array cannot be allocated.
    pub fn with_config(config: StateSetConfig, cmp: C) -> Result<Self, Error> {
        Ok(Self {
            cmp,
            table: BucketTable::try_with_buckets(config.initial_buckets)?,
            frontier: Frontier::new(),
            slots: Arena::new(),
        })
    }

    /// Admitted state equal to `probe`, if any. `key` must be the key the
    /// equal state was inserted with.
    ///
    /// Read-only: a comparator holding a shared reference to this set may
    /// itself call `find`.
    pub fn find(&self, key: u64, probe: &T) -> Option<Handle> {
        match self.table.locate(&self.slots, &self.cmp, key, probe) {
            Probe::Found(k) => Some(Handle::new(k)),
            Probe::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, key: u64, probe: &T) -> bool {
        self.find(key, probe).is_some()
    }

    /// Admit `payload` under `key` unless an equal state is already present.
    ///
    /// A new state is linked into its bucket and pushed on the frontier.
    /// If the admission brings the load factor to 3/4 the bucket array
    /// doubles first, and the insertion point is recomputed against the
    /// new mask.
    pub fn insert(&mut self, key: u64, payload: T) -> Insertion<T> {
        let mut prev = match self.table.locate(&self.slots, &self.cmp, key, &payload) {
            Probe::Found(k) => return Insertion::Duplicate(Handle::new(k), payload),
            Probe::Vacant { prev } => prev,
        };

        if self.table.needs_grow(self.slots.len() + 1) {
            self.table.grow(&mut self.slots);
            // The neighbor found above may now live in the other half.
            prev = match self.table.locate(&self.slots, &self.cmp, key, &payload) {
                Probe::Found(k) => return Insertion::Duplicate(Handle::new(k), payload),
                Probe::Vacant { prev } => prev,
            };
        }

        let k = self.slots.insert(Entry::new(key, payload));
        self.table.link(&mut self.slots, k, prev);
        self.frontier.push(&mut self.slots, k);
        Insertion::Admitted(Handle::new(k))
    }

    /// Like `insert`, but reserves the doubled bucket array before a new
    /// state is admitted and reports allocation failure instead of
    /// aborting. Duplicates never allocate. On error the set is unchanged.
    pub fn try_insert(&mut self, key: u64, payload: T) -> Result<Insertion<T>, Error> {
        if let Probe::Found(k) = self.table.locate(&self.slots, &self.cmp, key, &payload) {
            return Ok(Insertion::Duplicate(Handle::new(k), payload));
        }
        if self.table.needs_grow(self.slots.len() + 1) {
            self.table.try_reserve_grow()?;
        }
        Ok(self.insert(key, payload))
    }
}

#[cfg(test)]
impl<T, C> StateSet<T, C>
where
    C: Compare<T>,
{
    /// Panics unless every chain is strictly ascending and every entry sits
    /// in the bucket its key selects.
    pub(crate) fn assert_chains_sorted(&self) {
        use core::cmp::Ordering;
        let mut seen = 0;
        for i in 0..self.table.bucket_count() {
            let mut prev: Option<DefaultKey> = None;
            for k in self.table.chain(&self.slots, i) {
                let e = &self.slots[k];
                assert_eq!(self.table.bucket_index(e.key), i, "entry in wrong bucket");
                if let Some(p) = prev {
                    assert_eq!(
                        self.cmp.compare(&self.slots[p].payload, &e.payload),
                        Ordering::Less,
                        "bucket {i} not ascending"
                    );
                }
                prev = Some(k);
                seen += 1;
            }
        }
        assert_eq!(seen, self.len(), "chains do not cover every entry");
    }
}
