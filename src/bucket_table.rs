//! BucketTable: power-of-two array of sorted chains threaded through the
//! entry arena, grown by doubling and splitting each chain in place.

use slotmap::DefaultKey;

use crate::compare::Compare;
use crate::entry::Arena;
use crate::error::Error;
use core::cmp::Ordering;

/// Initial and minimum number of buckets.
pub const MIN_BUCKETS: usize = 1024;

/// Result of walking a chain for a candidate.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    /// An entry comparing equal to the candidate.
    Found(DefaultKey),
    /// Not present. The candidate belongs right after `prev`, or at the
    /// chain head when `prev` is `None`.
    Vacant { prev: Option<DefaultKey> },
}

#[derive(Debug)]
pub(crate) struct BucketTable {
    heads: Vec<Option<DefaultKey>>,
    mask: usize,
    grows: usize,
}

/// Head/tail pair used while splitting one chain.
#[derive(Default)]
struct Split {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl Split {
    /// Append `k` at the tail, so relative order is kept without a
    /// reversal pass.
    #[inline]
    fn append<T>(&mut self, arena: &mut Arena<T>, k: DefaultKey) {
        match self.tail {
            Some(t) => arena[t].bucket_next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }
}

#[inline]
fn bucket_of(key: u64, mask: usize) -> usize {
    (key & mask as u64) as usize
}

pub(crate) fn valid_bucket_count(n: usize) -> bool {
    n >= MIN_BUCKETS && n.is_power_of_two()
}

impl BucketTable {
    /// `buckets` must satisfy `valid_bucket_count`.
    pub(crate) fn with_buckets(buckets: usize) -> Self {
        debug_assert!(valid_bucket_count(buckets));
        Self {
            heads: vec![None; buckets],
            mask: buckets - 1,
            grows: 0,
        }
    }

    pub(crate) fn try_with_buckets(buckets: usize) -> Result<Self, Error> {
        if !valid_bucket_count(buckets) {
            return Err(Error::InvalidBucketCount(buckets));
        }
        let mut heads = Vec::new();
        heads.try_reserve_exact(buckets)?;
        heads.resize(buckets, None);
        Ok(Self {
            heads,
            mask: buckets - 1,
            grows: 0,
        })
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.heads.capacity()
    }

    pub(crate) fn grow_count(&self) -> usize {
        self.grows
    }

    pub(crate) fn bucket_index(&self, key: u64) -> usize {
        bucket_of(key, self.mask)
    }

    /// Whether admitting an entry that brings the count to `entries`
    /// must double the table first (load factor reaches 3/4).
    #[inline]
    pub(crate) fn needs_grow(&self, entries: usize) -> bool {
        entries >= self.heads.len() / 4 * 3
    }

    /// Walk the chain for `key` in ascending order. Stops at the first
    /// entry greater than `probe`; chains are sorted so nothing past it
    /// can be equal.
    pub(crate) fn locate<T, C>(&self, arena: &Arena<T>, cmp: &C, key: u64, probe: &T) -> Probe
    where
        C: Compare<T>,
    {
        let mut prev = None;
        let mut cur = self.heads[self.bucket_index(key)];
        while let Some(k) = cur {
            let e = &arena[k];
            match cmp.compare(&e.payload, probe) {
                Ordering::Less => {
                    prev = Some(k);
                    cur = e.bucket_next;
                }
                Ordering::Equal => return Probe::Found(k),
                Ordering::Greater => break,
            }
        }
        Probe::Vacant { prev }
    }

    /// Splice `k` into its bucket right after `prev` (or at the head).
    /// `prev` must come from a `locate` against the current mask.
    pub(crate) fn link<T>(&mut self, arena: &mut Arena<T>, k: DefaultKey, prev: Option<DefaultKey>) {
        match prev {
            Some(p) => {
                arena[k].bucket_next = arena[p].bucket_next;
                arena[p].bucket_next = Some(k);
            }
            None => {
                let i = self.bucket_index(arena[k].key);
                arena[k].bucket_next = self.heads[i];
                self.heads[i] = Some(k);
            }
        }
    }

    /// Reserve room for the next doubling without changing the table.
    /// After success, `grow` does not allocate.
    pub(crate) fn try_reserve_grow(&mut self) -> Result<(), Error> {
        let old = self.heads.len();
        if old.checked_mul(2).is_none() {
            return Err(Error::CapacityOverflow(old));
        }
        self.heads.try_reserve_exact(old)?;
        Ok(())
    }

    /// Double the bucket count. Each old chain `i` is split on the newly
    /// significant key bit into buckets `i` and `i + old`; both halves keep
    /// the ascending order of the old chain.
    pub(crate) fn grow<T>(&mut self, arena: &mut Arena<T>) {
        let old = self.heads.len();
        let new_mask = old * 2 - 1;
        self.heads.resize(old * 2, None);

        for i in 0..old {
            let mut stay = Split::default();
            let mut moved = Split::default();
            let mut cur = self.heads[i].take();
            while let Some(k) = cur {
                cur = arena[k].bucket_next.take();
                if bucket_of(arena[k].key, new_mask) == i {
                    stay.append(arena, k);
                } else {
                    moved.append(arena, k);
                }
            }
            self.heads[i] = stay.head;
            self.heads[i + old] = moved.head;
        }

        self.mask = new_mask;
        self.grows += 1;
        log::debug!(
            "state set grew from {} to {} buckets ({} entries)",
            old,
            old * 2,
            arena.len()
        );
    }

    /// Iterate the arena keys of bucket `i`, head first.
    pub(crate) fn chain<'a, T>(&self, arena: &'a Arena<T>, i: usize) -> Chain<'a, T> {
        Chain {
            arena,
            cur: self.heads[i],
        }
    }
}

pub(crate) struct Chain<'a, T> {
    arena: &'a Arena<T>,
    cur: Option<DefaultKey>,
}

impl<'a, T> Iterator for Chain<'a, T> {
    type Item = DefaultKey;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        self.cur = self.arena[k].bucket_next;
        Some(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::OrdCompare;
    use crate::entry::Entry;

    fn admit(t: &mut BucketTable, arena: &mut Arena<u32>, key: u64, v: u32) -> DefaultKey {
        match t.locate(arena, &OrdCompare, key, &v) {
            Probe::Found(k) => k,
            Probe::Vacant { prev } => {
                let k = arena.insert(Entry::new(key, v));
                t.link(arena, k, prev);
                k
            }
        }
    }

    fn payloads(t: &BucketTable, arena: &Arena<u32>, i: usize) -> Vec<u32> {
        t.chain(arena, i).map(|k| arena[k].payload).collect()
    }

    /// Invariant: a chain stays ascending whatever the insertion order.
    #[test]
    fn chain_is_sorted_on_insert() {
        let mut arena = Arena::new();
        let mut t = BucketTable::with_buckets(MIN_BUCKETS);
        for v in [7, 3, 9, 1, 5] {
            admit(&mut t, &mut arena, 4, v);
        }
        assert_eq!(payloads(&t, &arena, 4), vec![1, 3, 5, 7, 9]);
    }

    /// Invariant: locate finds equal entries and stops early on a greater one.
    #[test]
    fn locate_found_and_vacant() {
        let mut arena = Arena::new();
        let mut t = BucketTable::with_buckets(MIN_BUCKETS);
        let k3 = admit(&mut t, &mut arena, 1, 3);
        let k5 = admit(&mut t, &mut arena, 1, 5);
        assert_eq!(t.locate(&arena, &OrdCompare, 1, &3), Probe::Found(k3));
        assert_eq!(t.locate(&arena, &OrdCompare, 1, &4), Probe::Vacant { prev: Some(k3) });
        assert_eq!(t.locate(&arena, &OrdCompare, 1, &2), Probe::Vacant { prev: None });
        assert_eq!(t.locate(&arena, &OrdCompare, 1, &6), Probe::Vacant { prev: Some(k5) });
        // Same payload under a different bucket is not seen.
        assert_eq!(t.locate(&arena, &OrdCompare, 2, &3), Probe::Vacant { prev: None });
    }

    /// Invariant: a split sends each entry to `i` or `i + old` by the new bit
    /// and keeps both halves ascending.
    #[test]
    fn grow_splits_by_new_bit_and_keeps_order() {
        let mut arena = Arena::new();
        let mut t = BucketTable::with_buckets(MIN_BUCKETS);
        let old = MIN_BUCKETS as u64;
        // Interleave keys 5 and 5 + old so both halves are non-trivial.
        for v in 0..20u32 {
            let key = if v % 3 == 0 { 5 + old } else { 5 };
            admit(&mut t, &mut arena, key, 100 - v);
        }
        let before = payloads(&t, &arena, 5);
        assert!(before.windows(2).all(|w| w[0] < w[1]));

        t.grow(&mut arena);
        assert_eq!(t.bucket_count(), MIN_BUCKETS * 2);
        assert_eq!(t.grow_count(), 1);

        let low = payloads(&t, &arena, 5);
        let high = payloads(&t, &arena, 5 + MIN_BUCKETS);
        assert_eq!(low.len() + high.len(), 20);
        assert!(low.windows(2).all(|w| w[0] < w[1]));
        assert!(high.windows(2).all(|w| w[0] < w[1]));
        for v in &high {
            assert_eq!((100 - v) % 3, 0);
        }
        for v in &low {
            assert_ne!((100 - v) % 3, 0);
        }
    }

    /// Invariant: the load threshold is 3/4 of the bucket count.
    #[test]
    fn threshold_is_three_quarters() {
        let t = BucketTable::with_buckets(MIN_BUCKETS);
        assert!(!t.needs_grow(767));
        assert!(t.needs_grow(768));
    }

    #[test]
    fn invalid_bucket_counts_rejected() {
        for n in [0, 1, 512, 1000, 1025, 3072] {
            assert!(matches!(
                BucketTable::try_with_buckets(n),
                Err(Error::InvalidBucketCount(m)) if m == n
            ));
        }
        let t = BucketTable::try_with_buckets(4096).unwrap();
        assert_eq!(t.bucket_count(), 4096);
        assert_eq!(t.bucket_index(4096 + 17), 17);
    }

    /// Invariant: after `try_reserve_grow` the table itself is unchanged.
    #[test]
    fn reserve_does_not_grow() {
        let mut t = BucketTable::with_buckets(MIN_BUCKETS);
        t.try_reserve_grow().unwrap();
        assert_eq!(t.bucket_count(), MIN_BUCKETS);
        assert_eq!(t.grow_count(), 0);
    }
}
