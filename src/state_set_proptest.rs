#![cfg(test)]

// Property tests for StateSet kept inside the crate so they can scan the
// bucket chains directly.

use crate::state_set::{Handle, Insertion, StateSet};
use proptest::prelude::*;
use std::collections::HashMap;

// How keys are derived from payloads. All of them agree with equality,
// they differ in how hard they hit a single bucket.
#[derive(Clone, Copy, Debug)]
enum KeyFn {
    Identity,
    FewBuckets,
    Scrambled,
}

impl KeyFn {
    fn key(self, p: u32) -> u64 {
        match self {
            KeyFn::Identity => u64::from(p),
            KeyFn::FewBuckets => u64::from(p % 7) << 10 | 3,
            KeyFn::Scrambled => u64::from(p).wrapping_mul(0x9E37_79B9_7F4A_7C15),
        }
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u32),
    // Insert `len` consecutive payloads to push the set across grow thresholds.
    InsertRun(u32, u32),
    Find(u32),
    Pop,
}

fn arb_key_fn() -> impl Strategy<Value = KeyFn> {
    prop_oneof![
        Just(KeyFn::Identity),
        Just(KeyFn::FewBuckets),
        Just(KeyFn::Scrambled),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let payload = 0u32..4000;
    let op = prop_oneof![
        4 => payload.clone().prop_map(Op::Insert),
        1 => (payload.clone(), 1u32..900).prop_map(|(s, n)| Op::InsertRun(s, n)),
        3 => payload.prop_map(Op::Find),
        3 => Just(Op::Pop),
    ];
    proptest::collection::vec(op, 1..80)
}

// Property: model equivalence against a HashMap of admitted payloads and a
// Vec used as the LIFO frontier.
// - Duplicates return the first handle and give the candidate back.
// - `find` is None before admission and the admitted handle after.
// - `pop` returns admitted handles most-recent-first, each at most once.
// - Every chain stays ascending and correctly bucketed after every grow.
proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(key_fn in arb_key_fn(), ops in arb_ops()) {
        let mut sut: StateSet<u32> = StateSet::new();
        let mut admitted: HashMap<u32, Handle> = HashMap::new();
        let mut stack: Vec<Handle> = Vec::new();
        let mut grows = 0;

        let insert = |sut: &mut StateSet<u32>,
                          admitted: &mut HashMap<u32, Handle>,
                          stack: &mut Vec<Handle>,
                          p: u32|
         -> Result<(), TestCaseError> {
            match sut.insert(key_fn.key(p), p) {
                Insertion::Admitted(h) => {
                    prop_assert!(!admitted.contains_key(&p), "re-admitted {}", p);
                    admitted.insert(p, h);
                    stack.push(h);
                }
                Insertion::Duplicate(h, rejected) => {
                    prop_assert_eq!(rejected, p);
                    prop_assert_eq!(Some(&h), admitted.get(&p));
                }
            }
            Ok(())
        };

        for op in ops {
            match op {
                Op::Insert(p) => insert(&mut sut, &mut admitted, &mut stack, p)?,
                Op::InsertRun(start, len) => {
                    for p in start..start.saturating_add(len) {
                        insert(&mut sut, &mut admitted, &mut stack, p)?;
                    }
                }
                Op::Find(p) => {
                    let found = sut.find(key_fn.key(p), &p);
                    prop_assert_eq!(found.as_ref(), admitted.get(&p));
                    if let Some(h) = found {
                        prop_assert_eq!(h.payload(&sut), Some(&p));
                    }
                }
                Op::Pop => {
                    let popped = sut.pop();
                    prop_assert_eq!(popped, stack.pop());
                    if let Some(h) = popped {
                        prop_assert_eq!(h.is_queued(&sut), Some(false));
                    }
                }
            }

            prop_assert_eq!(sut.len(), admitted.len());
            prop_assert_eq!(sut.pending(), stack.len());
            prop_assert!(sut.load_factor() < 0.75);
            if sut.grow_count() != grows {
                grows = sut.grow_count();
                sut.assert_chains_sorted();
            }
        }

        sut.assert_chains_sorted();
        // Draining yields exactly the remaining model stack, newest first.
        let drained: Vec<Handle> = std::iter::from_fn(|| sut.pop()).collect();
        stack.reverse();
        prop_assert_eq!(drained, stack);
        // Every admitted state stays findable after the frontier is empty.
        for (&p, h) in &admitted {
            let found = sut.find(key_fn.key(p), &p);
            prop_assert_eq!(found.as_ref(), Some(h));
        }
    }
}

// Property: chains end up ascending whatever order payloads arrive in,
// including long chains split by several grows.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_chains_sorted_for_any_order(
        payloads in proptest::collection::vec(0u32..2000, 700..1700),
    ) {
        let mut sut: StateSet<u32> = StateSet::new();
        for &p in &payloads {
            sut.insert(KeyFn::FewBuckets.key(p), p);
        }
        sut.assert_chains_sorted();

        let mut distinct = payloads.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(sut.len(), distinct.len());
    }
}
