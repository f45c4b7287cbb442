//! state-set: a single-threaded, deduplicating set of explored states
//! with a built-in LIFO worklist, for exhaustive state-space exploration.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: answer "have I seen this state?" in O(1) average and hand out
//!   every new state exactly once for expansion, with one structure.
//! - Layers:
//!   - Entry arena: a `SlotMap` holding every admitted state together
//!     with two links (bucket chain, frontier). Links are arena keys,
//!     never references.
//!   - BucketTable: power-of-two array of chain heads selected by
//!     `key & mask`. Chains are kept in ascending comparator order.
//!   - Frontier: LIFO chain threaded through the same entries.
//!   - StateSet<T, C>: public API composing the three; `explore` runs the
//!     canonical pop/expand/insert loop on top of it.
//!
//! Constraints
//! - Single-threaded: mutation goes through `&mut self`, so the comparator
//!   can only ever observe the set through shared, read-only lookups.
//! - No removal: entries live as long as the set, so handles never dangle.
//! - Keys are precomputed by the caller; the set never hashes payloads.
//! - The comparator must agree with keys on equality; this is a caller
//!   obligation and is not checked.
//!
//! Sorted chains
//! - Lookup stops at the first entry greater than the candidate, so both
//!   `find` and `insert` rely on every chain being strictly ascending.
//! - `insert` splices new entries before the first greater entry.
//! - Growing splits chain `i` into `i` and `i + old` by the newly
//!   significant key bit, appending at the tail of each half so both keep
//!   their existing relative order.
//!
//! Growth
//! - Triggered inside `insert` when the post-admission count reaches 3/4
//!   of the bucket count. The table doubles before the new entry is
//!   linked, then its insertion point is recomputed against the new mask.
//! - `try_insert` checks for a duplicate, then reserves the doubled array
//!   for a new state and reports allocation failure without touching the
//!   set.
//!
//! Frontier
//! - Each entry is pushed once, at admission, and popped at most once.
//!   Popping only moves the frontier head; the entry stays in its bucket.

mod bucket_table;
pub mod compare;
pub mod config;
mod entry;
pub mod error;
pub mod explore;
mod frontier;
pub mod state_set;
mod state_set_proptest;

// Public surface
pub use bucket_table::MIN_BUCKETS;
pub use compare::{Compare, OrdCompare};
pub use config::StateSetConfig;
pub use error::Error;
pub use explore::{explore, ExploreStats, Successors};
pub use state_set::{FrontierIter, Handle, Insertion, Iter, StateSet};
