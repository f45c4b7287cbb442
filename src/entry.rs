//! Arena-resident state record shared by the bucket table and the frontier.

use slotmap::{DefaultKey, SlotMap};

/// One admitted state.
///
/// `key` and `payload` are fixed once the entry is admitted. The two link
/// fields are owned by the bucket table and the frontier respectively and
/// are plain arena keys, never references.
#[derive(Debug)]
pub(crate) struct Entry<T> {
    pub(crate) key: u64,
    pub(crate) payload: T,
    /// Next entry in the same bucket chain (ascending by comparator).
    pub(crate) bucket_next: Option<DefaultKey>,
    /// Next entry in the frontier; meaningless once popped.
    pub(crate) frontier_next: Option<DefaultKey>,
    /// Still waiting in the frontier. Cleared exactly once, by `pop`.
    pub(crate) queued: bool,
}

impl<T> Entry<T> {
    pub(crate) fn new(key: u64, payload: T) -> Self {
        Self {
            key,
            payload,
            bucket_next: None,
            frontier_next: None,
            queued: false,
        }
    }
}

/// Storage for every admitted entry. Entries are never removed, so arena
/// keys stay valid for the lifetime of the set.
pub(crate) type Arena<T> = SlotMap<DefaultKey, Entry<T>>;
