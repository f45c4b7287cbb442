//! Crate error type.

use std::collections::TryReserveError;

use crate::bucket_table::MIN_BUCKETS;

/// Failures reported by the fallible constructors and `try_insert`.
///
/// The regular `insert`/`find`/`pop` paths never fail.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Requested bucket count is not a power of two of at least `MIN_BUCKETS`.
    #[error("invalid bucket count {0}: must be a power of two and at least {min}", min = MIN_BUCKETS)]
    InvalidBucketCount(usize),
    /// Doubling the bucket array would overflow `usize`.
    #[error("cannot grow past {0} buckets")]
    CapacityOverflow(usize),
    /// The bucket array could not be allocated.
    #[error("bucket array allocation failed")]
    Alloc(#[from] TryReserveError),
}
