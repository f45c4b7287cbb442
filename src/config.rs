//! Construction-time settings for `StateSet`.

use crate::bucket_table::MIN_BUCKETS;

/// Settings validated by `StateSet::with_config`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateSetConfig {
    /// Number of buckets to start with. Must be a power of two and at
    /// least `MIN_BUCKETS`. Sizing this up front avoids early grows when
    /// the state space is known to be large.
    pub initial_buckets: usize,
}

impl Default for StateSetConfig {
    fn default() -> Self {
        Self {
            initial_buckets: MIN_BUCKETS,
        }
    }
}

impl StateSetConfig {
    /// Smallest valid bucket count holding `states` entries below the
    /// 3/4 load threshold.
    pub fn for_expected_states(states: usize) -> Self {
        let needed = states.saturating_mul(4) / 3 + 1;
        let initial_buckets = needed
            .checked_next_power_of_two()
            .unwrap_or(usize::MAX / 2 + 1)
            .max(MIN_BUCKETS);
        Self { initial_buckets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_min_buckets() {
        assert_eq!(StateSetConfig::default().initial_buckets, MIN_BUCKETS);
    }

    #[test]
    fn sized_for_expected_states() {
        assert_eq!(StateSetConfig::for_expected_states(0).initial_buckets, MIN_BUCKETS);
        assert_eq!(StateSetConfig::for_expected_states(767).initial_buckets, MIN_BUCKETS);
        assert_eq!(StateSetConfig::for_expected_states(768).initial_buckets, 2048);
        assert_eq!(StateSetConfig::for_expected_states(1000).initial_buckets, 2048);
        assert_eq!(StateSetConfig::for_expected_states(1600).initial_buckets, 4096);
    }
}
