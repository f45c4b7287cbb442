//! Caller-supplied total order over state payloads.

use core::cmp::Ordering;

/// Total order used to detect duplicate states and to keep bucket chains
/// sorted.
///
/// Contract: two payloads that compare `Equal` must have been inserted
/// with the same key. The set never checks this; a comparator that
/// disagrees with the keys makes duplicate detection unreliable.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Comparator that defers to `T: Ord`.
#[derive(Copy, Clone, Debug, Default)]
pub struct OrdCompare;

impl<T: ?Sized + Ord> Compare<T> for OrdCompare {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_and_ord_agree() {
        let by_len = |a: &String, b: &String| a.len().cmp(&b.len());
        let a = "ab".to_string();
        let b = "abc".to_string();
        assert_eq!(by_len.compare(&a, &b), Ordering::Less);
        assert_eq!(OrdCompare.compare(&b, &a), Ordering::Greater);
        assert_eq!(OrdCompare.compare(&a, &a), Ordering::Equal);
    }
}
