//! Frontier: LIFO worklist threaded through the entry arena via
//! `frontier_next`. Independent of bucket membership.

use slotmap::DefaultKey;

use crate::entry::Arena;

#[derive(Debug, Default)]
pub(crate) struct Frontier {
    head: Option<DefaultKey>,
    len: usize,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn peek(&self) -> Option<DefaultKey> {
        self.head
    }

    /// Queue a freshly admitted entry. Called once per entry.
    pub(crate) fn push<T>(&mut self, arena: &mut Arena<T>, k: DefaultKey) {
        let e = &mut arena[k];
        debug_assert!(!e.queued, "entry pushed onto the frontier twice");
        e.frontier_next = self.head;
        e.queued = true;
        self.head = Some(k);
        self.len += 1;
    }

    /// Take the most recently queued entry. The entry stays in the arena
    /// and in its bucket.
    pub(crate) fn pop<T>(&mut self, arena: &mut Arena<T>) -> Option<DefaultKey> {
        let k = self.head?;
        let e = &mut arena[k];
        self.head = e.frontier_next.take();
        e.queued = false;
        self.len -= 1;
        Some(k)
    }

    pub(crate) fn iter<'a, T>(&self, arena: &'a Arena<T>) -> Queued<'a, T> {
        Queued {
            arena,
            cur: self.head,
        }
    }
}

/// Queued entries, head first.
pub(crate) struct Queued<'a, T> {
    arena: &'a Arena<T>,
    cur: Option<DefaultKey>,
}

impl<'a, T> Iterator for Queued<'a, T> {
    type Item = DefaultKey;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        self.cur = self.arena[k].frontier_next;
        Some(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    #[test]
    fn push_pop_is_lifo() {
        let mut arena: Arena<&str> = Arena::new();
        let mut f = Frontier::new();
        let a = arena.insert(Entry::new(1, "a"));
        let b = arena.insert(Entry::new(2, "b"));
        f.push(&mut arena, a);
        f.push(&mut arena, b);
        assert_eq!(f.len(), 2);
        assert_eq!(f.iter(&arena).collect::<Vec<_>>(), vec![b, a]);

        assert_eq!(f.pop(&mut arena), Some(b));
        assert!(!arena[b].queued);
        assert!(arena[a].queued);
        assert_eq!(f.peek(), Some(a));
        assert_eq!(f.pop(&mut arena), Some(a));
        assert_eq!(f.pop(&mut arena), None);
        assert_eq!(f.len(), 0);
        // Popped entries remain in the arena.
        assert_eq!(arena.len(), 2);
    }
}
