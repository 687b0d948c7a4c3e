//! Version-keyed caching for derived views.
//!
//! Each input of the pipeline carries a revision number that changes on every
//! effective mutation. A [`Memo`] remembers the key (a tuple of revisions and
//! upstream generations) its value was computed from and recomputes only when
//! the key differs. Every recompute bumps the memo's generation, which
//! downstream stages use as part of their own key.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A value plus the revision of its last effective change.
#[derive(Clone, Debug)]
pub struct Tracked<T> {
    value: T,
    rev: u64,
}

impl<T: PartialEq> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self { value, rev: 0 }
    }

    /// Store `value`; the revision moves only if it differs from the current one.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.rev += 1;
        true
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }
}

/// Single-slot cache keyed by the versions of its inputs.
pub struct Memo<K, V> {
    name: &'static str,
    slot: RefCell<Option<(K, Rc<V>)>>,
    generation: Cell<u64>,
}

impl<K: PartialEq + Copy + std::fmt::Debug, V> Memo<K, V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// Return the cached value for `key`, computing it first if the key changed.
    ///
    /// The second tuple element is the generation of the returned value.
    pub fn get(&self, key: K, compute: impl FnOnce() -> V) -> (Rc<V>, u64) {
        if let Some((cached, value)) = self.slot.borrow().as_ref()
            && *cached == key
        {
            return (Rc::clone(value), self.generation.get());
        }
        tracing::trace!(stage = self.name, ?key, "recomputing derived view");
        let value = Rc::new(compute());
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        *self.slot.borrow_mut() = Some((key, Rc::clone(&value)));
        (value, generation)
    }

    /// Number of times the value has been computed.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_only_bumps_on_change() {
        let mut t = Tracked::new(3);
        assert!(!t.set(3));
        assert_eq!(t.rev(), 0);
        assert!(t.set(4));
        assert_eq!(*t.get(), 4);
        assert_eq!(t.rev(), 1);
    }

    #[test]
    fn memo_recomputes_only_for_new_keys() {
        let memo: Memo<(u64, u64), Vec<u32>> = Memo::new("test");
        let mut calls = 0;
        let (a, g1) = memo.get((0, 0), || {
            calls += 1;
            vec![1, 2]
        });
        let (b, g2) = memo.get((0, 0), || {
            calls += 1;
            vec![9]
        });
        assert_eq!(calls, 1);
        assert_eq!(g1, g2);
        assert!(Rc::ptr_eq(&a, &b));

        let (c, g3) = memo.get((0, 1), || {
            calls += 1;
            vec![3]
        });
        assert_eq!(calls, 2);
        assert_eq!(g3, g1 + 1);
        assert_eq!(*c, vec![3]);
        assert_eq!(memo.generation(), 2);
    }
}
