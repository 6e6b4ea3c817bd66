//! Single-threaded lazy map.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops;
use std::rc::Rc;

use crate::KeyNotFound;
use crate::fragment::Fragment;
use crate::iter::Iter;
use crate::ops::detach::detach_chain;
use crate::ops::get::{contains_chain, depth_chain, find_chain};
use crate::ops::insert::{assign_chain, insert_chain, insert_with_chain};
use crate::ops::remove::remove_chain;
use crate::ops::take::{take_chain, take_unique_chain};
use crate::store::RcFamily;

/// Copy-on-write overlay map, single-threaded.
///
/// Cloning a `LazyMap` is O(1): both handles share the same fragment chain
/// until one of them writes, at which point the writer branches a private
/// leaf. Point operations cost O(d) dictionary lookups, where d is the chain
/// depth reported by [`depth`](Self::depth); [`detach`](Self::detach)
/// collapses the chain when the caller deems d too high.
pub struct LazyMap<K, V> {
    head: Rc<Fragment<K, V, RcFamily>>,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> LazyMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            head: Rc::new(Fragment::new()),
        }
    }

    /// Returns the number of live key-value pairs. O(1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counts the strict ancestors of the leaf fragment. O(d).
    ///
    /// Informational: callers use it to decide when to [`detach`](Self::detach).
    #[must_use]
    pub fn depth(&self) -> usize {
        depth_chain(&*self.head)
    }

    /// Returns `true` if the leaf has no parent fragment.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.head.parent.is_none()
    }

    /// Drops the current chain and installs a fresh empty root. O(1).
    ///
    /// Never branches: sharers keep the old chain untouched.
    pub fn clear(&mut self) {
        self.head = Rc::new(Fragment::new());
    }

    /// Returns an iterator over `(&K, &V)` pairs, in unspecified order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, RcFamily> {
        Iter::new(&*self.head)
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> LazyMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        find_chain(&*self.head, key).map(|(_, value)| value)
    }

    /// Returns the stored key-value pair for `key`.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        find_chain(&*self.head, key)
    }

    /// Like [`get`](Self::get), failing with [`KeyNotFound`] on absence.
    pub fn try_get(&self, key: &K) -> Result<&V, KeyNotFound> {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        contains_chain(&*self.head, key)
    }
}

// ---------------------------------------------------------------------------
// Write operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> LazyMap<K, V> {
    /// Inserts `key` unless it is already present.
    ///
    /// Returns `false` when the key is live, without branching or
    /// overwriting.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        insert_chain::<_, _, RcFamily>(&mut self.head, key, value)
    }

    /// Like [`insert`](Self::insert), but `make` runs only if the key is
    /// absent, so a costly value is never built just to be discarded.
    pub fn insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> bool {
        insert_with_chain::<_, _, RcFamily, _>(&mut self.head, key, make)
    }

    /// Inserts or overwrites the binding for `key`.
    ///
    /// The write always lands in the leaf: a binding held by an ancestor is
    /// shadowed, never mutated, and a leaf tombstone for the key is lifted.
    pub fn insert_or_assign(&mut self, key: K, value: V) {
        assign_chain::<_, _, RcFamily>(&mut self.head, key, value);
    }

    /// Removes `key` from the map. Returns `false` if it was not present.
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Clone,
    {
        remove_chain::<_, _, RcFamily>(&mut self.head, key)
    }
}

// ---------------------------------------------------------------------------
// Value extraction — the only way to update a value in place
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> LazyMap<K, V> {
    /// Extracts the value for `key`, to be updated and re-inserted via
    /// [`insert_or_assign`](Self::insert_or_assign).
    ///
    /// When this handle solely owns its leaf and the key is resident there,
    /// the value is moved out and the slot left holding `V::default()` until
    /// reassigned; the key stays live and `len` is unchanged. Otherwise the
    /// value is cloned and the map is untouched. Fails with [`KeyNotFound`]
    /// if the key is absent.
    pub fn take(&mut self, key: &K) -> Result<V, KeyNotFound>
    where
        V: Clone + Default,
    {
        take_chain::<_, _, RcFamily>(&mut self.head, key)
    }

    /// Like [`take`](Self::take), but never clones.
    ///
    /// Returns `Ok(None)` when the value cannot be moved because the leaf is
    /// shared or the key lives in an ancestor fragment, which is distinct
    /// from the [`KeyNotFound`] failure for an absent key.
    pub fn take_unique(&mut self, key: &K) -> Result<Option<V>, KeyNotFound>
    where
        V: Default,
    {
        take_unique_chain::<_, _, RcFamily>(&mut self.head, key)
    }
}

// ---------------------------------------------------------------------------
// Detachment
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Clone> LazyMap<K, V> {
    /// Collapses the ancestor chain into the leaf.
    ///
    /// Materializes the absolute value into the leaf's own entries and drops
    /// the parent link; the observable contents and `len` are unchanged.
    /// Costs the total weight of the chain. Branches first if the leaf is
    /// shared; returns `false` when there is nothing to collapse.
    pub fn detach(&mut self) -> bool {
        detach_chain::<_, _, RcFamily>(&mut self.head)
    }
}

// ---------------------------------------------------------------------------
// Invariant checks for tests
// ---------------------------------------------------------------------------

#[cfg(test)]
impl<K: Hash + Eq, V> LazyMap<K, V> {
    /// Asserts the structural invariants of every fragment on the chain.
    pub(crate) fn check_invariants(&self) {
        let mut cur: &Fragment<K, V, RcFamily> = &*self.head;
        loop {
            for key in &cur.tombstones {
                assert!(
                    !cur.entries.contains_key(key),
                    "entries and tombstones must be disjoint"
                );
                let parent = cur
                    .parent
                    .as_deref()
                    .expect("tombstone in a root fragment");
                assert!(
                    contains_chain(parent, key),
                    "tombstone must shadow a live ancestor binding"
                );
            }
            match cur.parent.as_deref() {
                Some(parent) => cur = parent,
                None => break,
            }
        }
        assert_eq!(self.iter().count(), self.len(), "cached size diverged");
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

// Manual impl — the O(1) copy must not demand `K: Clone` or `V: Clone`.
impl<K, V> Clone for LazyMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            head: Rc::clone(&self.head),
        }
    }
}

impl<K, V> Default for LazyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for LazyMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyMap")
            .field("len", &self.len())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for LazyMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries: HashMap<K, V> = iter.into_iter().collect();
        Self {
            head: Rc::new(Fragment::from_entries(entries)),
        }
    }
}

impl<K: Hash + Eq, V, const N: usize> From<[(K, V); N]> for LazyMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for LazyMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_or_assign(key, value);
        }
    }
}

impl<K: Hash + Eq, V> ops::Index<&K> for LazyMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K: Hash + Eq, V> IntoIterator for &'a LazyMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, RcFamily>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
