//! Thread-safe lazy map.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops;
use std::sync::Arc;

use crate::KeyNotFound;
use crate::fragment::Fragment;
use crate::iter::Iter;
use crate::ops::detach::detach_chain;
use crate::ops::get::{contains_chain, depth_chain, find_chain};
use crate::ops::insert::{assign_chain, insert_chain, insert_with_chain};
use crate::ops::remove::remove_chain;
use crate::ops::take::{take_chain, take_unique_chain};
use crate::store::ArcFamily;

/// Copy-on-write overlay map, thread-safe handle copies.
///
/// Identical API to [`LazyMap`](crate::LazyMap) but backed by [`Arc`], so
/// clones of a handle may be sent to other threads. Each handle still has a
/// single logical owner; the atomic reference count on shared fragments is
/// the only cross-handle coordination, and shared fragments are never
/// written, so no locking is involved.
pub struct LazyMapSync<K, V> {
    head: Arc<Fragment<K, V, ArcFamily>>,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> LazyMapSync<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            head: Arc::new(Fragment::new()),
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
    pub fn clear(&mut self) {
        self.head = Arc::new(Fragment::new());
    }

    /// Returns an iterator over `(&K, &V)` pairs, in unspecified order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, ArcFamily> {
        Iter::new(&*self.head)
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> LazyMapSync<K, V> {
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

impl<K: Hash + Eq, V> LazyMapSync<K, V> {
    /// Inserts `key` unless it is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        insert_chain::<_, _, ArcFamily>(&mut self.head, key, value)
    }

    /// Like [`insert`](Self::insert), building the value only when absent.
    pub fn insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> bool {
        insert_with_chain::<_, _, ArcFamily, _>(&mut self.head, key, make)
    }

    /// Inserts or overwrites the binding for `key`. Ancestors are shadowed,
    /// never mutated.
    pub fn insert_or_assign(&mut self, key: K, value: V) {
        assign_chain::<_, _, ArcFamily>(&mut self.head, key, value);
    }

    /// Removes `key` from the map. Returns `false` if it was not present.
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Clone,
    {
        remove_chain::<_, _, ArcFamily>(&mut self.head, key)
    }
}

// ---------------------------------------------------------------------------
// Value extraction
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> LazyMapSync<K, V> {
    /// Extracts the value for `key`; moves on the unique-leaf fast path,
    /// clones otherwise. See [`LazyMap::take`](crate::LazyMap::take).
    pub fn take(&mut self, key: &K) -> Result<V, KeyNotFound>
    where
        V: Clone + Default,
    {
        take_chain::<_, _, ArcFamily>(&mut self.head, key)
    }

    /// Like [`take`](Self::take), but never clones; `Ok(None)` reports that
    /// a move would be unsound.
    pub fn take_unique(&mut self, key: &K) -> Result<Option<V>, KeyNotFound>
    where
        V: Default,
    {
        take_unique_chain::<_, _, ArcFamily>(&mut self.head, key)
    }
}

// ---------------------------------------------------------------------------
// Detachment
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Clone> LazyMapSync<K, V> {
    /// Collapses the ancestor chain into the leaf. See
    /// [`LazyMap::detach`](crate::LazyMap::detach).
    pub fn detach(&mut self) -> bool {
        detach_chain::<_, _, ArcFamily>(&mut self.head)
    }
}

// ---------------------------------------------------------------------------
// Invariant checks for tests
// ---------------------------------------------------------------------------

#[cfg(test)]
impl<K: Hash + Eq, V> LazyMapSync<K, V> {
    /// Asserts the structural invariants of every fragment on the chain.
    pub(crate) fn check_invariants(&self) {
        let mut cur: &Fragment<K, V, ArcFamily> = &*self.head;
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
impl<K, V> Clone for LazyMapSync<K, V> {
    fn clone(&self) -> Self {
        Self {
            head: Arc::clone(&self.head),
        }
    }
}

impl<K, V> Default for LazyMapSync<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for LazyMapSync<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyMapSync")
            .field("len", &self.len())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for LazyMapSync<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries: HashMap<K, V> = iter.into_iter().collect();
        Self {
            head: Arc::new(Fragment::from_entries(entries)),
        }
    }
}

impl<K: Hash + Eq, V, const N: usize> From<[(K, V); N]> for LazyMapSync<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for LazyMapSync<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_or_assign(key, value);
        }
    }
}

impl<K: Hash + Eq, V> ops::Index<&K> for LazyMapSync<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K: Hash + Eq, V> IntoIterator for &'a LazyMapSync<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, ArcFamily>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
