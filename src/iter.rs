//! Iterator over a fragment chain.

use std::collections::hash_map;
use std::hash::Hash;
use std::ptr;

use crate::fragment::Fragment;
use crate::store::RefFamily;

/// Iterator over `(&K, &V)` pairs of a map's absolute value.
///
/// Walks the chain from the leaf toward the root, enumerating each
/// fragment's local entries. A key is skipped when any fragment strictly
/// closer to the leaf already accounts for it, as a live entry or as a
/// tombstone. Order is unspecified; every live key is produced exactly once.
pub struct Iter<'a, K, V, F: RefFamily> {
    head: &'a Fragment<K, V, F>,
    cur: Option<&'a Fragment<K, V, F>>,
    entries: hash_map::Iter<'a, K, V>,
    yielded: usize,
}

impl<'a, K, V, F: RefFamily> Iter<'a, K, V, F> {
    pub(crate) fn new(head: &'a Fragment<K, V, F>) -> Self {
        Self {
            head,
            cur: Some(head),
            entries: head.entries.iter(),
            yielded: 0,
        }
    }
}

impl<'a, K: Hash + Eq, V, F: RefFamily> Iterator for Iter<'a, K, V, F> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cur = self.cur?;
            if let Some((key, value)) = self.entries.next() {
                if !shadowed(self.head, cur, key) {
                    self.yielded += 1;
                    return Some((key, value));
                }
            } else {
                // Local entries exhausted: hop to the parent, or finish.
                self.cur = cur.parent.as_deref();
                if let Some(parent) = self.cur {
                    self.entries = parent.entries.iter();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.head.size - self.yielded;
        (remaining, Some(remaining))
    }
}

impl<K: Hash + Eq, V, F: RefFamily> ExactSizeIterator for Iter<'_, K, V, F> {}

/// Is `key` already accounted for strictly below `cur` on the path to `head`?
fn shadowed<K: Hash + Eq, V, F: RefFamily>(
    head: &Fragment<K, V, F>,
    cur: &Fragment<K, V, F>,
    key: &K,
) -> bool {
    let mut fragment = head;
    while !ptr::eq(fragment, cur) {
        if fragment.entries.contains_key(key) || fragment.tombstones.contains(key) {
            return true;
        }
        fragment = fragment
            .parent
            .as_deref()
            .expect("cur lies on the chain above head");
    }
    false
}
