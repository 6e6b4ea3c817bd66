//! Lookup operations — walk the chain from leaf toward root.

use std::hash::Hash;

use crate::fragment::Fragment;
use crate::store::RefFamily;

/// Searches the chain for `key`.
///
/// Returns the first live hit walking leaf to root; a tombstone on the way
/// hides anything older, so the walk short-circuits to `None`.
pub fn find_chain<'a, K, V, F>(
    leaf: &'a Fragment<K, V, F>,
    key: &K,
) -> Option<(&'a K, &'a V)>
where
    K: Hash + Eq,
    F: RefFamily,
{
    let mut cur = leaf;
    loop {
        if let Some(found) = cur.entries.get_key_value(key) {
            return Some(found);
        }
        if cur.tombstones.contains(key) {
            return None;
        }
        cur = cur.parent.as_deref()?;
    }
}

/// Returns `true` if `key` is live in the chain's absolute value.
pub fn contains_chain<K, V, F>(leaf: &Fragment<K, V, F>, key: &K) -> bool
where
    K: Hash + Eq,
    F: RefFamily,
{
    find_chain(leaf, key).is_some()
}

/// Counts the strict ancestors of `leaf`.
pub fn depth_chain<K, V, F: RefFamily>(leaf: &Fragment<K, V, F>) -> usize {
    let mut depth = 0;
    let mut cur = leaf;
    while let Some(parent) = cur.parent.as_deref() {
        depth += 1;
        cur = parent;
    }
    depth
}
