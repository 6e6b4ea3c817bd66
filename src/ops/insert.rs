//! Insertion — write into the leaf after the uniqueness check.

use std::hash::Hash;

use crate::fragment::Fragment;
use crate::ops::get::contains_chain;
use crate::ops::prepare_for_edit;
use crate::store::RefFamily;

/// Inserts `key` unless it is already live. Never overwrites.
///
/// Returns `false` without branching when the key is present.
pub fn insert_chain<K, V, F>(head: &mut F::Ref<Fragment<K, V, F>>, key: K, value: V) -> bool
where
    K: Hash + Eq,
    F: RefFamily,
{
    insert_with_chain::<K, V, F, _>(head, key, move || value)
}

/// Like [`insert_chain`], but builds the value only if the key is absent.
pub fn insert_with_chain<K, V, F, M>(head: &mut F::Ref<Fragment<K, V, F>>, key: K, make: M) -> bool
where
    K: Hash + Eq,
    F: RefFamily,
    M: FnOnce() -> V,
{
    if contains_chain(&**head, &key) {
        return false;
    }
    let leaf = prepare_for_edit::<K, V, F>(head);
    leaf.tombstones.remove(&key);
    leaf.entries.insert(key, make());
    leaf.size += 1;
    true
}

/// Inserts or overwrites. The write always lands in the leaf, shadowing any
/// binding held by an ancestor; ancestors are never mutated.
pub fn assign_chain<K, V, F>(head: &mut F::Ref<Fragment<K, V, F>>, key: K, value: V)
where
    K: Hash + Eq,
    F: RefFamily,
{
    let was_live = contains_chain(&**head, &key);
    let leaf = prepare_for_edit::<K, V, F>(head);
    if !was_live {
        leaf.size += 1;
    }
    leaf.tombstones.remove(&key);
    leaf.entries.insert(key, value);
}
