//! Removal — drop the local entry and tombstone what the chain still shows.

use std::hash::Hash;

use crate::fragment::Fragment;
use crate::ops::get::contains_chain;
use crate::ops::prepare_for_edit;
use crate::store::RefFamily;

/// Removes `key` from the chain's absolute value.
///
/// Returns `false` without branching when the key is not live. When the key
/// is also visible through an ancestor, removing the local entry is not
/// enough: a tombstone must keep masking the inherited binding.
pub fn remove_chain<K, V, F>(head: &mut F::Ref<Fragment<K, V, F>>, key: &K) -> bool
where
    K: Hash + Eq + Clone,
    F: RefFamily,
{
    if !contains_chain(&**head, key) {
        return false;
    }
    let leaf = prepare_for_edit::<K, V, F>(head);
    leaf.entries.remove(key);
    let inherited = leaf
        .parent
        .as_deref()
        .map_or(false, |parent| contains_chain(parent, key));
    if inherited {
        leaf.tombstones.insert(key.clone());
    }
    leaf.size -= 1;
    true
}
