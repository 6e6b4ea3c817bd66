//! Value extraction — move out of a uniquely-owned leaf, else copy.

use std::hash::Hash;
use std::mem;

use crate::KeyNotFound;
use crate::fragment::Fragment;
use crate::ops::get::{contains_chain, find_chain};
use crate::store::RefFamily;

/// Extracts the value for `key`, moving when possible.
///
/// The move fast path applies when the handle solely owns its leaf and the
/// key is resident in the leaf's local entries; the slot is left holding
/// `V::default()` and the key stays live. In every other case the value is
/// cloned and the chain is untouched.
pub fn take_chain<K, V, F>(
    head: &mut F::Ref<Fragment<K, V, F>>,
    key: &K,
) -> Result<V, KeyNotFound>
where
    K: Hash + Eq,
    V: Clone + Default,
    F: RefFamily,
{
    if let Some(leaf) = F::get_mut(head) {
        if let Some(slot) = leaf.entries.get_mut(key) {
            return Ok(mem::take(slot));
        }
    }
    match find_chain(&**head, key) {
        Some((_, value)) => Ok(value.clone()),
        None => Err(KeyNotFound),
    }
}

/// Like [`take_chain`], but never clones.
///
/// `Ok(None)` reports that the value is reachable by other handles (or lives
/// in an ancestor fragment) and a move would be unsound; an absent key is the
/// distinct [`KeyNotFound`] error.
pub fn take_unique_chain<K, V, F>(
    head: &mut F::Ref<Fragment<K, V, F>>,
    key: &K,
) -> Result<Option<V>, KeyNotFound>
where
    K: Hash + Eq,
    V: Default,
    F: RefFamily,
{
    if let Some(leaf) = F::get_mut(head) {
        if let Some(slot) = leaf.entries.get_mut(key) {
            return Ok(Some(mem::take(slot)));
        }
    }
    if contains_chain(&**head, key) {
        Ok(None)
    } else {
        Err(KeyNotFound)
    }
}
