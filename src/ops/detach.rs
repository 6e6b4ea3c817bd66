//! Detachment — collapse the ancestor chain into the leaf.

use std::hash::Hash;

use crate::fragment::Fragment;
use crate::ops::prepare_for_edit;
use crate::store::RefFamily;

/// Materializes the leaf's absolute value locally and drops the parent link.
///
/// Ancestors are folded nearest-first. The leaf's own delta is the newest,
/// so an ancestor entry is taken only when the key is neither locally bound
/// nor tombstoned so far; ancestor tombstones accumulate during the walk so
/// an intermediate deletion keeps masking bindings of older ancestors.
///
/// Returns `false` when the leaf (after the uniqueness check) has no parent.
/// The absolute value and size are unchanged either way.
pub fn detach_chain<K, V, F>(head: &mut F::Ref<Fragment<K, V, F>>) -> bool
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: RefFamily,
{
    let leaf = prepare_for_edit::<K, V, F>(head);
    if leaf.parent.is_none() {
        return false;
    }
    let mut ancestor = leaf.parent.take();
    while let Some(fragment) = ancestor {
        for (key, value) in &fragment.entries {
            if !leaf.tombstones.contains(key) && !leaf.entries.contains_key(key) {
                leaf.entries.insert(key.clone(), value.clone());
            }
        }
        leaf.tombstones.extend(fragment.tombstones.iter().cloned());
        ancestor = fragment.parent.clone();
    }
    leaf.tombstones.clear();
    true
}
