//! Chain operations shared by both map flavors.
//!
//! Every mutator funnels through [`prepare_for_edit`]: branch a fresh leaf
//! when the current one is shared, then write on exclusively-owned data.

pub mod detach;
pub mod get;
pub mod insert;
pub mod remove;
pub mod take;

use crate::fragment::Fragment;
use crate::store::RefFamily;

/// Makes `head` safe to mutate, branching a new leaf if it is shared.
///
/// When the handle is the sole owner of its leaf this is a no-op. Otherwise
/// the handle retargets to a fresh empty leaf whose parent is the old one;
/// sharers keep reading the old leaf, which is never touched again.
pub fn prepare_for_edit<K, V, F: RefFamily>(
    head: &mut F::Ref<Fragment<K, V, F>>,
) -> &mut Fragment<K, V, F> {
    if F::get_mut(head).is_none() {
        let parent = head.clone();
        *head = F::new(Fragment::branch(parent));
    }
    F::get_mut(head).expect("freshly branched leaf is uniquely owned")
}
