//! Fragment — the delta node of a copy-on-write chain.

use std::collections::{HashMap, HashSet};

use crate::store::RefFamily;

/// One node of a fragment chain.
///
/// A fragment records only the delta against its parent: locally inserted or
/// overridden entries, plus tombstones for keys deleted relative to the
/// parent chain. The absolute value of a fragment is its parent's absolute
/// value minus tombstoned keys, overlaid with the local entries.
///
/// Invariants:
/// - `entries` and `tombstones` are disjoint.
/// - Every tombstoned key is present in the parent chain's absolute value.
/// - `size` is the exact cardinality of the absolute value.
/// - A fragment referenced by more than one handle is never mutated.
pub(crate) struct Fragment<K, V, F: RefFamily> {
    /// Shared handle to the parent fragment; `None` for a root.
    pub(crate) parent: Option<F::Ref<Self>>,
    /// Local inserts and overrides.
    pub(crate) entries: HashMap<K, V>,
    /// Keys deleted relative to the parent chain.
    pub(crate) tombstones: HashSet<K>,
    /// Cached cardinality of the absolute value.
    pub(crate) size: usize,
}

impl<K, V, F: RefFamily> Fragment<K, V, F> {
    /// Creates an empty root fragment.
    pub(crate) fn new() -> Self {
        Self {
            parent: None,
            entries: HashMap::new(),
            tombstones: HashSet::new(),
            size: 0,
        }
    }

    /// Creates a root fragment owning `entries` outright.
    pub(crate) fn from_entries(entries: HashMap<K, V>) -> Self {
        let size = entries.len();
        Self {
            parent: None,
            entries,
            tombstones: HashSet::new(),
            size,
        }
    }

    /// Creates an empty leaf on top of `parent`.
    ///
    /// The new leaf inherits the parent's size: with no local delta its
    /// absolute value is exactly the parent's.
    pub(crate) fn branch(parent: F::Ref<Self>) -> Self {
        let size = parent.size;
        Self {
            parent: Some(parent),
            entries: HashMap::new(),
            tombstones: HashSet::new(),
            size,
        }
    }
}

impl<K, V, F: RefFamily> Drop for Fragment<K, V, F> {
    fn drop(&mut self) {
        // Unlink ancestors iteratively: naive recursive drop of a deep
        // uniquely-owned chain would overflow the stack.
        let mut parent = self.parent.take();
        while let Some(ptr) = parent {
            match F::try_unwrap(ptr) {
                Ok(mut fragment) => parent = fragment.parent.take(),
                Err(_shared) => break,
            }
        }
    }
}
