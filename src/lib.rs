//! Copy-on-write overlay map with O(1) value-semantic copies.
//!
//! A [`LazyMap`] behaves like a hash map, with one distinguishing guarantee:
//! cloning a handle costs O(1) regardless of the number of entries, while
//! writes on either handle stay invisible to the other. Handles share a
//! **fragment chain**, where each fragment records only the delta (inserts
//! and tombstones) against its parent, and a handle branches a private leaf
//! the first time it writes to a shared one.
//!
//! Intended for systems that keep many near-duplicate snapshots of a large
//! map: speculative evaluators, scoped interpreter environments, search
//! frontiers, backtracking solvers.
//!
//! # Key properties
//!
//! - **O(1) copy**: `clone` bumps one reference count
//! - **Write isolation**: shared fragments are never mutated
//! - **O(d) point operations**: d is the chain depth, bounded by the caller
//!   through [`detach`](LazyMap::detach)
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # Example
//!
//! ```
//! use lazymap::LazyMap;
//!
//! let mut base = LazyMap::new();
//! base.insert("alpha", 1);
//! base.insert("beta", 2);
//!
//! let mut branch = base.clone(); // O(1), shares the chain
//! branch.insert_or_assign("beta", 20);
//! branch.remove(&"alpha");
//!
//! assert_eq!(base.get(&"beta"), Some(&2)); // original untouched
//! assert_eq!(branch.get(&"beta"), Some(&20));
//! assert!(!branch.contains_key(&"alpha"));
//! assert_eq!((base.len(), branch.len()), (2, 1));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

use thiserror::Error;

pub mod iter;
pub mod store;

mod fragment;
mod map;
mod map_sync;
mod ops;

#[cfg(test)]
mod tests;

pub use map::LazyMap;
pub use map_sync::LazyMapSync;

/// A checked read found no live binding for the key.
///
/// Returned by [`LazyMap::try_get`], [`LazyMap::take`] and
/// [`LazyMap::take_unique`] (and their [`LazyMapSync`] counterparts) when the
/// key is absent from the map's absolute value, and for no other condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lazymap: key not found")]
pub struct KeyNotFound;
