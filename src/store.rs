//! Reference-count abstraction for fragment-chain handles.

use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

/// Family of reference-counted pointers backing a fragment chain.
///
/// Abstracts over [`Rc`] (single-thread) and [`Arc`] (thread-safe handle
/// copies). The reference count is the only cross-handle coordination in the
/// crate: a fragment is mutable exactly when [`get_mut`](Self::get_mut)
/// succeeds on its handle.
pub trait RefFamily {
    /// The concrete shared-pointer type of this family.
    type Ref<T>: Deref<Target = T> + Clone;

    /// Wraps a value in a new shared pointer with count 1.
    fn new<T>(value: T) -> Self::Ref<T>;

    /// Returns a mutable reference iff `ptr` is the sole owner.
    fn get_mut<T>(ptr: &mut Self::Ref<T>) -> Option<&mut T>;

    /// Unwraps the value iff `ptr` is the sole owner, else returns it back.
    fn try_unwrap<T>(ptr: Self::Ref<T>) -> Result<T, Self::Ref<T>>;
}

// ---------------------------------------------------------------------------
// Rc family — single-threaded
// ---------------------------------------------------------------------------

/// [`Rc`]-backed family used by [`LazyMap`](crate::LazyMap).
pub struct RcFamily;

impl RefFamily for RcFamily {
    type Ref<T> = Rc<T>;

    fn new<T>(value: T) -> Rc<T> {
        Rc::new(value)
    }

    fn get_mut<T>(ptr: &mut Rc<T>) -> Option<&mut T> {
        Rc::get_mut(ptr)
    }

    fn try_unwrap<T>(ptr: Rc<T>) -> Result<T, Rc<T>> {
        Rc::try_unwrap(ptr)
    }
}

// ---------------------------------------------------------------------------
// Arc family — thread-safe handle copies
// ---------------------------------------------------------------------------

/// [`Arc`]-backed family used by [`LazyMapSync`](crate::LazyMapSync).
pub struct ArcFamily;

impl RefFamily for ArcFamily {
    type Ref<T> = Arc<T>;

    fn new<T>(value: T) -> Arc<T> {
        Arc::new(value)
    }

    fn get_mut<T>(ptr: &mut Arc<T>) -> Option<&mut T> {
        Arc::get_mut(ptr)
    }

    fn try_unwrap<T>(ptr: Arc<T>) -> Result<T, Arc<T>> {
        Arc::try_unwrap(ptr)
    }
}
