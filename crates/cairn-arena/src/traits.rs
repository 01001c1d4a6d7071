//! The allocation capability set containers are generic over.
//!
//! A container never names a concrete allocator. It holds some
//! `A: TypedAllocator<T>`, rebinds it to its own node type, and routes every
//! node construction and destruction through it. [`HeapAllocator`] and
//! [`ArenaAllocator`] are the two implementations in this crate.
//!
//! [`HeapAllocator`]: crate::HeapAllocator
//! [`ArenaAllocator`]: crate::ArenaAllocator

#![allow(unsafe_code)]

use std::ptr::{self, NonNull};

use crate::error::AllocError;

/// Typed allocate/deallocate/construct/destroy over one allocation source.
///
/// Two allocators compare equal when memory obtained from one may be
/// released through the other. Cloning and [`rebind`](Self::rebind) both
/// preserve that equality class.
pub trait TypedAllocator<T>: Clone + PartialEq {
    /// The same allocator, retargeted at element type `U`.
    type Rebind<U>: TypedAllocator<U>;

    /// Produce a handle for `U` that shares this allocator's source.
    fn rebind<U>(&self) -> Self::Rebind<U>;

    /// Obtain uninitialised storage for `n` contiguous values of `T`.
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError>;

    /// Return storage obtained from [`allocate`](Self::allocate).
    ///
    /// Never fails. Implementations may choose to reclaim nothing.
    ///
    /// # Safety
    ///
    /// `ptr` must have come from `allocate(n)` on an allocator equal to
    /// `self`, any value in it must already be destroyed, and it must not
    /// be deallocated twice.
    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize);

    /// Move `value` into the storage at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes and aligned for `T`. Any value
    /// already there is overwritten without being dropped.
    unsafe fn construct(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: forwarded from the caller.
        unsafe { ptr.as_ptr().write(value) }
    }

    /// Drop the value at `ptr` in place, leaving the storage allocated.
    ///
    /// # Safety
    ///
    /// `ptr` must point at an initialised `T` that is not used again
    /// afterwards except to be deallocated or reconstructed.
    unsafe fn destroy(&self, ptr: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { ptr::drop_in_place(ptr.as_ptr()) }
    }
}
