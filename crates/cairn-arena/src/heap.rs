//! [`TypedAllocator`] over the global heap.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::AllocError;
use crate::traits::TypedAllocator;

/// Stateless allocator backed by the global allocator.
///
/// All instances are interchangeable, so every pair compares equal.
pub struct HeapAllocator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> HeapAllocator<T> {
    /// Create a heap allocator for `T`.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for HeapAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HeapAllocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for HeapAllocator<T> {}

impl<T, U> PartialEq<HeapAllocator<U>> for HeapAllocator<T> {
    fn eq(&self, _other: &HeapAllocator<U>) -> bool {
        true
    }
}

impl<T> Eq for HeapAllocator<T> {}

impl<T> fmt::Debug for HeapAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HeapAllocator")
    }
}

fn array_layout<T>(n: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow {
        count: n,
        size: std::mem::size_of::<T>(),
    })
}

impl<T> TypedAllocator<T> for HeapAllocator<T> {
    type Rebind<U> = HeapAllocator<U>;

    fn rebind<U>(&self) -> HeapAllocator<U> {
        HeapAllocator::new()
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(AllocError::SystemAllocation {
            bytes: layout.size(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let Ok(layout) = Layout::array::<T>(n) else {
            return;
        };
        if layout.size() != 0 {
            // SAFETY: the caller guarantees `ptr` came from `allocate(n)`,
            // which used this same layout.
            unsafe { alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_construct_destroy_deallocate() {
        let heap = HeapAllocator::<String>::new();
        let p = heap.allocate(1).unwrap();
        unsafe {
            heap.construct(p, "hello".to_string());
            assert_eq!(p.as_ref(), "hello");
            heap.destroy(p);
            heap.deallocate(p, 1);
        }
    }

    #[test]
    fn zero_sized_requests_are_dangling() {
        let heap = HeapAllocator::<u64>::new();
        let p = heap.allocate(0).unwrap();
        assert_eq!(p, NonNull::dangling());
        unsafe { heap.deallocate(p, 0) };
    }

    #[test]
    fn overflowing_count_is_reported() {
        let heap = HeapAllocator::<u64>::new();
        assert_eq!(
            heap.allocate(usize::MAX),
            Err(AllocError::CapacityOverflow {
                count: usize::MAX,
                size: 8
            })
        );
    }

    #[test]
    fn all_heap_allocators_are_equal() {
        let a = HeapAllocator::<u8>::new();
        let b: HeapAllocator<String> = a.rebind();
        assert!(a == b);
        assert_eq!(a, a.clone());
    }
}
