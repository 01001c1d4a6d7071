//! Owned, aligned byte buffer backing an arena.
//!
//! This is the only place the system allocator is called directly for arena
//! storage. The buffer never moves or reallocates, so every pointer derived
//! from it stays valid until the buffer is dropped.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use crate::error::AllocError;

pub(crate) struct RawBuffer {
    base: NonNull<u8>,
    layout: Layout,
}

impl RawBuffer {
    /// Allocate `capacity` uninitialised bytes aligned to `align`.
    ///
    /// `align` must already be validated as a power of two.
    pub(crate) fn new(capacity: usize, align: usize) -> Result<Self, AllocError> {
        let layout = Layout::from_size_align(capacity, align)
            .map_err(|_| AllocError::SystemAllocation { bytes: capacity })?;

        if capacity == 0 {
            // Zero-sized layouts must not reach the system allocator. The
            // dangling base still carries the promised alignment.
            let base = NonNull::new(ptr::without_provenance_mut::<u8>(align))
                .ok_or(AllocError::InvalidAlignment { align })?;
            return Ok(Self { base, layout });
        }

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let base = NonNull::new(raw).ok_or(AllocError::SystemAllocation { bytes: capacity })?;
        Ok(Self { base, layout })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.layout.size()
    }

    pub(crate) fn align(&self) -> usize {
        self.layout.align()
    }

    /// Pointer to the byte at `offset` from the base.
    ///
    /// `offset` may equal the capacity (one past the end) for zero-sized
    /// reservations at the very end of the buffer.
    pub(crate) fn at(&self, offset: usize) -> NonNull<u8> {
        assert!(offset <= self.capacity(), "offset {offset} out of bounds");
        // SAFETY: `offset <= capacity`, so the result stays within (or one
        // past the end of) the allocation and cannot wrap to null.
        unsafe { self.base.add(offset) }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: `base` came from `alloc::alloc` with this exact layout
            // and is released exactly once, here.
            unsafe { alloc::dealloc(self.base.as_ptr(), self.layout) };
        }
    }
}
