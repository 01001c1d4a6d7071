//! The fixed-capacity bump arena.
//!
//! An [`Arena`] hands out non-overlapping, aligned sub-ranges of one owned
//! buffer by advancing a byte offset. Alignment is computed on the
//! arena-relative offset: the base address is aligned to `base_align`, so an
//! offset that is a multiple of `align <= base_align` is also an aligned
//! address.
//!
//! Deallocation is a no-op. Space is only returned to the system, in one
//! piece, when the arena is dropped.

use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::config::ArenaConfig;
use crate::error::AllocError;
use crate::raw::RawBuffer;

/// A single-shot bump allocation region.
///
/// Allocation takes `&self` so that many handles can share one arena
/// through an `Rc`. The type is neither `Send` nor `Sync`.
pub struct Arena {
    buffer: RawBuffer,
    /// Bytes committed so far. Never decreases.
    offset: Cell<usize>,
}

impl Arena {
    /// Create an arena with a buffer of exactly `capacity` bytes.
    pub fn new(capacity: usize) -> Result<Self, AllocError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Create an arena from a validated configuration.
    pub fn with_config(config: ArenaConfig) -> Result<Self, AllocError> {
        config.validate()?;
        let buffer = RawBuffer::new(config.capacity, config.base_align)?;
        debug!(
            capacity = config.capacity,
            base_align = config.base_align,
            "arena created"
        );
        Ok(Self {
            buffer,
            offset: Cell::new(0),
        })
    }

    /// Reserve `size` bytes aligned to `align`.
    ///
    /// The cursor is rounded up to the next multiple of `align`, then
    /// `size` bytes are reserved from there. On any error the committed
    /// offset is left untouched.
    ///
    /// Non-empty reservations always lie inside the buffer. A zero-sized
    /// request on a full arena succeeds with a pointer one past the end of
    /// the buffer; it must not be dereferenced.
    pub fn allocate(&self, size: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
        if !align.is_power_of_two() {
            return Err(AllocError::InvalidAlignment { align });
        }
        if align > self.buffer.align() {
            return Err(AllocError::UnsupportedAlignment {
                align,
                base_align: self.buffer.align(),
            });
        }

        let used = self.offset.get();
        let capacity = self.buffer.capacity();
        let exhausted = AllocError::Exhausted {
            requested: size,
            align,
            used,
            capacity,
        };

        let end = align_up(used, align)
            .and_then(|start| start.checked_add(size).map(|end| (start, end)))
            .filter(|&(_, end)| end <= capacity);
        let Some((start, end)) = end else {
            debug!(requested = size, align, used, capacity, "arena exhausted");
            return Err(exhausted);
        };

        self.offset.set(end);
        trace!(start, end, "arena bump");
        Ok(self.buffer.at(start))
    }

    /// Reserve space for `layout`.
    pub fn allocate_layout(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.allocate(layout.size(), layout.align())
    }

    /// Release a previous allocation. Always a no-op.
    ///
    /// Bump arenas never reclaim individual ranges; the committed offset is
    /// not reduced and the space is not reused for the arena's lifetime.
    pub fn deallocate(&self, _ptr: NonNull<u8>, _size: usize) {}

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Bytes committed so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    /// Bytes not yet committed.
    pub fn remaining(&self) -> usize {
        self.buffer.capacity() - self.offset.get()
    }

    /// Alignment guaranteed for the base of the buffer.
    pub fn base_align(&self) -> usize {
        self.buffer.align()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        debug!(
            capacity = self.capacity(),
            used = self.used(),
            "arena released"
        );
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .field("used", &self.used())
            .field("base_align", &self.base_align())
            .finish()
    }
}

/// Round `offset` up to a multiple of `align` (a power of two).
fn align_up(offset: usize, align: usize) -> Option<usize> {
    let mask = align - 1;
    offset.checked_add(mask).map(|v| v & !mask)
}
