//! Rebindable allocator handles sharing one [`Arena`].
//!
//! An [`ArenaAllocator`] is an `Rc<Arena>` plus a phantom element type.
//! Cloning a handle or rebinding it to another element type shares the same
//! arena and never allocates arena space. The arena's buffer is released
//! when the last handle referencing it is dropped.

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::arena::Arena;
use crate::config::ArenaConfig;
use crate::error::AllocError;
use crate::footprint::{Footprint, NodeKind, Plain};
use crate::traits::TypedAllocator;

/// Typed allocator over a shared, reference-counted [`Arena`].
///
/// Two handles are equal iff they reference the identical arena, whatever
/// their element types.
pub struct ArenaAllocator<T> {
    arena: Rc<Arena>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaAllocator<T> {
    /// Create a handle over a fresh arena with room for `count` values of `T`.
    pub fn new(count: usize) -> Result<Self, AllocError> {
        Self::sized_for::<Plain>(count)
    }

    /// Create a handle over a fresh arena sized for `count` nodes of kind `K`.
    ///
    /// `K` names the node representation the consuming container allocates
    /// for each `T`, so the budget matches that container's real overhead.
    pub fn sized_for<K: NodeKind<T>>(count: usize) -> Result<Self, AllocError> {
        Self::with_footprint(count, K::footprint())
    }

    /// Create a handle over a fresh arena with room for `count` values of
    /// `footprint`.
    pub fn with_footprint(count: usize, footprint: Footprint) -> Result<Self, AllocError> {
        Self::with_config(ArenaConfig::for_elements(count, footprint)?)
    }

    /// Create a handle over a fresh arena built from `config`.
    pub fn with_config(config: ArenaConfig) -> Result<Self, AllocError> {
        Ok(Self::from_arena(Rc::new(Arena::with_config(config)?)))
    }

    /// Wrap an existing shared arena.
    pub fn from_arena(arena: Rc<Arena>) -> Self {
        Self {
            arena,
            _marker: PhantomData,
        }
    }

    /// The arena this handle allocates from.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Number of handles (of any element type) sharing this arena.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.arena)
    }

    /// Whether `other` allocates from the same arena.
    pub fn shares_arena<U>(&self, other: &ArenaAllocator<U>) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }
}

impl<T> Clone for ArenaAllocator<T> {
    fn clone(&self) -> Self {
        Self::from_arena(Rc::clone(&self.arena))
    }
}

impl<T, U> PartialEq<ArenaAllocator<U>> for ArenaAllocator<T> {
    fn eq(&self, other: &ArenaAllocator<U>) -> bool {
        self.shares_arena(other)
    }
}

impl<T> Eq for ArenaAllocator<T> {}

impl<T> fmt::Debug for ArenaAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaAllocator")
            .field("element", &std::any::type_name::<T>())
            .field("arena", &*self.arena)
            .finish()
    }
}

impl<T> TypedAllocator<T> for ArenaAllocator<T> {
    type Rebind<U> = ArenaAllocator<U>;

    fn rebind<U>(&self) -> ArenaAllocator<U> {
        ArenaAllocator::from_arena(Rc::clone(&self.arena))
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let bytes = Footprint::of::<T>().bytes_for(n)?;
        let ptr = self.arena.allocate(bytes, std::mem::align_of::<T>())?;
        Ok(ptr.cast::<T>())
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let bytes = n.saturating_mul(std::mem::size_of::<T>());
        self.arena.deallocate(ptr.cast::<u8>(), bytes);
    }
}
