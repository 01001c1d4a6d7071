//! Fixed-capacity bump arena and the allocator handles built on it.
//!
//! An [`Arena`] owns one contiguous byte buffer and serves requests by
//! advancing a cursor. Nothing is ever reclaimed individually; the whole
//! buffer is released when the last [`ArenaAllocator`] referencing it is
//! dropped.
//!
//! # Architecture
//!
//! ```text
//! ArenaAllocator<T> ──┐
//! ArenaAllocator<U> ──┼── Rc<Arena> ── RawBuffer (capacity bytes, base_align)
//! ArenaAllocator<T> ──┘                 └── offset: Cell<usize> (bump cursor)
//! ```
//!
//! Containers are written against [`TypedAllocator`], so the same code runs
//! on [`HeapAllocator`] or on an [`ArenaAllocator`]. Arena capacity is sized
//! by the caller through a [`NodeKind`] selector that names the node
//! representation the consuming container actually allocates.
//!
//! # Non-goals
//!
//! No free list, no growth, no defragmentation, no thread safety. Handles
//! are `!Send` and `!Sync`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod arena;
pub mod config;
pub mod error;
pub mod footprint;
pub mod handle;
pub mod heap;
mod raw;
pub mod traits;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::AllocError;
pub use footprint::{Footprint, NodeKind, Plain};
pub use handle::ArenaAllocator;
pub use heap::HeapAllocator;
pub use traits::TypedAllocator;
