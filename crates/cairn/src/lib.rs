//! Cairn: a fixed-capacity bump arena with allocator-generic containers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Cairn sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use cairn::prelude::*;
//!
//! // Room for exactly ten list nodes carrying an `i32`.
//! let alloc = ArenaAllocator::<i32>::sized_for::<ListNodes>(10).unwrap();
//! let mut list = SinglyList::new_in(alloc.clone());
//! for v in 0..10 {
//!     list.push_back(v).unwrap();
//! }
//! assert!(list.push_back(10).unwrap_err().is_exhausted());
//! assert_eq!(list.iter().sum::<i32>(), 45);
//!
//! // The list's node allocator is a rebind of the caller's handle.
//! assert!(*list.allocator() == alloc);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `cairn-arena` | `Arena`, `ArenaAllocator`, `HeapAllocator`, sizing, errors |
//! | [`collections`] | `cairn-collections` | `SinglyList`, `OrderedMap`, node-kind selectors |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena, allocator handles and the allocation capability trait
/// (`cairn-arena`).
pub use cairn_arena as arena;

/// Allocator-generic containers (`cairn-collections`).
pub use cairn_collections as collections;

/// Common imports for typical Cairn usage.
///
/// ```rust
/// use cairn::prelude::*;
/// ```
pub mod prelude {
    // Allocation
    pub use cairn_arena::{
        AllocError, Arena, ArenaAllocator, ArenaConfig, Footprint, HeapAllocator, NodeKind,
        Plain, TypedAllocator,
    };

    // Containers
    pub use cairn_collections::{ListNodes, OrderedMap, SinglyList, TreeNodes};
}
