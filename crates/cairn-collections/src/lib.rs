//! Containers generic over [`TypedAllocator`].
//!
//! Both containers take an allocator for their payload type and rebind it
//! to their own node type, so the same code runs on the global heap
//! ([`HeapAllocator`]) or on a shared bump arena ([`ArenaAllocator`]).
//!
//! - [`SinglyList`]: append-only singly-linked list with a forward iterator.
//! - [`OrderedMap`]: balanced (AA) search tree keyed by `K: Ord`.
//!
//! Size arenas for these containers with the [`ListNodes`] and
//! [`TreeNodes`] selectors:
//!
//! ```rust
//! use cairn_arena::ArenaAllocator;
//! use cairn_collections::{OrderedMap, TreeNodes};
//!
//! let alloc = ArenaAllocator::<(u32, u64)>::sized_for::<TreeNodes>(3).unwrap();
//! let mut map = OrderedMap::new_in(alloc);
//! for k in 0..3 {
//!     map.insert(k, u64::from(k) * 10).unwrap();
//! }
//! assert!(map.insert(3, 30).unwrap_err().is_exhausted());
//! assert_eq!(map.len(), 3);
//! ```
//!
//! [`TypedAllocator`]: cairn_arena::TypedAllocator
//! [`HeapAllocator`]: cairn_arena::HeapAllocator
//! [`ArenaAllocator`]: cairn_arena::ArenaAllocator

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod list;
pub mod map;

pub use list::{ListNodes, Node, SinglyList};
pub use map::{OrderedMap, TreeNode, TreeNodes};
