//! Append-only singly-linked list over any [`TypedAllocator`].
//!
//! Every node is allocated, constructed, destroyed and deallocated through
//! the list's allocator handle. The list never touches the global heap
//! directly.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use cairn_arena::{AllocError, Footprint, HeapAllocator, NodeKind, TypedAllocator};

type Link<T> = Option<NonNull<Node<T>>>;

/// One list element plus its successor link.
///
/// This is the type a list's allocator is rebound to.
pub struct Node<T> {
    next: Link<T>,
    value: T,
}

/// Sizes an arena for [`SinglyList`] nodes carrying `T`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListNodes;

impl<T> NodeKind<T> for ListNodes {
    fn footprint() -> Footprint {
        Footprint::of::<Node<T>>()
    }
}

/// A singly-linked list with O(1) append and a forward iterator.
///
/// `A` is an allocator for `T`; the list rebinds it to [`Node<T>`] and uses
/// the rebound handle for every node.
///
/// Invariants: `len` equals the number of nodes reachable from `head`;
/// `tail` is the last of them and its successor is `None`; an empty list has
/// neither head nor tail.
pub struct SinglyList<T, A: TypedAllocator<T> = HeapAllocator<T>> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    alloc: A::Rebind<Node<T>>,
    _owns: PhantomData<T>,
}

impl<T> SinglyList<T> {
    /// Create an empty list on the global heap.
    pub fn new() -> Self {
        Self::new_in(HeapAllocator::new())
    }
}

impl<T> Default for SinglyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: TypedAllocator<T>> SinglyList<T, A> {
    /// Create an empty list whose nodes come from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc: alloc.rebind(),
            _owns: PhantomData,
        }
    }

    /// Append `value` at the tail.
    ///
    /// If the node cannot be allocated the error is returned, `value` is
    /// dropped and the list is left exactly as it was.
    pub fn push_back(&mut self, value: T) -> Result<(), AllocError> {
        let node = self.alloc.allocate(1)?;
        // SAFETY: `node` is fresh storage for one `Node<T>` from our allocator.
        unsafe { self.alloc.construct(node, Node { next: None, value }) };

        match self.tail {
            // SAFETY: `tail` points at a live node owned by this list.
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Number of elements. O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The first element.
    pub fn front(&self) -> Option<&T> {
        // SAFETY: `head` points at a live node borrowed for `&self`.
        self.head.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// The last element.
    pub fn back(&self) -> Option<&T> {
        // SAFETY: `tail` points at a live node borrowed for `&self`.
        self.tail.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Forward iterator over the elements, head to tail.
    ///
    /// Each call starts over from the head.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Destroy and deallocate every node, head to tail.
    pub fn clear(&mut self) {
        let mut cursor = self.head.take();
        self.tail = None;
        self.len = 0;
        while let Some(node) = cursor {
            // SAFETY: each node is reached exactly once along the chain; its
            // successor is read before the node is destroyed, and the node
            // is deallocated only after its value has been dropped.
            unsafe {
                cursor = (*node.as_ptr()).next;
                self.alloc.destroy(node);
                self.alloc.deallocate(node, 1);
            }
        }
    }

    /// The node allocator this list uses.
    pub fn allocator(&self) -> &A::Rebind<Node<T>> {
        &self.alloc
    }
}

impl<T, A: TypedAllocator<T>> Drop for SinglyList<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, A: TypedAllocator<T>> fmt::Debug for SinglyList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, A: TypedAllocator<T>> IntoIterator for &'a SinglyList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Borrowing forward iterator over a [`SinglyList`].
pub struct Iter<'a, T> {
    next: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a Node<T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        // SAFETY: the list is borrowed for `'a`, so no node can be appended,
        // destroyed or moved while this iterator exists.
        let node = unsafe { &*node.as_ptr() };
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use cairn_arena::ArenaAllocator;

    use super::*;

    fn fill<A: TypedAllocator<i32>>(list: &mut SinglyList<i32, A>, values: &[i32]) {
        for &v in values {
            list.push_back(v).unwrap();
        }
    }

    #[test]
    fn empty_list_has_no_ends() {
        let list = SinglyList::<i32>::new();
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.iter().next(), None);
    }

    #[test]
    fn push_back_preserves_order() {
        let mut list = SinglyList::new();
        fill(&mut list, &[10, 20, 30]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [10, 20, 30]);
        assert_eq!(list.front(), Some(&10));
        assert_eq!(list.back(), Some(&30));
    }

    #[test]
    fn iteration_is_restartable() {
        let mut list = SinglyList::new();
        fill(&mut list, &[1, 2, 3]);
        let first: Vec<_> = list.iter().collect();
        let second: Vec<_> = (&list).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn iterator_is_exact_size() {
        let mut list = SinglyList::new();
        fill(&mut list, &[4, 5, 6, 7]);
        let mut it = list.iter();
        assert_eq!(it.len(), 4);
        it.next();
        assert_eq!(it.len(), 3);
        let rest = it.clone();
        assert_eq!(rest.copied().collect::<Vec<_>>(), [5, 6, 7]);
        assert_eq!(it.count(), 3);
    }

    #[test]
    fn same_code_runs_on_heap_and_arena() {
        let values: Vec<i32> = (0..10).collect();

        let mut heap_list = SinglyList::new();
        fill(&mut heap_list, &values);

        let alloc = ArenaAllocator::<i32>::sized_for::<ListNodes>(10).unwrap();
        let mut arena_list = SinglyList::new_in(alloc);
        fill(&mut arena_list, &values);

        assert!(heap_list.iter().eq(arena_list.iter()));
        assert_eq!(arena_list.allocator().arena().remaining(), 0);
    }

    #[test]
    fn arena_sized_for_k_nodes_rejects_the_next() {
        let alloc = ArenaAllocator::<i32>::sized_for::<ListNodes>(3).unwrap();
        let mut list = SinglyList::new_in(alloc);
        fill(&mut list, &[1, 2, 3]);

        let err = list.push_back(4).unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(list.len(), 3);
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn list_allocator_shares_the_callers_arena() {
        let alloc = ArenaAllocator::<u8>::sized_for::<ListNodes>(2).unwrap();
        let list = SinglyList::new_in(alloc.clone());
        assert!(*list.allocator() == alloc);
        assert_eq!(alloc.handle_count(), 2);
    }

    #[test]
    fn drop_releases_every_value() {
        let shared = Rc::new(());
        {
            let alloc = ArenaAllocator::<Rc<()>>::sized_for::<ListNodes>(5).unwrap();
            let mut list = SinglyList::new_in(alloc);
            for _ in 0..5 {
                list.push_back(Rc::clone(&shared)).unwrap();
            }
            assert_eq!(Rc::strong_count(&shared), 6);
        }
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn failed_push_drops_the_value() {
        let shared = Rc::new(());
        let alloc = ArenaAllocator::<Rc<()>>::sized_for::<ListNodes>(0).unwrap();
        let mut list = SinglyList::new_in(alloc);
        assert!(list.push_back(Rc::clone(&shared)).is_err());
        assert_eq!(Rc::strong_count(&shared), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn clear_empties_and_allows_reuse_on_heap() {
        let mut list = SinglyList::new();
        fill(&mut list, &[1, 2]);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        fill(&mut list, &[3]);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [3]);
    }

    #[test]
    fn clear_does_not_return_arena_space() {
        let alloc = ArenaAllocator::<i32>::sized_for::<ListNodes>(2).unwrap();
        let mut list = SinglyList::new_in(alloc);
        fill(&mut list, &[1, 2]);
        list.clear();
        assert!(list.push_back(3).unwrap_err().is_exhausted());
    }

    #[test]
    fn list_node_footprint_includes_link() {
        let fp = <ListNodes as NodeKind<u64>>::footprint();
        assert_eq!(fp.size(), std::mem::size_of::<Node<u64>>());
        assert!(fp.size() >= std::mem::size_of::<u64>() + std::mem::size_of::<usize>());
    }

    #[test]
    fn debug_lists_elements() {
        let mut list = SinglyList::new();
        fill(&mut list, &[1, 2, 3]);
        assert_eq!(format!("{list:?}"), "[1, 2, 3]");
    }
}
