//! Ordered map over any [`TypedAllocator`], balanced as an AA tree.
//!
//! An AA tree is a red-black tree variant where only right children may be
//! "red" (share their parent's level). Insertion restores balance with two
//! rotations, `skew` and `split`, applied on the way back up. Every node is
//! allocated, constructed, destroyed and deallocated through the map's
//! allocator handle, rebound from `(K, V)` to [`TreeNode<K, V>`].
//!
//! Nodes are never removed individually, which keeps the map a good fit for
//! bump arenas that reclaim nothing until they are dropped.

#![allow(unsafe_code)]

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use cairn_arena::{AllocError, Footprint, HeapAllocator, NodeKind, TypedAllocator};
use smallvec::SmallVec;

type Link<K, V> = Option<NonNull<TreeNode<K, V>>>;

/// Traversal stack. Depth stays within about `2 * log2(len)`.
type Stack<K, V> = SmallVec<[NonNull<TreeNode<K, V>>; 24]>;

/// One map entry plus the tree bookkeeping around it.
///
/// This is the type a map's allocator is rebound to.
pub struct TreeNode<K, V> {
    left: Link<K, V>,
    right: Link<K, V>,
    level: u32,
    entry: (K, V),
}

/// Sizes an arena for [`OrderedMap`] nodes carrying `(K, V)` entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeNodes;

impl<K, V> NodeKind<(K, V)> for TreeNodes {
    fn footprint() -> Footprint {
        Footprint::of::<TreeNode<K, V>>()
    }
}

/// A sorted map with logarithmic insert and lookup.
///
/// `A` allocates `(K, V)` entries; the map rebinds it to
/// [`TreeNode<K, V>`]. Iteration visits entries in ascending key order.
pub struct OrderedMap<K, V, A: TypedAllocator<(K, V)> = HeapAllocator<(K, V)>> {
    root: Link<K, V>,
    len: usize,
    alloc: A::Rebind<TreeNode<K, V>>,
    _owns: PhantomData<(K, V)>,
}

impl<K, V> OrderedMap<K, V> {
    /// Create an empty map on the global heap.
    pub fn new() -> Self {
        Self::new_in(HeapAllocator::new())
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, A: TypedAllocator<(K, V)>> OrderedMap<K, V, A> {
    /// Create an empty map whose nodes come from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            root: None,
            len: 0,
            alloc: alloc.rebind(),
            _owns: PhantomData,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            stack: Stack::new(),
            remaining: self.len,
            _marker: PhantomData,
        };
        iter.descend_left(self.root);
        iter
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// The node allocator this map uses.
    pub fn allocator(&self) -> &A::Rebind<TreeNode<K, V>> {
        &self.alloc
    }

    fn find<Q>(&self, key: &Q) -> Link<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(node) = cursor {
            // SAFETY: every link reachable from `root` is a live node.
            let n = unsafe { node.as_ref() };
            cursor = match key.cmp(n.entry.0.borrow()) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Look up the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // SAFETY: the node lives as long as `&self`.
        self.find(key).map(|node| unsafe { &(*node.as_ptr()).entry.1 })
    }

    /// Look up the value for `key` mutably.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // SAFETY: the node lives as long as `&mut self`, which is exclusive.
        self.find(key).map(|node| unsafe { &mut (*node.as_ptr()).entry.1 })
    }

    /// Whether `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Insert `value` under `key`, returning the value it replaced.
    ///
    /// Replacing an existing key allocates nothing. When a new node cannot
    /// be allocated the error is returned and the map is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, AllocError>
    where
        K: Ord,
    {
        let (root, previous) = self.insert_at(self.root, key, value)?;
        self.root = Some(root);
        Ok(previous)
    }

    /// Recursive AA insertion. Rebalancing only happens after the recursive
    /// call has succeeded, so an allocation failure at the leaf unwinds
    /// without touching any link.
    fn insert_at(
        &mut self,
        link: Link<K, V>,
        key: K,
        value: V,
    ) -> Result<(NonNull<TreeNode<K, V>>, Option<V>), AllocError>
    where
        K: Ord,
    {
        let Some(node) = link else {
            let fresh = self.alloc.allocate(1)?;
            let leaf = TreeNode {
                left: None,
                right: None,
                level: 1,
                entry: (key, value),
            };
            // SAFETY: `fresh` is new storage for one node from our allocator.
            unsafe { self.alloc.construct(fresh, leaf) };
            self.len += 1;
            return Ok((fresh, None));
        };

        let n = node.as_ptr();
        // SAFETY: `node` is reachable from `root` and therefore live; no other
        // reference to it exists while `&mut self` is held.
        let previous = unsafe {
            match key.cmp(&(*n).entry.0) {
                Ordering::Less => {
                    let (child, previous) = self.insert_at((*n).left, key, value)?;
                    (*n).left = Some(child);
                    previous
                }
                Ordering::Greater => {
                    let (child, previous) = self.insert_at((*n).right, key, value)?;
                    (*n).right = Some(child);
                    previous
                }
                Ordering::Equal => {
                    return Ok((node, Some(mem::replace(&mut (*n).entry.1, value))));
                }
            }
        };

        // SAFETY: `node` and its subtree are live and exclusively ours.
        let node = unsafe { split(skew(node)) };
        Ok((node, previous))
    }

    /// Destroy and deallocate every node.
    pub fn clear(&mut self) {
        let mut stack = Stack::new();
        stack.extend(self.root.take());
        self.len = 0;
        while let Some(node) = stack.pop() {
            // SAFETY: each node is pushed once, by its unique parent; its
            // children are read before it is destroyed, and it is
            // deallocated only after its entry has been dropped.
            unsafe {
                let n = node.as_ptr();
                stack.extend((*n).left);
                stack.extend((*n).right);
                self.alloc.destroy(node);
                self.alloc.deallocate(node, 1);
            }
        }
    }
}

/// Rotate right when the left child sits on the same level.
///
/// # Safety
///
/// `node` and its left child, if any, must be live and not aliased.
unsafe fn skew<K, V>(node: NonNull<TreeNode<K, V>>) -> NonNull<TreeNode<K, V>> {
    let n = node.as_ptr();
    // SAFETY: guaranteed by the caller.
    unsafe {
        match (*n).left {
            Some(left) if (*left.as_ptr()).level == (*n).level => {
                let l = left.as_ptr();
                (*n).left = (*l).right;
                (*l).right = Some(node);
                left
            }
            _ => node,
        }
    }
}

/// Rotate left and promote when two right links sit on the same level.
///
/// # Safety
///
/// `node`, its right child and right grandchild, if any, must be live and
/// not aliased.
unsafe fn split<K, V>(node: NonNull<TreeNode<K, V>>) -> NonNull<TreeNode<K, V>> {
    let n = node.as_ptr();
    // SAFETY: guaranteed by the caller.
    unsafe {
        let Some(right) = (*n).right else {
            return node;
        };
        let r = right.as_ptr();
        match (*r).right {
            Some(grand) if (*grand.as_ptr()).level == (*n).level => {
                (*n).right = (*r).left;
                (*r).left = Some(node);
                (*r).level += 1;
                right
            }
            _ => node,
        }
    }
}

impl<K, V, A: TypedAllocator<(K, V)>> Drop for OrderedMap<K, V, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: fmt::Debug, V: fmt::Debug, A: TypedAllocator<(K, V)>> fmt::Debug for OrderedMap<K, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, A: TypedAllocator<(K, V)>> IntoIterator for &'a OrderedMap<K, V, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// In-order iterator over an [`OrderedMap`].
pub struct Iter<'a, K, V> {
    stack: Stack<K, V>,
    remaining: usize,
    _marker: PhantomData<&'a TreeNode<K, V>>,
}

impl<K, V> Iter<'_, K, V> {
    fn descend_left(&mut self, mut link: Link<K, V>) {
        while let Some(node) = link {
            self.stack.push(node);
            // SAFETY: the map is borrowed for the iterator's lifetime.
            link = unsafe { (*node.as_ptr()).left };
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // SAFETY: the map is borrowed for `'a`; no node is mutated or freed
        // while this iterator exists.
        let n = unsafe { &*node.as_ptr() };
        self.descend_left(n.right);
        self.remaining -= 1;
        Some((&n.entry.0, &n.entry.1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
