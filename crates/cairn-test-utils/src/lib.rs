//! Test utilities and instrumented allocators for Cairn development.
//!
//! - [`CountingAllocator`] wraps any [`TypedAllocator`] and records every
//!   allocate/construct/destroy/deallocate call into a shared [`EventLog`].
//!   Rebinding keeps the same log, so a container's internal node allocator
//!   reports into the log the test holds.
//! - [`DropProbe`] values record their id into a [`DropLog`] when dropped.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::rc::Rc;

use cairn_arena::{AllocError, TypedAllocator};

/// One call observed by a [`CountingAllocator`].
///
/// Addresses are recorded as plain integers for comparison only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocEvent {
    Allocate { addr: usize, n: usize },
    Construct { addr: usize },
    Destroy { addr: usize },
    Deallocate { addr: usize, n: usize },
}

impl AllocEvent {
    pub fn addr(&self) -> usize {
        match *self {
            Self::Allocate { addr, .. }
            | Self::Construct { addr }
            | Self::Destroy { addr }
            | Self::Deallocate { addr, .. } => addr,
        }
    }
}

/// Shared, append-only record of allocator calls.
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<AllocEvent>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: AllocEvent) {
        self.0.borrow_mut().push(event);
    }

    /// Snapshot of every event so far.
    pub fn events(&self) -> Vec<AllocEvent> {
        self.0.borrow().clone()
    }

    /// Number of events matching `pred`.
    pub fn count(&self, pred: impl Fn(&AllocEvent) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

/// A [`TypedAllocator`] that forwards to `A` and logs every call.
pub struct CountingAllocator<T, A> {
    inner: A,
    log: EventLog,
    _marker: PhantomData<fn() -> T>,
}

impl<T, A: TypedAllocator<T>> CountingAllocator<T, A> {
    pub fn new(inner: A, log: EventLog) -> Self {
        Self {
            inner,
            log,
            _marker: PhantomData,
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<T, A: Clone> Clone for CountingAllocator<T, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            log: self.log.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, A: PartialEq> PartialEq for CountingAllocator<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T, A: fmt::Debug> fmt::Debug for CountingAllocator<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingAllocator")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<T, A: TypedAllocator<T>> TypedAllocator<T> for CountingAllocator<T, A> {
    type Rebind<U> = CountingAllocator<U, A::Rebind<U>>;

    fn rebind<U>(&self) -> Self::Rebind<U> {
        CountingAllocator {
            inner: self.inner.rebind(),
            log: self.log.clone(),
            _marker: PhantomData,
        }
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let ptr = self.inner.allocate(n)?;
        self.log.push(AllocEvent::Allocate {
            addr: ptr.as_ptr().addr(),
            n,
        });
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        self.log.push(AllocEvent::Deallocate {
            addr: ptr.as_ptr().addr(),
            n,
        });
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.deallocate(ptr, n) }
    }

    unsafe fn construct(&self, ptr: NonNull<T>, value: T) {
        self.log.push(AllocEvent::Construct {
            addr: ptr.as_ptr().addr(),
        });
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.construct(ptr, value) }
    }

    unsafe fn destroy(&self, ptr: NonNull<T>) {
        self.log.push(AllocEvent::Destroy {
            addr: ptr.as_ptr().addr(),
        });
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.destroy(ptr) }
    }
}

/// Shared record of [`DropProbe`] ids in the order they were dropped.
#[derive(Clone, Default)]
pub struct DropLog(Rc<RefCell<Vec<u32>>>);

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self, id: u32) -> DropProbe {
        DropProbe {
            id,
            log: self.clone(),
        }
    }

    pub fn dropped(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

/// A value that records its id into a [`DropLog`] when dropped.
pub struct DropProbe {
    id: u32,
    log: DropLog,
}

impl DropProbe {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.log.0.borrow_mut().push(self.id);
    }
}

impl fmt::Debug for DropProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DropProbe({})", self.id)
    }
}

#[cfg(test)]
mod tests {
    use cairn_arena::{ArenaAllocator, HeapAllocator};

    use super::*;

    #[test]
    fn rebound_allocator_shares_log() {
        let log = EventLog::new();
        let alloc = CountingAllocator::new(HeapAllocator::<u32>::new(), log.clone());
        let rebound: CountingAllocator<u64, HeapAllocator<u64>> = alloc.rebind();
        let p = rebound.allocate(2).unwrap();
        unsafe { rebound.deallocate(p, 2) };
        assert_eq!(log.events().len(), 2);
        assert!(matches!(log.events()[0], AllocEvent::Allocate { n: 2, .. }));
    }

    #[test]
    fn equality_follows_inner_allocator() {
        let log = EventLog::new();
        let a = CountingAllocator::new(ArenaAllocator::<u8>::new(4).unwrap(), log.clone());
        let b = a.clone();
        let c = CountingAllocator::new(ArenaAllocator::<u8>::new(4).unwrap(), log);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn failed_allocation_is_not_logged() {
        let log = EventLog::new();
        let alloc = CountingAllocator::new(ArenaAllocator::<u64>::new(0).unwrap(), log.clone());
        assert!(alloc.allocate(1).is_err());
        assert!(log.events().is_empty());
    }

    #[test]
    fn drop_probes_record_order() {
        let drops = DropLog::new();
        let a = drops.probe(1);
        let b = drops.probe(2);
        drop(b);
        drop(a);
        assert_eq!(drops.dropped(), [2, 1]);
    }
}
