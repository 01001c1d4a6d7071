//! Integration test: the reference workload end to end.
//!
//! Ten factorials in an arena-backed ordered map sized for exactly ten tree
//! nodes, and ten integers in an arena-backed list sized for exactly ten
//! list nodes, each compared against the same container on the heap.

use cairn::prelude::*;

fn factorial(n: i32) -> i32 {
    (2..=n).product()
}

const EXPECTED: [(i32, i32); 10] = [
    (0, 1),
    (1, 1),
    (2, 2),
    (3, 6),
    (4, 24),
    (5, 120),
    (6, 720),
    (7, 5040),
    (8, 40320),
    (9, 362880),
];

#[test]
fn factorial_map_matches_heap_map() {
    let mut heap_map = OrderedMap::new();
    for k in 0..=9 {
        heap_map.insert(k, factorial(k)).unwrap();
    }

    let alloc = ArenaAllocator::<(i32, i32)>::sized_for::<TreeNodes>(10).unwrap();
    let mut arena_map = OrderedMap::new_in(alloc.clone());
    for k in 0..=9 {
        arena_map.insert(k, factorial(k)).unwrap();
    }

    let entries: Vec<(i32, i32)> = arena_map.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(entries, EXPECTED);
    assert!(heap_map.iter().eq(arena_map.iter()));

    // The arena was sized for exactly the ten tree nodes it now holds.
    assert_eq!(alloc.arena().remaining(), 0);
    assert!(arena_map.insert(10, factorial(10)).unwrap_err().is_exhausted());
    assert_eq!(arena_map.len(), 10);
}

#[test]
fn list_on_heap_and_arena_yield_the_same_sequence() {
    let mut heap_list = SinglyList::new();
    let alloc = ArenaAllocator::<i32>::sized_for::<ListNodes>(10).unwrap();
    let mut arena_list = SinglyList::new_in(alloc);
    for v in 0..=9 {
        heap_list.push_back(v).unwrap();
        arena_list.push_back(v).unwrap();
    }

    assert_eq!(arena_list.len(), 10);
    assert!(heap_list.iter().eq(arena_list.iter()));
    assert_eq!(
        arena_list.iter().copied().collect::<Vec<_>>(),
        (0..=9).collect::<Vec<_>>()
    );
}

#[test]
fn tree_sized_arena_is_larger_than_list_sized_arena() {
    let tree = ArenaAllocator::<(i32, i32)>::sized_for::<TreeNodes>(10).unwrap();
    let list = ArenaAllocator::<(i32, i32)>::sized_for::<ListNodes>(10).unwrap();
    let plain = ArenaAllocator::<(i32, i32)>::new(10).unwrap();
    assert!(tree.arena().capacity() > list.arena().capacity());
    assert!(list.arena().capacity() > plain.arena().capacity());
    assert_eq!(plain.arena().capacity(), 80);
}

#[test]
fn list_sized_arena_cannot_hold_a_full_tree() {
    // Sizing for the wrong node kind fails loudly instead of corrupting.
    let alloc = ArenaAllocator::<(i32, i32)>::sized_for::<ListNodes>(10).unwrap();
    let mut map = OrderedMap::new_in(alloc);
    let mut inserted = 0;
    let err = loop {
        match map.insert(inserted, factorial(inserted)) {
            Ok(_) => inserted += 1,
            Err(err) => break err,
        }
    };
    assert!(err.is_exhausted());
    assert!(inserted < 10);
    assert_eq!(map.len(), inserted as usize);
}

#[test]
fn two_containers_can_share_one_arena() {
    let alloc = ArenaAllocator::<i32>::sized_for::<ListNodes>(4).unwrap();
    let mut a = SinglyList::new_in(alloc.clone());
    let mut b = SinglyList::new_in(alloc.clone());
    a.push_back(1).unwrap();
    b.push_back(2).unwrap();
    a.push_back(3).unwrap();
    b.push_back(4).unwrap();
    assert!(a.push_back(5).unwrap_err().is_exhausted());
    assert!(*a.allocator() == *b.allocator());
    assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 3]);
    assert_eq!(b.iter().copied().collect::<Vec<_>>(), [2, 4]);

    drop(a);
    assert_eq!(alloc.handle_count(), 2);
    drop(b);
    assert_eq!(alloc.handle_count(), 1);
}
