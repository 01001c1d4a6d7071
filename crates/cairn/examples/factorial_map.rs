//! Factorials in an ordered map and integers in a list, each built once on
//! the heap and once on a bump arena sized for exactly ten nodes.
//!
//! The subscriber logs at DEBUG, so arena creation, exhaustion and release
//! show up alongside the listing.

use cairn::prelude::*;

fn factorial(n: i32) -> i32 {
    (2..=n).product()
}

fn main() -> Result<(), AllocError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut heap_map = OrderedMap::new();
    for k in 0..=9 {
        heap_map.insert(k, factorial(k))?;
    }

    let map_alloc = ArenaAllocator::<(i32, i32)>::sized_for::<TreeNodes>(10)?;
    let mut arena_map = OrderedMap::new_in(map_alloc);
    for k in 0..=9 {
        arena_map.insert(k, factorial(k))?;
    }

    println!("Heap map:");
    for (k, v) in &heap_map {
        println!("{k} {v}");
    }
    println!("Arena map:");
    for (k, v) in &arena_map {
        println!("{k} {v}");
    }

    let mut heap_list = SinglyList::new();
    let list_alloc = ArenaAllocator::<i32>::sized_for::<ListNodes>(10)?;
    let mut arena_list = SinglyList::new_in(list_alloc);
    for v in 0..=9 {
        heap_list.push_back(v)?;
        arena_list.push_back(v)?;
    }

    println!("List, heap allocator:");
    for v in &heap_list {
        println!("{v}");
    }
    println!("List, arena allocator:");
    for v in &arena_list {
        println!("{v}");
    }

    tracing::info!(
        map_nodes = arena_map.len(),
        list_nodes = arena_list.len(),
        "done"
    );
    Ok(())
}
