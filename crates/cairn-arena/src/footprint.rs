//! Per-node byte footprints and the selectors used to size arenas.
//!
//! Different containers allocate different node representations for the
//! same payload: a list node carries a successor link, a tree node carries
//! two child links and a level. Arena capacity therefore has to be computed
//! from the node type the consuming container really allocates, which is
//! what a [`NodeKind`] names.
//!
//! The sizing formula is `count * size_of::<Node>()`. A Rust type's size is
//! always a multiple of its alignment, so `count` nodes of one type pack
//! back to back with no padding once the arena base is suitably aligned.

use std::fmt;

use crate::error::AllocError;

/// Byte size and alignment one value of a node representation needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Footprint {
    size: usize,
    align: usize,
}

impl Footprint {
    /// Footprint of `T`.
    pub const fn of<T>() -> Self {
        Self {
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alignment in bytes.
    pub fn align(&self) -> usize {
        self.align
    }

    /// Bytes needed for `count` consecutive values.
    pub fn bytes_for(&self, count: usize) -> Result<usize, AllocError> {
        count
            .checked_mul(self.size)
            .ok_or(AllocError::CapacityOverflow {
                count,
                size: self.size,
            })
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes (align {})", self.size, self.align)
    }
}

/// Selects which node representation an arena is sized for.
///
/// `T` is the payload the caller stores; the implementor maps it to the
/// node type that will actually be allocated.
pub trait NodeKind<T> {
    /// Footprint of one node holding a `T`.
    fn footprint() -> Footprint;
}

/// Sizes for bare `T` values with no container overhead.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl<T> NodeKind<T> for Plain {
    fn footprint() -> Footprint {
        Footprint::of::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_of_primitive() {
        let fp = Footprint::of::<u32>();
        assert_eq!(fp.size(), 4);
        assert_eq!(fp.align(), 4);
        assert_eq!(fp.to_string(), "4 bytes (align 4)");
    }

    #[test]
    fn footprint_size_is_multiple_of_align() {
        let fp = Footprint::of::<(u64, u8)>();
        assert_eq!(fp.size() % fp.align(), 0);
        assert_eq!(fp.bytes_for(3).unwrap(), 3 * fp.size());
    }

    #[test]
    fn plain_kind_matches_payload() {
        assert_eq!(
            <Plain as NodeKind<(i32, i32)>>::footprint(),
            Footprint::of::<(i32, i32)>()
        );
    }

    #[test]
    fn zero_sized_footprint_needs_no_bytes() {
        assert_eq!(Footprint::of::<()>().bytes_for(1_000).unwrap(), 0);
    }
}
