//! Allocation error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur while building an arena or allocating from one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The request does not fit in the remaining arena capacity.
    ///
    /// The arena's committed offset is unchanged when this is returned.
    Exhausted {
        /// Number of bytes requested.
        requested: usize,
        /// Alignment requested, in bytes.
        align: usize,
        /// Bytes already committed at the time of the request.
        used: usize,
        /// Total arena capacity in bytes.
        capacity: usize,
    },
    /// The system allocator could not provide a backing buffer.
    SystemAllocation {
        /// Size of the buffer that could not be obtained.
        bytes: usize,
    },
    /// `count * size` overflowed while computing a byte budget.
    CapacityOverflow {
        /// Number of elements.
        count: usize,
        /// Per-element size in bytes.
        size: usize,
    },
    /// An alignment that is not a power of two.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// An alignment stricter than the arena's backing buffer guarantees.
    UnsupportedAlignment {
        /// The requested alignment.
        align: usize,
        /// Alignment of the arena's base address.
        base_align: usize,
    },
}

impl AllocError {
    /// Whether this is the [`AllocError::Exhausted`] condition.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted {
                requested,
                align,
                used,
                capacity,
            } => {
                write!(
                    f,
                    "arena exhausted: requested {requested} bytes (align {align}), \
                     {used} of {capacity} bytes used"
                )
            }
            Self::SystemAllocation { bytes } => {
                write!(f, "system allocator failed to provide {bytes} bytes")
            }
            Self::CapacityOverflow { count, size } => {
                write!(f, "capacity overflow: {count} elements of {size} bytes")
            }
            Self::InvalidAlignment { align } => {
                write!(f, "alignment {align} is not a power of two")
            }
            Self::UnsupportedAlignment { align, base_align } => {
                write!(
                    f,
                    "alignment {align} exceeds arena base alignment {base_align}"
                )
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_display_names_all_quantities() {
        let err = AllocError::Exhausted {
            requested: 24,
            align: 8,
            used: 40,
            capacity: 48,
        };
        let msg = err.to_string();
        assert!(msg.contains("24 bytes"));
        assert!(msg.contains("40 of 48"));
        assert!(err.is_exhausted());
    }

    #[test]
    fn system_allocation_is_not_exhausted() {
        let err = AllocError::SystemAllocation { bytes: 1 << 40 };
        assert!(!err.is_exhausted());
        assert_eq!(
            err.to_string(),
            "system allocator failed to provide 1099511627776 bytes"
        );
    }
}
