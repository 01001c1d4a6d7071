//! Arena configuration parameters.

use crate::error::AllocError;
use crate::footprint::Footprint;

/// Configuration for a single [`Arena`](crate::Arena).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing buffer in bytes. Fixed for the arena's lifetime.
    pub capacity: usize,

    /// Alignment of the backing buffer's base address.
    ///
    /// Default: 16. Must be a power of two. Allocation requests may ask for
    /// any alignment up to this value; stricter requests are rejected with
    /// [`AllocError::UnsupportedAlignment`].
    pub base_align: usize,
}

impl ArenaConfig {
    /// Default base alignment, enough for every primitive including `u128`.
    pub const DEFAULT_BASE_ALIGN: usize = 16;

    /// Create a config for a buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            base_align: Self::DEFAULT_BASE_ALIGN,
        }
    }

    /// Create a config with room for exactly `count` values of `footprint`.
    ///
    /// The base alignment is raised to the footprint's alignment when that
    /// is stricter than the default.
    pub fn for_elements(count: usize, footprint: Footprint) -> Result<Self, AllocError> {
        let capacity = footprint.bytes_for(count)?;
        Ok(Self {
            capacity,
            base_align: Self::DEFAULT_BASE_ALIGN.max(footprint.align()),
        })
    }

    /// Override the base alignment.
    pub fn with_base_align(mut self, base_align: usize) -> Self {
        self.base_align = base_align;
        self
    }

    /// Check that the configuration can back an arena.
    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.base_align.is_power_of_two() {
            return Err(AllocError::InvalidAlignment {
                align: self.base_align,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
