//! Mode-selected heap accessor.

#![allow(unsafe_code)]

use nativemem_core::{AccessError, Address, FieldOffset};

use crate::config::{AccessMode, AccessorConfig};
use crate::heap;
use crate::tracked::TrackedHeap;

/// Heap operations routed either straight to the allocator or through a
/// [`TrackedHeap`], chosen once from [`AccessorConfig::mode`].
///
/// Only allocate, reallocate, free, fill, and offset bookkeeping go
/// through here. Typed address reads and writes always use the unchecked
/// [`primitive`](crate::primitive) functions.
pub enum NativeMemory {
    /// Direct forwarding.
    Unchecked,
    /// Registry-checked forwarding.
    Tracked(TrackedHeap),
}

impl NativeMemory {
    /// Build the accessor selected by `config`.
    pub fn new(config: &AccessorConfig) -> Self {
        match config.mode {
            AccessMode::Unchecked => Self::Unchecked,
            AccessMode::Tracked => {
                Self::Tracked(TrackedHeap::with_alignment_checks(config.check_alignment))
            }
        }
    }

    /// The active mode.
    pub fn mode(&self) -> AccessMode {
        match self {
            Self::Unchecked => AccessMode::Unchecked,
            Self::Tracked(_) => AccessMode::Tracked,
        }
    }

    /// The tracked heap, when in tracked mode.
    pub fn tracked(&self) -> Option<&TrackedHeap> {
        match self {
            Self::Unchecked => None,
            Self::Tracked(heap) => Some(heap),
        }
    }

    /// Allocate `size` bytes. Failure is `Ok(Address::NULL)` in both modes.
    #[inline]
    pub fn allocate(&self, size: i64) -> Result<Address, AccessError> {
        match self {
            Self::Unchecked => Ok(heap::allocate(size)),
            Self::Tracked(tracked) => tracked.allocate(size),
        }
    }

    /// Resize an allocation.
    ///
    /// # Safety
    ///
    /// In unchecked mode, the [`heap::reallocate`] contract applies.
    #[inline]
    pub unsafe fn reallocate(&self, address: Address, size: i64) -> Result<Address, AccessError> {
        match self {
            // SAFETY: forwarded contract.
            Self::Unchecked => Ok(unsafe { heap::reallocate(address, size) }),
            Self::Tracked(tracked) => tracked.reallocate(address, size),
        }
    }

    /// Release an allocation.
    ///
    /// # Safety
    ///
    /// In unchecked mode, the [`heap::free`] contract applies.
    #[inline]
    pub unsafe fn free(&self, address: Address) -> Result<(), AccessError> {
        match self {
            Self::Unchecked => {
                // SAFETY: forwarded contract.
                unsafe { heap::free(address) };
                Ok(())
            }
            Self::Tracked(tracked) => tracked.free(address),
        }
    }

    /// Fill `size` bytes at `address` with `value`.
    ///
    /// # Safety
    ///
    /// In unchecked mode, the [`heap::fill`] contract applies.
    #[inline]
    pub unsafe fn fill(&self, address: Address, size: i64, value: i8) -> Result<(), AccessError> {
        match self {
            Self::Unchecked => {
                // SAFETY: forwarded contract.
                unsafe { heap::fill(address, size, value) };
                Ok(())
            }
            Self::Tracked(tracked) => tracked.fill(address, size, value),
        }
    }

    /// Record a resolved field offset. Builds the description only in
    /// tracked mode.
    #[inline]
    pub fn record_field_offset(&self, offset: FieldOffset, describe: impl FnOnce() -> String) {
        if let Self::Tracked(tracked) = self {
            tracked.record_field_offset(offset, describe());
        }
    }
}
