//! Canary-guarded allocations over the unchecked heap.

#![allow(unsafe_code)]

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use nativemem_core::Address;
use nativemem_raw::heap;

/// Byte written into both guard zones.
pub const CANARY: u8 = 0xA5;

/// Width of each guard zone in bytes.
pub const CANARY_LEN: usize = 16;

/// Which guard zone was overwritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardSide {
    Leading,
    Trailing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardViolation {
    /// The address was not handed out by this heap, or was already freed.
    Unknown { address: Address },
    /// A canary byte changed.
    Corrupted {
        address: Address,
        side: GuardSide,
        index: usize,
        found: u8,
    },
}

impl fmt::Display for GuardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { address } => write!(f, "{address} is not a guarded allocation"),
            Self::Corrupted {
                address,
                side,
                index,
                found,
            } => write!(
                f,
                "{side:?} canary byte {index} of {address} is {found:#04x}, expected {CANARY:#04x}"
            ),
        }
    }
}

impl Error for GuardViolation {}

/// Heap whose allocations carry a [`CANARY_LEN`]-byte guard zone on each
/// side. Addresses handed out point past the leading zone.
///
/// Blocks still live when the heap drops are released without checking.
#[derive(Default)]
pub struct GuardedHeap {
    /// User address → user size.
    blocks: HashMap<i64, usize>,
}

impl GuardedHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `size` usable bytes.
    ///
    /// # Panics
    ///
    /// If the system allocator fails.
    pub fn allocate(&mut self, size: usize) -> Address {
        let base = heap::allocate((size + 2 * CANARY_LEN) as i64);
        assert!(!base.is_null(), "allocation of {size} guarded bytes failed");
        let user = base.offset(CANARY_LEN as i64);
        // SAFETY: the block was just allocated with room for both zones.
        unsafe { write_canaries(base, size) };
        self.blocks.insert(user.raw(), size);
        user
    }

    /// Resize a guarded allocation, preserving its contents and moving the
    /// trailing guard. The old guards are verified first.
    pub fn reallocate(&mut self, address: Address, size: usize) -> Result<Address, GuardViolation> {
        self.verify(address)?;
        let base = address.offset(-(CANARY_LEN as i64));
        // SAFETY: base is the live block behind a verified guarded address.
        let moved = unsafe { heap::reallocate(base, (size + 2 * CANARY_LEN) as i64) };
        assert!(!moved.is_null(), "reallocation to {size} guarded bytes failed");
        self.blocks.remove(&address.raw());
        // SAFETY: realloc returned a block with room for both zones; the
        // leading zone moved along with the contents.
        unsafe { write_canaries(moved, size) };
        let user = moved.offset(CANARY_LEN as i64);
        self.blocks.insert(user.raw(), size);
        Ok(user)
    }

    /// Usable size of a guarded allocation.
    pub fn size_of(&self, address: Address) -> Option<usize> {
        self.blocks.get(&address.raw()).copied()
    }

    /// Check both guard zones of one allocation.
    pub fn verify(&self, address: Address) -> Result<(), GuardViolation> {
        let size = self
            .size_of(address)
            .ok_or(GuardViolation::Unknown { address })?;
        let base = address.offset(-(CANARY_LEN as i64));
        // SAFETY: both zones belong to the live guarded block.
        let (leading, trailing) = unsafe {
            (
                std::slice::from_raw_parts(base.as_ptr::<u8>(), CANARY_LEN),
                std::slice::from_raw_parts(address.offset(size as i64).as_ptr::<u8>(), CANARY_LEN),
            )
        };
        for (side, zone) in [(GuardSide::Leading, leading), (GuardSide::Trailing, trailing)] {
            if let Some(index) = zone.iter().position(|&b| b != CANARY) {
                return Err(GuardViolation::Corrupted {
                    address,
                    side,
                    index,
                    found: zone[index],
                });
            }
        }
        Ok(())
    }

    /// Check every live allocation.
    pub fn verify_all(&self) -> Result<(), GuardViolation> {
        self.blocks
            .keys()
            .try_for_each(|&address| self.verify(Address(address)))
    }

    /// Verify and release an allocation. The block is released even when
    /// verification fails.
    pub fn free(&mut self, address: Address) -> Result<(), GuardViolation> {
        let verdict = self.verify(address);
        if self.blocks.remove(&address.raw()).is_some() {
            // SAFETY: the block was live in this heap and is now forgotten.
            unsafe { heap::free(address.offset(-(CANARY_LEN as i64))) };
        }
        verdict
    }

    /// Number of live guarded allocations.
    pub fn live(&self) -> usize {
        self.blocks.len()
    }
}

impl Drop for GuardedHeap {
    fn drop(&mut self) {
        for (&address, _) in self.blocks.iter() {
            // SAFETY: every tracked block is live and owned by this heap.
            unsafe { heap::free(Address(address).offset(-(CANARY_LEN as i64))) };
        }
    }
}

/// # Safety
///
/// `base` must be writable for `size + 2 * CANARY_LEN` bytes.
unsafe fn write_canaries(base: Address, size: usize) {
    // SAFETY: forwarded contract.
    unsafe {
        heap::fill(base, CANARY_LEN as i64, CANARY as i8);
        heap::fill(
            base.offset((CANARY_LEN + size) as i64),
            CANARY_LEN as i64,
            CANARY as i8,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_allocation_verifies() {
        let mut h = GuardedHeap::new();
        let a = h.allocate(8);
        assert!(h.verify(a).is_ok());
        assert!(h.free(a).is_ok());
        assert_eq!(h.live(), 0);
    }

    #[test]
    fn trailing_overrun_detected() {
        let mut h = GuardedHeap::new();
        let a = h.allocate(4);
        unsafe { heap::fill(a, 5, 0) };
        assert_eq!(
            h.verify(a),
            Err(GuardViolation::Corrupted {
                address: a,
                side: GuardSide::Trailing,
                index: 0,
                found: 0,
            })
        );
        assert!(h.free(a).is_err());
    }

    #[test]
    fn leading_underrun_detected() {
        let mut h = GuardedHeap::new();
        let a = h.allocate(4);
        unsafe { heap::fill(a.offset(-1), 1, 7) };
        assert!(matches!(
            h.verify(a),
            Err(GuardViolation::Corrupted {
                side: GuardSide::Leading,
                index: 15,
                ..
            })
        ));
        let _ = h.free(a);
    }

    #[test]
    fn reallocate_keeps_contents_and_guards() {
        let mut h = GuardedHeap::new();
        let a = h.allocate(4);
        unsafe { heap::fill(a, 4, 9) };
        let b = h.reallocate(a, 64).unwrap();
        assert_eq!(h.size_of(b), Some(64));
        assert!(h.verify(b).is_ok());
        let first = unsafe { std::slice::from_raw_parts(b.as_ptr::<u8>(), 4) };
        assert_eq!(first, &[9, 9, 9, 9]);
        h.free(b).unwrap();
    }

    #[test]
    fn unknown_address() {
        let mut h = GuardedHeap::new();
        assert_eq!(
            h.free(Address(0x1000)),
            Err(GuardViolation::Unknown { address: Address(0x1000) })
        );
    }
}
