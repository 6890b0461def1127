//! Tracked heap: the opt-in debug accessor.
//!
//! Wraps the unchecked [`heap`](crate::heap) functions with a registry of
//! live allocations. Frees of unknown addresses and accesses that leave
//! their allocation are rejected before they reach the allocator; a
//! repeated free is logged and skipped. Counters and resolved field
//! offsets are kept for diagnostics.
//!
//! All registry updates and the memory operation they guard happen under
//! one lock, so tracked operations are serialised. Mixing tracked and
//! unchecked calls on the same allocation defeats the registry.

#![allow(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::{IndexMap, IndexSet};
use nativemem_core::{AccessError, Address, FieldOffset};
use tracing::{debug, error, info, warn};

use crate::heap;
use crate::primitive::Primitive;

/// Snapshot of tracked-heap counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackedStats {
    /// Allocation requests, including failed ones.
    pub allocations: u64,
    /// Successful frees (explicit or zero-size reallocations).
    pub frees: u64,
    /// Allocations currently live.
    pub live_allocations: usize,
    /// Bytes held by live allocations.
    pub live_bytes: usize,
    /// Repeated frees that were detected and skipped.
    pub double_frees: u64,
}

#[derive(Default)]
struct Registry {
    /// Base address → size in bytes.
    live: BTreeMap<i64, usize>,
    /// Addresses freed and not yet handed out again.
    freed: IndexSet<i64>,
    /// Resolved field offsets → field description.
    field_offsets: IndexMap<i64, String>,
    double_frees: u64,
}

impl Registry {
    /// Base of a live allocation overlapping `[start, start + len)`.
    ///
    /// Zero-size allocations occupy one byte for overlap purposes.
    fn overlapping(&self, address: Address, len: usize) -> Option<Address> {
        let start = address.raw();
        let end = start.saturating_add(len.max(1) as i64);
        if let Some((&base, &size)) = self.live.range(..=start).next_back() {
            if base.saturating_add(size.max(1) as i64) > start {
                return Some(Address(base));
            }
        }
        self.live
            .range(start..end)
            .next()
            .map(|(&base, _)| Address(base))
    }

    fn check_range(&self, address: Address, len: usize) -> Result<(), AccessError> {
        if address.is_null() {
            return Err(AccessError::NullAddress);
        }
        let start = address.raw();
        let Some((&base, &size)) = self.live.range(..=start).next_back() else {
            return Err(AccessError::UnknownAllocation { address });
        };
        let alloc_end = base.saturating_add(size as i64);
        if start > alloc_end {
            return Err(AccessError::UnknownAllocation { address });
        }
        let end = start.saturating_add(len as i64);
        if end > alloc_end {
            return Err(AccessError::OutOfBounds {
                address,
                len,
                allocation: Address(base),
                size,
            });
        }
        Ok(())
    }

    fn insert(&mut self, address: Address, len: usize) {
        self.live.insert(address.raw(), len);
        self.freed.shift_remove(&address.raw());
    }
}

/// Native heap access with an allocation registry.
///
/// Thread-safe: every operation takes the registry lock for its full
/// duration.
pub struct TrackedHeap {
    registry: Mutex<Registry>,
    allocation_count: AtomicU64,
    free_count: AtomicU64,
    check_alignment: bool,
}

impl TrackedHeap {
    /// Create an empty tracked heap without alignment checks.
    pub fn new() -> Self {
        Self::with_alignment_checks(false)
    }

    /// Create an empty tracked heap. When `check_alignment` is set,
    /// typed reads and writes must be naturally aligned.
    pub fn with_alignment_checks(check_alignment: bool) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            allocation_count: AtomicU64::new(0),
            free_count: AtomicU64::new(0),
            check_alignment,
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // A panic while holding the lock leaves the registry usable:
        // every mutation is a single map insert or remove.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate `size` bytes and record the range.
    ///
    /// Allocator failure is `Ok(Address::NULL)`, as in the unchecked
    /// layer. A negative size is rejected. An allocator result that
    /// overlaps a live range is reported and left untracked.
    pub fn allocate(&self, size: i64) -> Result<Address, AccessError> {
        self.allocation_count.fetch_add(1, Ordering::Relaxed);
        let len = usize::try_from(size).map_err(|_| AccessError::SizeOverflow { size })?;
        let mut registry = self.registry();
        let address = heap::allocate(size);
        if address.is_null() {
            warn!(size, "allocation failed");
            return Ok(Address::NULL);
        }
        if let Some(existing) = registry.overlapping(address, len) {
            error!(%address, %existing, size, "allocator returned a range inside a live allocation");
            return Err(AccessError::OverlappingAllocation { address, existing });
        }
        registry.insert(address, len);
        debug!(%address, size, "allocate");
        Ok(address)
    }

    /// Resize a tracked allocation.
    ///
    /// A null `address` allocates. Resizing to zero frees the allocation
    /// and returns null. On allocator failure the original allocation
    /// stays live and `Ok(Address::NULL)` is returned. When the block
    /// moves, the old address counts as freed.
    pub fn reallocate(&self, address: Address, size: i64) -> Result<Address, AccessError> {
        if address.is_null() {
            return self.allocate(size);
        }
        let len = usize::try_from(size).map_err(|_| AccessError::SizeOverflow { size })?;
        let mut registry = self.registry();
        let Some(&old_len) = registry.live.get(&address.raw()) else {
            error!(%address, size, "reallocate of unknown address");
            return Err(AccessError::UnknownAllocation { address });
        };
        if len == 0 {
            registry.live.remove(&address.raw());
            // SAFETY: address is a live allocation owned by this registry.
            unsafe { heap::free(address) };
            registry.freed.insert(address.raw());
            self.free_count.fetch_add(1, Ordering::Relaxed);
            debug!(%address, "reallocate to zero frees");
            return Ok(Address::NULL);
        }
        // SAFETY: address is a live allocation owned by this registry.
        let moved = unsafe { heap::reallocate(address, size) };
        if moved.is_null() {
            warn!(%address, size, "reallocation failed");
            return Ok(Address::NULL);
        }
        registry.live.remove(&address.raw());
        if moved != address {
            registry.freed.insert(address.raw());
        }
        if let Some(existing) = registry.overlapping(moved, len) {
            error!(address = %moved, %existing, size, "allocator returned a range inside a live allocation");
            return Err(AccessError::OverlappingAllocation {
                address: moved,
                existing,
            });
        }
        registry.insert(moved, len);
        debug!(from = %address, to = %moved, old_len, size, "reallocate");
        Ok(moved)
    }

    /// Free a tracked allocation.
    ///
    /// Null is a no-op. A repeated free is logged and skipped
    /// ([`AccessError::DoubleFree`]); an address that is not the base of
    /// a live allocation is rejected without calling the allocator.
    pub fn free(&self, address: Address) -> Result<(), AccessError> {
        if address.is_null() {
            return Ok(());
        }
        let mut registry = self.registry();
        if registry.live.remove(&address.raw()).is_some() {
            // SAFETY: address was a live allocation owned by this registry.
            unsafe { heap::free(address) };
            registry.freed.insert(address.raw());
            self.free_count.fetch_add(1, Ordering::Relaxed);
            debug!(%address, "free");
            return Ok(());
        }
        if registry.freed.contains(&address.raw()) {
            registry.double_frees += 1;
            warn!(%address, "multiple free of address");
            return Err(AccessError::DoubleFree { address });
        }
        error!(%address, "free of address not in known allocations");
        Err(AccessError::UnknownAllocation { address })
    }

    /// Fill `size` bytes at `address` with `value` after a bounds check.
    pub fn fill(&self, address: Address, size: i64, value: i8) -> Result<(), AccessError> {
        let len = usize::try_from(size).map_err(|_| AccessError::SizeOverflow { size })?;
        let registry = self.registry();
        registry.check_range(address, len)?;
        // SAFETY: the range lies inside a live allocation and the lock is held.
        unsafe { heap::fill(address, size, value) };
        Ok(())
    }

    /// Verify `[address, address + len)` lies inside one live allocation.
    pub fn check_range(&self, address: Address, len: usize) -> Result<(), AccessError> {
        self.registry().check_range(address, len)
    }

    fn check_typed<T: Primitive>(&self, address: Address) -> Result<(), AccessError> {
        let align = T::KIND.align();
        if self.check_alignment && address.raw() % align as i64 != 0 {
            return Err(AccessError::Misaligned { address, align });
        }
        Ok(())
    }

    /// Read a value after bounds (and optionally alignment) checks.
    ///
    /// The bytes must have been written before; tracked memory is not
    /// zeroed on allocation.
    pub fn read<T: Primitive>(&self, address: Address) -> Result<T, AccessError> {
        self.check_typed::<T>(address)?;
        let registry = self.registry();
        registry.check_range(address, T::KIND.size())?;
        // SAFETY: the range lies inside a live allocation and the lock is held.
        Ok(unsafe { T::read_at(address) })
    }

    /// Write a value after bounds (and optionally alignment) checks.
    pub fn write<T: Primitive>(&self, address: Address, value: T) -> Result<(), AccessError> {
        self.check_typed::<T>(address)?;
        let registry = self.registry();
        registry.check_range(address, T::KIND.size())?;
        // SAFETY: the range lies inside a live allocation and the lock is held.
        unsafe { value.write_at(address) };
        Ok(())
    }

    /// Remember which field an offset was resolved from.
    pub fn record_field_offset(&self, offset: FieldOffset, field: impl Into<String>) {
        let field = field.into();
        info!(%offset, field = %field, "resolved field offset");
        self.registry().field_offsets.insert(offset.raw(), field);
    }

    /// Description recorded for a resolved field offset.
    pub fn field_for_offset(&self, offset: FieldOffset) -> Option<String> {
        self.registry().field_offsets.get(&offset.raw()).cloned()
    }

    /// Size of the live allocation based at `address`.
    pub fn allocation_size(&self, address: Address) -> Option<usize> {
        self.registry().live.get(&address.raw()).copied()
    }

    /// Live allocations in address order.
    pub fn live_allocations(&self) -> Vec<(Address, usize)> {
        self.registry()
            .live
            .iter()
            .map(|(&base, &size)| (Address(base), size))
            .collect()
    }

    /// Current counters.
    pub fn stats(&self) -> TrackedStats {
        let registry = self.registry();
        TrackedStats {
            allocations: self.allocation_count.load(Ordering::Relaxed),
            frees: self.free_count.load(Ordering::Relaxed),
            live_allocations: registry.live.len(),
            live_bytes: registry.live.values().sum(),
            double_frees: registry.double_frees,
        }
    }
}

impl Default for TrackedHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackedHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stats();
        write!(
            f,
            "TrackedHeap [allocations={}, frees={}, live={} ({} bytes), double_frees={}]",
            s.allocations, s.frees, s.live_allocations, s.live_bytes, s.double_frees
        )
    }
}
