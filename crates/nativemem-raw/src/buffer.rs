//! Heap and direct byte buffers, and direct-buffer address resolution.
//!
//! A direct buffer owns a native allocation and exposes its base address;
//! a heap buffer lives in Rust-managed memory and has no stable native
//! address to hand out. [`resolve_buffer_address`] mirrors the runtime's
//! `GetDirectBufferAddress`: the base for direct buffers, null otherwise.

#![allow(unsafe_code)]

use nativemem_core::Address;

use crate::heap;

enum Storage {
    Heap(Box<[u8]>),
    Direct { address: Address, capacity: usize },
}

/// A fixed-capacity byte buffer, either heap-backed or direct.
///
/// Contents are zeroed at creation. A direct buffer frees its native
/// memory on drop; addresses resolved from it must not outlive it.
pub struct ByteBuffer {
    storage: Storage,
}

impl ByteBuffer {
    /// Create a heap-backed buffer of `capacity` zero bytes.
    pub fn allocate(capacity: usize) -> Self {
        Self {
            storage: Storage::Heap(vec![0u8; capacity].into_boxed_slice()),
        }
    }

    /// Create a direct buffer of `capacity` zero bytes in native memory.
    ///
    /// Returns `None` if the allocator fails or `capacity` does not fit
    /// in a signed 64-bit size.
    pub fn allocate_direct(capacity: usize) -> Option<Self> {
        let size = i64::try_from(capacity.max(1)).ok()?;
        let address = heap::allocate(size);
        if address.is_null() {
            return None;
        }
        // SAFETY: address was just allocated with `size` bytes.
        unsafe { heap::fill(address, size, 0) };
        Some(Self {
            storage: Storage::Direct { address, capacity },
        })
    }

    /// Whether the buffer is backed by native memory.
    pub fn is_direct(&self) -> bool {
        matches!(self.storage, Storage::Direct { .. })
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Heap(bytes) => bytes.len(),
            Storage::Direct { capacity, .. } => *capacity,
        }
    }

    /// Native base address for a direct buffer, `None` for a heap buffer.
    pub fn direct_address(&self) -> Option<Address> {
        match self.storage {
            Storage::Heap(_) => None,
            Storage::Direct { address, .. } => Some(address),
        }
    }

    /// Buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            Storage::Heap(bytes) => bytes,
            // SAFETY: the allocation is owned, initialised, and at least
            // `capacity` bytes; the borrow ties the slice to `self`.
            Storage::Direct { address, capacity } => unsafe {
                std::slice::from_raw_parts(address.as_ptr::<u8>(), *capacity)
            },
        }
    }

    /// Mutable buffer contents.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Heap(bytes) => bytes,
            // SAFETY: as in `as_slice`, with exclusive access through `&mut self`.
            Storage::Direct { address, capacity } => unsafe {
                std::slice::from_raw_parts_mut(address.as_mut_ptr::<u8>(), *capacity)
            },
        }
    }
}

impl Drop for ByteBuffer {
    fn drop(&mut self) {
        if let Storage::Direct { address, .. } = self.storage {
            // SAFETY: the buffer exclusively owns this allocation.
            unsafe { heap::free(address) };
        }
    }
}

impl std::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("direct", &self.is_direct())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Native base address backing `buffer`.
///
/// Returns [`Address::NULL`] for a heap buffer, matching the runtime's
/// failure signal for non-direct buffers.
pub fn resolve_buffer_address(buffer: &ByteBuffer) -> Address {
    buffer.direct_address().unwrap_or(Address::NULL)
}
