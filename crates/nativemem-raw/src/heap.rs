//! Allocate, reallocate, free, and fill on the process heap.
//!
//! Each function forwards to the C allocator (`malloc`, `realloc`,
//! `free`) or a byte fill. Sizes arrive as signed 64-bit integers; a
//! negative size is treated as an allocation the allocator cannot
//! satisfy.

#![allow(unsafe_code)]

use libc::c_void;
use nativemem_core::Address;

fn to_size(size: i64) -> Option<usize> {
    usize::try_from(size).ok()
}

/// Request `size` bytes from the system allocator.
///
/// Returns [`Address::NULL`] when the allocator fails or `size` is
/// negative. The memory is uninitialised. `allocate(0)` returns either
/// null or a unique address that must still be passed to [`free`].
#[inline]
pub fn allocate(size: i64) -> Address {
    let Some(size) = to_size(size) else {
        return Address::NULL;
    };
    // SAFETY: malloc accepts any size and reports failure with null.
    let ptr = unsafe { libc::malloc(size) };
    Address::from_ptr(ptr as *const c_void)
}

/// Resize an allocation, possibly moving it.
///
/// On success the old address must no longer be used. On failure returns
/// [`Address::NULL`] and the original allocation stays valid. A negative
/// size fails without touching the allocation. A null `address` behaves
/// like [`allocate`]. Resizing to zero is allocator-defined.
///
/// # Safety
///
/// `address` must be null or a live address returned by [`allocate`] or
/// [`reallocate`].
#[inline]
pub unsafe fn reallocate(address: Address, size: i64) -> Address {
    let Some(size) = to_size(size) else {
        return Address::NULL;
    };
    // SAFETY: caller guarantees address is null or a live malloc'd block.
    let ptr = unsafe { libc::realloc(address.as_mut_ptr::<c_void>(), size) };
    Address::from_ptr(ptr as *const c_void)
}

/// Release an allocation. Freeing null is a no-op.
///
/// # Safety
///
/// `address` must be null or a live address returned by [`allocate`] or
/// [`reallocate`]. Freeing twice is undefined behaviour.
#[inline]
pub unsafe fn free(address: Address) {
    // SAFETY: caller guarantees address is null or a live malloc'd block.
    unsafe { libc::free(address.as_mut_ptr::<c_void>()) }
}

/// Write `value` into `size` consecutive bytes starting at `address`.
///
/// A negative size writes nothing.
///
/// # Safety
///
/// `address` must be valid for writes of `size` bytes.
#[inline]
pub unsafe fn fill(address: Address, size: i64, value: i8) {
    let Some(size) = to_size(size) else {
        return;
    };
    // SAFETY: caller guarantees the range is writable; u8 has no alignment.
    unsafe { std::ptr::write_bytes(address.as_mut_ptr::<u8>(), value as u8, size) }
}
