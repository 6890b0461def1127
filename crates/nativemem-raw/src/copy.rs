//! Bulk copies between native memory and Rust slices.

#![allow(unsafe_code)]

use nativemem_core::Address;

use crate::primitive::Primitive;

/// Copy `len` bytes from `source` to `target`. The ranges may overlap.
///
/// A negative length copies nothing.
///
/// # Safety
///
/// `source` must be readable and `target` writable for `len` bytes.
#[inline]
pub unsafe fn copy_range(source: Address, target: Address, len: i64) {
    let Ok(len) = usize::try_from(len) else {
        return;
    };
    // SAFETY: caller guarantees both ranges; `copy` handles overlap.
    unsafe { std::ptr::copy(source.as_ptr::<u8>(), target.as_mut_ptr::<u8>(), len) }
}

/// Fill `target` with consecutive native-order values read from `source`.
///
/// Reads are unaligned. Booleans read any non-zero byte as `true`.
///
/// # Safety
///
/// `source` must be readable for `target.len() * size_of::<T>()` bytes
/// of initialised memory.
pub unsafe fn copy_range_to_slice<T: Primitive>(source: Address, target: &mut [T]) {
    let width = T::KIND.size() as i64;
    let mut at = source;
    for slot in target.iter_mut() {
        // SAFETY: `at` stays inside the range the caller vouched for.
        *slot = unsafe { T::read_at(at) };
        at = at.offset(width);
    }
}

/// Write the values of `source` consecutively starting at `target`.
///
/// Writes are unaligned. Booleans are written as 0 or 1.
///
/// # Safety
///
/// `target` must be writable for `source.len() * size_of::<T>()` bytes.
pub unsafe fn copy_slice_to_address<T: Primitive>(source: &[T], target: Address) {
    let width = T::KIND.size() as i64;
    let mut at = target;
    for value in source {
        // SAFETY: `at` stays inside the range the caller vouched for.
        unsafe { value.write_at(at) };
        at = at.offset(width);
    }
}
