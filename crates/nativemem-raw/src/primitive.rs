//! Typed reads and writes at an absolute address, one function per width.
//!
//! Every access is unaligned-tolerant (`read_unaligned` /
//! `write_unaligned`) and uses native byte order. Nothing is checked.
//! Booleans are stored as one byte; any non-zero byte reads as `true`.

#![allow(unsafe_code)]

use nativemem_core::{Address, PrimitiveKind};

macro_rules! address_accessors {
    ($($get:ident, $set:ident => $ty:ty;)*) => {$(
        #[doc = concat!("Read a native-order `", stringify!($ty), "` at `address`.")]
        ///
        /// # Safety
        ///
        /// `address` must be valid for reads of the value's width and the
        /// bytes must be initialised. Alignment is not required.
        #[inline]
        pub unsafe fn $get(address: Address) -> $ty {
            // SAFETY: caller guarantees the range is readable.
            unsafe { address.as_ptr::<$ty>().read_unaligned() }
        }

        #[doc = concat!("Write a native-order `", stringify!($ty), "` at `address`.")]
        ///
        /// # Safety
        ///
        /// `address` must be valid for writes of the value's width.
        /// Alignment is not required.
        #[inline]
        pub unsafe fn $set(address: Address, value: $ty) {
            // SAFETY: caller guarantees the range is writable.
            unsafe { address.as_mut_ptr::<$ty>().write_unaligned(value) }
        }
    )*};
}

address_accessors! {
    get_byte, set_byte => i8;
    get_short, set_short => i16;
    get_char, set_char => u16;
    get_int, set_int => i32;
    get_float, set_float => f32;
    get_long, set_long => i64;
    get_double, set_double => f64;
}

/// Read a boolean byte at `address`.
///
/// # Safety
///
/// `address` must be valid for a one-byte read of initialised memory.
#[inline]
pub unsafe fn get_boolean(address: Address) -> bool {
    // SAFETY: caller guarantees the byte is readable; read as u8, never as bool.
    unsafe { address.as_ptr::<u8>().read() != 0 }
}

/// Write a boolean as the byte 0 or 1 at `address`.
///
/// # Safety
///
/// `address` must be valid for a one-byte write.
#[inline]
pub unsafe fn set_boolean(address: Address, value: bool) {
    // SAFETY: caller guarantees the byte is writable.
    unsafe { address.as_mut_ptr::<u8>().write(u8::from(value)) }
}

mod sealed {
    pub trait Sealed {}
}

/// A value the layer can move between Rust and native memory.
///
/// Sealed: implemented exactly for the eight managed primitive types.
/// Generic code over `Primitive` monomorphises to the per-width functions
/// above; there is no runtime width dispatch.
pub trait Primitive: Copy + sealed::Sealed {
    /// The managed kind this type represents.
    const KIND: PrimitiveKind;

    /// Read a value at `address`.
    ///
    /// # Safety
    ///
    /// Same contract as the per-width getter for this type.
    unsafe fn read_at(address: Address) -> Self;

    /// Write this value at `address`.
    ///
    /// # Safety
    ///
    /// Same contract as the per-width setter for this type.
    unsafe fn write_at(self, address: Address);
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident, $get:ident, $set:ident;)*) => {$(
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            #[inline]
            unsafe fn read_at(address: Address) -> Self {
                // SAFETY: forwarded contract.
                unsafe { $get(address) }
            }

            #[inline]
            unsafe fn write_at(self, address: Address) {
                // SAFETY: forwarded contract.
                unsafe { $set(address, self) }
            }
        }
    )*};
}

impl_primitive! {
    i8 => Byte, get_byte, set_byte;
    bool => Boolean, get_boolean, set_boolean;
    i16 => Short, get_short, set_short;
    u16 => Char, get_char, set_char;
    i32 => Int, get_int, set_int;
    f32 => Float, get_float, set_float;
    i64 => Long, get_long, set_long;
    f64 => Double, get_double, set_double;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap;
    use proptest::prelude::*;

    /// Run `f` against a zeroed 32-byte scratch allocation.
    fn with_scratch(f: impl FnOnce(Address)) {
        let a = heap::allocate(32);
        assert!(!a.is_null());
        unsafe { heap::fill(a, 32, 0) };
        f(a);
        unsafe { heap::free(a) };
    }

    #[test]
    fn sixteen_byte_long_scenario() {
        let a = heap::allocate(16);
        unsafe {
            set_long(a, 0x0102_0304_0506_0708);
            set_long(a.offset(8), 0x0102_0304_0506_0708);
            assert_eq!(get_long(a), 0x0102_0304_0506_0708);
            assert_eq!(get_long(a.offset(8)), 0x0102_0304_0506_0708);
            heap::free(a);
        }
    }

    #[test]
    fn unaligned_access_round_trips() {
        with_scratch(|a| unsafe {
            set_double(a.offset(3), -1.5);
            assert_eq!(get_double(a.offset(3)), -1.5);
            set_int(a.offset(17), 0x7eadbeef);
            assert_eq!(get_int(a.offset(17)), 0x7eadbeef);
        });
    }

    #[test]
    fn native_byte_order() {
        with_scratch(|a| unsafe {
            set_int(a, 0x0A0B0C0D);
            let bytes = std::slice::from_raw_parts(a.as_ptr::<u8>(), 4);
            assert_eq!(bytes, &0x0A0B0C0Di32.to_ne_bytes());
        });
    }

    #[test]
    fn boolean_reads_any_nonzero_as_true() {
        with_scratch(|a| unsafe {
            set_byte(a, 2);
            assert!(get_boolean(a));
            set_boolean(a, true);
            assert_eq!(get_byte(a), 1);
            set_boolean(a, false);
            assert_eq!(get_byte(a), 0);
        });
    }

    #[test]
    fn nan_bits_survive() {
        with_scratch(|a| unsafe {
            let nan = f32::from_bits(0x7fc0_0001);
            set_float(a, nan);
            assert_eq!(get_float(a).to_bits(), 0x7fc0_0001);
        });
    }

    #[test]
    fn trait_kinds_match_widths() {
        assert_eq!(<i8 as Primitive>::KIND.size(), 1);
        assert_eq!(<bool as Primitive>::KIND.size(), 1);
        assert_eq!(<u16 as Primitive>::KIND, PrimitiveKind::Char);
        assert_eq!(<f64 as Primitive>::KIND.size(), 8);
    }

    proptest! {
        #[test]
        fn long_round_trip(v in any::<i64>(), off in 0i64..24) {
            with_scratch(|a| unsafe {
                set_long(a.offset(off), v);
                assert_eq!(get_long(a.offset(off)), v);
            });
        }

        #[test]
        fn int_round_trip(v in any::<i32>(), off in 0i64..28) {
            with_scratch(|a| unsafe {
                set_int(a.offset(off), v);
                assert_eq!(get_int(a.offset(off)), v);
            });
        }

        #[test]
        fn short_and_char_round_trip(s in any::<i16>(), c in any::<u16>()) {
            with_scratch(|a| unsafe {
                set_short(a, s);
                set_char(a.offset(5), c);
                assert_eq!(get_short(a), s);
                assert_eq!(get_char(a.offset(5)), c);
            });
        }

        #[test]
        fn byte_and_boolean_round_trip(b in any::<i8>(), z in any::<bool>()) {
            with_scratch(|a| unsafe {
                set_byte(a, b);
                set_boolean(a.offset(1), z);
                assert_eq!(get_byte(a), b);
                assert_eq!(get_boolean(a.offset(1)), z);
            });
        }

        #[test]
        fn float_bits_round_trip(bits in any::<u32>(), dbits in any::<u64>()) {
            with_scratch(|a| unsafe {
                set_float(a, f32::from_bits(bits));
                set_double(a.offset(8), f64::from_bits(dbits));
                assert_eq!(get_float(a).to_bits(), bits);
                assert_eq!(get_double(a.offset(8)).to_bits(), dbits);
            });
        }
    }
}
