//! Native-order primitives inside byte slices, at arbitrary indices.
//!
//! The safe counterpart of [`primitive`](crate::primitive) for memory the
//! caller already holds as `[u8]`: no alignment requirement, slice bounds
//! enforced by indexing.

macro_rules! slice_accessors {
    ($($get:ident, $set:ident => $ty:ty;)*) => {$(
        #[doc = concat!("Read a native-order `", stringify!($ty), "` starting at `bytes[index]`.")]
        ///
        /// # Panics
        ///
        /// Panics if the value would extend past the end of `bytes`.
        #[inline]
        pub fn $get(bytes: &[u8], index: usize) -> $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();
            let mut raw = [0u8; WIDTH];
            raw.copy_from_slice(&bytes[index..index + WIDTH]);
            <$ty>::from_ne_bytes(raw)
        }

        #[doc = concat!("Write a native-order `", stringify!($ty), "` starting at `bytes[index]`.")]
        ///
        /// # Panics
        ///
        /// Panics if the value would extend past the end of `bytes`.
        #[inline]
        pub fn $set(bytes: &mut [u8], index: usize, value: $ty) {
            let raw = value.to_ne_bytes();
            bytes[index..index + raw.len()].copy_from_slice(&raw);
        }
    )*};
}

slice_accessors! {
    get_byte_in_bytes, set_byte_in_bytes => i8;
    get_short_in_bytes, set_short_in_bytes => i16;
    get_char_in_bytes, set_char_in_bytes => u16;
    get_int_in_bytes, set_int_in_bytes => i32;
    get_float_in_bytes, set_float_in_bytes => f32;
    get_long_in_bytes, set_long_in_bytes => i64;
    get_double_in_bytes, set_double_in_bytes => f64;
}

/// Read the boolean byte at `bytes[index]`. Non-zero is `true`.
///
/// # Panics
///
/// Panics if `index` is out of range.
#[inline]
pub fn get_boolean_in_bytes(bytes: &[u8], index: usize) -> bool {
    bytes[index] != 0
}

/// Write a boolean as 0 or 1 at `bytes[index]`.
///
/// # Panics
///
/// Panics if `index` is out of range.
#[inline]
pub fn set_boolean_in_bytes(bytes: &mut [u8], index: usize, value: bool) {
    bytes[index] = u8::from(value);
}
