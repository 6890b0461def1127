//! Field access through the raw JNI function table.
//!
//! Offsets are `jfieldID`s carried as `jlong`. Each accessor is a single
//! function-table call: no exception checks, no local-frame management.

#![allow(unsafe_code)]

use std::marker::PhantomData;

use jni::sys::{self, jboolean, jfieldID, jobject, JNI_FALSE};
use jni::JNIEnv;
use nativemem_core::{Address, FieldAccess, FieldOffset};

/// Borrowed JNI environment implementing [`FieldAccess`].
///
/// Targets, references, and reflected fields are raw `jobject`s valid in
/// the current local frame.
#[derive(Clone, Copy)]
pub struct RawEnv<'env> {
    raw: *mut sys::JNIEnv,
    _env: PhantomData<&'env ()>,
}

/// Call an entry of the JNI function table.
macro_rules! jni_call {
    ($env:expr, $name:ident ( $($arg:expr),* $(,)? )) => {{
        let raw = $env.raw;
        // SAFETY: `raw` is the live environment of the current thread;
        // the table is populated by the JVM before native code runs.
        let table = unsafe { &**raw };
        match table.$name {
            // SAFETY: argument validity is the contract of `RawEnv::new`.
            Some(f) => unsafe { f(raw, $($arg),*) },
            None => panic!(concat!("JNI function table has no ", stringify!($name))),
        }
    }};
}

fn field_id(offset: FieldOffset) -> jfieldID {
    offset.raw() as jfieldID
}

impl<'env> RawEnv<'env> {
    /// Wrap the environment of a JNI call.
    ///
    /// # Safety
    ///
    /// For as long as the wrapper is used, every target passed to its
    /// [`FieldAccess`] methods must be a live object reference, every
    /// offset a `jfieldID` of an instance field declared by the target's
    /// class with the width of the accessor used, every reflected field a
    /// `java.lang.reflect.Field`, and every reference value assignable to
    /// the field. Violations are undefined behaviour.
    pub unsafe fn new(env: &JNIEnv<'env>) -> Self {
        Self {
            raw: env.get_raw(),
            _env: PhantomData,
        }
    }

    /// Native base address of a direct `java.nio.ByteBuffer`, or null
    /// when `buffer` is not direct.
    pub fn direct_buffer_address(&self, buffer: jobject) -> Address {
        let ptr = jni_call!(self, GetDirectBufferAddress(buffer));
        Address::from_ptr(ptr as *const u8)
    }
}

fn to_jboolean(value: bool) -> jboolean {
    jboolean::from(value)
}

macro_rules! env_accessors {
    ($($get:ident / $set:ident : $ty:ty => $jget:ident / $jset:ident),* $(,)?) => {$(
        fn $get(&self, target: Self::Target<'_>, offset: FieldOffset) -> $ty {
            jni_call!(self, $jget(target, field_id(offset)))
        }

        fn $set(&self, target: Self::Target<'_>, offset: FieldOffset, value: $ty) {
            jni_call!(self, $jset(target, field_id(offset), value))
        }
    )*};
}

impl FieldAccess for RawEnv<'_> {
    type Target<'a> = jobject;
    type Reference = jobject;
    type Field<'a> = jobject;

    env_accessors! {
        get_byte / set_byte: i8 => GetByteField / SetByteField,
        get_short / set_short: i16 => GetShortField / SetShortField,
        get_char / set_char: u16 => GetCharField / SetCharField,
        get_int / set_int: i32 => GetIntField / SetIntField,
        get_float / set_float: f32 => GetFloatField / SetFloatField,
        get_long / set_long: i64 => GetLongField / SetLongField,
        get_double / set_double: f64 => GetDoubleField / SetDoubleField,
    }

    fn get_boolean(&self, target: jobject, offset: FieldOffset) -> bool {
        jni_call!(self, GetBooleanField(target, field_id(offset))) != JNI_FALSE
    }

    fn set_boolean(&self, target: jobject, offset: FieldOffset, value: bool) {
        jni_call!(self, SetBooleanField(target, field_id(offset), to_jboolean(value)))
    }

    fn get_object(&self, target: jobject, offset: FieldOffset) -> jobject {
        jni_call!(self, GetObjectField(target, field_id(offset)))
    }

    fn set_object(&self, target: jobject, offset: FieldOffset, value: jobject) {
        jni_call!(self, SetObjectField(target, field_id(offset), value))
    }

    fn object_field_offset(&self, field: jobject) -> FieldOffset {
        FieldOffset(jni_call!(self, FromReflectedField(field)) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_id_round_trips_through_offset() {
        let id = field_id(FieldOffset(0x7f00_1234));
        assert_eq!(id as i64, 0x7f00_1234);
    }

    #[test]
    fn boolean_encoding() {
        assert_eq!(to_jboolean(true), 1);
        assert_eq!(to_jboolean(false), JNI_FALSE);
    }
}
