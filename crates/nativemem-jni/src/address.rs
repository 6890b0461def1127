//! Typed reads and writes at absolute addresses.
//!
//! Always unchecked, in every mode: each export is one unaligned load or
//! store through [`nativemem_raw::primitive`].

#![allow(unsafe_code)]
#![allow(non_snake_case)]

use jni::objects::JObject;
use jni::sys::{jboolean, jbyte, jchar, jdouble, jfloat, jint, jlong, jshort, JNI_FALSE};
use jni::JNIEnv;
use nativemem_core::Address;
use nativemem_raw::primitive;

macro_rules! address_exports {
    ($($get:ident, $set:ident => $jty:ty : $read:ident / $write:ident;)*) => {$(
        #[doc = concat!("`", stringify!($read), "(long)`: read at an address.")]
        #[no_mangle]
        pub extern "system" fn $get(mut env: JNIEnv<'_>, _this: JObject<'_>, address: jlong) -> $jty {
            jni_guard!(Some(&mut env), Default::default(), {
                // SAFETY: the caller passes a readable address.
                unsafe { primitive::$read(Address(address)) }
            })
        }

        #[doc = concat!("`", stringify!($write), "(long, value)`: write at an address.")]
        #[no_mangle]
        pub extern "system" fn $set(
            mut env: JNIEnv<'_>,
            _this: JObject<'_>,
            address: jlong,
            value: $jty,
        ) {
            jni_guard!(Some(&mut env), (), {
                // SAFETY: the caller passes a writable address.
                unsafe { primitive::$write(Address(address), value) }
            })
        }
    )*};
}

address_exports! {
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1byte__J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1byte__JB
        => jbyte: get_byte / set_byte;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1short__J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1short__JS
        => jshort: get_short / set_short;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1char__J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1char__JC
        => jchar: get_char / set_char;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1int__J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1int__JI
        => jint: get_int / set_int;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1float__J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1float__JF
        => jfloat: get_float / set_float;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1long__J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1long__JJ
        => jlong: get_long / set_long;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1double__J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1double__JD
        => jdouble: get_double / set_double;
}

/// `get_boolean(long)`: read a boolean byte at an address.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1boolean__J(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    address: jlong,
) -> jboolean {
    jni_guard!(Some(&mut env), JNI_FALSE, {
        // SAFETY: the caller passes a readable address.
        jboolean::from(unsafe { primitive::get_boolean(Address(address)) })
    })
}

/// `set_boolean(long, boolean)`: write a boolean byte at an address.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1boolean__JZ(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    address: jlong,
    value: jboolean,
) {
    jni_guard!(Some(&mut env), (), {
        // SAFETY: the caller passes a writable address.
        unsafe { primitive::set_boolean(Address(address), value != JNI_FALSE) }
    })
}
