//! Object field exports: typed get/set through a field offset, and
//! reflected-field resolution.

#![allow(unsafe_code)]
#![allow(non_snake_case)]

use jni::objects::{JObject, JString};
use jni::sys::{
    jboolean, jbyte, jchar, jdouble, jfloat, jint, jlong, jobject, jshort, JNI_FALSE,
};
use jni::JNIEnv;
use nativemem_core::{FieldAccess, FieldOffset};
use tracing::debug;

use crate::env::RawEnv;
use crate::native_memory;

macro_rules! field_exports {
    ($($get:ident, $set:ident => $jty:ty : $read:ident / $write:ident;)*) => {$(
        #[doc = concat!("`", stringify!($read), "(Object, long)`: read a field.")]
        #[no_mangle]
        pub extern "system" fn $get(
            mut env: JNIEnv<'_>,
            _this: JObject<'_>,
            target: JObject<'_>,
            field_id: jlong,
        ) -> $jty {
            jni_guard!(Some(&mut env), Default::default(), {
                // SAFETY: the caller passes an offset resolved from a field
                // of the target's class with this width.
                let raw = unsafe { RawEnv::new(&env) };
                raw.$read(target.as_raw(), FieldOffset(field_id))
            })
        }

        #[doc = concat!("`", stringify!($write), "(Object, long, value)`: write a field.")]
        #[no_mangle]
        pub extern "system" fn $set(
            mut env: JNIEnv<'_>,
            _this: JObject<'_>,
            target: JObject<'_>,
            field_id: jlong,
            value: $jty,
        ) {
            jni_guard!(Some(&mut env), (), {
                // SAFETY: as for the getter.
                let raw = unsafe { RawEnv::new(&env) };
                raw.$write(target.as_raw(), FieldOffset(field_id), value)
            })
        }
    )*};
}

field_exports! {
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1byte__Ljava_lang_Object_2J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1byte__Ljava_lang_Object_2JB
        => jbyte: get_byte / set_byte;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1short__Ljava_lang_Object_2J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1short__Ljava_lang_Object_2JS
        => jshort: get_short / set_short;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1char__Ljava_lang_Object_2J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1char__Ljava_lang_Object_2JC
        => jchar: get_char / set_char;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1int__Ljava_lang_Object_2J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1int__Ljava_lang_Object_2JI
        => jint: get_int / set_int;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1float__Ljava_lang_Object_2J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1float__Ljava_lang_Object_2JF
        => jfloat: get_float / set_float;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1long__Ljava_lang_Object_2J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1long__Ljava_lang_Object_2JJ
        => jlong: get_long / set_long;
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1double__Ljava_lang_Object_2J,
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1double__Ljava_lang_Object_2JD
        => jdouble: get_double / set_double;
}

/// `get_boolean(Object, long)`.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1boolean__Ljava_lang_Object_2J(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    target: JObject<'_>,
    field_id: jlong,
) -> jboolean {
    jni_guard!(Some(&mut env), JNI_FALSE, {
        // SAFETY: the caller passes a boolean field offset of the target's class.
        let raw = unsafe { RawEnv::new(&env) };
        jboolean::from(raw.get_boolean(target.as_raw(), FieldOffset(field_id)))
    })
}

/// `set_boolean(Object, long, boolean)`.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1boolean__Ljava_lang_Object_2JZ(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    target: JObject<'_>,
    field_id: jlong,
    value: jboolean,
) {
    jni_guard!(Some(&mut env), (), {
        // SAFETY: the caller passes a boolean field offset of the target's class.
        let raw = unsafe { RawEnv::new(&env) };
        raw.set_boolean(target.as_raw(), FieldOffset(field_id), value != JNI_FALSE)
    })
}

/// `getObject(Object, long)`: a new local reference, or null.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_getObject(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    target: JObject<'_>,
    field_id: jlong,
) -> jobject {
    jni_guard!(Some(&mut env), std::ptr::null_mut(), {
        // SAFETY: the caller passes a reference field offset of the target's class.
        let raw = unsafe { RawEnv::new(&env) };
        raw.get_object(target.as_raw(), FieldOffset(field_id))
    })
}

/// `setObject(Object, long, Object)`.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_setObject(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    target: JObject<'_>,
    field_id: jlong,
    value: JObject<'_>,
) {
    jni_guard!(Some(&mut env), (), {
        // SAFETY: the caller passes a reference field offset of the
        // target's class and an assignable value.
        let raw = unsafe { RawEnv::new(&env) };
        raw.set_object(target.as_raw(), FieldOffset(field_id), value.as_raw())
    })
}

/// `objectFieldOffset(Field)`: the field's `jfieldID` as a long.
///
/// In tracked mode the offset is recorded together with the field's
/// `toString()` for later diagnostics.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_objectFieldOffset(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    field: JObject<'_>,
) -> jlong {
    jni_guard!(Some(&mut env), 0, {
        // SAFETY: the caller passes a java.lang.reflect.Field.
        let raw = unsafe { RawEnv::new(&env) };
        let offset = raw.object_field_offset(field.as_raw());
        native_memory().record_field_offset(offset, || describe_field(&mut env, &field));
        offset.raw()
    })
}

/// `field.toString()`, or a placeholder when the call fails.
fn describe_field(env: &mut JNIEnv<'_>, field: &JObject<'_>) -> String {
    let described = env
        .call_method(field, "toString", "()Ljava/lang/String;", &[])
        .and_then(|value| value.l())
        .and_then(|object| {
            let text = JString::from(object);
            let owned: String = env.get_string(&text)?.into();
            Ok(owned)
        });
    match described {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "field description unavailable");
            let _ = env.exception_clear();
            "<unknown field>".to_string()
        }
    }
}
