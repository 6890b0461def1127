//! Heap lifecycle exports and direct-buffer address resolution.
//!
//! In unchecked mode each export is a single allocator call. In tracked
//! mode rejected operations raise a Java exception, except repeated
//! frees, which are logged and skipped.

#![allow(unsafe_code)]
#![allow(non_snake_case)]

use jni::objects::{JByteBuffer, JObject};
use jni::sys::{jbyte, jlong};
use jni::JNIEnv;
use nativemem_core::{AccessError, Address};

use crate::env::RawEnv;
use crate::native_memory;
use crate::status::throw_access_error;

/// Map a tracked-heap result to its JNI return value, raising rejections.
fn settle<T>(env: &mut JNIEnv<'_>, result: Result<T, AccessError>, rejected: T) -> T {
    match result {
        Ok(value) => value,
        Err(AccessError::DoubleFree { .. }) => rejected,
        Err(e) => {
            throw_access_error(env, &e);
            rejected
        }
    }
}

/// `getDirectByteBufferAddress(ByteBuffer)`: native base of a direct
/// buffer, 0 for a heap buffer.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_getDirectByteBufferAddress(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    buffer: JByteBuffer<'_>,
) -> jlong {
    jni_guard!(Some(&mut env), 0, {
        // SAFETY: `buffer` is a live local reference for this call.
        let raw = unsafe { RawEnv::new(&env) };
        raw.direct_buffer_address(buffer.as_raw()).raw()
    })
}

/// `allocateMemory(long)`: 0 when the allocator fails.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_allocateMemory(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    size: jlong,
) -> jlong {
    jni_guard!(Some(&mut env), 0, {
        let result = native_memory().allocate(size).map(Address::raw);
        settle(&mut env, result, 0)
    })
}

/// `reallocateMemory(long, long)`: 0 when the allocator fails.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_reallocateMemory(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    address: jlong,
    size: jlong,
) -> jlong {
    jni_guard!(Some(&mut env), 0, {
        // SAFETY: the caller passes null or a live allocation.
        let result = unsafe { native_memory().reallocate(Address(address), size) };
        settle(&mut env, result.map(Address::raw), 0)
    })
}

/// `freeMemory(long)`.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_freeMemory(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    address: jlong,
) {
    jni_guard!(Some(&mut env), (), {
        // SAFETY: the caller passes null or a live allocation.
        let result = unsafe { native_memory().free(Address(address)) };
        settle(&mut env, result, ())
    })
}

/// `fillMemory(long, long, byte)`.
#[no_mangle]
pub extern "system" fn Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_fillMemory(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    address: jlong,
    size: jlong,
    value: jbyte,
) {
    jni_guard!(Some(&mut env), (), {
        // SAFETY: the caller passes a range writable for `size` bytes.
        let result = unsafe { native_memory().fill(Address(address), size, value) };
        settle(&mut env, result, ())
    })
}
