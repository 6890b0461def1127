//! Drives the exports through a hand-built JNI function table.

use std::cell::RefCell;
use std::ffi::c_void;

use jni::objects::{JByteBuffer, JObject};
use jni::sys::{self, jboolean, jfieldID, jint, jlong, jobject, JNINativeInterface_};
use jni::JNIEnv;
use nativemem_core::{FieldAccess, FieldOffset};
use nativemem_jni::address::*;
use nativemem_jni::env::RawEnv;
use nativemem_jni::field::*;
use nativemem_jni::memory::*;

thread_local! {
    static WRITES: RefCell<Vec<(i64, i64, i64)>> = const { RefCell::new(Vec::new()) };
}

unsafe extern "system" fn get_int_field(_: *mut sys::JNIEnv, obj: jobject, id: jfieldID) -> jint {
    (obj as i64 * 10 + id as i64) as jint
}

unsafe extern "system" fn set_long_field(
    _: *mut sys::JNIEnv,
    obj: jobject,
    id: jfieldID,
    value: jlong,
) {
    WRITES.with(|w| w.borrow_mut().push((obj as i64, id as i64, value)));
}

unsafe extern "system" fn get_boolean_field(_: *mut sys::JNIEnv, _: jobject, _: jfieldID) -> jboolean {
    2
}

unsafe extern "system" fn get_object_field(_: *mut sys::JNIEnv, obj: jobject, _: jfieldID) -> jobject {
    obj
}

unsafe extern "system" fn from_reflected_field(_: *mut sys::JNIEnv, field: jobject) -> jfieldID {
    (field as i64 + 0x100) as jfieldID
}

unsafe extern "system" fn get_direct_buffer_address(_: *mut sys::JNIEnv, buf: jobject) -> *mut c_void {
    if buf as i64 == 0x1 {
        std::ptr::null_mut()
    } else {
        buf as *mut c_void
    }
}

/// Owns the function table and the pointer a `JNIEnv*` points at.
struct FakeVm {
    _table: Box<JNINativeInterface_>,
    iface: Box<*const JNINativeInterface_>,
}

impl FakeVm {
    fn new() -> Self {
        // SAFETY: every entry is an Option of a fn pointer or a raw pointer;
        // all-zero is None / null.
        let mut table: Box<JNINativeInterface_> = Box::new(unsafe { std::mem::zeroed() });
        table.GetIntField = Some(get_int_field);
        table.SetLongField = Some(set_long_field);
        table.GetBooleanField = Some(get_boolean_field);
        table.GetObjectField = Some(get_object_field);
        table.FromReflectedField = Some(from_reflected_field);
        table.GetDirectBufferAddress = Some(get_direct_buffer_address);
        let iface = Box::new(&*table as *const JNINativeInterface_);
        Self {
            _table: table,
            iface,
        }
    }

    fn env(&self) -> JNIEnv<'static> {
        let raw = &*self.iface as *const *const JNINativeInterface_ as *mut sys::JNIEnv;
        // SAFETY: the table outlives every env handed out in a test.
        unsafe { JNIEnv::from_raw(raw) }.unwrap()
    }
}

fn object(raw: i64) -> JObject<'static> {
    // SAFETY: the fake table never dereferences object handles.
    unsafe { JObject::from_raw(raw as jobject) }
}

#[test]
fn load_hook_reports_jni_1_8() {
    let version = nativemem_jni::JNI_OnLoad(std::ptr::null_mut(), std::ptr::null_mut());
    assert_eq!(version, sys::JNI_VERSION_1_8);
}

#[test]
fn raw_env_forwards_target_and_field_id() {
    let vm = FakeVm::new();
    let env = vm.env();
    let raw = unsafe { RawEnv::new(&env) };
    assert_eq!(raw.get_int(7 as jobject, FieldOffset(3)), 73);

    raw.set_long(9 as jobject, FieldOffset(16), -5);
    WRITES.with(|w| assert_eq!(w.borrow().last(), Some(&(9, 16, -5))));
}

#[test]
fn raw_env_batch_offsets_preserve_order() {
    let vm = FakeVm::new();
    let env = vm.env();
    let raw = unsafe { RawEnv::new(&env) };
    let fields = [1 as jobject, 2 as jobject, 3 as jobject];
    assert_eq!(
        raw.object_field_offsets(&fields),
        vec![FieldOffset(0x101), FieldOffset(0x102), FieldOffset(0x103)]
    );
}

#[test]
fn field_exports_go_through_the_table() {
    let vm = FakeVm::new();
    let v = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1int__Ljava_lang_Object_2J(
        vm.env(),
        JObject::null(),
        object(4),
        2,
    );
    assert_eq!(v, 42);

    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1long__Ljava_lang_Object_2JJ(
        vm.env(),
        JObject::null(),
        object(5),
        24,
        i64::MIN,
    );
    WRITES.with(|w| assert_eq!(w.borrow().last(), Some(&(5, 24, i64::MIN))));
}

#[test]
fn boolean_field_is_normalised() {
    let vm = FakeVm::new();
    let v = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1boolean__Ljava_lang_Object_2J(
        vm.env(),
        JObject::null(),
        object(4),
        8,
    );
    assert_eq!(v, 1);
}

#[test]
fn get_object_returns_the_table_result() {
    let vm = FakeVm::new();
    let v = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_getObject(
        vm.env(),
        JObject::null(),
        object(0x40),
        8,
    );
    assert_eq!(v as i64, 0x40);
}

#[test]
fn object_field_offset_is_the_field_id() {
    let vm = FakeVm::new();
    let offset = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_objectFieldOffset(
        vm.env(),
        JObject::null(),
        object(0x20),
    );
    assert_eq!(offset, 0x120);
}

#[test]
fn heap_buffer_resolves_to_zero() {
    let vm = FakeVm::new();
    let heap = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_getDirectByteBufferAddress(
        vm.env(),
        JObject::null(),
        JByteBuffer::from(object(0x1)),
    );
    assert_eq!(heap, 0);

    let direct = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_getDirectByteBufferAddress(
        vm.env(),
        JObject::null(),
        JByteBuffer::from(object(0x8000)),
    );
    assert_eq!(direct, 0x8000);
}

#[test]
fn sixteen_byte_scenario_through_the_exports() {
    let vm = FakeVm::new();
    let a = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_allocateMemory(
        vm.env(),
        JObject::null(),
        16,
    );
    assert_ne!(a, 0);
    for at in [a, a + 8] {
        Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1long__JJ(
            vm.env(),
            JObject::null(),
            at,
            0x0102030405060708,
        );
    }
    for at in [a, a + 8] {
        let v = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1long__J(
            vm.env(),
            JObject::null(),
            at,
        );
        assert_eq!(v, 0x0102030405060708);
    }
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_fillMemory(
        vm.env(),
        JObject::null(),
        a,
        16,
        -1,
    );
    assert_eq!(
        Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1int__J(
            vm.env(),
            JObject::null(),
            a + 3,
        ),
        -1
    );
    let b = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_reallocateMemory(
        vm.env(),
        JObject::null(),
        a,
        64,
    );
    assert_ne!(b, 0);
    assert_eq!(
        Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1byte__J(
            vm.env(),
            JObject::null(),
            b + 15,
        ),
        -1
    );
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_freeMemory(
        vm.env(),
        JObject::null(),
        b,
    );
}

#[test]
fn boolean_address_access_writes_one_byte() {
    let vm = FakeVm::new();
    let a = Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_allocateMemory(
        vm.env(),
        JObject::null(),
        2,
    );
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1byte__JB(
        vm.env(),
        JObject::null(),
        a + 1,
        0x33,
    );
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_set_1boolean__JZ(
        vm.env(),
        JObject::null(),
        a,
        7,
    );
    assert_eq!(
        Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1byte__J(vm.env(), JObject::null(), a),
        1
    );
    assert_eq!(
        Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_get_1byte__J(vm.env(), JObject::null(), a + 1),
        0x33
    );
    Java_org_eclipse_serializer_nativememory_NativeMemoryAccessor_freeMemory(vm.env(), JObject::null(), a);
}
