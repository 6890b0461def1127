//! Managed object instances with offset-addressed field storage.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nativemem_core::{FieldOffset, FieldType, LayoutError, PrimitiveKind};

use crate::layout::{ClassLayout, FieldSlot, SlotStorage};
use crate::registry::ClassId;

/// Shared handle to a managed object. `None` in a reference field is null.
pub type ObjectRef = Arc<ManagedObject>;

mod sealed {
    pub trait Sealed {}
}

/// Primitive value storable in a managed object field.
pub trait FieldValue: Copy + sealed::Sealed {
    /// Declared kind a field must have to hold this value.
    const KIND: PrimitiveKind;

    /// Decode from exactly `KIND.size()` native-order bytes.
    fn decode(bytes: &[u8]) -> Self;

    /// Encode into exactly `KIND.size()` bytes, native order.
    fn encode(self, bytes: &mut [u8]);
}

macro_rules! impl_field_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl FieldValue for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            #[inline]
            fn decode(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_ne_bytes(raw)
            }

            #[inline]
            fn encode(self, bytes: &mut [u8]) {
                bytes.copy_from_slice(&self.to_ne_bytes());
            }
        }
    )*};
}

impl_field_value! {
    i8 => Byte,
    i16 => Short,
    u16 => Char,
    i32 => Int,
    f32 => Float,
    i64 => Long,
    f64 => Double,
}

impl sealed::Sealed for bool {}

impl FieldValue for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Boolean;

    #[inline]
    fn decode(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    #[inline]
    fn encode(self, bytes: &mut [u8]) {
        bytes[0] = u8::from(self);
    }
}

struct ObjectState {
    primitives: Box<[u8]>,
    references: Box<[Option<ObjectRef>]>,
}

/// One instance of a registered class.
///
/// Fields are addressed by the offsets from the class's [`ClassLayout`].
/// Every access checks that the offset starts a field of this class and
/// that the declared type matches. Storage sits behind a mutex, so shared
/// [`ObjectRef`] handles may be read and written from any thread.
pub struct ManagedObject {
    class: ClassId,
    layout: Arc<ClassLayout>,
    state: Mutex<ObjectState>,
}

impl ManagedObject {
    /// A zeroed instance: every primitive is 0/false, every reference null.
    pub(crate) fn blank(class: ClassId, layout: Arc<ClassLayout>) -> Self {
        let state = ObjectState {
            primitives: vec![0u8; layout.primitive_bytes()].into_boxed_slice(),
            references: vec![None; layout.reference_slots()].into_boxed_slice(),
        };
        Self {
            class,
            layout,
            state: Mutex::new(state),
        }
    }

    /// Class of this instance.
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Layout of this instance's class.
    pub fn layout(&self) -> &ClassLayout {
        &self.layout
    }

    fn state(&self) -> MutexGuard<'_, ObjectState> {
        // Field storage is plain data; a panic mid-write cannot break it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, offset: FieldOffset, actual: FieldType) -> Result<&FieldSlot, LayoutError> {
        let slot = self
            .layout
            .slot_at(offset)
            .ok_or_else(|| LayoutError::InvalidOffset {
                class: self.layout.name().to_string(),
                offset,
            })?;
        if slot.field_type != actual {
            return Err(LayoutError::TypeMismatch {
                expected: slot.field_type,
                actual,
            });
        }
        Ok(slot)
    }

    /// Read the primitive field at `offset`.
    pub fn get<T: FieldValue>(&self, offset: FieldOffset) -> Result<T, LayoutError> {
        let slot = self.slot(offset, FieldType::Primitive(T::KIND))?;
        let SlotStorage::Bytes { start } = slot.storage else {
            unreachable!("primitive field without byte storage");
        };
        let state = self.state();
        Ok(T::decode(&state.primitives[start..start + T::KIND.size()]))
    }

    /// Write the primitive field at `offset`.
    pub fn set<T: FieldValue>(&self, offset: FieldOffset, value: T) -> Result<(), LayoutError> {
        let slot = self.slot(offset, FieldType::Primitive(T::KIND))?;
        let SlotStorage::Bytes { start } = slot.storage else {
            unreachable!("primitive field without byte storage");
        };
        let mut state = self.state();
        value.encode(&mut state.primitives[start..start + T::KIND.size()]);
        Ok(())
    }

    /// Read the reference field at `offset`.
    pub fn get_reference(&self, offset: FieldOffset) -> Result<Option<ObjectRef>, LayoutError> {
        let slot = self.slot(offset, FieldType::Reference)?;
        let SlotStorage::Reference { index } = slot.storage else {
            unreachable!("reference field without reference slot");
        };
        Ok(self.state().references[index].clone())
    }

    /// Write the reference field at `offset`. Returns the previous value.
    pub fn set_reference(
        &self,
        offset: FieldOffset,
        value: Option<ObjectRef>,
    ) -> Result<Option<ObjectRef>, LayoutError> {
        let slot = self.slot(offset, FieldType::Reference)?;
        let SlotStorage::Reference { index } = slot.storage else {
            unreachable!("reference field without reference slot");
        };
        let previous = std::mem::replace(&mut self.state().references[index], value);
        Ok(previous)
    }

    /// Read a field by name. Convenience for tests and diagnostics.
    pub fn get_named<T: FieldValue>(&self, name: &str) -> Result<T, LayoutError> {
        let offset = self.named_offset(name)?;
        self.get(offset)
    }

    fn named_offset(&self, name: &str) -> Result<FieldOffset, LayoutError> {
        self.layout
            .field(name)
            .map(|slot| slot.offset)
            .ok_or_else(|| LayoutError::UnknownField {
                class: self.layout.name().to_string(),
                field: name.to_string(),
            })
    }
}

impl fmt::Debug for ManagedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // References are printed as present/null to keep cycles finite.
        let state = self.state();
        let references: Vec<bool> = state.references.iter().map(Option::is_some).collect();
        f.debug_struct("ManagedObject")
            .field("class", &self.layout.name())
            .field("id", &self.class)
            .field("primitives", &state.primitives)
            .field("references", &references)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> ManagedObject {
        let layout = ClassLayout::builder("Node")
            .field("value", PrimitiveKind::Int)
            .field("weight", PrimitiveKind::Double)
            .field("live", PrimitiveKind::Boolean)
            .reference("next")
            .build()
            .unwrap();
        ManagedObject::blank(ClassId(0), Arc::new(layout))
    }

    fn offset(obj: &ManagedObject, name: &str) -> FieldOffset {
        obj.layout().field(name).unwrap().offset
    }

    #[test]
    fn blank_is_zeroed() {
        let n = node();
        assert_eq!(n.get::<i32>(offset(&n, "value")).unwrap(), 0);
        assert!(!n.get::<bool>(offset(&n, "live")).unwrap());
        assert!(n.get_reference(offset(&n, "next")).unwrap().is_none());
    }

    #[test]
    fn primitive_round_trip() {
        let n = node();
        n.set(offset(&n, "value"), -7i32).unwrap();
        n.set(offset(&n, "weight"), 2.5f64).unwrap();
        n.set(offset(&n, "live"), true).unwrap();
        assert_eq!(n.get::<i32>(offset(&n, "value")).unwrap(), -7);
        assert_eq!(n.get_named::<f64>("weight").unwrap(), 2.5);
        assert!(n.get_named::<bool>("live").unwrap());
    }

    #[test]
    fn wrong_width_is_type_mismatch() {
        let n = node();
        let err = n.get::<i64>(offset(&n, "value")).unwrap_err();
        assert_eq!(
            err,
            LayoutError::TypeMismatch {
                expected: FieldType::Primitive(PrimitiveKind::Int),
                actual: FieldType::Primitive(PrimitiveKind::Long),
            }
        );
    }

    #[test]
    fn reference_accessed_as_primitive_rejected() {
        let n = node();
        assert!(matches!(
            n.get::<i64>(offset(&n, "next")),
            Err(LayoutError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn unknown_offset_rejected() {
        let n = node();
        assert_eq!(
            n.get::<i32>(FieldOffset(0)).unwrap_err(),
            LayoutError::InvalidOffset {
                class: "Node".into(),
                offset: FieldOffset(0)
            }
        );
    }

    #[test]
    fn self_reference_allowed() {
        let n: ObjectRef = Arc::new(node());
        let next = offset(&n, "next");
        assert!(n.set_reference(next, Some(Arc::clone(&n))).unwrap().is_none());
        let back = n.get_reference(next).unwrap().unwrap();
        assert!(Arc::ptr_eq(&back, &n));
        // Break the cycle so the test does not leak.
        assert!(n.set_reference(next, None).unwrap().is_some());
    }

    #[test]
    fn debug_output_is_finite_for_cycles() {
        let n: ObjectRef = Arc::new(node());
        let next = offset(&n, "next");
        n.set_reference(next, Some(Arc::clone(&n))).unwrap();
        let text = format!("{n:?}");
        assert!(text.contains("Node"));
        n.set_reference(next, None).unwrap();
    }
}
