//! [`FieldAccess`] over the in-process object model.

use nativemem_core::{FieldAccess, FieldOffset, LayoutError};

use crate::object::{FieldValue, ManagedObject, ObjectRef};
use crate::registry::{ClassId, ClassRegistry, ReflectedField};

/// Owns a [`ClassRegistry`] and serves typed field access on its objects.
///
/// # Panics
///
/// The [`FieldAccess`] methods panic when an offset does not start a field
/// of the target's class, when the accessed width differs from the
/// declared type, or when a reflected field does not resolve. The
/// `try_*` methods report the same conditions as [`LayoutError`].
#[derive(Debug, Default)]
pub struct ObjectRuntime {
    registry: ClassRegistry,
}

impl ObjectRuntime {
    /// Runtime over an existing registry.
    pub fn new(registry: ClassRegistry) -> Self {
        Self { registry }
    }

    /// The class registry.
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// The class registry, for registering more classes.
    pub fn registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    /// A new zeroed instance of `class`.
    pub fn instantiate(&self, class: ClassId) -> Result<ObjectRef, LayoutError> {
        self.registry.instantiate(class)
    }

    /// Checked primitive read.
    pub fn try_get<T: FieldValue>(
        &self,
        target: &ManagedObject,
        offset: FieldOffset,
    ) -> Result<T, LayoutError> {
        target.get(offset)
    }

    /// Checked primitive write.
    pub fn try_set<T: FieldValue>(
        &self,
        target: &ManagedObject,
        offset: FieldOffset,
        value: T,
    ) -> Result<(), LayoutError> {
        target.set(offset, value)
    }

    /// Checked offset resolution.
    pub fn try_field_offset(&self, field: &ReflectedField) -> Result<FieldOffset, LayoutError> {
        self.registry.resolve(field)
    }
}

#[track_caller]
fn checked<T>(result: Result<T, LayoutError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("invalid field access: {e}"),
    }
}

macro_rules! runtime_accessors {
    ($($get:ident / $set:ident : $ty:ty),* $(,)?) => {$(
        fn $get(&self, target: Self::Target<'_>, offset: FieldOffset) -> $ty {
            checked(target.get::<$ty>(offset))
        }

        fn $set(&self, target: Self::Target<'_>, offset: FieldOffset, value: $ty) {
            checked(target.set::<$ty>(offset, value))
        }
    )*};
}

impl FieldAccess for ObjectRuntime {
    type Target<'a> = &'a ManagedObject;
    type Reference = Option<ObjectRef>;
    type Field<'a> = &'a ReflectedField;

    runtime_accessors! {
        get_byte / set_byte: i8,
        get_boolean / set_boolean: bool,
        get_short / set_short: i16,
        get_char / set_char: u16,
        get_int / set_int: i32,
        get_float / set_float: f32,
        get_long / set_long: i64,
        get_double / set_double: f64,
    }

    fn get_object(&self, target: Self::Target<'_>, offset: FieldOffset) -> Option<ObjectRef> {
        checked(target.get_reference(offset))
    }

    fn set_object(&self, target: Self::Target<'_>, offset: FieldOffset, value: Option<ObjectRef>) {
        checked(target.set_reference(offset, value));
    }

    fn object_field_offset(&self, field: Self::Field<'_>) -> FieldOffset {
        checked(self.registry.resolve(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ClassLayout;
    use nativemem_core::PrimitiveKind;
    use std::sync::Arc;

    fn runtime() -> (ObjectRuntime, ClassId) {
        let mut rt = ObjectRuntime::default();
        let id = rt
            .registry_mut()
            .register(
                ClassLayout::builder("Holder")
                    .field("count", PrimitiveKind::Int)
                    .field("ch", PrimitiveKind::Char)
                    .reference("peer")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        (rt, id)
    }

    #[test]
    fn int_field_round_trip() {
        let (rt, holder) = runtime();
        let obj = rt.instantiate(holder).unwrap();
        let count = rt.registry().reflect(holder, "count").unwrap();
        let off = rt.object_field_offset(&count);
        rt.set_int(&obj, off, 42);
        assert_eq!(rt.get_int(&obj, off), 42);
    }

    #[test]
    fn char_is_unsigned() {
        let (rt, holder) = runtime();
        let obj = rt.instantiate(holder).unwrap();
        let off = rt.object_field_offset(&rt.registry().reflect(holder, "ch").unwrap());
        rt.set_char(&obj, off, 0xFFFF);
        assert_eq!(rt.get_char(&obj, off), 0xFFFF);
    }

    #[test]
    fn object_field_round_trip() {
        let (rt, holder) = runtime();
        let a = rt.instantiate(holder).unwrap();
        let b = rt.instantiate(holder).unwrap();
        let off = rt.object_field_offset(&rt.registry().reflect(holder, "peer").unwrap());
        rt.set_object(&a, off, Some(Arc::clone(&b)));
        assert!(Arc::ptr_eq(&rt.get_object(&a, off).unwrap(), &b));
        rt.set_object(&a, off, None);
        assert!(rt.get_object(&a, off).is_none());
    }

    #[test]
    fn batch_offsets_preserve_order() {
        let (rt, holder) = runtime();
        let fields = rt.registry().declared_fields(holder).unwrap();
        let refs: Vec<&ReflectedField> = fields.iter().collect();
        let offsets = rt.object_field_offsets(&refs);
        let single: Vec<FieldOffset> = refs.iter().map(|f| rt.object_field_offset(f)).collect();
        assert_eq!(offsets, single);
    }

    #[test]
    fn try_variants_report_errors() {
        let (rt, holder) = runtime();
        let obj = rt.instantiate(holder).unwrap();
        assert!(rt.try_get::<i32>(&obj, FieldOffset(3)).is_err());
        assert!(rt.try_set(&obj, FieldOffset(3), 1i32).is_err());
    }

    #[test]
    fn try_field_offset_rejects_foreign_field() {
        let (rt, holder) = runtime();
        let count = rt.registry().reflect(holder, "count").unwrap();
        assert_eq!(rt.try_field_offset(&count), Ok(rt.object_field_offset(&count)));

        let mut other = ObjectRuntime::default();
        let id = other
            .registry_mut()
            .register(ClassLayout::builder("Other").build().unwrap())
            .unwrap();
        assert_eq!(id, holder);
        assert_eq!(
            other.try_field_offset(&count),
            Err(LayoutError::UnknownField {
                class: "Other".into(),
                field: "count".into(),
            })
        );
    }

    #[test]
    #[should_panic(expected = "invalid field access")]
    fn wrong_width_panics() {
        let (rt, holder) = runtime();
        let obj = rt.instantiate(holder).unwrap();
        let off = rt.object_field_offset(&rt.registry().reflect(holder, "count").unwrap());
        rt.get_long(&obj, off);
    }
}
