//! The [`FieldAccess`] seam between the access layer and a managed runtime.

use crate::address::FieldOffset;

/// Typed field access on managed objects through raw field offsets.
///
/// Implemented by the JNI environment wrapper (where `Target` is a raw
/// object reference and offsets are `jfieldID`s) and by the in-process
/// object model (where offsets come from a class layout table). One
/// method per primitive width: callers pick the width statically.
///
/// Implementations do not validate offsets on the hot path beyond what
/// their runtime already does. Passing an offset from a different class
/// is undefined for JNI and a panic for the in-process model.
pub trait FieldAccess {
    /// Borrowed handle to the object being read or written.
    type Target<'a>: Copy;
    /// Value stored in reference-typed fields.
    type Reference;
    /// Reflected field handle accepted by [`object_field_offset`](Self::object_field_offset).
    type Field<'a>: Copy;

    /// Read a `byte` field.
    fn get_byte(&self, target: Self::Target<'_>, offset: FieldOffset) -> i8;
    /// Read a `boolean` field.
    fn get_boolean(&self, target: Self::Target<'_>, offset: FieldOffset) -> bool;
    /// Read a `short` field.
    fn get_short(&self, target: Self::Target<'_>, offset: FieldOffset) -> i16;
    /// Read a `char` field.
    fn get_char(&self, target: Self::Target<'_>, offset: FieldOffset) -> u16;
    /// Read an `int` field.
    fn get_int(&self, target: Self::Target<'_>, offset: FieldOffset) -> i32;
    /// Read a `float` field.
    fn get_float(&self, target: Self::Target<'_>, offset: FieldOffset) -> f32;
    /// Read a `long` field.
    fn get_long(&self, target: Self::Target<'_>, offset: FieldOffset) -> i64;
    /// Read a `double` field.
    fn get_double(&self, target: Self::Target<'_>, offset: FieldOffset) -> f64;
    /// Read a reference field.
    fn get_object(&self, target: Self::Target<'_>, offset: FieldOffset) -> Self::Reference;

    /// Write a `byte` field.
    fn set_byte(&self, target: Self::Target<'_>, offset: FieldOffset, value: i8);
    /// Write a `boolean` field.
    fn set_boolean(&self, target: Self::Target<'_>, offset: FieldOffset, value: bool);
    /// Write a `short` field.
    fn set_short(&self, target: Self::Target<'_>, offset: FieldOffset, value: i16);
    /// Write a `char` field.
    fn set_char(&self, target: Self::Target<'_>, offset: FieldOffset, value: u16);
    /// Write an `int` field.
    fn set_int(&self, target: Self::Target<'_>, offset: FieldOffset, value: i32);
    /// Write a `float` field.
    fn set_float(&self, target: Self::Target<'_>, offset: FieldOffset, value: f32);
    /// Write a `long` field.
    fn set_long(&self, target: Self::Target<'_>, offset: FieldOffset, value: i64);
    /// Write a `double` field.
    fn set_double(&self, target: Self::Target<'_>, offset: FieldOffset, value: f64);
    /// Write a reference field.
    fn set_object(&self, target: Self::Target<'_>, offset: FieldOffset, value: Self::Reference);

    /// Resolve a reflected field to the offset the typed accessors take.
    fn object_field_offset(&self, field: Self::Field<'_>) -> FieldOffset;

    /// Resolve several reflected fields, preserving order.
    fn object_field_offsets(&self, fields: &[Self::Field<'_>]) -> Vec<FieldOffset> {
        fields
            .iter()
            .map(|field| self.object_field_offset(*field))
            .collect()
    }
}
