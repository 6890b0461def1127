//! Class layouts: field declarations to stable offsets.
//!
//! Offsets start after a fixed object header so that no field ever sits
//! at offset 0. Primitive fields are packed widest first (declaration
//! order breaks ties), which keeps every field naturally aligned without
//! padding. Reference fields follow in pointer-sized slots.

use indexmap::IndexMap;
use nativemem_core::{FieldOffset, FieldType, LayoutError, PrimitiveKind};
use smallvec::SmallVec;

/// Bytes reserved ahead of the first field.
pub const HEADER_SIZE: i64 = 16;

/// Width of a reference slot.
const REFERENCE_SIZE: i64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SlotStorage {
    /// Byte range start inside the primitive storage.
    Bytes { start: usize },
    /// Index into the reference table.
    Reference { index: usize },
}

/// One laid-out field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSlot {
    /// Declared name.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Offset the typed accessors take.
    pub offset: FieldOffset,
    pub(crate) storage: SlotStorage,
}

/// Immutable field layout of one class.
#[derive(Clone, Debug)]
pub struct ClassLayout {
    name: String,
    /// Fields in declaration order.
    fields: SmallVec<[FieldSlot; 8]>,
    by_name: IndexMap<String, usize>,
    by_offset: IndexMap<i64, usize>,
    primitive_bytes: usize,
    reference_slots: usize,
}

impl ClassLayout {
    /// Start declaring a class.
    pub fn builder(name: impl Into<String>) -> ClassLayoutBuilder {
        ClassLayoutBuilder {
            name: name.into(),
            declared: Vec::new(),
        }
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSlot> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Field starting exactly at `offset`.
    pub fn slot_at(&self, offset: FieldOffset) -> Option<&FieldSlot> {
        self.by_offset.get(&offset.raw()).map(|&i| &self.fields[i])
    }

    /// Bytes of primitive field storage.
    pub fn primitive_bytes(&self) -> usize {
        self.primitive_bytes
    }

    /// Number of reference fields.
    pub fn reference_slots(&self) -> usize {
        self.reference_slots
    }

    /// Header plus all field storage, including padding before the
    /// reference slots, in bytes.
    pub fn instance_size(&self) -> usize {
        if self.reference_slots == 0 {
            return HEADER_SIZE as usize + self.primitive_bytes;
        }
        reference_base(self.primitive_bytes) as usize + self.reference_slots * REFERENCE_SIZE as usize
    }
}

/// First reference offset: the next pointer-aligned offset after the
/// primitive fields.
fn reference_base(primitive_bytes: usize) -> i64 {
    HEADER_SIZE + (primitive_bytes as i64 + REFERENCE_SIZE - 1) / REFERENCE_SIZE * REFERENCE_SIZE
}

/// Accumulates field declarations for a [`ClassLayout`].
#[derive(Clone, Debug)]
pub struct ClassLayoutBuilder {
    name: String,
    declared: Vec<(String, FieldType)>,
}

impl ClassLayoutBuilder {
    /// Declare a primitive field.
    pub fn field(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.declared.push((name.into(), FieldType::Primitive(kind)));
        self
    }

    /// Declare a reference field.
    pub fn reference(mut self, name: impl Into<String>) -> Self {
        self.declared.push((name.into(), FieldType::Reference));
        self
    }

    /// Assign offsets. Fails on a repeated field name.
    pub fn build(self) -> Result<ClassLayout, LayoutError> {
        let mut by_name = IndexMap::with_capacity(self.declared.len());
        for (i, (name, _)) in self.declared.iter().enumerate() {
            if by_name.insert(name.clone(), i).is_some() {
                return Err(LayoutError::DuplicateField { name: name.clone() });
            }
        }

        // Widest primitives first; stable sort keeps declaration order on ties.
        let mut primitive_order: Vec<usize> = (0..self.declared.len())
            .filter(|&i| matches!(self.declared[i].1, FieldType::Primitive(_)))
            .collect();
        primitive_order.sort_by_key(|&i| std::cmp::Reverse(self.declared[i].1.size()));

        let mut placement: Vec<Option<(FieldOffset, SlotStorage)>> =
            vec![None; self.declared.len()];
        let mut cursor = 0usize;
        for &i in &primitive_order {
            let offset = FieldOffset(HEADER_SIZE + cursor as i64);
            placement[i] = Some((offset, SlotStorage::Bytes { start: cursor }));
            cursor += self.declared[i].1.size();
        }
        let primitive_bytes = cursor;

        let base = reference_base(primitive_bytes);
        let mut reference_slots = 0usize;
        for (i, (_, field_type)) in self.declared.iter().enumerate() {
            if *field_type == FieldType::Reference {
                let offset = FieldOffset(base + reference_slots as i64 * REFERENCE_SIZE);
                placement[i] = Some((offset, SlotStorage::Reference { index: reference_slots }));
                reference_slots += 1;
            }
        }

        let mut fields = SmallVec::with_capacity(self.declared.len());
        let mut by_offset = IndexMap::with_capacity(self.declared.len());
        for (i, ((name, field_type), placed)) in
            self.declared.into_iter().zip(placement).enumerate()
        {
            let Some((offset, storage)) = placed else {
                continue;
            };
            by_offset.insert(offset.raw(), i);
            fields.push(FieldSlot {
                name,
                field_type,
                offset,
                storage,
            });
        }

        Ok(ClassLayout {
            name: self.name,
            fields,
            by_name,
            by_offset,
            primitive_bytes,
            reference_slots,
        })
    }
}
