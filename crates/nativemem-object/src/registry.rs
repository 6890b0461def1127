//! Class registry and field reflection.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use nativemem_core::{FieldOffset, FieldType, LayoutError};
use tracing::{debug, trace};

use crate::layout::ClassLayout;
use crate::object::{ManagedObject, ObjectRef};

/// Index of a class in its [`ClassRegistry`], assigned in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Reflected handle to one declared field, the analogue of a
/// `java.lang.reflect.Field`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectedField {
    class: ClassId,
    name: String,
    field_type: FieldType,
}

impl ReflectedField {
    /// Declaring class.
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// Registered class layouts, by name and by [`ClassId`].
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: IndexMap<String, Arc<ClassLayout>>,
}

impl ClassRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layout. Class names are unique.
    pub fn register(&mut self, layout: ClassLayout) -> Result<ClassId, LayoutError> {
        if self.classes.contains_key(layout.name()) {
            return Err(LayoutError::DuplicateClass {
                name: layout.name().to_string(),
            });
        }
        let id = ClassId(self.classes.len() as u32);
        debug!(
            class = layout.name(),
            id = id.0,
            fields = layout.fields().len(),
            instance_size = layout.instance_size(),
            "registered class"
        );
        self.classes
            .insert(layout.name().to_string(), Arc::new(layout));
        Ok(id)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Id of the class registered under `name`.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes.get_index_of(name).map(|i| ClassId(i as u32))
    }

    /// Layout of `class`.
    pub fn layout(&self, class: ClassId) -> Result<&Arc<ClassLayout>, LayoutError> {
        self.classes
            .get_index(class.0 as usize)
            .map(|(_, layout)| layout)
            .ok_or_else(|| LayoutError::UnknownClass {
                class: class.to_string(),
            })
    }

    /// Reflect the field `name` declared by `class`.
    pub fn reflect(&self, class: ClassId, name: &str) -> Result<ReflectedField, LayoutError> {
        let layout = self.layout(class)?;
        let slot = layout.field(name).ok_or_else(|| LayoutError::UnknownField {
            class: layout.name().to_string(),
            field: name.to_string(),
        })?;
        Ok(ReflectedField {
            class,
            name: slot.name.clone(),
            field_type: slot.field_type,
        })
    }

    /// Reflect every field of `class`, in declaration order.
    pub fn declared_fields(&self, class: ClassId) -> Result<Vec<ReflectedField>, LayoutError> {
        let layout = self.layout(class)?;
        Ok(layout
            .fields()
            .iter()
            .map(|slot| ReflectedField {
                class,
                name: slot.name.clone(),
                field_type: slot.field_type,
            })
            .collect())
    }

    /// Offset of a reflected field. Stable for the registry's lifetime.
    pub fn resolve(&self, field: &ReflectedField) -> Result<FieldOffset, LayoutError> {
        let layout = self.layout(field.class)?;
        layout
            .field(&field.name)
            .map(|slot| slot.offset)
            .ok_or_else(|| LayoutError::UnknownField {
                class: layout.name().to_string(),
                field: field.name.clone(),
            })
    }

    /// A new zeroed instance of `class`.
    pub fn instantiate(&self, class: ClassId) -> Result<ObjectRef, LayoutError> {
        let layout = Arc::clone(self.layout(class)?);
        trace!(class = layout.name(), "instantiate");
        Ok(Arc::new(ManagedObject::blank(class, layout)))
    }
}
