//! In-process managed object model for nativemem.
//!
//! Stands in for the runtime's object layout and reflection when no JVM
//! is present. A [`ClassLayout`] assigns every declared field a stable
//! offset; a [`ClassRegistry`] maps (class, field name) to a
//! [`ReflectedField`] and resolves it to that offset; [`ManagedObject`]s
//! store field values addressed by offset. [`ObjectRuntime`] implements
//! [`FieldAccess`](nativemem_core::FieldAccess) over all of it, so code
//! written against the JNI accessor runs unchanged against this model.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod layout;
pub mod object;
pub mod registry;
pub mod runtime;

pub use layout::{ClassLayout, ClassLayoutBuilder, FieldSlot};
pub use object::{FieldValue, ManagedObject, ObjectRef};
pub use registry::{ClassId, ClassRegistry, ReflectedField};
pub use runtime::ObjectRuntime;
