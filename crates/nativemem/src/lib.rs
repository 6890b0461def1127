//! nativemem: raw native memory access for managed-runtime serializers.
//!
//! This is the facade crate re-exporting the public API of the nativemem
//! sub-crates. The JNI library itself is built from `nativemem-jni`.
//!
//! # Quick start
//!
//! ```rust
//! use nativemem::prelude::*;
//! use nativemem::types::PrimitiveKind;
//!
//! // Checked access through the tracked heap.
//! let heap = TrackedHeap::new();
//! let block = heap.allocate(16).unwrap();
//! heap.write(block, 0x0102030405060708i64).unwrap();
//! heap.write(block.offset(8), 0x0102030405060708i64).unwrap();
//! assert_eq!(heap.read::<i64>(block.offset(8)).unwrap(), 0x0102030405060708);
//! assert!(heap.read::<i64>(block.offset(9)).is_err());
//! heap.free(block).unwrap();
//!
//! // Field access through resolved offsets on the in-process object model.
//! let mut registry = ClassRegistry::new();
//! let point = registry
//!     .register(
//!         ClassLayout::builder("Point")
//!             .field("x", PrimitiveKind::Int)
//!             .field("y", PrimitiveKind::Int)
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//! let runtime = ObjectRuntime::new(registry);
//! let y = runtime.object_field_offset(&runtime.registry().reflect(point, "y").unwrap());
//! let p = runtime.instantiate(point).unwrap();
//! runtime.set_int(&p, y, 7);
//! assert_eq!(runtime.get_int(&p, y), 7);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `nativemem-core` | `Address`, `FieldOffset`, primitive kinds, errors, `FieldAccess` |
//! | [`raw`] | `nativemem-raw` | Heap ops, per-width access, byte slices, copies, buffers, tracked heap, config |
//! | [`object`] | `nativemem-object` | Class layouts, registry, managed objects |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the field-access trait (`nativemem-core`).
pub use nativemem_core as types;

/// Native heap access (`nativemem-raw`).
///
/// The unchecked functions live in [`raw::heap`], [`raw::primitive`], and
/// [`raw::copy`]; [`raw::TrackedHeap`] is the checked alternative.
pub use nativemem_raw as raw;

/// In-process object model (`nativemem-object`).
pub use nativemem_object as object;

/// Common imports for typical nativemem usage.
pub mod prelude {
    // Core types and traits
    pub use nativemem_core::{AccessError, Address, FieldAccess, FieldOffset, LayoutError};

    // Heap access
    pub use nativemem_raw::{
        AccessMode, AccessorConfig, ByteBuffer, NativeMemory, Primitive, TrackedHeap,
    };

    // Object model
    pub use nativemem_object::{
        ClassLayout, ClassRegistry, ManagedObject, ObjectRef, ObjectRuntime, ReflectedField,
    };
}
