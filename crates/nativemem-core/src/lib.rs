//! Core types and traits for the nativemem access layer.
//!
//! Everything here is plain data: addresses, field offsets, primitive
//! kinds, and the error enums shared by the raw heap, the in-process
//! object model, and the JNI entry points. This crate contains no
//! `unsafe` code; outside `nativemem-raw`, `nativemem-jni`, and the
//! test-only guard heap, none of the workspace does.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod address;
pub mod error;
pub mod primitive;
pub mod traits;

pub use address::{Address, FieldOffset};
pub use error::{AccessError, LayoutError};
pub use primitive::{FieldType, PrimitiveKind};
pub use traits::FieldAccess;
