//! Native heap access for nativemem.
//!
//! Two layers live here:
//!
//! - The **unchecked** layer ([`heap`], [`primitive`], [`copy`]): one
//!   forwarding call per operation to the system allocator or a raw
//!   pointer read/write. No bounds, liveness, or alignment checks. All
//!   reads and writes are unaligned-tolerant.
//! - The **tracked** layer ([`TrackedHeap`]): records every live
//!   allocation and rejects frees of unknown addresses, repeated frees,
//!   and out-of-range accesses. Opt-in via [`AccessorConfig`].
//!
//! [`NativeMemory`] picks one of the two at construction. [`bytes`]
//! provides the safe, slice-bounded counterpart for byte arrays, and
//! [`ByteBuffer`] models heap and direct buffers.
//!
//! This crate and `nativemem-jni` are the only library crates that may
//! contain `unsafe` code; the test-only guard heap is the other exception.
//! Every `unsafe` block carries a `// SAFETY:` note.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod accessor;
pub mod buffer;
pub mod bytes;
pub mod config;
pub mod copy;
pub mod heap;
pub mod primitive;
pub mod tracked;

pub use accessor::NativeMemory;
pub use buffer::{resolve_buffer_address, ByteBuffer};
pub use config::{AccessMode, AccessorConfig, LogFormat, LogLevel, LogOptions};
pub use primitive::Primitive;
pub use tracked::{TrackedHeap, TrackedStats};
