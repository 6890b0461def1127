//! Test utilities for nativemem development.
//!
//! [`GuardedHeap`] surrounds every allocation with canary bytes so tests
//! can detect writes that stray past either end. [`fixtures`] holds
//! class layouts covering every field width.
//!
//! `unsafe` is denied here except in [`guard`], which reads and writes
//! the guard zones through raw addresses.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod guard;

pub use guard::{GuardSide, GuardViolation, GuardedHeap, CANARY, CANARY_LEN};
