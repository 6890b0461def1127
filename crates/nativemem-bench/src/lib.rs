//! Benchmark workloads for the nativemem access layer.
//!
//! - [`allocation_sizes`]: deterministic mix of small and large block sizes
//! - [`record_runtime`]: object runtime with a serializer-style record class

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use nativemem_core::PrimitiveKind;
use nativemem_object::{ClassId, ClassLayout, ClassRegistry, ObjectRuntime};

/// `count` block sizes between 8 and 4096 bytes, reproducible from `seed`.
///
/// Three in four sizes are at most 64 bytes, matching the small-record
/// skew of serializer buffers.
pub fn allocation_sizes(count: usize, seed: u64) -> Vec<i64> {
    // xorshift64; zero is a fixed point.
    let mut state = seed | 1;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            if state % 4 == 0 {
                64 + (state >> 8) as i64 % 4033
            } else {
                8 + (state >> 8) as i64 % 57
            }
        })
        .collect()
}

/// Runtime with one `Record` class: an id, a timestamp, a score, a flag,
/// and a link to another record.
pub fn record_runtime() -> (ObjectRuntime, ClassId) {
    let mut registry = ClassRegistry::new();
    let layout = ClassLayout::builder("Record")
        .field("id", PrimitiveKind::Int)
        .field("timestamp", PrimitiveKind::Long)
        .field("score", PrimitiveKind::Double)
        .field("active", PrimitiveKind::Boolean)
        .reference("next")
        .build()
        .unwrap();
    let id = registry.register(layout).unwrap();
    (ObjectRuntime::new(registry), id)
}
