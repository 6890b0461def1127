//! Reusable class layout fixtures.
//!
//! - [`all_widths`]: one field of every primitive kind plus a reference,
//!   declared narrowest first so packing reorders them.
//! - [`linked_node`]: an int payload and a self-typed `next` reference.

use nativemem_core::PrimitiveKind;
use nativemem_object::{ClassId, ClassLayout, ClassRegistry, ObjectRuntime};

/// Field names of [`all_widths`], in declaration order.
pub const ALL_WIDTHS_FIELDS: [&str; 9] = [
    "b", "z", "s", "c", "i", "f", "j", "d", "ref",
];

/// A class with one field of every primitive kind and one reference.
pub fn all_widths() -> ClassLayout {
    ClassLayout::builder("AllWidths")
        .field("b", PrimitiveKind::Byte)
        .field("z", PrimitiveKind::Boolean)
        .field("s", PrimitiveKind::Short)
        .field("c", PrimitiveKind::Char)
        .field("i", PrimitiveKind::Int)
        .field("f", PrimitiveKind::Float)
        .field("j", PrimitiveKind::Long)
        .field("d", PrimitiveKind::Double)
        .reference("ref")
        .build()
        .expect("fixture layout is valid")
}

/// A singly linked list node.
pub fn linked_node() -> ClassLayout {
    ClassLayout::builder("Node")
        .field("value", PrimitiveKind::Int)
        .reference("next")
        .build()
        .expect("fixture layout is valid")
}

/// Runtime with both fixtures registered.
pub struct FixtureRuntime {
    pub runtime: ObjectRuntime,
    pub all_widths: ClassId,
    pub node: ClassId,
}

pub fn fixture_runtime() -> FixtureRuntime {
    let mut registry = ClassRegistry::new();
    let all_widths = registry.register(all_widths()).expect("unique class");
    let node = registry.register(linked_node()).expect("unique class");
    FixtureRuntime {
        runtime: ObjectRuntime::new(registry),
        all_widths,
        node,
    }
}
