use std::sync::Arc;

use nativemem_core::{FieldAccess, FieldOffset};
use nativemem_object::ReflectedField;
use nativemem_test_utils::fixtures::{fixture_runtime, ALL_WIDTHS_FIELDS};
use proptest::prelude::*;

fn offsets(fx: &nativemem_test_utils::fixtures::FixtureRuntime) -> Vec<FieldOffset> {
    let rt = &fx.runtime;
    let fields: Vec<ReflectedField> = ALL_WIDTHS_FIELDS
        .iter()
        .map(|name| rt.registry().reflect(fx.all_widths, name).unwrap())
        .collect();
    let refs: Vec<&ReflectedField> = fields.iter().collect();
    rt.object_field_offsets(&refs)
}

#[test]
fn offsets_are_distinct_and_nonzero() {
    let fx = fixture_runtime();
    let offs = offsets(&fx);
    for (i, a) in offs.iter().enumerate() {
        assert_ne!(a.raw(), 0);
        for b in &offs[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn writes_to_one_field_leave_others_untouched() {
    let fx = fixture_runtime();
    let rt = &fx.runtime;
    let obj = rt.instantiate(fx.all_widths).unwrap();
    let o = offsets(&fx);

    rt.set_long(&obj, o[6], -1);
    rt.set_byte(&obj, o[0], 0x7F);

    assert_eq!(rt.get_long(&obj, o[6]), -1);
    assert_eq!(rt.get_byte(&obj, o[0]), 0x7F);
    assert!(!rt.get_boolean(&obj, o[1]));
    assert_eq!(rt.get_short(&obj, o[2]), 0);
    assert_eq!(rt.get_char(&obj, o[3]), 0);
    assert_eq!(rt.get_int(&obj, o[4]), 0);
    assert_eq!(rt.get_float(&obj, o[5]), 0.0);
    assert_eq!(rt.get_double(&obj, o[7]), 0.0);
    assert!(rt.get_object(&obj, o[8]).is_none());
}

#[test]
fn linked_list_through_reference_fields() {
    let fx = fixture_runtime();
    let rt = &fx.runtime;
    let value = rt.object_field_offset(&rt.registry().reflect(fx.node, "value").unwrap());
    let next = rt.object_field_offset(&rt.registry().reflect(fx.node, "next").unwrap());

    let head = rt.instantiate(fx.node).unwrap();
    let mut tail = Arc::clone(&head);
    for i in 1..=3 {
        let n = rt.instantiate(fx.node).unwrap();
        rt.set_int(&n, value, i);
        rt.set_object(&tail, next, Some(Arc::clone(&n)));
        tail = n;
    }

    let mut sum = 0;
    let mut cursor = rt.get_object(&head, next);
    while let Some(node) = cursor {
        sum += rt.get_int(&node, value);
        cursor = rt.get_object(&node, next);
    }
    assert_eq!(sum, 6);
}

proptest! {
    #[test]
    fn every_width_round_trips(
        b in any::<i8>(),
        z in any::<bool>(),
        s in any::<i16>(),
        c in any::<u16>(),
        i in any::<i32>(),
        f in any::<f32>(),
        j in any::<i64>(),
        d in any::<f64>(),
    ) {
        let fx = fixture_runtime();
        let rt = &fx.runtime;
        let obj = rt.instantiate(fx.all_widths).unwrap();
        let o = offsets(&fx);

        rt.set_byte(&obj, o[0], b);
        rt.set_boolean(&obj, o[1], z);
        rt.set_short(&obj, o[2], s);
        rt.set_char(&obj, o[3], c);
        rt.set_int(&obj, o[4], i);
        rt.set_float(&obj, o[5], f);
        rt.set_long(&obj, o[6], j);
        rt.set_double(&obj, o[7], d);

        prop_assert_eq!(rt.get_byte(&obj, o[0]), b);
        prop_assert_eq!(rt.get_boolean(&obj, o[1]), z);
        prop_assert_eq!(rt.get_short(&obj, o[2]), s);
        prop_assert_eq!(rt.get_char(&obj, o[3]), c);
        prop_assert_eq!(rt.get_int(&obj, o[4]), i);
        prop_assert_eq!(rt.get_float(&obj, o[5]).to_bits(), f.to_bits());
        prop_assert_eq!(rt.get_long(&obj, o[6]), j);
        prop_assert_eq!(rt.get_double(&obj, o[7]).to_bits(), d.to_bits());
    }
}
