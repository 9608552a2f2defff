//! Property-based tests for the value converter.
//!
//! - Round trip: lower(lift(T, r)) == r for every raw value already in lowered form
//! - Null propagation: Null and Unknown of every type lower to raw Null
//! - Lifted values always report the type they were lifted against

use proptest::prelude::*;
use vastate_types::{AttrType, AttrValue, RawValue, lift, lower};

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn type_strategy() -> impl Strategy<Value = AttrType> {
    let leaf = prop_oneof![
        Just(AttrType::String),
        Just(AttrType::Int64),
        Just(AttrType::Float64),
        Just(AttrType::Bool),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(AttrType::list),
            inner.clone().prop_map(AttrType::set),
            inner.clone().prop_map(AttrType::map),
            prop::collection::btree_map("[a-z]{1,6}", inner, 1..4).prop_map(AttrType::Object),
        ]
    })
}

/// A non-null raw value in the form `lower` produces for type `ty`.
///
/// List and set items are never Null because lowering drops them; map and
/// object entries may be.
fn lowered_raw(ty: &AttrType) -> BoxedStrategy<RawValue> {
    match ty {
        AttrType::String => "[a-z0-9 ]{0,12}".prop_map(RawValue::String).boxed(),
        AttrType::Int64 => any::<i64>().prop_map(RawValue::Int).boxed(),
        AttrType::Float64 => (-1.0e9f64..1.0e9).prop_map(RawValue::Float).boxed(),
        AttrType::Bool => any::<bool>().prop_map(RawValue::Bool).boxed(),
        AttrType::List(e) | AttrType::Set(e) => prop::collection::vec(lowered_raw(e), 0..4)
            .prop_map(RawValue::List)
            .boxed(),
        AttrType::Map(e) => prop::collection::btree_map("[a-z]{1,4}", nullable_raw(e), 0..4)
            .prop_map(RawValue::Map)
            .boxed(),
        AttrType::Object(fields) => fields
            .iter()
            .map(|(name, field_ty)| (Just(name.clone()), nullable_raw(field_ty)))
            .collect::<Vec<_>>()
            .prop_map(|entries| RawValue::Map(entries.into_iter().collect()))
            .boxed(),
    }
}

fn nullable_raw(ty: &AttrType) -> BoxedStrategy<RawValue> {
    prop_oneof![1 => Just(RawValue::Null), 3 => lowered_raw(ty)].boxed()
}

fn typed_raw_strategy() -> impl Strategy<Value = (AttrType, RawValue)> {
    type_strategy().prop_flat_map(|ty| {
        let raw = lowered_raw(&ty);
        (Just(ty), raw)
    })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn lower_inverts_lift((ty, raw) in typed_raw_strategy()) {
        let lifted = lift(&ty, &raw).unwrap();
        prop_assert_eq!(lower(&lifted), raw);
    }

    #[test]
    fn lifted_value_carries_declared_type((ty, raw) in typed_raw_strategy()) {
        let lifted = lift(&ty, &raw).unwrap();
        prop_assert_eq!(lifted.attr_type(), ty);
        prop_assert!(lifted.is_known());
    }

    #[test]
    fn lift_then_lower_then_lift_is_stable((ty, raw) in typed_raw_strategy()) {
        let once = lift(&ty, &raw).unwrap();
        let twice = lift(&ty, &lower(&once)).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn null_and_unknown_lower_to_null(ty in type_strategy()) {
        let null = lift(&ty, &RawValue::Null).unwrap();
        prop_assert!(null.is_null());
        prop_assert_eq!(null.attr_type(), ty.clone());
        prop_assert_eq!(lower(&null), RawValue::Null);
        prop_assert_eq!(lower(&AttrValue::unknown(&ty)), RawValue::Null);
    }
}
