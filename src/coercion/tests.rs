#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::descriptor::{DeclaredType, ScalarKind, TypeDescriptor, TypeHead};
use crate::registry::{GeneralRegistry, Tier};
use crate::value::TypedValue;
use serde_json::json;

fn shout(value: &TypedValue, _: &TypeDescriptor, _: &Coercer) -> Result<TypedValue, CoercionFailure> {
    Ok(TypedValue::Str(value.to_string().to_uppercase()))
}

#[test]
fn test_fast_path_returns_value_unchanged() {
    let coercer = Coercer::default();
    let value = TypedValue::List(vec![TypedValue::from("1")]);
    let out = coercer
        .coerce(value.clone(), &DeclaredType::bare(crate::descriptor::ContainerKind::List))
        .unwrap();
    assert_eq!(out, value);
}

#[test]
fn test_parametrized_target_skips_fast_path() {
    let coercer = Coercer::default();
    let out = coercer
        .coerce(json!(["1"]), &DeclaredType::list_of(DeclaredType::int()))
        .unwrap();
    assert_eq!(out, TypedValue::List(vec![TypedValue::Int(1)]));
}

#[test]
fn test_unregistered_head_is_wrapped() {
    let coercer = Coercer::default();
    let err = coercer
        .coerce(json!(5), &DeclaredType::custom("Money"))
        .unwrap_err();
    assert_eq!(err.value(), &TypedValue::Int(5));
    assert_eq!(err.declared(), &DeclaredType::custom("Money"));
    assert!(matches!(
        err.cause(),
        CoercionFailure::UnregisteredType { head } if *head == TypeHead::custom("Money")
    ));
}

#[test]
fn test_nested_failure_keeps_top_level_context() {
    let coercer = Coercer::default();
    let declared = DeclaredType::list_of(DeclaredType::list_of(DeclaredType::int()));
    let err = coercer.coerce(json!([["1"], ["x"]]), &declared).unwrap_err();
    assert_eq!(err.declared(), &declared);
    assert_eq!(err.value(), &TypedValue::from(json!([["1"], ["x"]])));
    match err.cause() {
        CoercionFailure::Conversion { value, target, .. } => {
            assert_eq!(value, &TypedValue::from("x"));
            assert_eq!(target, "int");
        }
        other => panic!("unexpected cause {other:?}"),
    }
}

#[test]
fn test_local_override_beats_general() {
    let general = GeneralRegistry::with_builtins();
    let mut coercer = Coercer::new(general.clone());
    coercer.register_local(TypeHead::Scalar(ScalarKind::Str), shout);
    let out = coercer.coerce(json!(["ab"]), &DeclaredType::list_of(DeclaredType::str()));
    // Str elements already match and never reach the parser.
    assert_eq!(out.unwrap(), TypedValue::List(vec![TypedValue::from("ab")]));
    let out = coercer.coerce(json!(true), &DeclaredType::str()).unwrap();
    assert_eq!(out, TypedValue::from("TRUE"));

    let other = Coercer::new(general);
    assert_eq!(
        other.lookup(&TypeHead::Scalar(ScalarKind::Str)).map(|(_, t)| t),
        Some(Tier::General)
    );
    assert_eq!(
        coercer.lookup(&TypeHead::Scalar(ScalarKind::Str)).map(|(_, t)| t),
        Some(Tier::Local)
    );
}

#[test]
fn test_general_registration_reaches_existing_coercers() {
    let general = GeneralRegistry::with_builtins();
    let coercer = Coercer::new(general.clone());
    general.register(TypeHead::custom("Shout"), shout);
    let out = coercer.coerce("hey", &DeclaredType::custom("Shout")).unwrap();
    assert_eq!(out, TypedValue::from("HEY"));
}

#[test]
fn test_custom_parser_recurses_through_engine() {
    let general = GeneralRegistry::with_builtins();
    general.register(
        TypeHead::custom("Pair"),
        |value: &TypedValue, descriptor: &TypeDescriptor, coercer: &Coercer| {
            let tuple = TypeDescriptor::new(
                TypeHead::Container(crate::descriptor::ContainerKind::Tuple),
                vec![descriptor.params[0].clone(), descriptor.params[0].clone()],
            );
            coercer.coerce_descriptor(value, &tuple)
        },
    );
    let coercer = Coercer::new(general);
    let declared: DeclaredType = "Pair[int]".parse().unwrap();
    let out = coercer.coerce(json!(["1", 2]), &declared).unwrap();
    assert_eq!(
        out,
        TypedValue::Tuple(vec![TypedValue::Int(1), TypedValue::Int(2)])
    );
}
