#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use restmodels::coercion::CoercionFailure;
use restmodels::descriptor::{DeclaredType, TypeHead};
use restmodels::value::{Instant, TimeOfDay};
use restmodels::{Coercer, TypedValue};
use rust_decimal::Decimal;
use serde_json::json;

fn coerce(value: impl Into<TypedValue>, expr: &str) -> TypedValue {
    let declared: DeclaredType = expr.parse().expect("type expression");
    Coercer::default()
        .coerce(value, &declared)
        .unwrap_or_else(|err| panic!("coercing to {expr} failed: {err}"))
}

fn failure(value: impl Into<TypedValue>, expr: &str) -> CoercionFailure {
    let declared: DeclaredType = expr.parse().expect("type expression");
    Coercer::default()
        .coerce(value, &declared)
        .expect_err("coercion should fail")
        .cause()
        .clone()
}

fn ints(values: &[i64]) -> Vec<TypedValue> {
    values.iter().copied().map(TypedValue::Int).collect()
}

fn sample_naive() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 10, 22)
        .unwrap()
        .and_hms_micro_opt(19, 50, 29, 182_993)
        .unwrap()
}

#[test]
fn test_already_typed_values_pass_through() {
    let samples: Vec<(TypedValue, &str)> = vec![
        (TypedValue::from("text"), "str"),
        (TypedValue::Int(5), "int"),
        (TypedValue::Float(2.5), "float"),
        (TypedValue::Bool(false), "bool"),
        (TypedValue::Decimal(Decimal::new(13567, 3)), "decimal"),
        (TypedValue::Bytes(b"raw".to_vec()), "bytes"),
        (TypedValue::Date(NaiveDate::from_ymd_opt(2023, 10, 22).unwrap()), "date"),
        (TypedValue::DateTime(Instant::Naive(sample_naive())), "datetime"),
        (TypedValue::Duration(TimeDelta::days(15)), "timedelta"),
        (TypedValue::List(vec![TypedValue::from("a"), TypedValue::Int(1)]), "list"),
    ];
    for (value, expr) in samples {
        assert_eq!(coerce(value.clone(), expr), value, "{expr}");
    }
}

#[test]
fn test_scalar_round_trips() {
    assert_eq!(coerce(json!("5"), "int"), TypedValue::Int(5));
    assert_eq!(coerce(json!(5), "int"), TypedValue::Int(5));
    assert_eq!(
        coerce(json!("2023-10-22"), "date"),
        TypedValue::Date(NaiveDate::from_ymd_opt(2023, 10, 22).unwrap())
    );
    assert_eq!(coerce(json!("text"), "str"), TypedValue::from("text"));
    assert_eq!(coerce(json!("text"), "bytes"), TypedValue::Bytes(b"text".to_vec()));
}

#[test]
fn test_float_and_decimal_sources() {
    for source in [json!("5"), json!(5), json!(5.0)] {
        assert_eq!(coerce(source.clone(), "float"), TypedValue::Float(5.0));
        assert_eq!(
            coerce(source, "decimal"),
            TypedValue::Decimal(Decimal::from(5))
        );
    }
}

#[test]
fn test_decimal_never_rounds_silently() {
    for source in [json!(1e-300), json!("12345678901234567890123456789012345")] {
        assert!(
            matches!(failure(source, "decimal"), CoercionFailure::Conversion { .. }),
            "lossy decimal conversion must fail"
        );
    }
    assert_eq!(
        coerce(json!(["0.25", 2]), "list[decimal]"),
        TypedValue::List(vec![
            TypedValue::Decimal(Decimal::new(25, 2)),
            TypedValue::Decimal(Decimal::from(2)),
        ])
    );
}

#[test]
fn test_bool_truthiness_table() {
    let cases = [
        (json!("text"), true),
        (json!(5), true),
        (json!(0), false),
        (json!(1), true),
        (json!(true), true),
        (json!(false), false),
        (json!([]), false),
        (json!(""), false),
        (json!(null), false),
        (json!({"k": 1}), true),
    ];
    for (source, expected) in cases {
        assert_eq!(
            coerce(source.clone(), "bool"),
            TypedValue::Bool(expected),
            "{source}"
        );
    }
}

#[test]
fn test_datetime_naive_and_aware() {
    assert_eq!(
        coerce(json!("2023-10-22T19:50:29.182993"), "datetime"),
        TypedValue::DateTime(Instant::Naive(sample_naive()))
    );
    let aware = DateTime::parse_from_rfc3339("2023-10-22T19:50:29.182993+00:00").unwrap();
    assert_eq!(
        coerce(json!("2023-10-22T19:50:29.182993Z"), "datetime"),
        TypedValue::DateTime(Instant::Offset(aware))
    );
    assert_eq!(
        coerce(json!("2023-10-22 19:50:29.182993"), "datetime"),
        TypedValue::DateTime(Instant::Naive(sample_naive()))
    );
}

#[test]
fn test_time_sources() {
    let time = NaiveTime::from_hms_micro_opt(19, 50, 29, 182_993).unwrap();
    assert_eq!(
        coerce(json!("19:50:29.182993"), "time"),
        TypedValue::Time(TimeOfDay::naive(time))
    );
    assert_eq!(
        coerce(json!("19:50:29.182993Z"), "time"),
        TypedValue::Time(TimeOfDay {
            time,
            offset: FixedOffset::east_opt(0),
        })
    );
    assert_eq!(
        coerce(json!("19:50:29.182993+02:00"), "time"),
        TypedValue::Time(TimeOfDay {
            time,
            offset: FixedOffset::east_opt(7200),
        })
    );
    assert_eq!(
        coerce(json!(23), "time"),
        TypedValue::Time(TimeOfDay::from_hour(23).unwrap())
    );
    let fifteen = TypedValue::Time(TimeOfDay::from_hour(15).unwrap());
    assert_eq!(coerce(fifteen.clone(), "time"), fifteen);
    assert!(matches!(
        failure(json!(24), "time"),
        CoercionFailure::Conversion { .. }
    ));
}

#[test]
fn test_timedelta_sources() {
    assert_eq!(
        coerce(json!(23), "timedelta"),
        TypedValue::Duration(TimeDelta::days(23))
    );
    assert!(matches!(
        failure(json!("P1D"), "timedelta"),
        CoercionFailure::Conversion { .. }
    ));
}

#[test]
fn test_none_head_ignores_input() {
    let samples = [
        TypedValue::Int(23),
        TypedValue::Duration(TimeDelta::days(15)),
        TypedValue::Float(5.0),
        TypedValue::Decimal(Decimal::new(13567, 3)),
        TypedValue::List(Vec::new()),
        TypedValue::from(json!({})),
    ];
    for value in samples {
        assert_eq!(coerce(value, "None"), TypedValue::None);
    }
}

#[test]
fn test_bytes_rejects_non_string_sources() {
    match failure(json!(5), "bytes") {
        CoercionFailure::Conversion { value, target, .. } => {
            assert_eq!(value, TypedValue::Int(5));
            assert_eq!(target, "bytes");
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_shallow_containers() {
    assert!(matches!(coerce(json!([1, 2]), "tuple"), TypedValue::Tuple(_)));
    assert!(matches!(coerce(json!(["ez"]), "tuple"), TypedValue::Tuple(_)));
    assert_eq!(
        coerce(TypedValue::Tuple(ints(&[1, 2])), "list"),
        TypedValue::List(ints(&[1, 2]))
    );
    assert_eq!(coerce(json!([1, 2]), "set"), TypedValue::set(ints(&[2, 1])));
    assert_eq!(
        coerce(json!(["ez"]), "frozenset"),
        TypedValue::frozen_set([TypedValue::from("ez")])
    );
    assert_eq!(
        coerce(json!("test"), "frozenset"),
        TypedValue::frozen_set(["t", "e", "s"].map(TypedValue::from))
    );
}

#[test]
fn test_tuple_arity_mismatch() {
    assert_eq!(
        failure(json!(["1", "2", "3"]), "tuple[int]"),
        CoercionFailure::ArityMismatch {
            expected: 1,
            actual: 3
        }
    );
}

#[test]
fn test_tuple_pairwise() {
    let naive = NaiveDate::from_ymd_opt(2023, 10, 22)
        .unwrap()
        .and_hms_opt(19, 50, 29)
        .unwrap();
    assert_eq!(
        coerce(json!(["2023-10-22T19:50:29", "5"]), "tuple[datetime, int]"),
        TypedValue::Tuple(vec![
            TypedValue::DateTime(Instant::Naive(naive)),
            TypedValue::Int(5)
        ])
    );

    let typed = TypedValue::DateTime(Instant::Naive(sample_naive()));
    let mixed = TypedValue::List(vec![typed.clone(), TypedValue::from("5")]);
    assert_eq!(
        coerce(mixed, "tuple[datetime, int]"),
        TypedValue::Tuple(vec![typed, TypedValue::Int(5)])
    );

    assert_eq!(coerce(json!(["1"]), "tuple[int]"), TypedValue::Tuple(ints(&[1])));
    assert_eq!(
        coerce(TypedValue::set([TypedValue::Int(5)]), "tuple[int]"),
        TypedValue::Tuple(ints(&[5]))
    );
}

#[test]
fn test_tuple_element_failure() {
    assert!(matches!(
        failure(json!([5, "str"]), "tuple[str, int]"),
        CoercionFailure::Conversion { ref target, .. } if target == "int"
    ));
}

#[test]
fn test_nested_lists() {
    assert_eq!(
        coerce(json!([["1", "2"], ["3"]]), "list[list[int]]"),
        TypedValue::List(vec![
            TypedValue::List(ints(&[1, 2])),
            TypedValue::List(ints(&[3]))
        ])
    );
    assert_eq!(
        coerce(json!([5, 6.0, "10"]), "list[int]"),
        TypedValue::List(ints(&[5, 6, 10]))
    );
}

#[test]
fn test_nested_sets() {
    assert_eq!(
        coerce(json!([5, 6.0, "10"]), "set[int]"),
        TypedValue::set(ints(&[10, 6, 5]))
    );
    assert_eq!(
        coerce(json!(["1", "1", 1]), "frozenset[int]"),
        TypedValue::frozen_set(ints(&[1]))
    );
    assert_eq!(
        coerce(json!([[1, 2], ["3", "4"]]), "list[set[int]]"),
        TypedValue::List(vec![
            TypedValue::set(ints(&[1, 2])),
            TypedValue::set(ints(&[3, 4]))
        ])
    );
}

#[test]
fn test_nested_tuples_of_strings() {
    let strs = |items: &[&str]| items.iter().copied().map(TypedValue::from).collect::<Vec<_>>();
    assert_eq!(
        coerce(json!([[[5, 10]], [15]]), "tuple[tuple[tuple[str, str]], tuple[str]]"),
        TypedValue::Tuple(vec![
            TypedValue::Tuple(vec![TypedValue::Tuple(strs(&["5", "10"]))]),
            TypedValue::Tuple(strs(&["15"])),
        ])
    );
}

#[test]
fn test_union_order_is_deterministic() {
    assert_eq!(coerce(json!("15"), "int | str"), TypedValue::Int(15));
    assert_eq!(coerce(json!("15"), "str | int"), TypedValue::from("15"));

    for expr in ["Union[int, str, float]", "int | str | float"] {
        assert_eq!(coerce(json!("test"), expr), TypedValue::from("test"));
        assert_eq!(coerce(json!(15), expr), TypedValue::Int(15));
        assert_eq!(coerce(json!(6.3), expr), TypedValue::Int(6));
    }
}

#[test]
fn test_optional_accepts_anything() {
    assert_eq!(coerce(json!(null), "Optional[int]"), TypedValue::None);
    assert_eq!(coerce(json!("7"), "Optional[int]"), TypedValue::Int(7));
    assert_eq!(coerce(json!("seven"), "Optional[int]"), TypedValue::None);
}

#[test]
fn test_union_collects_every_attempt() {
    match failure(json!([1]), "int | date") {
        CoercionFailure::AllAlternativesFailed { attempts } => assert_eq!(attempts.len(), 2),
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_unregistered_type() {
    assert_eq!(
        failure(json!({"name": "rex"}), "Pet"),
        CoercionFailure::UnregisteredType {
            head: TypeHead::custom("Pet")
        }
    );
}

#[test]
fn test_error_keeps_top_level_context() {
    let declared: DeclaredType = "list[tuple[int, date]]".parse().unwrap();
    let err = Coercer::default()
        .coerce(json!([[1, "2023-10-22"], [2, "not a date"]]), &declared)
        .unwrap_err();

    assert_eq!(err.declared(), &declared);
    assert_eq!(
        err.value(),
        &TypedValue::from(json!([[1, "2023-10-22"], [2, "not a date"]]))
    );
    assert!(matches!(
        err.cause(),
        CoercionFailure::Conversion { target, .. } if target == "date"
    ));
    let source = std::error::Error::source(&err).expect("cause is exposed as source");
    assert!(source.to_string().contains("not a date"));
}
