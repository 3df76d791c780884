//! Union parser: ordered first-match over the alternatives.

use crate::coercion::{CoercionFailure, Coercer};
use crate::descriptor::TypeDescriptor;
use crate::value::TypedValue;
use tracing::debug;

/// Try each alternative in declared order and return the first success.
///
/// Rejections are held back until every alternative has failed, then
/// reported together. An alternative of `None` always succeeds, so it only
/// makes sense as the last alternative.
pub fn parse_union(
    value: &TypedValue,
    descriptor: &TypeDescriptor,
    coercer: &Coercer,
) -> Result<TypedValue, CoercionFailure> {
    let mut attempts = Vec::with_capacity(descriptor.params.len());
    for alternative in &descriptor.params {
        match coercer.coerce_descriptor(value, alternative) {
            Ok(coerced) => return Ok(coerced),
            Err(failure) => {
                debug!(
                    alternative = %alternative,
                    error = %failure,
                    "union alternative rejected"
                );
                attempts.push(failure);
            }
        }
    }
    Err(CoercionFailure::AllAlternativesFailed { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{resolve, DeclaredType};

    fn run(value: TypedValue, expr: &str) -> Result<TypedValue, CoercionFailure> {
        let declared: DeclaredType = expr.parse().unwrap();
        parse_union(&value, &resolve(&declared), &Coercer::default())
    }

    #[test]
    fn test_first_success_wins() {
        assert_eq!(run("15".into(), "int | str").unwrap(), TypedValue::Int(15));
        assert_eq!(run("15".into(), "str | int").unwrap(), TypedValue::from("15"));
        assert_eq!(run("test".into(), "int | str | float").unwrap(), TypedValue::from("test"));
        assert_eq!(run(6.3.into(), "int | str | float").unwrap(), TypedValue::Int(6));
    }

    #[test]
    fn test_all_failures_are_collected_in_order() {
        let err = run("abc".into(), "int | float | date").unwrap_err();
        let CoercionFailure::AllAlternativesFailed { attempts } = err else {
            panic!("expected an aggregate failure");
        };
        let targets: Vec<_> = attempts
            .iter()
            .map(|a| match a {
                CoercionFailure::Conversion { target, .. } => target.as_str(),
                _ => "?",
            })
            .collect();
        assert_eq!(targets, ["int", "float", "date"]);
    }

    #[test]
    fn test_optional_falls_back_to_none() {
        assert_eq!(run("x".into(), "Optional[int]").unwrap(), TypedValue::None);
        assert_eq!(run("7".into(), "Optional[int]").unwrap(), TypedValue::Int(7));
    }

    #[test]
    fn test_empty_union_fails_without_attempts() {
        let descriptor = resolve(&DeclaredType::Union(Vec::new()));
        let err = parse_union(&TypedValue::Int(1), &descriptor, &Coercer::default()).unwrap_err();
        assert_eq!(
            err,
            CoercionFailure::AllAlternativesFailed {
                attempts: Vec::new()
            }
        );
    }
}
