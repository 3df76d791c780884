//! Container parsers: `tuple`, `list`, `set`, `frozenset`.
//!
//! Without parameters a container is converted shallowly: the source
//! elements are collected as they are. With parameters every element is
//! converted through the engine, positionally for tuples and against the
//! single item type for the other kinds.

use crate::coercion::{CoercionFailure, Coercer};
use crate::descriptor::{ContainerKind, TypeDescriptor};
use crate::value::TypedValue;
use indexmap::IndexSet;
use std::borrow::Cow;
use std::sync::Arc;

pub fn parse_container(
    kind: ContainerKind,
    value: &TypedValue,
    descriptor: &TypeDescriptor,
    coercer: &Coercer,
) -> Result<TypedValue, CoercionFailure> {
    let items = elements(value, descriptor)?;
    let params = &descriptor.params;

    if kind == ContainerKind::Tuple {
        if params.is_empty() {
            return Ok(TypedValue::Tuple(
                items.into_iter().map(Cow::into_owned).collect(),
            ));
        }
        if items.len() != params.len() {
            return Err(CoercionFailure::ArityMismatch {
                expected: params.len(),
                actual: items.len(),
            });
        }
        let converted = items
            .iter()
            .zip(params)
            .map(|(item, param)| coercer.coerce_descriptor(item, param))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(TypedValue::Tuple(converted));
    }

    let converted: Vec<TypedValue> = match params.as_slice() {
        [] => items.into_iter().map(Cow::into_owned).collect(),
        [item_type] => items
            .iter()
            .map(|item| coercer.coerce_descriptor(item, item_type))
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(CoercionFailure::conversion(
                value,
                descriptor,
                format!(
                    "`{}` takes a single item type, got {}",
                    kind.name(),
                    params.len()
                ),
            ))
        }
    };

    Ok(match kind {
        ContainerKind::List => TypedValue::List(converted),
        ContainerKind::Set => TypedValue::Set(converted.into_iter().collect()),
        ContainerKind::FrozenSet => {
            TypedValue::FrozenSet(Arc::new(converted.into_iter().collect::<IndexSet<_>>()))
        }
        ContainerKind::Tuple => TypedValue::Tuple(converted),
    })
}

/// Elements of an iterable source, in iteration order.
///
/// Strings yield one-character strings, bytes yield their byte values and
/// maps yield their keys.
fn elements<'v>(
    value: &'v TypedValue,
    descriptor: &TypeDescriptor,
) -> Result<Vec<Cow<'v, TypedValue>>, CoercionFailure> {
    let items = match value {
        TypedValue::Tuple(items) | TypedValue::List(items) => {
            items.iter().map(Cow::Borrowed).collect()
        }
        TypedValue::Set(items) => items.iter().map(Cow::Borrowed).collect(),
        TypedValue::FrozenSet(items) => items.iter().map(Cow::Borrowed).collect(),
        TypedValue::Str(s) => s
            .chars()
            .map(|c| Cow::Owned(TypedValue::Str(c.to_string())))
            .collect(),
        TypedValue::Bytes(bytes) => bytes
            .iter()
            .map(|b| Cow::Owned(TypedValue::Int(i64::from(*b))))
            .collect(),
        TypedValue::Map(entries) => entries
            .keys()
            .map(|k| Cow::Owned(TypedValue::Str(k.clone())))
            .collect(),
        other => {
            return Err(CoercionFailure::conversion(
                value,
                descriptor,
                format!("{} is not iterable", other.kind()),
            ))
        }
    };
    Ok(items)
}
