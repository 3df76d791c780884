//! # Parsers Module
//!
//! Builtin conversion routines, one per builtin [`TypeHead`].
//!
//! Builtin dispatch is a closed `match` inside [`Builtin`], which is
//! registered once under every head in [`TypeHead::BUILTINS`]. Custom heads
//! never reach it through the registry; they are served by caller parsers.
//!
//! | Head | Accepted sources |
//! |---|---|
//! | `str` | anything, via its string representation |
//! | `int` / `float` / `decimal` | numbers, booleans and numeric text |
//! | `bool` | anything, by truthiness |
//! | `bytes` | strings only (UTF-8) |
//! | `datetime` | datetimes and ISO-8601 text |
//! | `date` | ISO-8601 text |
//! | `time` | ISO-8601 text, or an int hour |
//! | `timedelta` | durations, or an int day count |
//! | `None` | anything; always yields `None` |
//! | `tuple` / `list` / `set` / `frozenset` | iterable sources |
//! | `Union` | whatever the first accepting alternative accepts |

mod container;
mod scalar;
mod temporal;
mod union;

pub use self::container::parse_container;
pub use self::scalar::{
    parse_bool, parse_bytes, parse_decimal, parse_float, parse_int, parse_str,
};
pub use self::temporal::{parse_date, parse_datetime, parse_duration, parse_time};
pub use self::union::parse_union;

use crate::coercion::{CoercionFailure, Coercer};
use crate::descriptor::{ScalarKind, TemporalKind, TypeDescriptor, TypeHead};
use crate::registry::{GeneralRegistry, ParserEntry, TypeParser};
use crate::value::TypedValue;
use std::sync::Arc;

/// Parser for every builtin head.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl TypeParser for Builtin {
    fn parse(
        &self,
        value: &TypedValue,
        descriptor: &TypeDescriptor,
        coercer: &Coercer,
    ) -> Result<TypedValue, CoercionFailure> {
        match &descriptor.head {
            TypeHead::Scalar(kind) => match kind {
                ScalarKind::Str => Ok(parse_str(value)),
                ScalarKind::Int => parse_int(value),
                ScalarKind::Bool => Ok(parse_bool(value)),
                ScalarKind::Float => parse_float(value),
                ScalarKind::Decimal => parse_decimal(value),
                ScalarKind::Bytes => parse_bytes(value),
            },
            TypeHead::Temporal(kind) => match kind {
                TemporalKind::DateTime => parse_datetime(value),
                TemporalKind::Date => parse_date(value),
                TemporalKind::Time => parse_time(value),
                TemporalKind::Duration => parse_duration(value),
            },
            TypeHead::Container(kind) => parse_container(*kind, value, descriptor, coercer),
            TypeHead::Union => parse_union(value, descriptor, coercer),
            TypeHead::None => Ok(TypedValue::None),
            TypeHead::Custom(_) => Err(CoercionFailure::UnregisteredType {
                head: descriptor.head.clone(),
            }),
        }
    }
}

/// Register [`Builtin`] under every builtin head of `registry`.
pub fn register_builtins(registry: &GeneralRegistry) {
    let entry: ParserEntry = Arc::new(Builtin);
    for head in TypeHead::BUILTINS {
        registry.register_entry(head, Arc::clone(&entry));
    }
}
