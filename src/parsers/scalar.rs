//! Scalar parsers: `str`, `int`, `float`, `decimal`, `bool`, `bytes`.

use crate::coercion::CoercionFailure;
use crate::value::TypedValue;
use chrono::TimeDelta;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Upper bound (exclusive) of floats that truncate into an `i64`.
const I64_FLOAT_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Any value, through its string representation.
#[must_use]
pub fn parse_str(value: &TypedValue) -> TypedValue {
    match value {
        TypedValue::Str(s) => TypedValue::Str(s.clone()),
        other => TypedValue::Str(other.to_string()),
    }
}

pub fn parse_int(value: &TypedValue) -> Result<TypedValue, CoercionFailure> {
    let out = match value {
        TypedValue::Int(i) => *i,
        TypedValue::Bool(b) => i64::from(*b),
        TypedValue::Str(s) => s.trim().parse::<i64>().map_err(|e| {
            CoercionFailure::conversion(value, "int", format!("invalid integer literal: {e}"))
        })?,
        TypedValue::Float(f) => {
            if !f.is_finite() {
                return Err(CoercionFailure::conversion(
                    value,
                    "int",
                    "cannot convert a non-finite float",
                ));
            }
            let truncated = f.trunc();
            if truncated < -I64_FLOAT_LIMIT || truncated >= I64_FLOAT_LIMIT {
                return Err(CoercionFailure::conversion(value, "int", "out of range"));
            }
            truncated as i64
        }
        TypedValue::Decimal(d) => d
            .trunc()
            .to_i64()
            .ok_or_else(|| CoercionFailure::conversion(value, "int", "out of range"))?,
        other => {
            return Err(CoercionFailure::conversion(
                value,
                "int",
                format!("{} is not a number", other.kind()),
            ))
        }
    };
    Ok(TypedValue::Int(out))
}

pub fn parse_float(value: &TypedValue) -> Result<TypedValue, CoercionFailure> {
    let out = match value {
        TypedValue::Float(f) => *f,
        TypedValue::Int(i) => *i as f64,
        TypedValue::Bool(b) => f64::from(u8::from(*b)),
        TypedValue::Decimal(d) => d
            .to_f64()
            .ok_or_else(|| CoercionFailure::conversion(value, "float", "out of range"))?,
        TypedValue::Str(s) => s.trim().parse::<f64>().map_err(|e| {
            CoercionFailure::conversion(value, "float", format!("invalid float literal: {e}"))
        })?,
        other => {
            return Err(CoercionFailure::conversion(
                value,
                "float",
                format!("{} is not a number", other.kind()),
            ))
        }
    };
    Ok(TypedValue::Float(out))
}

/// Exact decimal conversion. Sources that would need rounding to fit the
/// 28-digit decimal range fail instead of losing digits.
pub fn parse_decimal(value: &TypedValue) -> Result<TypedValue, CoercionFailure> {
    let out = match value {
        TypedValue::Decimal(d) => *d,
        TypedValue::Int(i) => Decimal::from(*i),
        TypedValue::Bool(b) => Decimal::from(u8::from(*b)),
        TypedValue::Str(s) => exact_decimal(s.trim())
            .map_err(|reason| CoercionFailure::conversion(value, "decimal", reason))?,
        TypedValue::Float(f) => {
            if !f.is_finite() {
                return Err(CoercionFailure::conversion(
                    value,
                    "decimal",
                    "cannot convert a non-finite float",
                ));
            }
            // Rust's float Display is the shortest text that round-trips.
            exact_decimal(&f.to_string())
                .map_err(|reason| CoercionFailure::conversion(value, "decimal", reason))?
        }
        other => {
            return Err(CoercionFailure::conversion(
                value,
                "decimal",
                format!("{} is not a number", other.kind()),
            ))
        }
    };
    Ok(TypedValue::Decimal(out))
}

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$")
        .expect("decimal literal regex should be valid")
});

const PRECISION_LOSS: &str = "does not fit a 28-digit decimal without rounding";

fn exact_decimal(text: &str) -> Result<Decimal, &'static str> {
    if !DECIMAL_LITERAL.is_match(text) {
        return Err("invalid decimal literal");
    }
    let parsed = Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| PRECISION_LOSS)?;
    if significant_digits(text) != significant_digits(&parsed.normalize().to_string()) {
        return Err(PRECISION_LOSS);
    }
    Ok(parsed)
}

/// Mantissa digits with the sign, point, exponent and the leading and
/// trailing zeros removed.
fn significant_digits(text: &str) -> String {
    let mantissa = text
        .split(['e', 'E'])
        .next()
        .unwrap_or_default()
        .trim_start_matches(['+', '-']);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    digits.trim_matches('0').to_string()
}

/// Truthiness of any value. Never fails.
#[must_use]
pub fn parse_bool(value: &TypedValue) -> TypedValue {
    let truthy = match value {
        TypedValue::None => false,
        TypedValue::Bool(b) => *b,
        TypedValue::Int(i) => *i != 0,
        TypedValue::Float(f) => *f != 0.0,
        TypedValue::Decimal(d) => !d.is_zero(),
        TypedValue::Str(s) => !s.is_empty(),
        TypedValue::Bytes(b) => !b.is_empty(),
        TypedValue::DateTime(_) | TypedValue::Date(_) | TypedValue::Time(_) => true,
        TypedValue::Duration(d) => *d != TimeDelta::zero(),
        TypedValue::Tuple(items) | TypedValue::List(items) => !items.is_empty(),
        TypedValue::Set(items) => !items.is_empty(),
        TypedValue::FrozenSet(items) => !items.is_empty(),
        TypedValue::Map(entries) => !entries.is_empty(),
    };
    TypedValue::Bool(truthy)
}

/// UTF-8 encoding of a string source. Every other source is rejected.
pub fn parse_bytes(value: &TypedValue) -> Result<TypedValue, CoercionFailure> {
    match value {
        TypedValue::Str(s) => Ok(TypedValue::Bytes(s.as_bytes().to_vec())),
        other => Err(CoercionFailure::conversion(
            value,
            "bytes",
            format!("only str sources are accepted, got {}", other.kind()),
        )),
    }
}
