//! # Value Module
//!
//! [`TypedValue`] is the single owned value tree the coercion engine reads and
//! writes. Decoded response bodies enter as the JSON-shaped subset (`None`,
//! `Bool`, `Int`, `Float`, `Str`, `List`, `Map`); coercion produces the richer
//! variants (`Decimal`, `Bytes`, temporals, `Tuple`, `Set`, `FrozenSet`).
//!
//! Because input and output share one type, an already-coerced value can be
//! fed back into the engine and is returned unchanged by the fast path.
//!
//! ## Equality and hashing
//!
//! Values are stored in sets, so `TypedValue` implements `Eq` and `Hash`.
//! Floats compare by their canonical bit pattern: `-0.0 == 0.0` and
//! `NaN == NaN`. Sets and maps compare without regard to order, and their
//! hash only covers the length.
//!
//! ## String representation
//!
//! `Display` is the representation used by the `str` parser and by path
//! substitution in the binding layer: strings are written raw, temporals as
//! ISO-8601 text, everything else as its JSON text.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Format used when rendering naive date-times.
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// Format used when rendering times of day.
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// A date-time, with or without a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instant {
    /// Civil date-time without offset, e.g. `2023-10-22T19:50:29.182993`
    Naive(NaiveDateTime),
    /// Date-time with a fixed UTC offset, e.g. `2023-10-22T19:50:29Z`
    Offset(DateTime<FixedOffset>),
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instant::Naive(dt) => write!(f, "{}", dt.format(NAIVE_DATETIME_FORMAT)),
            Instant::Offset(dt) => f.write_str(&dt.to_rfc3339()),
        }
    }
}

/// A time of day with an optional UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    pub time: NaiveTime,
    pub offset: Option<FixedOffset>,
}

impl TimeOfDay {
    #[must_use]
    pub fn naive(time: NaiveTime) -> Self {
        Self { time, offset: None }
    }

    /// Whole-hour time of day without offset, `None` for hours past 23.
    #[must_use]
    pub fn from_hour(hour: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, 0, 0).map(Self::naive)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format(TIME_FORMAT))?;
        match self.offset {
            Some(offset) => write!(f, "{offset}"),
            None => Ok(()),
        }
    }
}

/// Typed value tree: decoded input and coerced output alike.
#[derive(Debug, Clone)]
pub enum TypedValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Str(String),
    Bytes(Vec<u8>),
    DateTime(Instant),
    Date(NaiveDate),
    Time(TimeOfDay),
    Duration(TimeDelta),
    /// Fixed-length ordered structure
    Tuple(Vec<TypedValue>),
    List(Vec<TypedValue>),
    /// Deduplicated, insertion ordered
    Set(IndexSet<TypedValue>),
    /// Immutable, shareable set
    FrozenSet(Arc<IndexSet<TypedValue>>),
    /// String-keyed mapping as produced by JSON objects
    Map(IndexMap<String, TypedValue>),
}

impl TypedValue {
    /// Short name of the value's kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TypedValue::None => "none",
            TypedValue::Bool(_) => "bool",
            TypedValue::Int(_) => "int",
            TypedValue::Float(_) => "float",
            TypedValue::Decimal(_) => "decimal",
            TypedValue::Str(_) => "str",
            TypedValue::Bytes(_) => "bytes",
            TypedValue::DateTime(_) => "datetime",
            TypedValue::Date(_) => "date",
            TypedValue::Time(_) => "time",
            TypedValue::Duration(_) => "timedelta",
            TypedValue::Tuple(_) => "tuple",
            TypedValue::List(_) => "list",
            TypedValue::Set(_) => "set",
            TypedValue::FrozenSet(_) => "frozenset",
            TypedValue::Map(_) => "map",
        }
    }

    /// Build a frozen set from any iterator of values.
    pub fn frozen_set<I>(items: I) -> Self
    where
        I: IntoIterator<Item = TypedValue>,
    {
        TypedValue::FrozenSet(Arc::new(items.into_iter().collect()))
    }

    /// Build a mutable set from any iterator of values.
    pub fn set<I>(items: I) -> Self
    where
        I: IntoIterator<Item = TypedValue>,
    {
        TypedValue::Set(items.into_iter().collect())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Render the value as a `serde_json::Value`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing into a Value is infallible for this tree: every map key is a String.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Canonical float bits: folds `-0.0` into `0.0` and every NaN into one pattern.
fn float_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

/// Order-independent digest of a collection: the wrapping sum of the
/// element hashes, mixed with the length.
fn unordered_hash<T: Hash>(items: impl ExactSizeIterator<Item = T>) -> u64 {
    let len = items.len() as u64;
    items.fold(len, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypedValue::None, TypedValue::None) => true,
            (TypedValue::Bool(a), TypedValue::Bool(b)) => a == b,
            (TypedValue::Int(a), TypedValue::Int(b)) => a == b,
            (TypedValue::Float(a), TypedValue::Float(b)) => float_bits(*a) == float_bits(*b),
            (TypedValue::Decimal(a), TypedValue::Decimal(b)) => a == b,
            (TypedValue::Str(a), TypedValue::Str(b)) => a == b,
            (TypedValue::Bytes(a), TypedValue::Bytes(b)) => a == b,
            (TypedValue::DateTime(a), TypedValue::DateTime(b)) => a == b,
            (TypedValue::Date(a), TypedValue::Date(b)) => a == b,
            (TypedValue::Time(a), TypedValue::Time(b)) => a == b,
            (TypedValue::Duration(a), TypedValue::Duration(b)) => a == b,
            (TypedValue::Tuple(a), TypedValue::Tuple(b))
            | (TypedValue::List(a), TypedValue::List(b)) => a == b,
            (TypedValue::Set(a), TypedValue::Set(b)) => a == b,
            (TypedValue::FrozenSet(a), TypedValue::FrozenSet(b)) => a == b,
            (TypedValue::Map(a), TypedValue::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypedValue {}

impl Hash for TypedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TypedValue::None => {}
            TypedValue::Bool(b) => b.hash(state),
            TypedValue::Int(i) => i.hash(state),
            TypedValue::Float(f) => float_bits(*f).hash(state),
            TypedValue::Decimal(d) => d.hash(state),
            TypedValue::Str(s) => s.hash(state),
            TypedValue::Bytes(b) => b.hash(state),
            TypedValue::DateTime(dt) => dt.hash(state),
            TypedValue::Date(d) => d.hash(state),
            TypedValue::Time(t) => t.hash(state),
            TypedValue::Duration(d) => d.hash(state),
            TypedValue::Tuple(items) | TypedValue::List(items) => items.hash(state),
            // Unordered containers: equality ignores order, so element hashes are summed.
            TypedValue::Set(items) => unordered_hash(items.iter()).hash(state),
            TypedValue::FrozenSet(items) => unordered_hash(items.iter()).hash(state),
            TypedValue::Map(entries) => unordered_hash(entries.iter()).hash(state),
        }
    }
}

impl From<serde_json::Value> for TypedValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => TypedValue::None,
            Value::Bool(b) => TypedValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    TypedValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    TypedValue::Decimal(Decimal::from(u))
                } else {
                    TypedValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => TypedValue::Str(s),
            Value::Array(items) => {
                TypedValue::List(items.into_iter().map(TypedValue::from).collect())
            }
            Value::Object(map) => TypedValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, TypedValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Bool(b)
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Int(i)
    }
}

impl From<f64> for TypedValue {
    fn from(f: f64) -> Self {
        TypedValue::Float(f)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::Str(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::Str(s)
    }
}

impl From<Decimal> for TypedValue {
    fn from(d: Decimal) -> Self {
        TypedValue::Decimal(d)
    }
}

impl From<Instant> for TypedValue {
    fn from(i: Instant) -> Self {
        TypedValue::DateTime(i)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(d: NaiveDate) -> Self {
        TypedValue::Date(d)
    }
}

impl From<TimeOfDay> for TypedValue {
    fn from(t: TimeOfDay) -> Self {
        TypedValue::Time(t)
    }
}

impl From<TimeDelta> for TypedValue {
    fn from(d: TimeDelta) -> Self {
        TypedValue::Duration(d)
    }
}

impl<T: Into<TypedValue>> From<Vec<T>> for TypedValue {
    fn from(items: Vec<T>) -> Self {
        TypedValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypedValue::None => serializer.serialize_none(),
            TypedValue::Bool(b) => serializer.serialize_bool(*b),
            TypedValue::Int(i) => serializer.serialize_i64(*i),
            TypedValue::Float(f) => serializer.serialize_f64(*f),
            TypedValue::Decimal(d) => serializer.collect_str(d),
            TypedValue::Str(s) => serializer.serialize_str(s),
            TypedValue::Bytes(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
            TypedValue::DateTime(dt) => serializer.collect_str(dt),
            TypedValue::Date(d) => serializer.collect_str(d),
            TypedValue::Time(t) => serializer.collect_str(t),
            TypedValue::Duration(d) => serializer.collect_str(d),
            TypedValue::Tuple(items) | TypedValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TypedValue::Set(items) => serialize_set(serializer, items),
            TypedValue::FrozenSet(items) => serialize_set(serializer, items),
            TypedValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

fn serialize_set<S: Serializer>(
    serializer: S,
    items: &IndexSet<TypedValue>,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::None => f.write_str("null"),
            TypedValue::Bool(b) => write!(f, "{b}"),
            TypedValue::Int(i) => write!(f, "{i}"),
            TypedValue::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            TypedValue::Decimal(d) => write!(f, "{d}"),
            TypedValue::Str(s) => f.write_str(s),
            TypedValue::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            TypedValue::DateTime(dt) => write!(f, "{dt}"),
            TypedValue::Date(d) => write!(f, "{d}"),
            TypedValue::Time(t) => write!(f, "{t}"),
            TypedValue::Duration(d) => write!(f, "{d}"),
            TypedValue::Tuple(_)
            | TypedValue::List(_)
            | TypedValue::Set(_)
            | TypedValue::FrozenSet(_)
            | TypedValue::Map(_) => {
                let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
        }
    }
}
