//! # Coercion Module
//!
//! The typed response coercion engine. Given a decoded value tree and a
//! [`DeclaredType`](crate::descriptor::DeclaredType), [`Coercer::coerce`]
//! produces a [`TypedValue`](crate::value::TypedValue) matching the declared
//! shape, recursing through arbitrarily nested containers and unions.
//!
//! ## Algorithm
//!
//! 1. **Fast path** - a concrete, non-parametrized target whose value already
//!    has exactly that type is returned unchanged.
//! 2. **Resolve** - the declared type becomes a
//!    [`TypeDescriptor`](crate::descriptor::TypeDescriptor).
//! 3. **Dispatch** - the head is looked up local tier first, then general.
//! 4. **Invoke** - the parser receives the value, the descriptor and the
//!    engine, and converts nested values through
//!    [`Coercer::coerce_descriptor`].
//! 5. **Wrap** - any failure becomes one [`CoercionError`] holding the
//!    top-level value and declared type, with the root [`CoercionFailure`]
//!    as its source.
//!
//! ## Error Taxonomy
//!
//! | Failure | Raised when |
//! |---|---|
//! | `UnregisteredType` | neither tier holds a parser for the head |
//! | `Conversion` | a parser cannot interpret its source value |
//! | `ArityMismatch` | a parametrized tuple gets the wrong element count |
//! | `AllAlternativesFailed` | every alternative of a union failed |
//!
//! Failures are never retried. Union resolution is the only place where
//! failures are held back, until every alternative has been tried.
//!
//! ## Concurrency
//!
//! `coerce` takes `&self` and never mutates shared state, so a `Coercer` can
//! be shared across threads once registration is finished.

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::{is_exact_instance, Coercer};
pub use self::error::{CoercionError, CoercionFailure};
