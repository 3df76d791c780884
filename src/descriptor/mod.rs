//! # Descriptor Module
//!
//! Declared target types and their decomposition into dispatchable
//! [`TypeDescriptor`]s.
//!
//! ## Overview
//!
//! A [`DeclaredType`] is what the caller asks for: `list[int]`,
//! `tuple[datetime, int]`, `int | str`, or a caller-registered tag. It is an
//! explicit value built in code (or parsed from an annotation string), never
//! discovered by reflection.
//!
//! [`resolve`] turns a declared type into a [`TypeDescriptor`]: a *head*
//! ([`TypeHead`], the registry dispatch key) plus an ordered list of nested
//! parameter descriptors. Descriptors are built fresh for each coercion call
//! and discarded afterwards.
//!
//! ```
//! use restmodels::descriptor::{resolve, ContainerKind, DeclaredType, TypeHead};
//!
//! let declared: DeclaredType = "list[list[int]]".parse().unwrap();
//! let descriptor = resolve(&declared);
//! assert_eq!(descriptor.head, TypeHead::Container(ContainerKind::List));
//! assert_eq!(descriptor.params.len(), 1);
//! ```
//!
//! ## Unions
//!
//! A union resolves to the `Union` head with one parameter per alternative,
//! in declared left-to-right order. The order matters: the engine tries the
//! alternatives in that order and keeps the first success.

mod core;
mod parse;


pub use self::core::{
    resolve, ContainerKind, DeclaredType, ScalarKind, TemporalKind, TypeDescriptor, TypeHead,
    TypeTag,
};
pub use self::parse::TypeExprError;
