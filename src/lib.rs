//! # restmodels
//!
//! **restmodels** converts loosely typed REST responses into strongly typed value trees,
//! driven by a declared return type.
//!
//! ## Overview
//!
//! A response body arrives as JSON: strings, numbers, arrays and objects. Callers want
//! datetimes, decimals, sets and tuples. restmodels closes that gap with a small coercion
//! engine: declare what an endpoint returns, and the engine walks the decoded body into a
//! [`TypedValue`] of that shape, or reports exactly which value could not be converted and why.
//!
//! ## Architecture
//!
//! - **[`value`]** - The [`TypedValue`] tree the engine consumes and produces
//! - **[`descriptor`]** - Declared types, type expressions and the descriptor resolver
//! - **[`registry`]** - The two-tier (local, general) parser registry
//! - **[`coercion`]** - The [`Coercer`] engine and its error taxonomy
//! - **[`parsers`]** - Builtin parsers for scalars, temporals, containers and unions
//! - **[`binding`]** - Declarative endpoints: path/body/query assembly and transport
//! - **[`config`]** - YAML and environment configuration for the HTTP client
//! - **[`logging`]** - Structured logging setup
//! - **[`cli`]** - The `restmodels` command-line front end
//!
//! ### Coercion Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Engine as Coercer
//!     participant Resolver as descriptor::resolve
//!     participant Registry as Local/General registry
//!     participant Parser
//!
//!     Caller->>Engine: coerce(value, declared)
//!     Engine->>Resolver: resolve(declared)
//!     Resolver-->>Engine: TypeDescriptor
//!     alt value already is the declared type
//!         Engine-->>Caller: value unchanged
//!     else
//!         Engine->>Registry: lookup(head)
//!         Registry-->>Engine: parser (local tier first)
//!         Engine->>Parser: parse(value, descriptor, engine)
//!         Parser->>Engine: coerce_descriptor(element, param)
//!         Parser-->>Engine: TypedValue or CoercionFailure
//!         Engine-->>Caller: TypedValue or CoercionError
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use restmodels::{Coercer, DeclaredType, TypedValue};
//! use serde_json::json;
//!
//! let coercer = Coercer::default();
//! let declared: DeclaredType = "list[tuple[date, int]]".parse().unwrap();
//!
//! let out = coercer
//!     .coerce(json!([["2023-10-22", "5"]]), &declared)
//!     .unwrap();
//! assert_eq!(out.to_string(), r#"[["2023-10-22",5]]"#);
//! assert!(matches!(out, TypedValue::List(_)));
//! ```
//!
//! ### Custom Types
//!
//! Parsers are registered per type head, either for one engine (local tier) or for every
//! engine sharing a [`GeneralRegistry`] (general tier). A parser may call back into the
//! engine for nested values:
//!
//! ```rust
//! use restmodels::coercion::CoercionFailure;
//! use restmodels::descriptor::{DeclaredType, TypeDescriptor, TypeHead};
//! use restmodels::{Coercer, TypedValue};
//!
//! let mut coercer = Coercer::default();
//! coercer.register_local(
//!     TypeHead::custom("Celsius"),
//!     |value: &TypedValue, _: &TypeDescriptor, _: &Coercer| match value {
//!         TypedValue::Float(f) => Ok(TypedValue::Float(*f)),
//!         TypedValue::Int(i) => Ok(TypedValue::Float(*i as f64)),
//!         other => Err(CoercionFailure::conversion(other, "Celsius", "expected a number")),
//!     },
//! );
//! let out = coercer.coerce(21_i64, &DeclaredType::custom("Celsius")).unwrap();
//! assert_eq!(out, TypedValue::Float(21.0));
//! ```
//!
//! ### Bound Endpoints
//!
//! See [`binding`] for declaring endpoints whose responses are coerced on arrival.
//!
//! ## Logging
//!
//! The engine emits `tracing` events at `debug` and `trace` level. Install a subscriber
//! with [`logging::init_logging`], which honors `RESTMODELS_LOG_LEVEL`,
//! `RESTMODELS_LOG_FORMAT` (`json` or `pretty`) and `RESTMODELS_LOG_TARGET_FILTER`.

pub mod binding;
pub mod cli;
pub mod coercion;
pub mod config;
pub mod descriptor;
pub mod ids;
pub mod logging;
pub mod parsers;
pub mod registry;
pub mod value;

pub use binding::{BindingError, BodyStyle, Endpoint, Resource};
pub use coercion::{Coercer, CoercionError, CoercionFailure};
pub use config::ClientConfig;
pub use descriptor::{resolve, DeclaredType, TypeDescriptor, TypeHead};
pub use registry::{GeneralRegistry, LocalRegistry, Tier, TypeParser};
pub use value::TypedValue;
