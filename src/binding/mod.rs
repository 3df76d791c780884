//! # Binding Module
//!
//! Turns a declared endpoint into a network call and feeds the decoded
//! response through the coercion engine exactly once.
//!
//! ## Flow
//!
//! 1. [`build_path`] substitutes `{name}` placeholders from the call
//!    arguments and removes them.
//! 2. [`build_body`] assembles the body from the declared body parameters
//!    ([`BodyStyle::Embedded`] object or [`BodyStyle::Flat`] string) and
//!    removes them.
//! 3. The remaining arguments become query parameters and the [`Client`]
//!    issues the request.
//! 4. The decoded body is coerced into the endpoint's declared return type.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use restmodels::binding::{CallArgs, Endpoint, Resource};
//! use restmodels::config::ClientConfig;
//! use restmodels::descriptor::DeclaredType;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let resource = Resource::http(&ClientConfig::new("https://api.example.com"))?;
//! let list_tags = Endpoint::get("/pets/{id}/tags")
//!     .returns(DeclaredType::set_of(DeclaredType::str()))
//!     .build()?;
//!
//! let args = CallArgs::from([("id".to_string(), json!(42))]);
//! let tags = list_tags.call(&resource, args)?;
//! println!("{tags}");
//! # Ok(())
//! # }
//! ```
//!
//! Streaming, authentication and retries are not handled here.

mod body;
mod client;
mod endpoint;
mod error;
mod path;

pub use body::{build_body, BodyStyle};
pub use client::{Client, HttpClient};
pub use endpoint::{Endpoint, EndpointBuilder, Resource};
pub use error::BindingError;
pub use path::{build_path, placeholders};

use indexmap::IndexMap;
use serde_json::Value;

/// Named call arguments, in call order.
pub type CallArgs = IndexMap<String, Value>;

/// Text form of an argument for paths, query strings and flat bodies:
/// strings are used raw, everything else as JSON text.
pub(crate) fn render_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
