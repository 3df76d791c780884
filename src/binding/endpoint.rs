//! Declarative endpoints: a path template, a body strategy and a declared
//! return type, bound to a [`Resource`] at call time.

use super::body::{build_body, BodyStyle};
use super::client::{Client, HttpClient};
use super::path::build_path;
use super::{BindingError, CallArgs};
use crate::coercion::Coercer;
use crate::config::ClientConfig;
use crate::descriptor::DeclaredType;
use crate::value::TypedValue;
use http::Method;
use std::sync::Arc;
use tracing::{debug, info_span};

/// A transport paired with the coercion engine its endpoints use.
#[derive(Clone)]
pub struct Resource {
    client: Arc<dyn Client>,
    coercer: Arc<Coercer>,
}

impl Resource {
    pub fn new(client: Arc<dyn Client>, coercer: Arc<Coercer>) -> Self {
        Self { client, coercer }
    }

    /// Resource over an [`HttpClient`] with an engine on the process-wide
    /// general registry.
    pub fn http(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(config)?;
        Ok(Self::new(Arc::new(client), Arc::new(Coercer::default())))
    }

    #[must_use]
    pub fn client(&self) -> &dyn Client {
        self.client.as_ref()
    }

    #[must_use]
    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("coercer", &self.coercer)
            .finish_non_exhaustive()
    }
}

/// A bound endpoint. Build one with [`Endpoint::get`], [`Endpoint::post`]
/// and friends.
///
/// ```
/// use restmodels::binding::{BodyStyle, Endpoint};
/// use restmodels::descriptor::DeclaredType;
///
/// let endpoint = Endpoint::post("/pets/{id}/rename")
///     .body(["name"])
///     .body_style(BodyStyle::Flat)
///     .returns(DeclaredType::bool())
///     .build()
///     .unwrap();
/// assert_eq!(endpoint.path(), "/pets/{id}/rename");
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    path: String,
    body_params: Vec<String>,
    body_style: BodyStyle,
    returns: DeclaredType,
}

impl Endpoint {
    pub fn builder(method: Method, path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder {
            method,
            path: path.into(),
            body_params: Vec::new(),
            body_style: BodyStyle::default(),
            returns: DeclaredType::None,
        }
    }

    pub fn get(path: impl Into<String>) -> EndpointBuilder {
        Self::builder(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> EndpointBuilder {
        Self::builder(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> EndpointBuilder {
        Self::builder(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> EndpointBuilder {
        Self::builder(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> EndpointBuilder {
        Self::builder(Method::DELETE, path)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn body_params(&self) -> &[String] {
        &self.body_params
    }

    #[must_use]
    pub fn body_style(&self) -> BodyStyle {
        self.body_style
    }

    #[must_use]
    pub fn returns(&self) -> &DeclaredType {
        &self.returns
    }

    /// Issue the call and coerce the response into the declared return type.
    ///
    /// Path placeholders and body parameters are taken out of `args`; the
    /// remaining arguments become the query string. `GET` requests send no
    /// body, and their body parameters are dropped rather than leaked into
    /// the query.
    pub fn call(&self, resource: &Resource, mut args: CallArgs) -> Result<TypedValue, BindingError> {
        let span = info_span!(
            "endpoint_call",
            method = %self.method,
            path = %self.path,
            returns = %self.returns
        );
        let _guard = span.enter();

        let path = build_path(&self.path, &mut args, true)?;
        let body = build_body(&self.body_params, &mut args, self.body_style, true)?;
        let body = (self.method != Method::GET).then_some(body);
        debug!(path = %path, query_args = args.len(), "request assembled");

        let raw = resource
            .client()
            .request(&self.method, &path, &args, body.as_ref())
            .map_err(BindingError::Transport)?;
        Ok(resource.coercer().coerce(raw, &self.returns)?)
    }
}

/// Builder for [`Endpoint`].
#[derive(Debug, Clone)]
#[must_use]
pub struct EndpointBuilder {
    method: Method,
    path: String,
    body_params: Vec<String>,
    body_style: BodyStyle,
    returns: DeclaredType,
}

impl EndpointBuilder {
    /// Names of the arguments that make up the body.
    pub fn body<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn body_style(mut self, style: BodyStyle) -> Self {
        self.body_style = style;
        self
    }

    /// Declared return type. Defaults to `None`.
    pub fn returns(mut self, declared: DeclaredType) -> Self {
        self.returns = declared;
        self
    }

    /// Finish the endpoint. A flat body must name exactly one parameter.
    pub fn build(self) -> Result<Endpoint, BindingError> {
        if self.body_style == BodyStyle::Flat && self.body_params.len() != 1 {
            return Err(BindingError::FlatBodyArity {
                count: self.body_params.len(),
            });
        }
        Ok(Endpoint {
            method: self.method,
            path: self.path,
            body_params: self.body_params,
            body_style: self.body_style,
            returns: self.returns,
        })
    }
}
