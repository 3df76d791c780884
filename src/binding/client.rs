//! Transport seam for bound endpoints.

use super::{render_arg, CallArgs};
use crate::config::ClientConfig;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use anyhow::{bail, Context, Result};
use http::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Longest response excerpt included in an error status message.
const ERROR_BODY_CHARS: usize = 200;

/// Issues one request and returns the decoded JSON body.
///
/// `query` holds the call arguments left after path and body assembly.
/// `body` is `None` for verbs that carry no body.
pub trait Client: Send + Sync {
    fn request(
        &self,
        method: &Method,
        path: &str,
        query: &CallArgs,
        body: Option<&Value>,
    ) -> Result<Value>;
}

/// Blocking HTTP transport built on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: Url,
    http: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid default header name '{name}'"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for default header '{name}'"))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url()?,
            http,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `path` with the query arguments appended.
    ///
    /// Arrays repeat their key once per element; `null` arguments and
    /// elements are skipped.
    pub fn url_for(&self, path: &str, query: &CallArgs) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid endpoint path '{path}'"))?;

        let mut pairs: Vec<(&str, String)> = Vec::new();
        for (key, value) in query {
            match value {
                Value::Null => {}
                Value::Array(items) => pairs.extend(
                    items
                        .iter()
                        .filter(|item| !item.is_null())
                        .map(|item| (key.as_str(), render_arg(item))),
                ),
                other => pairs.push((key.as_str(), render_arg(other))),
            }
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

impl Client for HttpClient {
    fn request(
        &self,
        method: &Method,
        path: &str,
        query: &CallArgs,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url_for(path, query)?;
        let request_id = RequestId::new();
        debug!(
            method = %method,
            url = %url,
            request_id = %request_id,
            "sending request"
        );

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if *method != Method::GET {
            if let Some(body) = body {
                request = request.json(body);
            }
        }

        let response = request
            .send()
            .with_context(|| format!("{method} {url} failed"))?;
        let status = response.status();
        let text = response
            .text()
            .with_context(|| format!("Failed to read response body of {method} {url}"))?;
        debug!(
            status = status.as_u16(),
            request_id = %request_id,
            bytes = text.len(),
            "response received"
        );

        if !status.is_success() {
            let excerpt: String = text.chars().take(ERROR_BODY_CHARS).collect();
            bail!("{method} {url} returned {status}: {excerpt}");
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .with_context(|| format!("{method} {url} returned a body that is not JSON"))
    }
}
