//! # Client Configuration
//!
//! Settings for the HTTP transport behind bound endpoints, read from the
//! `client:` section of a YAML file and/or from environment variables.
//!
//! ```yaml
//! client:
//!   base_url: https://api.example.com/v1/
//!   timeout_secs: 10
//!   user_agent: my-service/1.0
//!   default_headers:
//!     Accept-Language: en
//! ```
//!
//! ## Environment Variables
//!
//! ### `RESTMODELS_BASE_URL`
//!
//! Overrides `base_url`. Required by [`ClientConfig::from_env`].
//!
//! ### `RESTMODELS_TIMEOUT_SECS`
//!
//! Overrides `timeout_secs`. Accepts decimal (`30`) or hexadecimal (`0x1e`).
//! Default: `30`.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::warn;
use url::Url;

pub const BASE_URL_ENV: &str = "RESTMODELS_BASE_URL";
pub const TIMEOUT_SECS_ENV: &str = "RESTMODELS_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Root every endpoint path is joined onto
    pub base_url: String,
    /// Whole-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Headers sent with every request
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    client: ClientConfig,
}

impl ClientConfig {
    /// Configuration for `base_url` with every other setting defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            default_headers: BTreeMap::new(),
        }
    }

    /// Load the `client:` section of a YAML file, then apply environment
    /// overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse the `client:` section of a YAML document without touching the
    /// environment.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(file.client)
    }

    /// Build a configuration purely from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(base_url) = lookup(BASE_URL_ENV) else {
            bail!("{BASE_URL_ENV} is not set");
        };
        let mut config = Self::new(base_url);
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply `RESTMODELS_*` overrides found through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(val) = lookup(TIMEOUT_SECS_ENV) {
            match parse_secs(&val) {
                Some(secs) => self.timeout_secs = secs,
                None => warn!(
                    variable = TIMEOUT_SECS_ENV,
                    value = %val,
                    "ignoring invalid timeout override"
                ),
            }
        }
    }

    /// Parsed base URL. A trailing `/` is added so relative paths join below it.
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| anyhow!("invalid base_url '{}': {e}", self.base_url))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        let url = self.base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base_url must use http or https, got '{}'", url.scheme());
        }
        Ok(())
    }
}

fn parse_secs(val: &str) -> Option<u64> {
    let val = val.trim();
    match val.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}
