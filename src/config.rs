//! Runtime configuration.
//!
//! Defaults mirror the production front end. A JSON file may override any
//! subset of fields, and `LOAN_DESK_*` environment variables override both.

use crate::api::graphql::LoanFilter;
use crate::core::status::StatusThresholds;
use crate::portfolio::debounce::SearchDebouncer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const ENV_API_URL: &str = "LOAN_DESK_API_URL";
pub const ENV_DEBOUNCE_MS: &str = "LOAN_DESK_DEBOUNCE_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Base URL of the loan backend (GraphQL at `/graphql`, REST below it).
    pub api_url: String,
    /// Quiet period before a search filter is applied, in milliseconds.
    pub search_debounce_ms: u64,
    pub thresholds: StatusThresholds,
    /// Filter applied to the first fetch.
    pub initial_filter: LoanFilter,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            search_debounce_ms: 300,
            thresholds: StatusThresholds::default(),
            initial_filter: LoanFilter::default(),
        }
    }
}

impl DeskConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_DEBOUNCE_MS) {
            self.search_debounce_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_DEBOUNCE_MS,
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.api_url.trim_end_matches('/'))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// A search debouncer primed with the initial filter.
    pub fn search_debouncer(&self) -> SearchDebouncer {
        let initial = self.initial_filter.name.clone().unwrap_or_default();
        SearchDebouncer::new(initial, self.search_debounce())
    }
}
