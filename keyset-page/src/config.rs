//! Pagination configuration.
//!
//! | Key / Variable                           | Default | Description                         |
//! |------------------------------------------|---------|-------------------------------------|
//! | `default_limit` / `KEYSET_DEFAULT_LIMIT` | 1000    | Page size when a request omits one  |
//!
//! ```
//! use keyset_page::PaginationConfig;
//!
//! let config = PaginationConfig::from_toml_str("default_limit = 50").unwrap();
//! assert_eq!(config.default_limit, 50);
//! ```

use serde::{Deserialize, Serialize};

/// Page size used when a request does not carry one.
pub const DEFAULT_LIMIT: usize = 1000;

/// Environment variable overriding [`PaginationConfig::default_limit`].
pub const DEFAULT_LIMIT_ENV: &str = "KEYSET_DEFAULT_LIMIT";

/// Errors raised while loading a configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid pagination config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override is not a number.
    #[error("{var} must be a positive integer (got {value:?})")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// The default page size is zero.
    #[error("default_limit must be positive")]
    ZeroLimit,
}

/// Settings shared by all page requests of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page size used when a request omits `limit`.
    pub default_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl PaginationConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(DEFAULT_LIMIT_ENV) {
            self.default_limit = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: DEFAULT_LIMIT_ENV,
                value: value.clone(),
            })?;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.default_limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(self)
    }
}
