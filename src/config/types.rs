//! Configuration types for tables-authz
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::{InMemoryAclStore, TableAcl};
use crate::error::ConfigError;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Table ACL records
    ///
    /// ```toml
    /// [[acls]]
    /// table_id = "households"
    /// scope = { type = "USER", value = "alice@example.org" }
    /// role = "FILTERED_WRITER"
    /// ```
    pub acls: Vec<TableAcl>,
}

impl AppConfig {
    /// Build an in-memory ACL store from the configured records
    pub fn acl_store(&self) -> Result<InMemoryAclStore, ConfigError> {
        InMemoryAclStore::from_acls(self.acls.iter().cloned())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
