//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (TABLES_AUTHZ__*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::access_control::Scope;
use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::collections::HashSet;
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "tables-authz.toml",
    ".tables-authz.toml",
    "~/.config/tables-authz/config.toml",
    "/etc/tables-authz/config.toml",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with TABLES_AUTHZ_ prefix
    // e.g., TABLES_AUTHZ__LOGGING__LEVEL
    // Double underscore (__) maps to nested keys (logging.level)
    builder = builder.add_source(
        Environment::with_prefix("TABLES_AUTHZ")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Invalid {
            message: format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                config.logging.level
            ),
        });
    }

    validate_acls(config)
}

/// Validate ACL records: named tables, grantable scopes, one record per pair
fn validate_acls(config: &AppConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for (index, acl) in config.acls.iter().enumerate() {
        if acl.table_id.is_empty() {
            return Err(ConfigError::Missing {
                field: format!("acls[{}].table_id", index),
            });
        }

        match &acl.scope {
            Scope::Empty => {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "acls[{}]: the EMPTY scope cannot be granted a role on table '{}'",
                        index, acl.table_id
                    ),
                });
            }
            Scope::User(None) => {
                return Err(ConfigError::Missing {
                    field: format!("acls[{}].scope.value", index),
                });
            }
            Scope::Group(name) if name.is_empty() => {
                return Err(ConfigError::Missing {
                    field: format!("acls[{}].scope.value", index),
                });
            }
            _ => {}
        }

        if !seen.insert((&acl.table_id, &acl.scope)) {
            return Err(ConfigError::DuplicateAcl {
                table: acl.table_id.clone(),
                scope: acl.scope.clone(),
            });
        }
    }

    Ok(())
}
