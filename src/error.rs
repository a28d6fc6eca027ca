//! Error types for tables-authz
//!
//! This module defines the error hierarchy used throughout the crate.
//! A permission denial is an expected outcome the caller translates into an
//! access-denied response; a store failure is a collaborator fault and is
//! always propagated, never downgraded to a denial.

use crate::access_control::types::{Scope, TableId, TablePermission, UserIdentity};
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Duplicate ACL for table '{table}' and scope {scope}")]
    DuplicateAcl { table: TableId, scope: Scope },
}

/// Failure of the ACL store or another backing collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("ACL store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable(reason.into())
    }
}

/// A permission check that did not pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionDeniedError {
    #[error("Denied table {table} permission {permission} to user {}", display_user(.user))]
    Table {
        table: TableId,
        permission: TablePermission,
        user: Option<UserIdentity>,
    },

    #[error("Denied permission to access row {row_id} to user {}", display_user(.user))]
    Row {
        row_id: String,
        user: Option<UserIdentity>,
    },
}

impl PermissionDeniedError {
    pub fn table(
        table: &TableId,
        permission: TablePermission,
        user: Option<&UserIdentity>,
    ) -> Self {
        PermissionDeniedError::Table {
            table: table.clone(),
            permission,
            user: user.cloned(),
        }
    }

    pub fn row(row_id: impl Into<String>, user: Option<&UserIdentity>) -> Self {
        PermissionDeniedError::Row {
            row_id: row_id.into(),
            user: user.cloned(),
        }
    }

    /// The caller the permission was denied to, if it had an identity
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            PermissionDeniedError::Table { user, .. } | PermissionDeniedError::Row { user, .. } => {
                user.as_ref()
            }
        }
    }
}

fn display_user(user: &Option<UserIdentity>) -> String {
    match user {
        Some(user) => user.to_string(),
        None => "<anonymous>".to_string(),
    }
}

/// Outcome of a failed access check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Permission denied: {0}")]
    PermissionDenied(#[from] PermissionDeniedError),

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl AccessError {
    pub fn is_denied(&self) -> bool {
        matches!(self, AccessError::PermissionDenied(_))
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, AccessError::StoreUnavailable(_))
    }
}

/// Result type alias for access checks
pub type AccessResult<T> = std::result::Result<T, AccessError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
