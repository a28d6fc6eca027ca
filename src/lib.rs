//! Table access control
//!
//! Scope-based authorization for data-collection tables: decides whether a
//! user may perform an operation on a table, and whether a per-row filter
//! still admits them when they lack the unfiltered permission.
//!
//! ## Features
//!
//! - **Static roles** from `FILTERED_READER` up to `OWNER`, each a fixed permission set
//! - **Scoped grants** at `DEFAULT`, `USER` and `GROUP` scope, unioned per user and table
//! - **Row filters** that admit callers by the row's recorded scope
//! - **Request-scoped caching** of resolved permissions per table
//!
//! ## Example Configuration
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [[acls]]
//! table_id = "households"
//! scope = { type = "DEFAULT" }
//! role = "FILTERED_READER"          # Everyone sees their own rows
//!
//! [[acls]]
//! table_id = "households"
//! scope = { type = "USER", value = "supervisor@example.org" }
//! role = "UNFILTERED_WRITER"        # Supervisor sees and edits all rows
//! ```

pub mod access_control;
pub mod config;
pub mod error;

// Re-export main types
pub use access_control::{
    AccessChecker, PermissionResolver, Scope, TableId, TablePermission, TableRole,
    TablesUserPermissions, UserIdentity,
};
pub use config::{AppConfig, load_config};
pub use error::{AccessError, ConfigError, PermissionDeniedError, StoreError};
