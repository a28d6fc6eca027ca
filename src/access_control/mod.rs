//! Access control module
//!
//! Provides scope-based access control for data tables.
//!
//! ## Access Control Model
//!
//! Each table carries ACL records mapping a [`Scope`] to a [`TableRole`]:
//!
//! - `DEFAULT` - applies to every user
//! - `USER` - applies to one user identity
//! - `GROUP` - applies to members of a group (requires a [`GroupMembership`] source)
//!
//! A user's effective permissions on a table are the union of the roles
//! granted to every scope they participate in. Grants only add permissions.
//!
//! Row access falls back to the row's filter scope when the caller lacks the
//! unfiltered permission for the operation:
//!
//! | Row filter      | Admits                                  |
//! |-----------------|-----------------------------------------|
//! | none / `EMPTY`  | nobody                                  |
//! | `USER:<id>`     | exactly that user (case-sensitive)      |
//! | `GROUP:<name>`  | everyone (group filters not evaluated)  |
//! | `DEFAULT`       | everyone                                |

pub mod checker;
pub mod groups;
pub mod identity;
pub mod resolver;
pub mod role;
pub mod store;
pub mod types;
pub mod user_permissions;

pub use checker::{AccessChecker, filter_admits};
pub use groups::{GroupMembership, NoGroupMembership, SharedGroupMembership, StaticGroupMembership};
pub use identity::{IdentityProvider, StaticIdentity};
pub use resolver::PermissionResolver;
pub use role::{TableAcl, TableRole};
pub use store::{AclStore, InMemoryAclStore, SharedAclStore};
pub use types::{EMPTY_SCOPE, PermissionSet, Scope, TableId, TablePermission, UserIdentity};
pub use user_permissions::TablesUserPermissions;
