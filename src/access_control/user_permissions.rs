//! Request-scoped permissions of one user across tables
//!
//! Owned by the request context and dropped (or cleared) when the request
//! ends. One [`AccessChecker`] is kept per table so repeated checks against
//! the same table hit the ACL store once.

use crate::access_control::checker::AccessChecker;
use crate::access_control::identity::IdentityProvider;
use crate::access_control::resolver::PermissionResolver;
use crate::access_control::types::{Scope, TableId, TablePermission, UserIdentity};
use crate::error::{AccessResult, StoreResult};
use std::collections::HashMap;

/// Table permissions of the current user for the lifetime of a request
pub struct TablesUserPermissions {
    user: Option<UserIdentity>,
    resolver: PermissionResolver,
    checkers: HashMap<TableId, AccessChecker>,
}

impl TablesUserPermissions {
    pub fn new(user: Option<UserIdentity>, resolver: PermissionResolver) -> Self {
        Self {
            user,
            resolver,
            checkers: HashMap::new(),
        }
    }

    pub fn for_current_user(identity: &dyn IdentityProvider, resolver: PermissionResolver) -> Self {
        Self::new(identity.current_user_identity(), resolver)
    }

    pub fn user_identity(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// Check that the user holds `permission` on `table_id`
    pub async fn check_permission(
        &mut self,
        table_id: &TableId,
        permission: TablePermission,
    ) -> AccessResult<()> {
        self.checker(table_id).check_permission(permission).await
    }

    /// Whether the user holds `permission` on `table_id`
    pub async fn has_permission(
        &mut self,
        table_id: &TableId,
        permission: TablePermission,
    ) -> StoreResult<bool> {
        self.checker(table_id).has_permission(permission).await
    }

    /// Check row access on `table_id`; see [`AccessChecker::check_filter`]
    pub async fn check_filter(
        &mut self,
        table_id: &TableId,
        permission: TablePermission,
        row_id: &str,
        filter: Option<&Scope>,
    ) -> AccessResult<()> {
        self.checker(table_id)
            .check_filter(permission, row_id, filter)
            .await
    }

    /// All scopes the user participates in
    pub async fn scopes(&self) -> StoreResult<Vec<Scope>> {
        self.resolver.scopes_for(self.user.as_ref()).await
    }

    /// Whether the user may record `filter_scope` as a row's filter
    pub async fn has_filter_scope(&self, filter_scope: &Scope) -> StoreResult<bool> {
        Ok(self.scopes().await?.contains(filter_scope))
    }

    /// Number of tables with a cached checker
    pub fn cached_tables(&self) -> usize {
        self.checkers.len()
    }

    /// Drop all cached checkers
    pub fn clear(&mut self) {
        self.checkers.clear();
    }

    fn checker(&mut self, table_id: &TableId) -> &AccessChecker {
        self.checkers.entry(table_id.clone()).or_insert_with(|| {
            AccessChecker::new(table_id.clone(), self.user.clone(), self.resolver.clone())
        })
    }
}
