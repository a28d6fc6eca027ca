//! Per-table access checker
//!
//! An [`AccessChecker`] answers permission questions for one caller on one
//! table. The caller's permission set is resolved on first use and reused for
//! every later check on the same checker.

use crate::access_control::identity::IdentityProvider;
use crate::access_control::resolver::PermissionResolver;
use crate::access_control::types::{PermissionSet, Scope, TableId, TablePermission, UserIdentity};
use crate::error::{AccessResult, PermissionDeniedError, StoreResult};
use tokio::sync::OnceCell;
use tracing::{debug, trace};

/// Decision API for one caller on one table
pub struct AccessChecker {
    table_id: TableId,
    user: Option<UserIdentity>,
    resolver: PermissionResolver,
    permissions: OnceCell<PermissionSet>,
}

impl AccessChecker {
    pub fn new(table_id: TableId, user: Option<UserIdentity>, resolver: PermissionResolver) -> Self {
        Self {
            table_id,
            user,
            resolver,
            permissions: OnceCell::new(),
        }
    }

    /// Create a checker for whoever `identity` reports as the current user
    pub fn for_current_user(
        table_id: TableId,
        identity: &dyn IdentityProvider,
        resolver: PermissionResolver,
    ) -> Self {
        Self::new(table_id, identity.current_user_identity(), resolver)
    }

    pub fn table_id(&self) -> &TableId {
        &self.table_id
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// The caller's permissions on this table, resolved at most once
    pub async fn permissions(&self) -> StoreResult<&PermissionSet> {
        self.permissions
            .get_or_try_init(|| self.resolver.resolve(self.user.as_ref(), &self.table_id))
            .await
    }

    /// Check that the caller holds `permission`
    pub async fn check_permission(&self, permission: TablePermission) -> AccessResult<()> {
        if self.has_permission(permission).await? {
            return Ok(());
        }

        debug!(
            table = %self.table_id,
            permission = %permission,
            user = ?self.user,
            "Permission denied"
        );
        Err(PermissionDeniedError::table(&self.table_id, permission, self.user.as_ref()).into())
    }

    /// Whether the caller holds `permission`
    ///
    /// A missing permission is `Ok(false)`; store failures are still errors.
    pub async fn has_permission(&self, permission: TablePermission) -> StoreResult<bool> {
        let permissions = self.permissions().await?;
        let granted = permissions.contains(permission);
        trace!(table = %self.table_id, permission = %permission, granted, "Permission lookup");
        Ok(granted)
    }

    /// Check that the caller either holds `permission` or falls within the
    /// row's filter scope.
    ///
    /// `permission` is the unfiltered variant guarding the row, typically
    /// [`TablePermission::UnfilteredRead`], [`TablePermission::UnfilteredWrite`]
    /// or [`TablePermission::UnfilteredDelete`]. A row without a filter, or
    /// with the empty scope, is accessible only through that permission.
    pub async fn check_filter(
        &self,
        permission: TablePermission,
        row_id: &str,
        filter: Option<&Scope>,
    ) -> AccessResult<()> {
        debug!(
            table = %self.table_id,
            permission = %permission,
            row = row_id,
            filter = ?filter,
            user = ?self.user,
            "Checking row filter"
        );

        if self.has_permission(permission).await? {
            trace!("Caller holds unfiltered permission");
            return Ok(());
        }

        if filter_admits(self.user.as_ref(), filter) {
            return Ok(());
        }

        debug!(table = %self.table_id, row = row_id, user = ?self.user, "Row access denied");
        Err(PermissionDeniedError::row(row_id, self.user.as_ref()).into())
    }
}

/// Whether a row filter admits `user` on its own, without any permission
pub fn filter_admits(user: Option<&UserIdentity>, filter: Option<&Scope>) -> bool {
    match filter {
        None | Some(Scope::Empty) => false,
        Some(Scope::User(filter_user)) => {
            matches!((user, filter_user), (Some(user), Some(filter_user)) if user == filter_user)
        }
        // TODO: check membership through GroupMembership once rows carry group
        // filters in practice; until then group-filtered rows are visible to all.
        Some(Scope::Group(_)) => true,
        Some(Scope::Default) => true,
    }
}
