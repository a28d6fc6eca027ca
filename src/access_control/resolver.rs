//! Permission resolver
//!
//! Computes the effective permissions of a user on a table by unioning the
//! grants found at each scope the user participates in:
//! 1. DEFAULT scope (everyone)
//! 2. USER scope for the caller's identity
//! 3. GROUP scope for each group reported by the membership source
//!
//! Aggregation is union-only: no grant can revoke a permission contributed by
//! another scope, and a scope without a matching record contributes nothing.

use crate::access_control::groups::{NoGroupMembership, SharedGroupMembership};
use crate::access_control::store::SharedAclStore;
use crate::access_control::types::{PermissionSet, Scope, TableId, UserIdentity};
use crate::error::StoreResult;
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolves table permissions from the ACL store
#[derive(Clone)]
pub struct PermissionResolver {
    store: SharedAclStore,
    groups: SharedGroupMembership,
}

impl PermissionResolver {
    /// Create a resolver without group support
    pub fn new(store: SharedAclStore) -> Self {
        Self::with_groups(store, Arc::new(NoGroupMembership))
    }

    pub fn with_groups(store: SharedAclStore, groups: SharedGroupMembership) -> Self {
        Self { store, groups }
    }

    /// Resolve the permission set of `user` on `table_id`
    ///
    /// An anonymous caller only receives DEFAULT-scope grants.
    pub async fn resolve(
        &self,
        user: Option<&UserIdentity>,
        table_id: &TableId,
    ) -> StoreResult<PermissionSet> {
        debug!(table = %table_id, user = ?user, "Resolving table permissions");

        let mut permissions = PermissionSet::new();

        self.grant_from_scope(&mut permissions, table_id, &Scope::Default)
            .await?;

        if let Some(user) = user {
            self.grant_from_scope(&mut permissions, table_id, &Scope::User(Some(user.clone())))
                .await?;

            for group in self.groups.groups_for(user).await? {
                self.grant_from_scope(&mut permissions, table_id, &Scope::Group(group))
                    .await?;
            }
        }

        debug!(table = %table_id, permissions = %permissions, "Resolved table permissions");
        Ok(permissions)
    }

    /// All scopes `user` participates in, broadest first
    pub async fn scopes_for(&self, user: Option<&UserIdentity>) -> StoreResult<Vec<Scope>> {
        let mut scopes = vec![Scope::Default];
        if let Some(user) = user {
            scopes.push(Scope::User(Some(user.clone())));
            scopes.extend(
                self.groups
                    .groups_for(user)
                    .await?
                    .into_iter()
                    .map(Scope::Group),
            );
        }
        Ok(scopes)
    }

    async fn grant_from_scope(
        &self,
        permissions: &mut PermissionSet,
        table_id: &TableId,
        scope: &Scope,
    ) -> StoreResult<()> {
        match self.store.get_acl(table_id, scope).await? {
            Some(acl) => {
                trace!(scope = %scope, role = %acl.role, "Matched table ACL");
                permissions.grant(acl.role.permissions().iter().copied());
            }
            None => trace!(scope = %scope, "No table ACL for scope"),
        }
        Ok(())
    }
}
