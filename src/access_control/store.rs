//! ACL store collaborator
//!
//! The evaluator only ever reads ACL records; persisting them belongs to the
//! hosting application.

use crate::access_control::role::{TableAcl, TableRole};
use crate::access_control::types::{Scope, TableId};
use crate::error::{ConfigError, StoreResult};
// async_trait required for dyn-compatibility with Arc<dyn AclStore>
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// Read access to table ACL records
#[async_trait]
pub trait AclStore: Send + Sync {
    /// Get the ACL for a table and scope
    ///
    /// Returns `Ok(None)` when no record matches; that is not a failure.
    async fn get_acl(&self, table_id: &TableId, scope: &Scope) -> StoreResult<Option<TableAcl>>;
}

/// Shared handle to an ACL store
pub type SharedAclStore = Arc<dyn AclStore>;

/// In-memory ACL store
///
/// Holds at most one record per (table, scope) pair.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAclStore {
    acls: HashMap<(TableId, Scope), TableRole>,
}

impl InMemoryAclStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from ACL records, rejecting duplicate (table, scope) pairs
    pub fn from_acls(acls: impl IntoIterator<Item = TableAcl>) -> Result<Self, ConfigError> {
        let mut store = Self::new();
        for acl in acls {
            match store.acls.entry((acl.table_id, acl.scope)) {
                Entry::Occupied(entry) => {
                    let (table, scope) = entry.key().clone();
                    return Err(ConfigError::DuplicateAcl { table, scope });
                }
                Entry::Vacant(entry) => {
                    entry.insert(acl.role);
                }
            }
        }
        Ok(store)
    }

    /// Grant a role, replacing any existing grant for the same pair
    pub fn grant(&mut self, table_id: TableId, scope: Scope, role: TableRole) -> &mut Self {
        self.acls.insert((table_id, scope), role);
        self
    }

    pub fn len(&self) -> usize {
        self.acls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acls.is_empty()
    }

    /// All stored records, ordered by table then scope text
    pub fn acls(&self) -> Vec<TableAcl> {
        let mut acls: Vec<TableAcl> = self
            .acls
            .iter()
            .map(|((table_id, scope), role)| TableAcl::new(table_id.clone(), scope.clone(), *role))
            .collect();
        acls.sort_by(|a, b| {
            a.table_id
                .cmp(&b.table_id)
                .then_with(|| a.scope.to_string().cmp(&b.scope.to_string()))
        });
        acls
    }
}

#[async_trait]
impl AclStore for InMemoryAclStore {
    async fn get_acl(&self, table_id: &TableId, scope: &Scope) -> StoreResult<Option<TableAcl>> {
        Ok(self
            .acls
            .get(&(table_id.clone(), scope.clone()))
            .map(|role| TableAcl::new(table_id.clone(), scope.clone(), *role)))
    }
}
