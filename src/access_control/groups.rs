//! Group membership collaborator
//!
//! Deployments without group support use [`NoGroupMembership`], under which
//! GROUP-scoped grants never contribute permissions.

use crate::access_control::types::UserIdentity;
use crate::error::StoreResult;
// async_trait required for dyn-compatibility with Arc<dyn GroupMembership>
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Source of the groups a user belongs to
#[async_trait]
pub trait GroupMembership: Send + Sync {
    async fn groups_for(&self, user: &UserIdentity) -> StoreResult<Vec<String>>;
}

/// Shared handle to a group membership source
pub type SharedGroupMembership = Arc<dyn GroupMembership>;

/// Membership source that knows no groups
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGroupMembership;

#[async_trait]
impl GroupMembership for NoGroupMembership {
    async fn groups_for(&self, _user: &UserIdentity) -> StoreResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Fixed user to groups mapping
#[derive(Debug, Clone, Default)]
pub struct StaticGroupMembership {
    groups: HashMap<UserIdentity, Vec<String>>,
}

impl StaticGroupMembership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, user: UserIdentity, group: impl Into<String>) -> Self {
        self.groups.entry(user).or_default().push(group.into());
        self
    }
}

#[async_trait]
impl GroupMembership for StaticGroupMembership {
    async fn groups_for(&self, user: &UserIdentity) -> StoreResult<Vec<String>> {
        Ok(self.groups.get(user).cloned().unwrap_or_default())
    }
}
