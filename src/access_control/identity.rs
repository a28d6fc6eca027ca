//! Identity of the acting principal

use crate::access_control::types::UserIdentity;

/// Supplies the acting principal for the current evaluation context
pub trait IdentityProvider: Send + Sync {
    /// The current user's identity, or `None` for an anonymous caller
    fn current_user_identity(&self) -> Option<UserIdentity>;
}

/// Identity fixed for the lifetime of a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity(Option<UserIdentity>);

impl StaticIdentity {
    pub fn new(identity: Option<UserIdentity>) -> Self {
        Self(identity)
    }

    pub fn user(identity: impl Into<String>) -> Self {
        Self(Some(UserIdentity::new(identity)))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_identity(&self) -> Option<UserIdentity> {
        self.0.clone()
    }
}
