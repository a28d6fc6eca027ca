//! Access control types
//!
//! Core value types used by the access control system: identifiers,
//! permissions, permission sets and scopes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Prefix applied to account usernames when no email is available
pub const USERNAME_PREFIX: &str = "username:";

/// Stable identifier of the acting principal
///
/// Either an email address or `username:<name>` for accounts without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(String);

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the identity of a registered account.
    ///
    /// The email wins when present; otherwise the username is used with the
    /// `username:` prefix. An account with neither has no identity.
    pub fn from_account(email: Option<&str>, username: Option<&str>) -> Option<Self> {
        match (email, username) {
            (Some(email), _) => Some(Self::new(email)),
            (None, Some(username)) => Some(Self(format!("{USERNAME_PREFIX}{username}"))),
            (None, None) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an access-controlled table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Atomic table capability
///
/// The `Unfiltered*` variants bypass row-level filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TablePermission {
    ReadTableEntry,
    DeleteTable,
    ReadProperties,
    WriteProperties,
    ReadRow,
    WriteRow,
    DeleteRow,
    UnfilteredRead,
    UnfilteredWrite,
    UnfilteredDelete,
    ReadAcl,
    WriteAcl,
    DeleteAcl,
}

impl TablePermission {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TablePermission::ReadTableEntry => "READ_TABLE_ENTRY",
            TablePermission::DeleteTable => "DELETE_TABLE",
            TablePermission::ReadProperties => "READ_PROPERTIES",
            TablePermission::WriteProperties => "WRITE_PROPERTIES",
            TablePermission::ReadRow => "READ_ROW",
            TablePermission::WriteRow => "WRITE_ROW",
            TablePermission::DeleteRow => "DELETE_ROW",
            TablePermission::UnfilteredRead => "UNFILTERED_READ",
            TablePermission::UnfilteredWrite => "UNFILTERED_WRITE",
            TablePermission::UnfilteredDelete => "UNFILTERED_DELETE",
            TablePermission::ReadAcl => "READ_ACL",
            TablePermission::WriteAcl => "WRITE_ACL",
            TablePermission::DeleteAcl => "DELETE_ACL",
        }
    }

    /// Parse a permission name, ignoring ASCII case
    pub fn try_parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
    }

    pub fn all() -> &'static [TablePermission] {
        &[
            TablePermission::ReadTableEntry,
            TablePermission::DeleteTable,
            TablePermission::ReadProperties,
            TablePermission::WriteProperties,
            TablePermission::ReadRow,
            TablePermission::WriteRow,
            TablePermission::DeleteRow,
            TablePermission::UnfilteredRead,
            TablePermission::UnfilteredWrite,
            TablePermission::UnfilteredDelete,
            TablePermission::ReadAcl,
            TablePermission::WriteAcl,
            TablePermission::DeleteAcl,
        ]
    }

    /// Whether holding this permission bypasses row filters
    pub const fn is_unfiltered(&self) -> bool {
        matches!(
            self,
            TablePermission::UnfilteredRead
                | TablePermission::UnfilteredWrite
                | TablePermission::UnfilteredDelete
        )
    }
}

impl fmt::Display for TablePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TablePermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| format!("unknown table permission '{}'", s))
    }
}

/// Effective permissions of one user on one table
///
/// Only grows: there is no way to remove a permission once added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: BTreeSet<TablePermission>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: TablePermission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Add every permission from `granted`
    pub fn grant(&mut self, granted: impl IntoIterator<Item = TablePermission>) {
        self.permissions.extend(granted);
    }

    /// Whether every permission in `other` is also in `self`
    pub fn is_superset(&self, other: &PermissionSet) -> bool {
        self.permissions.is_superset(&other.permissions)
    }

    pub fn iter(&self) -> impl Iterator<Item = TablePermission> + '_ {
        self.permissions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<TablePermission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = TablePermission>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.permissions.iter().map(|p| p.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Audience a grant or a row filter applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Everyone
    Default,
    /// A single user. A row may record a user scope without a user.
    User(Option<UserIdentity>),
    /// Members of a named group
    Group(String),
    /// Nobody
    Empty,
}

/// Sentinel scope that matches nobody
pub const EMPTY_SCOPE: Scope = Scope::Empty;

impl Scope {
    pub fn user(identity: impl Into<String>) -> Self {
        Scope::User(Some(UserIdentity::new(identity)))
    }

    pub fn group(name: impl Into<String>) -> Self {
        Scope::Group(name.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Scope::Empty)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Default => f.write_str("default"),
            Scope::User(Some(user)) => write!(f, "user:{}", user),
            Scope::User(None) => f.write_str("user"),
            Scope::Group(name) => write!(f, "group:{}", name),
            Scope::Empty => f.write_str("empty"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    /// Parse `default`, `empty`, `user`, `user:<id>` or `group:<name>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = match s.split_once(':') {
            Some((kind, value)) => (kind, Some(value)),
            None => (s, None),
        };

        match (kind.to_ascii_lowercase().as_str(), value) {
            ("default", None) => Ok(Scope::Default),
            ("empty", None) => Ok(Scope::Empty),
            ("user", None) => Ok(Scope::User(None)),
            ("user", Some(user)) if !user.is_empty() => Ok(Scope::user(user)),
            ("group", Some(group)) if !group.is_empty() => Ok(Scope::group(group)),
            _ => Err(format!("invalid scope '{}'", s)),
        }
    }
}
