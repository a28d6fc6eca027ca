//! Table roles and ACL records
//!
//! Roles are a fixed catalogue; a role cannot be defined or edited at runtime.

use crate::access_control::types::{Scope, TableId, TablePermission};
use serde::{Deserialize, Serialize};
use std::fmt;

use TablePermission::*;

const FILTERED_READER: &[TablePermission] = &[ReadTableEntry, ReadProperties, ReadRow];

const UNFILTERED_READER: &[TablePermission] =
    &[ReadTableEntry, ReadProperties, ReadRow, UnfilteredRead];

const FILTERED_WRITER: &[TablePermission] = &[
    ReadTableEntry,
    ReadProperties,
    ReadRow,
    WriteRow,
    DeleteRow,
];

const UNFILTERED_READ_FILTERED_WRITE: &[TablePermission] = &[
    ReadTableEntry,
    ReadProperties,
    ReadRow,
    WriteRow,
    DeleteRow,
    UnfilteredRead,
];

const UNFILTERED_WRITER: &[TablePermission] = &[
    ReadTableEntry,
    ReadProperties,
    ReadRow,
    WriteRow,
    DeleteRow,
    UnfilteredRead,
    UnfilteredWrite,
    UnfilteredDelete,
];

const OWNER: &[TablePermission] = &[
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
];

/// Named bundle of table permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableRole {
    None,
    FilteredReader,
    UnfilteredReader,
    FilteredWriter,
    UnfilteredReadFilteredWrite,
    UnfilteredWriter,
    Owner,
}

impl TableRole {
    /// Permissions granted by this role
    pub const fn permissions(&self) -> &'static [TablePermission] {
        match self {
            TableRole::None => &[],
            TableRole::FilteredReader => FILTERED_READER,
            TableRole::UnfilteredReader => UNFILTERED_READER,
            TableRole::FilteredWriter => FILTERED_WRITER,
            TableRole::UnfilteredReadFilteredWrite => UNFILTERED_READ_FILTERED_WRITE,
            TableRole::UnfilteredWriter => UNFILTERED_WRITER,
            TableRole::Owner => OWNER,
        }
    }

    pub fn has_permission(&self, permission: TablePermission) -> bool {
        self.permissions().contains(&permission)
    }

    pub const fn description(&self) -> &'static str {
        match self {
            TableRole::None => "No permissions. Can not see the table.",
            TableRole::FilteredReader => "Can read properties and only see filtered rows.",
            TableRole::UnfilteredReader => "Can read properties and see all rows.",
            TableRole::FilteredWriter => "Can read properties and read/write filtered rows.",
            TableRole::UnfilteredReadFilteredWrite => {
                "Can read properties, see all rows and write filtered rows."
            }
            TableRole::UnfilteredWriter => "Can read properties and read/write all rows.",
            TableRole::Owner => {
                "Can read/write properties, read/write all rows, delete the table and manage ACLs."
            }
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            TableRole::None => "NONE",
            TableRole::FilteredReader => "FILTERED_READER",
            TableRole::UnfilteredReader => "UNFILTERED_READER",
            TableRole::FilteredWriter => "FILTERED_WRITER",
            TableRole::UnfilteredReadFilteredWrite => "UNFILTERED_READ_FILTERED_WRITE",
            TableRole::UnfilteredWriter => "UNFILTERED_WRITER",
            TableRole::Owner => "OWNER",
        }
    }

    pub fn all() -> &'static [TableRole] {
        &[
            TableRole::None,
            TableRole::FilteredReader,
            TableRole::UnfilteredReader,
            TableRole::FilteredWriter,
            TableRole::UnfilteredReadFilteredWrite,
            TableRole::UnfilteredWriter,
            TableRole::Owner,
        ]
    }
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grant of a role to a scope on one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAcl {
    pub table_id: TableId,
    pub scope: Scope,
    pub role: TableRole,
}

impl TableAcl {
    pub fn new(table_id: TableId, scope: Scope, role: TableRole) -> Self {
        Self {
            table_id,
            scope,
            role,
        }
    }
}
