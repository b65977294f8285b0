//! The database driver trait and its result types.
//!
//! A driver is one storage backend behind the host's generic inspection
//! surface. The host composes drivers via [`crate::registry::DriverRegistry`]
//! rather than subclassing; each backend implements this trait independently.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::row::{ColumnInfo, Row};
use crate::error::DriverError;

/// An opaque handle to one discovered database file.
///
/// Descriptors are immutable value objects recreated on every discovery call;
/// nothing is cached across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDescriptor {
    /// Absolute path of the database file.
    pub path: PathBuf,
    /// Display name shown by the host, derived from the filename plus a
    /// driver-specific annotation.
    pub name: String,
}

impl DatabaseDescriptor {
    /// Create a descriptor for `path` with the given display name.
    pub fn new(path: PathBuf, name: String) -> Self {
        Self { path, name }
    }
}

/// Result of executing one SQL statement. Exactly one shape is populated per
/// execution, chosen by the statement's leading keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    /// UPDATE/DELETE: number of rows affected.
    RowsAffected { count: usize },
    /// INSERT: row id assigned by the store.
    Inserted { row_id: i64 },
    /// SELECT/PRAGMA/EXPLAIN: tabular rows with named columns.
    Table(TableResult),
    /// Any other statement: executed, no payload.
    Statement,
}

/// Tabular payload of a row-producing statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResult {
    /// Column metadata, in result order.
    pub columns: Vec<ColumnInfo>,
    /// Result rows, in cursor order.
    pub rows: Vec<Row>,
}

/// One pluggable storage backend behind the host inspection surface.
///
/// Every operation is synchronous and blocking; storage I/O and
/// authentication happen inline. Connections never outlive a single call, so
/// implementations need no locking across operations.
pub trait DatabaseDriver: Send + Sync {
    /// Discover the database files this driver is responsible for.
    ///
    /// Never fails wholesale: unreadable candidates are logged and skipped.
    fn list_databases(&self) -> Vec<DatabaseDescriptor>;

    /// List table and view names of one discovered database, in the order
    /// the schema catalog yields them.
    fn list_tables(&self, descriptor: &DatabaseDescriptor) -> Result<Vec<String>, DriverError>;

    /// Execute one SQL statement against a discovered database.
    fn run_query(
        &self,
        descriptor: &DatabaseDescriptor,
        sql: &str,
    ) -> Result<QueryResult, DriverError>;
}
