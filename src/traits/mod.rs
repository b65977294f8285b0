//! Backend-agnostic driver abstractions.
//!
//! This module defines the surface shared by all storage backends:
//!
//! - **Driver** (`driver`): the `DatabaseDriver` trait, descriptors, and
//!   typed query results
//! - **Row/Value** (`row`): backend-agnostic value representation
//! - **Providers** (`providers`): collaborator traits implemented by the host

pub mod driver;
pub mod providers;
pub mod row;

pub use driver::{DatabaseDescriptor, DatabaseDriver, QueryResult, TableResult};
pub use providers::{DatabaseFilesProvider, PasswordProvider};
pub use row::{ColumnInfo, Row, Value};
