//! SQLCipher database driver for remote inspection tooling.
//!
//! This crate locates SQLCipher-encrypted SQLite files in an application's
//! private storage, tells them apart from plaintext databases by their file
//! header, and exposes a uniform interface for listing tables and executing
//! arbitrary SQL against them. It is one pluggable driver behind a generic
//! inspection surface; the surface's wire protocol, the file enumeration,
//! and the password retrieval are host collaborators consumed through
//! traits.
//!
//! # Example
//!
//! ```ignore
//! use cipherscope::{DriverRegistry, SqlCipherDriver};
//!
//! let mut registry = DriverRegistry::new();
//! let index = registry.register(Box::new(SqlCipherDriver::with_password_provider(
//!     Box::new(my_files_provider),
//!     Box::new(my_password_provider),
//! )));
//!
//! for (driver_index, descriptor) in registry.list_databases() {
//!     let tables = registry.list_tables(driver_index, &descriptor)?;
//!     // ...
//! }
//! ```
//!
//! Every operation is synchronous and blocking; callers on latency-sensitive
//! threads are responsible for moving the work off them. Connections never
//! outlive a single operation.

pub mod drivers;
pub mod error;
pub mod registry;
pub mod traits;

pub use drivers::sqlcipher::{
    CollectingHandler, ConnectionProvider, DefaultConnectionProvider, ResultHandler,
    SelectCursor, SqlCipherDriver,
};
pub use error::DriverError;
pub use registry::DriverRegistry;
pub use traits::{
    ColumnInfo, DatabaseDescriptor, DatabaseDriver, DatabaseFilesProvider, PasswordProvider,
    QueryResult, Row, TableResult, Value,
};
