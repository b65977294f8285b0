//! Boundary collaborator traits.
//!
//! These contracts are implemented by the host application and consumed by
//! drivers: the host knows where its private storage lives and how to fetch
//! decryption secrets; the driver does not.

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Supplies the raw candidate list of files from the application's private
/// storage root. No ordering guarantee; drivers sort before tidying.
pub trait DatabaseFilesProvider: Send + Sync {
    /// Absolute paths of every potential database file.
    fn database_files(&self) -> Vec<PathBuf>;
}

/// Supplies the decryption secret for a database file.
///
/// May fail (secret store unavailable, no entry for the file); the connection
/// open fails in turn and the cause is carried along.
pub trait PasswordProvider: Send + Sync {
    /// The passphrase for `database_file`.
    fn password_for(&self, database_file: &Path) -> Result<String>;
}
