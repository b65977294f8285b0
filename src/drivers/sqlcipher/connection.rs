//! Authenticated connection acquisition.
//!
//! Opening an encrypted database is a fixed sequence: fetch the passphrase,
//! open read-write, apply the key, probe the schema so a wrong key fails
//! here rather than on first use, enable referential integrity, and switch
//! to write-ahead logging when a companion WAL file already exists on disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};

use crate::traits::PasswordProvider;

/// Opens an authenticated connection to a database file.
///
/// Implemented by [`DefaultConnectionProvider`]; hosts with their own keying
/// scheme (raw hex keys, cipher settings) substitute their own implementation.
pub trait ConnectionProvider: Send + Sync {
    /// Open `database_file` read-write and apply post-open configuration.
    fn open(&self, database_file: &Path) -> Result<Connection>;
}

/// Default provider: passphrase keying via a [`PasswordProvider`].
pub struct DefaultConnectionProvider {
    passwords: Box<dyn PasswordProvider>,
}

impl DefaultConnectionProvider {
    pub fn new(passwords: Box<dyn PasswordProvider>) -> Self {
        Self { passwords }
    }
}

impl ConnectionProvider for DefaultConnectionProvider {
    fn open(&self, database_file: &Path) -> Result<Connection> {
        let wal_file = wal_companion(database_file);

        let password = self
            .passwords
            .password_for(database_file)
            .with_context(|| format!("no password for `{}`", database_file.display()))?;

        // No CREATE flag: the file was discovered on disk and must exist.
        let conn = Connection::open_with_flags(
            database_file,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("opening `{}`", database_file.display()))?;

        apply_key(&conn, &password).context("applying encryption key")?;

        // Keying never fails by itself; the first page read does. Probe the
        // schema so authentication failures surface at open time.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |_row| Ok(()))
            .context("encryption key rejected by the database")?;

        conn.pragma_update(None, "foreign_keys", true)
            .context("enabling foreign key enforcement")?;

        // Only toggles the journal mode; an existing WAL file means the
        // database was last written in WAL mode and concurrent access is
        // expected. Must not create the file.
        if wal_file.exists() {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |_row| Ok(()))
                .context("switching to write-ahead logging")?;
            tracing::debug!(path = %database_file.display(), "write-ahead logging enabled");
        }

        Ok(conn)
    }
}

/// The companion write-ahead-log path: same directory, filename plus `-wal`.
pub(crate) fn wal_companion(database_file: &Path) -> PathBuf {
    let mut name = database_file
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push("-wal");
    database_file.with_file_name(name)
}

/// `PRAGMA key` with the passphrase quoted as a SQL string literal.
///
/// SQLCipher 4 answers the pragma with an `ok` row while plain builds answer
/// nothing, so returned rows are drained rather than asserted on.
pub(crate) fn apply_key(conn: &Connection, password: &str) -> rusqlite::Result<()> {
    let escaped = password.replace('\'', "''");
    let mut stmt = conn.prepare(&format!("PRAGMA key = '{escaped}'"))?;
    let mut rows = stmt.query([])?;
    while rows.next()?.is_some() {}
    Ok(())
}
