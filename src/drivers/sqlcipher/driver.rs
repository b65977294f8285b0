//! The SQLCipher driver: discovery on one side, dispatch on the other.

use rusqlite::Connection;

use super::connection::ConnectionProvider;
use super::dispatch::{self, CollectingHandler, ResultHandler};
use super::discovery;
use crate::error::DriverError;
use crate::traits::{
    DatabaseDescriptor, DatabaseDriver, DatabaseFilesProvider, PasswordProvider, QueryResult,
};

/// Annotation appended to descriptor display names.
const DISPLAY_ANNOTATION: &str = "SQLCipher";

/// Driver for SQLCipher-encrypted SQLite files in the application's private
/// storage.
///
/// Composes a file enumerator and a connection provider; both are host
/// collaborators. Every operation opens its own connection and closes it
/// before returning, so the driver holds no state across calls.
pub struct SqlCipherDriver {
    files: Box<dyn DatabaseFilesProvider>,
    connections: Box<dyn ConnectionProvider>,
}

impl SqlCipherDriver {
    pub fn new(
        files: Box<dyn DatabaseFilesProvider>,
        connections: Box<dyn ConnectionProvider>,
    ) -> Self {
        Self { files, connections }
    }

    /// Convenience constructor wiring the default passphrase-keyed
    /// connection provider.
    pub fn with_password_provider(
        files: Box<dyn DatabaseFilesProvider>,
        passwords: Box<dyn PasswordProvider>,
    ) -> Self {
        Self::new(
            files,
            Box::new(super::connection::DefaultConnectionProvider::new(passwords)),
        )
    }

    /// Execute one statement with a caller-supplied result handler.
    ///
    /// [`DatabaseDriver::run_query`] is this with [`CollectingHandler`];
    /// hosts that want to stream rows into their own shape use this entry
    /// point instead.
    pub fn run_query_with<H: ResultHandler>(
        &self,
        descriptor: &DatabaseDescriptor,
        sql: &str,
        handler: &mut H,
    ) -> Result<H::Output, DriverError> {
        let conn = self.open(descriptor)?;
        dispatch::execute(conn, sql, handler)
    }

    fn open(&self, descriptor: &DatabaseDescriptor) -> Result<Connection, DriverError> {
        self.connections
            .open(&descriptor.path)
            .map_err(|err| DriverError::unable_to_open(descriptor.path.clone(), err))
    }
}

impl DatabaseDriver for SqlCipherDriver {
    fn list_databases(&self) -> Vec<DatabaseDescriptor> {
        let mut candidates = self.files.database_files();
        candidates.sort();

        let descriptors: Vec<DatabaseDescriptor> = discovery::tidy_database_list(candidates)
            .into_iter()
            .filter(|path| discovery::is_foreign_format(path))
            .map(|path| {
                let file_name = match path.file_name() {
                    Some(name) => name.to_string_lossy().into_owned(),
                    None => path.to_string_lossy().into_owned(),
                };
                DatabaseDescriptor::new(path, format!("{file_name} ({DISPLAY_ANNOTATION})"))
            })
            .collect();

        tracing::debug!(count = descriptors.len(), "discovered encrypted databases");
        descriptors
    }

    fn list_tables(&self, descriptor: &DatabaseDescriptor) -> Result<Vec<String>, DriverError> {
        let conn = self.open(descriptor)?;
        list_table_names(&conn).map_err(DriverError::from)
        // `conn` dropped here on both paths.
    }

    fn run_query(
        &self,
        descriptor: &DatabaseDescriptor,
        sql: &str,
    ) -> Result<QueryResult, DriverError> {
        self.run_query_with(descriptor, sql, &mut CollectingHandler)
    }
}

fn list_table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut statement = conn.prepare("SELECT name FROM sqlite_master WHERE type IN (?1, ?2)")?;
    let names = statement.query_map(["table", "view"], |row| row.get(0))?;
    names.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::sqlcipher::connection::{apply_key, wal_companion};
    use anyhow::Result;
    use std::fs;
    use std::path::{Path, PathBuf};

    struct StaticFiles(Vec<PathBuf>);

    impl DatabaseFilesProvider for StaticFiles {
        fn database_files(&self) -> Vec<PathBuf> {
            self.0.clone()
        }
    }

    struct FixedPassword(&'static str);

    impl PasswordProvider for FixedPassword {
        fn password_for(&self, _database_file: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn create_encrypted_db(path: &Path, password: &str, schema: &str) {
        let conn = Connection::open(path).unwrap();
        apply_key(&conn, password).unwrap();
        conn.execute_batch(schema).unwrap();
    }

    fn driver_for(dir: &Path, password: &'static str) -> SqlCipherDriver {
        let files: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        SqlCipherDriver::with_password_provider(
            Box::new(StaticFiles(files)),
            Box::new(FixedPassword(password)),
        )
    }

    #[test]
    fn test_list_databases_filters_sidecars_and_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        create_encrypted_db(
            &dir.path().join("secrets.db"),
            "hunter2",
            "CREATE TABLE t (id INTEGER)",
        );
        // Plaintext database: excluded by the header check.
        Connection::open(dir.path().join("plain.db"))
            .unwrap()
            .execute_batch("CREATE TABLE t (id INTEGER)")
            .unwrap();
        // Derived side-files of a present primary: tidied away.
        fs::write(dir.path().join("secrets.db-journal"), [0xAB; 4]).unwrap();
        fs::write(dir.path().join("secrets.db-shm"), [0xAB; 4]).unwrap();

        let driver = driver_for(dir.path(), "hunter2");
        let databases = driver.list_databases();

        assert_eq!(databases.len(), 1);
        assert_eq!(databases[0].path, dir.path().join("secrets.db"));
        assert_eq!(databases[0].name, "secrets.db (SQLCipher)");
    }

    #[test]
    fn test_descriptors_are_recreated_each_call() {
        let dir = tempfile::tempdir().unwrap();
        create_encrypted_db(
            &dir.path().join("secrets.db"),
            "hunter2",
            "CREATE TABLE t (id INTEGER)",
        );

        let driver = driver_for(dir.path(), "hunter2");
        assert_eq!(driver.list_databases(), driver.list_databases());
    }

    #[test]
    fn test_display_name_with_spaces_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mes données.db");
        create_encrypted_db(&path, "hunter2", "CREATE TABLE t (id INTEGER)");

        let driver = driver_for(dir.path(), "hunter2");
        let databases = driver.list_databases();
        assert_eq!(databases[0].name, "mes données.db (SQLCipher)");
    }

    #[test]
    fn test_list_databases_sorts_by_path() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zulu.db", "alpha.db", "mike.db"] {
            create_encrypted_db(&dir.path().join(name), "hunter2", "CREATE TABLE t (id INTEGER)");
        }

        // Reverse order from the provider; discovery must sort.
        let mut files: Vec<PathBuf> = ["zulu.db", "mike.db", "alpha.db"]
            .iter()
            .map(|n| dir.path().join(n))
            .collect();
        files.reverse();
        let driver = SqlCipherDriver::with_password_provider(
            Box::new(StaticFiles(files)),
            Box::new(FixedPassword("hunter2")),
        );

        let names: Vec<String> = driver
            .list_databases()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "alpha.db (SQLCipher)",
                "mike.db (SQLCipher)",
                "zulu.db (SQLCipher)"
            ]
        );
    }

    #[test]
    fn test_list_tables_includes_views() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.db");
        create_encrypted_db(
            &path,
            "hunter2",
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE messages (id INTEGER PRIMARY KEY, body TEXT);
             CREATE VIEW user_names AS SELECT name FROM users;",
        );

        let driver = driver_for(dir.path(), "hunter2");
        let descriptor = &driver.list_databases()[0];
        let tables = driver.list_tables(descriptor).unwrap();

        assert_eq!(tables, vec!["users", "messages", "user_names"]);
    }

    #[test]
    fn test_list_tables_with_wrong_password_is_unable_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.db");
        create_encrypted_db(&path, "hunter2", "CREATE TABLE t (id INTEGER)");

        let driver = driver_for(dir.path(), "nope");
        let descriptor = &driver.list_databases()[0];
        let err = driver.list_tables(descriptor).unwrap_err();

        assert!(matches!(err, DriverError::UnableToOpen { .. }));
        assert!(err.to_string().starts_with("unable to open database"));
    }

    #[test]
    fn test_run_query_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.db");
        create_encrypted_db(
            &path,
            "hunter2",
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             INSERT INTO users (name) VALUES ('alice');",
        );

        let driver = driver_for(dir.path(), "hunter2");
        let descriptor = &driver.list_databases()[0];

        let inserted = driver
            .run_query(descriptor, "INSERT INTO users(name) VALUES('bob')")
            .unwrap();
        assert_eq!(inserted, QueryResult::Inserted { row_id: 2 });

        let deleted = driver
            .run_query(descriptor, "DELETE FROM users WHERE id=1")
            .unwrap();
        assert_eq!(deleted, QueryResult::RowsAffected { count: 1 });

        // Each operation used its own connection; the mutations stuck.
        let selected = driver
            .run_query(descriptor, "SELECT name FROM users")
            .unwrap();
        let QueryResult::Table(table) = selected else {
            panic!("expected table result");
        };
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_wal_companion_survives_tidying_but_enables_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.db");
        create_encrypted_db(&path, "hunter2", "CREATE TABLE t (id INTEGER)");
        fs::write(wal_companion(&path), []).unwrap();

        let driver = driver_for(dir.path(), "hunter2");
        let databases = driver.list_databases();
        assert_eq!(databases.len(), 1, "-wal sidecar must be tidied away");

        let result = driver
            .run_query(&databases[0], "PRAGMA journal_mode")
            .unwrap();
        let QueryResult::Table(table) = result else {
            panic!("expected table result");
        };
        assert_eq!(table.rows[0].values[0], crate::traits::Value::Text("wal".into()));
    }
}
