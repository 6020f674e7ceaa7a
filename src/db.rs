use crate::constants::TABLE_COLUMNS;
use crate::error::{EtlError, Result};
use crate::pipeline::storage::RecordStore;
use crate::types::FieldRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const TABLE_MIGRATION: &str = include_str!("../migrations/001_create_employee_table.sql");
const TABLE_PLACEHOLDER: &str = "__TABLE__";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern compiles"));

/// Table names are spliced into SQL text, so only plain identifiers pass.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// SQLite-backed record store.
///
/// Owns the connection for the whole run; it is closed when the store is
/// dropped.
pub struct SqliteStore {
    conn: Connection,
    table: String,
    location: PathBuf,
}

impl SqliteStore {
    /// Opens an existing database read-write. A missing file is a
    /// connection error rather than a fresh empty database.
    pub fn open<P: AsRef<Path>>(path: P, table: &str) -> Result<Self> {
        let path = path.as_ref();
        check_table(table)?;
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| EtlError::StoreConnection(format!("failed to open {}: {e}", path.display())))?;
        let store = Self {
            conn,
            table: table.to_string(),
            location: path.to_path_buf(),
        };
        store.ping()?;
        info!("Connected to SQLite database at {}", path.display());
        Ok(store)
    }

    /// Opens or creates the database file and makes sure the table exists.
    pub fn create<P: AsRef<Path>>(path: P, table: &str) -> Result<Self> {
        let path = path.as_ref();
        check_table(table)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| EtlError::file_access(parent, e))?;
        }
        let conn = Connection::open(path)
            .map_err(|e| EtlError::StoreConnection(format!("failed to create {}: {e}", path.display())))?;
        let store = Self {
            conn,
            table: table.to_string(),
            location: path.to_path_buf(),
        };
        store.run_migrations()?;
        Ok(store)
    }

    /// Private in-memory database with the table already created.
    pub fn open_in_memory(table: &str) -> Result<Self> {
        check_table(table)?;
        let conn = Connection::open_in_memory()
            .map_err(|e| EtlError::StoreConnection(format!("failed to open in-memory database: {e}")))?;
        let store = Self {
            conn,
            table: table.to_string(),
            location: PathBuf::from(":memory:"),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn run_migrations(&self) -> Result<()> {
        info!("Ensuring table {} exists", self.table);
        let sql = TABLE_MIGRATION.replace(TABLE_PLACEHOLDER, &self.table);
        self.conn.execute_batch(&sql).map_err(EtlError::from_store)?;
        Ok(())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn count_rows(&self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(EtlError::from_store)?;
        Ok(count as usize)
    }

    /// Reads every stored row back in insertion order.
    pub fn fetch_all(&self) -> Result<Vec<[String; 5]>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            TABLE_COLUMNS.join(", "),
            self.table
        );
        let mut stmt = self.conn.prepare(&sql).map_err(EtlError::from_store)?;
        let rows = stmt
            .query_map([], |row| -> rusqlite::Result<[String; 5]> {
                Ok([row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?])
            })
            .map_err(EtlError::from_store)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(EtlError::from_store)
    }

    /// Deletes every row in the table and returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let sql = format!("DELETE FROM {}", self.table);
        let removed = self.conn.execute(&sql, []).map_err(EtlError::from_store)?;
        info!("Cleared {} rows from {}", removed, self.table);
        Ok(removed)
    }

    // Forces SQLite to read the header so a bad file fails at open time.
    fn ping(&self) -> Result<()> {
        self.conn
            .query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| EtlError::StoreConnection(format!("{} is not usable: {e}", self.location.display())))?;
        Ok(())
    }

    fn insert_statement(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
            self.table,
            TABLE_COLUMNS.join(", ")
        )
    }
}

impl RecordStore for SqliteStore {
    #[instrument(skip_all, fields(table = %self.table, records = records.len()))]
    fn insert_batch(&mut self, records: &[FieldRecord]) -> Result<usize> {
        let sql = self.insert_statement();
        let tx = self.conn.transaction().map_err(EtlError::from_store)?;
        let mut affected = 0usize;
        {
            let mut stmt = tx.prepare(&sql).map_err(EtlError::from_store)?;
            for record in records {
                let [name, email, phone, address, postal_code] = record.fields();
                affected += stmt
                    .execute(params![name, email, phone, address, postal_code])
                    .map_err(EtlError::from_store)?;
            }
        }
        // Dropping `tx` on any early return above rolls the batch back
        tx.commit().map_err(EtlError::from_store)?;
        debug!("Committed batch affected={}", affected);
        crate::metrics::store::rows_inserted(affected);
        Ok(affected)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.table, self.location.display())
    }
}

fn check_table(table: &str) -> Result<()> {
    if is_valid_identifier(table) {
        Ok(())
    } else {
        Err(EtlError::Config(format!("invalid table name {table:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> FieldRecord {
        FieldRecord::new("Alice Smith", "alice@x.com", "555-1234", "1 Main St", "90210").unwrap()
    }

    fn bob() -> FieldRecord {
        FieldRecord::new("Bob Jones", "bob@x.com", "555-9876", "22 Oak Ave", "10001").unwrap()
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("users"));
        assert!(is_valid_identifier("_staff_2024"));
        assert!(!is_valid_identifier("2users"));
        assert!(!is_valid_identifier("users; DROP TABLE users"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_insert_batch_commits_all_rows() {
        let mut store = SqliteStore::open_in_memory("users").unwrap();
        let affected = store.insert_batch(&[alice(), bob()]).unwrap();

        assert_eq!(affected, 2);
        assert_eq!(store.count_rows().unwrap(), 2);
        let rows = store.fetch_all().unwrap();
        assert_eq!(rows[0][0], "Alice Smith");
        assert_eq!(rows[1][4], "10001");
    }

    #[test]
    fn test_empty_batch_inserts_nothing() {
        let mut store = SqliteStore::open_in_memory("users").unwrap();
        assert_eq!(store.insert_batch(&[]).unwrap(), 0);
        assert_eq!(store.count_rows().unwrap(), 0);
    }

    #[test]
    fn test_repeated_batches_duplicate_rows() {
        let mut store = SqliteStore::open_in_memory("users").unwrap();
        store.insert_batch(&[alice()]).unwrap();
        store.insert_batch(&[alice()]).unwrap();
        assert_eq!(store.count_rows().unwrap(), 2);
    }

    #[test]
    fn test_constraint_violation_rolls_back_whole_batch() {
        let mut store = SqliteStore::open_in_memory("users").unwrap();
        store
            .connection()
            .execute_batch("CREATE UNIQUE INDEX users_email ON users (email);")
            .unwrap();

        let err = store.insert_batch(&[alice(), bob(), alice()]).unwrap_err();
        assert!(matches!(err, EtlError::StoreConstraint(_)), "got {err:?}");
        assert_eq!(store.count_rows().unwrap(), 0);
    }

    #[test]
    fn test_missing_table_is_database_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        SqliteStore::create(&path, "users").unwrap();

        let mut store = SqliteStore::open(&path, "staff").unwrap();
        assert!(matches!(store.insert_batch(&[alice()]), Err(EtlError::Database(_))));
    }

    #[test]
    fn test_open_missing_database_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteStore::open(dir.path().join("absent.db"), "users");
        assert!(matches!(result, Err(EtlError::StoreConnection(_))));
    }

    #[test]
    fn test_open_non_database_file_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, "this is definitely not a sqlite database header\n".repeat(64)).unwrap();
        assert!(matches!(SqliteStore::open(&path, "users"), Err(EtlError::StoreConnection(_))));
    }

    #[test]
    fn test_clear_removes_rows() {
        let mut store = SqliteStore::open_in_memory("users").unwrap();
        store.insert_batch(&[alice(), bob()]).unwrap();
        assert_eq!(store.clear().unwrap(), 2);
        assert_eq!(store.count_rows().unwrap(), 0);
    }

    #[test]
    fn test_rejects_invalid_table_name() {
        assert!(matches!(
            SqliteStore::open_in_memory("users--"),
            Err(EtlError::Config(_))
        ));
    }
}
