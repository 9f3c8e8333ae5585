// Single SQLite connection shared by the schema reset and every load
use log::{debug, info};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::{quote_ident, LoadResult};

pub struct Store {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened database {}", path.display());
        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> LoadResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, None)
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> LoadResult<Self> {
        // References between relations are declared only
        conn.pragma_update(None, "foreign_keys", false)?;
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Exclusive access to the connection. Callers hold the guard for a whole
    /// batch of statements so nothing else interleaves with it.
    pub fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Declared column names of `relation`, in declaration order, or `None`
    /// when the relation does not exist.
    pub fn declared_columns(&self, relation: &str) -> LoadResult<Option<Vec<String>>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let columns = stmt
            .query_map([relation], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            Ok(None)
        } else {
            Ok(Some(columns))
        }
    }

    pub fn relation_exists(&self, relation: &str) -> LoadResult<bool> {
        let conn = self.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [relation],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn row_count(&self, relation: &str) -> LoadResult<u64> {
        let conn = self.lock();
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(relation));
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn close(self) -> LoadResult<()> {
        let conn = self.conn.into_inner();
        conn.close().map_err(|(_, e)| e)?;
        debug!("Closed the database connection");
        Ok(())
    }
}
