use std::path::{Path, PathBuf};

use rusqlite::{Connection, Params, Row};

use super::error::{StoreError, StoreResult};
use crate::models::Customer;

/// Width of a `clientes` row: id, name, surname, email, national_id.
const CUSTOMER_COLUMNS: usize = 5;

/// Narrow, stateful wrapper around one SQLite connection.
///
/// A handle is either connected or not. Row-producing statements buffer
/// their output until `fetch_all`; mutating statements open an implicit
/// transaction that only becomes durable on `persist`. Dropping or
/// disconnecting without persisting rolls pending changes back.
pub struct Transaction {
    path: PathBuf,
    conn: Option<Connection>,
    rows: Vec<Customer>,
}

impl Transaction {
    /// Create a disconnected handle pointing at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
            rows: Vec::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the database file, creating it if absent. A handle that is
    /// already connected has its previous connection closed and replaced.
    pub fn connect(&mut self) -> StoreResult<()> {
        let conn = Connection::open(&self.path)?;
        self.rows.clear();
        self.conn = Some(conn);
        Ok(())
    }

    /// Close the connection. Uncommitted work is discarded by SQLite.
    pub fn disconnect(&mut self) -> StoreResult<()> {
        let conn = self.conn.take().ok_or(StoreError::NotConnected)?;
        self.rows.clear();
        conn.close().map_err(|(_, err)| StoreError::Store(err))
    }

    /// Run one statement with positional parameters and return the number of
    /// rows it produced or touched.
    ///
    /// Statements that return rows must yield the five `clientes` columns in
    /// table order; anything else fails with `UnexpectedColumns` before the
    /// statement runs.
    pub fn execute<P: Params>(&mut self, sql: &str, params: P) -> StoreResult<usize> {
        let conn = self.conn.as_ref().ok_or(StoreError::NotConnected)?;
        let mut stmt = conn.prepare(sql)?;

        let columns = stmt.column_count();
        if columns > 0 && columns != CUSTOMER_COLUMNS {
            return Err(StoreError::UnexpectedColumns {
                expected: CUSTOMER_COLUMNS,
                found: columns,
            });
        }

        if !stmt.readonly() && conn.is_autocommit() {
            conn.execute_batch("BEGIN")?;
        }

        if columns == 0 {
            return Ok(stmt.execute(params)?);
        }

        let rows = stmt
            .query_map(params, customer_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        let count = rows.len();
        self.rows = rows;
        Ok(count)
    }

    /// Hand over every row buffered by the last query, in store order.
    pub fn fetch_all(&mut self) -> Vec<Customer> {
        std::mem::take(&mut self.rows)
    }

    /// Commit whatever the previous statements changed.
    pub fn persist(&mut self) -> StoreResult<()> {
        let conn = self.conn.as_ref().ok_or(StoreError::NotConnected)?;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    /// Row id assigned by the most recent successful insert.
    pub fn last_insert_id(&self) -> StoreResult<i64> {
        let conn = self.conn.as_ref().ok_or(StoreError::NotConnected)?;
        Ok(conn.last_insert_rowid())
    }
}

/// Open a handle on `path`, run `f`, and always disconnect afterwards. When
/// both `f` and the disconnect fail, the error from `f` is returned.
pub fn with_transaction<T, F>(path: &Path, f: F) -> StoreResult<T>
where
    F: FnOnce(&mut Transaction) -> StoreResult<T>,
{
    let mut trans = Transaction::new(path);
    trans.connect()?;
    let outcome = f(&mut trans);
    let closed = trans.disconnect();
    let value = outcome?;
    closed?;
    Ok(value)
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        surname: row.get(2)?,
        email: row.get(3)?,
        national_id: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::params;
    use tempfile::TempDir;

    use super::*;

    const CREATE: &str = "CREATE TABLE IF NOT EXISTS clientes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT, surname TEXT, email TEXT, national_id TEXT
    )";

    fn connected(dir: &TempDir) -> Transaction {
        let mut trans = Transaction::new(dir.path().join("clientes.db"));
        trans.connect().unwrap();
        trans.execute(CREATE, []).unwrap();
        trans.persist().unwrap();
        trans
    }

    #[test]
    fn statements_on_a_closed_handle_report_not_connected() {
        let dir = TempDir::new().unwrap();
        let mut trans = Transaction::new(dir.path().join("clientes.db"));

        assert!(!trans.is_connected());
        assert!(matches!(trans.execute(CREATE, []), Err(StoreError::NotConnected)));
        assert!(matches!(trans.persist(), Err(StoreError::NotConnected)));
        assert!(matches!(trans.disconnect(), Err(StoreError::NotConnected)));
    }

    #[test]
    fn fetch_without_a_query_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut trans = connected(&dir);
        assert!(trans.fetch_all().is_empty());
        trans.disconnect().unwrap();
    }

    #[test]
    fn queries_with_other_shapes_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut trans = connected(&dir);

        let err = trans
            .execute("SELECT count(*) FROM clientes", [])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnexpectedColumns { expected: 5, found: 1 }
        ));
        trans.disconnect().unwrap();
    }

    #[test]
    fn returning_writes_wait_for_persist() {
        let dir = TempDir::new().unwrap();
        let mut trans = connected(&dir);

        let returned = trans
            .execute(
                "INSERT INTO clientes (name, surname, email, national_id) VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, name, surname, email, national_id",
                params!["Ana", "Silva", "ana@x.com", "11122233344"],
            )
            .unwrap();
        assert_eq!(returned, 1);
        assert_eq!(trans.fetch_all()[0].name, "Ana");
        trans.disconnect().unwrap();

        trans.connect().unwrap();
        trans.execute("SELECT * FROM clientes", []).unwrap();
        assert!(trans.fetch_all().is_empty());
        trans.disconnect().unwrap();
    }

    #[test]
    fn second_disconnect_fails() {
        let dir = TempDir::new().unwrap();
        let mut trans = connected(&dir);

        trans.disconnect().unwrap();
        assert!(matches!(trans.disconnect(), Err(StoreError::NotConnected)));
    }

    #[test]
    fn connect_creates_the_database_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clientes.db");
        assert!(!path.exists());

        let mut trans = Transaction::new(&path);
        trans.connect().unwrap();
        assert!(trans.is_connected());
        trans.disconnect().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unpersisted_changes_are_rolled_back_on_disconnect() {
        let dir = TempDir::new().unwrap();
        let mut trans = connected(&dir);

        trans
            .execute(
                "INSERT INTO clientes (name, surname, email, national_id) VALUES (?1, ?2, ?3, ?4)",
                params!["Ana", "Silva", "ana@x.com", "11122233344"],
            )
            .unwrap();
        trans.disconnect().unwrap();

        trans.connect().unwrap();
        trans.execute("SELECT * FROM clientes", []).unwrap();
        assert!(trans.fetch_all().is_empty());
        trans.disconnect().unwrap();
    }

    #[test]
    fn query_rows_are_buffered_until_fetched() {
        let dir = TempDir::new().unwrap();
        let mut trans = connected(&dir);

        let touched = trans
            .execute(
                "INSERT INTO clientes (name, surname, email, national_id) VALUES (?1, ?2, ?3, ?4)",
                params!["Ana", "Silva", "ana@x.com", "11122233344"],
            )
            .unwrap();
        assert_eq!(touched, 1);
        let id = trans.last_insert_id().unwrap();
        trans.persist().unwrap();

        let found = trans.execute("SELECT * FROM clientes", []).unwrap();
        assert_eq!(found, 1);
        let rows = trans.fetch_all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].surname, "Silva");
        assert!(trans.fetch_all().is_empty());
        trans.disconnect().unwrap();
    }

    #[test]
    fn malformed_statements_propagate_store_errors() {
        let dir = TempDir::new().unwrap();
        let mut trans = connected(&dir);

        let err = trans.execute("SELEKT nothing", []).unwrap_err();
        assert!(matches!(err, StoreError::Store(_)));
        trans.disconnect().unwrap();
    }

    #[test]
    fn scoped_helper_disconnects_even_when_the_body_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clientes.db");

        let result: StoreResult<()> = with_transaction(&path, |trans| {
            trans.execute(CREATE, [])?;
            trans.execute("INSERT INTO missing VALUES (1)", [])?;
            Ok(())
        });
        assert!(matches!(result, Err(StoreError::Store(_))));

        // The table creation was never persisted.
        let lookup = with_transaction(&path, |trans| trans.execute("SELECT * FROM clientes", []));
        assert!(matches!(lookup, Err(StoreError::Store(_))));
    }
}
