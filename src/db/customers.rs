use std::path::{Path, PathBuf};

use rusqlite::params;

use super::error::StoreResult;
use super::transaction::with_transaction;
use crate::models::{Customer, CustomerFields};

/// CRUD entry points for the `clientes` table. The store only remembers the
/// file location; every call opens its own connection, runs one statement,
/// commits when it mutated something, and disconnects before returning.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    path: PathBuf,
}

impl CustomerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the `clientes` table if it does not exist yet. Safe to run on
    /// every startup; existing rows are left alone.
    pub fn initialize(&self) -> StoreResult<()> {
        with_transaction(&self.path, |trans| {
            trans.execute(
                "CREATE TABLE IF NOT EXISTS clientes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT,
                    surname TEXT,
                    email TEXT,
                    national_id TEXT
                )",
                [],
            )?;
            trans.persist()
        })
    }

    /// Append a row and return it with the id SQLite assigned.
    pub fn insert(&self, fields: &CustomerFields) -> StoreResult<Customer> {
        with_transaction(&self.path, |trans| {
            trans.execute(
                "INSERT INTO clientes (name, surname, email, national_id) VALUES (?1, ?2, ?3, ?4)",
                params![fields.name, fields.surname, fields.email, fields.national_id],
            )?;
            let id = trans.last_insert_id()?;
            trans.persist()?;
            Ok(Customer::from_fields(id, fields))
        })
    }

    /// Every row, ordered by id.
    pub fn view(&self) -> StoreResult<Vec<Customer>> {
        with_transaction(&self.path, |trans| {
            trans.execute(
                "SELECT id, name, surname, email, national_id FROM clientes ORDER BY id",
                [],
            )?;
            Ok(trans.fetch_all())
        })
    }

    /// Rows where ANY of the four columns equals the matching field.
    ///
    /// Matching is an OR of exact equalities, not an AND of the filled-in
    /// fields. Empty strings are compared like any other value: searching
    /// with `CustomerFields::default()` returns rows that have at least one
    /// empty column, not every row.
    pub fn search(&self, filter: &CustomerFields) -> StoreResult<Vec<Customer>> {
        with_transaction(&self.path, |trans| {
            trans.execute(
                "SELECT id, name, surname, email, national_id FROM clientes
                 WHERE name = ?1 OR surname = ?2 OR email = ?3 OR national_id = ?4
                 ORDER BY id",
                params![filter.name, filter.surname, filter.email, filter.national_id],
            )?;
            Ok(trans.fetch_all())
        })
    }

    /// Replace the four text columns of row `id`. A missing id is a no-op.
    pub fn update(&self, id: i64, fields: &CustomerFields) -> StoreResult<()> {
        with_transaction(&self.path, |trans| {
            trans.execute(
                "UPDATE clientes SET name = ?1, surname = ?2, email = ?3, national_id = ?4
                 WHERE id = ?5",
                params![fields.name, fields.surname, fields.email, fields.national_id, id],
            )?;
            trans.persist()
        })
    }

    /// Remove row `id` for good. A missing id is a no-op.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        with_transaction(&self.path, |trans| {
            trans.execute("DELETE FROM clientes WHERE id = ?1", params![id])?;
            trans.persist()
        })
    }
}
