use thiserror::Error;

/// Failures surfaced by the persistence layer. "No matching row" is not an
/// error anywhere in this crate; those cases come back as empty results.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A statement or commit was attempted on a handle with no open
    /// connection.
    #[error("not connected to the customer database")]
    NotConnected,
    /// A row-returning statement did not produce a `clientes`-shaped row.
    #[error("query returned {found} columns, expected {expected}")]
    UnexpectedColumns { expected: usize, found: usize },
    /// Anything SQLite itself rejects: malformed SQL, I/O, constraints.
    #[error(transparent)]
    Store(#[from] rusqlite::Error),
    /// The directory holding the database file could not be prepared.
    #[error("failed to prepare data directory: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Result alias used by every function in `db`.
pub type StoreResult<T> = Result<T, StoreError>;
