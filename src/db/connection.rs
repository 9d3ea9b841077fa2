use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

use super::customers::CustomerStore;
use super::error::StoreResult;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".customer-registry";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "clientes.db";

/// Resolve the default database location, make sure the schema exists, and
/// hand back a store ready for CRUD calls.
pub fn ensure_schema() -> Result<CustomerStore> {
    let db_path = db_path()?;
    open_store(&db_path).context("failed to initialize customer database")
}

/// Prepare the parent directory of `path` and create the `clientes` table.
pub fn open_store(path: &Path) -> StoreResult<CustomerStore> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let store = CustomerStore::new(path);
    store.initialize()?;
    Ok(store)
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
