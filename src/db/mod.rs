//! Persistence module split across logical submodules.

mod connection;
mod customers;
mod error;
mod transaction;

pub use connection::{ensure_schema, open_store};
pub use customers::CustomerStore;
pub use error::{StoreError, StoreResult};
pub use transaction::{with_transaction, Transaction};
