//! Core library surface for the customer registry.
//!
//! `db` owns the SQLite-backed `clientes` table and the transaction wrapper
//! every operation goes through; `ui` is the terminal front-end that drives
//! it. The binary only wires the two together.
pub mod db;
pub mod models;
pub mod ui;

/// Persistence entry points used by `main.rs` and the integration tests.
pub use db::{ensure_schema, open_store, CustomerStore, StoreError, StoreResult};

/// Domain types passed between layers.
pub use models::{Customer, CustomerFields};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
