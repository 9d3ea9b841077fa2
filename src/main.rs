//! Binary entry point: bring up the customer database, load the current
//! rows, and run the Ratatui event loop until the user exits.
use anyhow::Context;
use customer_registry::{ensure_schema, run_app, App};

fn main() -> anyhow::Result<()> {
    let store = ensure_schema()?;
    let customers = store.view().context("failed to load customers")?;

    let mut app = App::new(store, customers);
    run_app(&mut app)
}
