use customer_registry::db::{with_transaction, Transaction};
use customer_registry::{open_store, CustomerFields, StoreError};
use rusqlite::params;
use tempfile::TempDir;

#[test]
fn raw_statements_share_the_table_with_the_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clientes.db");
    let store = open_store(&path).unwrap();
    store
        .insert(&CustomerFields::new("Ana", "Silva", "ana@x.com", "1"))
        .unwrap();

    let rows = with_transaction(&path, |trans| {
        trans.execute(
            "SELECT id, name, surname, email, national_id FROM clientes WHERE name = ?1",
            params!["Ana"],
        )?;
        Ok(trans.fetch_all())
    })
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "ana@x.com");
}

#[test]
fn reconnecting_replaces_the_previous_handle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clientes.db");
    open_store(&path).unwrap();

    let mut trans = Transaction::new(&path);
    trans.connect().unwrap();
    trans
        .execute(
            "INSERT INTO clientes (name, surname, email, national_id) VALUES (?1, ?2, ?3, ?4)",
            params!["Ana", "Silva", "ana@x.com", "1"],
        )
        .unwrap();

    // The pending insert dies with the replaced connection.
    trans.connect().unwrap();
    trans.execute("SELECT * FROM clientes", []).unwrap();
    assert!(trans.fetch_all().is_empty());
    trans.disconnect().unwrap();
    assert!(matches!(trans.disconnect(), Err(StoreError::NotConnected)));
}

#[test]
fn persisted_changes_survive_disconnect() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clientes.db");
    let store = open_store(&path).unwrap();

    let mut trans = Transaction::new(&path);
    trans.connect().unwrap();
    trans
        .execute("DELETE FROM clientes WHERE id = ?1", params![1])
        .unwrap();
    trans
        .execute(
            "INSERT INTO clientes (name, surname, email, national_id) VALUES (?1, ?2, ?3, ?4)",
            params!["Bia", "Lima", "bia@x.com", "2"],
        )
        .unwrap();
    trans.persist().unwrap();
    trans.disconnect().unwrap();

    let rows = store.view().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Bia");
}
