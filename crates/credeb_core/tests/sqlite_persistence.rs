use credeb_core::db::{open_db, open_db_in_memory, DbError};
use credeb_core::{
    KvRepository, LedgerStore, Namespace, RepoError, SqliteKvRepository, TransactionKind,
};
use rusqlite::Connection;
use rust_decimal_macros::dec;

#[test]
fn snapshot_round_trips_through_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credeb.sqlite3");

    let expected = {
        let mut conn = open_db(&path).unwrap();
        let repo = SqliteKvRepository::try_new(&mut conn).unwrap();
        let mut store = LedgerStore::open(repo, Namespace::purchase());
        store.add_person("Alice").unwrap();
        store.add_person("Bob").unwrap();
        store
            .add_transaction("Alice", "2024-01-01", dec!(100.25), TransactionKind::Credit)
            .unwrap();
        store
            .add_transaction("Bob", "2024-01-02", dec!(3), TransactionKind::Payment)
            .unwrap();
        store.add_due("Alice", Some("555-0100"), "2024-02-01").unwrap();
        store.add_due("Bob", None, "2024-02-02").unwrap();
        store.snapshot().clone()
    };

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteKvRepository::try_new(&mut conn).unwrap();
    let store = LedgerStore::open(repo, Namespace::purchase());
    assert_eq!(store.snapshot(), &expected);
}

#[test]
fn collections_are_stored_under_namespace_keys() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteKvRepository::try_new(&mut conn).unwrap();
        let mut store = LedgerStore::open(repo, Namespace::sales());
        store.add_person("Alice").unwrap();
    }

    let mut keys: Vec<String> = conn
        .prepare("SELECT key FROM kv_entries ORDER BY key;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    keys.sort();
    assert_eq!(keys, vec!["sales_dues", "sales_people", "sales_transactions"]);

    let people: Vec<u8> = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE key = 'sales_people';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    let decoded: serde_json::Value = serde_json::from_slice(&people).unwrap();
    assert_eq!(decoded, serde_json::json!(["Alice"]));
}

#[test]
fn legacy_numeric_amounts_and_corrupt_keys_load() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteKvRepository::try_new(&mut conn).unwrap();
    repo.set("purchase_people", br#"["Alice"]"#).unwrap();
    repo.set(
        "purchase_transactions",
        br#"[{"name":"Alice","date":"2024-01-01","amount":100,"type":"credit"},
             {"name":"Alice","date":"2024-01-02","amount":40.5,"type":"payment"}]"#,
    )
    .unwrap();
    repo.set("purchase_dues", b"\xff\xfe garbage").unwrap();

    let store = LedgerStore::open(repo, Namespace::purchase());
    assert_eq!(store.people(), ["Alice".to_string()]);
    assert_eq!(store.transactions().len(), 2);
    assert_eq!(store.transactions()[1].amount, dec!(40.5));
    assert!(store.dues().is_empty());
}

#[test]
fn unmigrated_connection_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqliteKvRepository::try_new(&mut conn).err().unwrap();
    assert!(matches!(err, RepoError::Db(DbError::MissingKvTable)));
}

#[test]
fn overwriting_a_key_keeps_single_row() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteKvRepository::try_new(&mut conn).unwrap();
        repo.set("k", b"one").unwrap();
        repo.set("k", b"two").unwrap();
        assert_eq!(repo.get("k").unwrap(), Some(b"two".to_vec()));
        assert_eq!(repo.get("missing").unwrap(), None);
    }

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}
