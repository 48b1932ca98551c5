use storage::keys;
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteStore;

#[tokio::test]
async fn sqlite_round_trips_values() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    let key = keys::completed_courses("ada@studio.dev");
    assert_eq!(store.get(&key).await.unwrap(), None);

    store.set(&key, r#"["react-fundamentals"]"#).await.unwrap();
    assert_eq!(
        store.get(&key).await.unwrap().as_deref(),
        Some(r#"["react-fundamentals"]"#)
    );

    store
        .set(&key, r#"["react-fundamentals","ai-integration"]"#)
        .await
        .unwrap();
    assert_eq!(
        store.get(&key).await.unwrap().as_deref(),
        Some(r#"["react-fundamentals","ai-integration"]"#)
    );

    store.remove(&key).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("first migrate");
    store.set(keys::SESSION_TOKEN, "token").await.unwrap();
    store.migrate().await.expect("second migrate");

    assert_eq!(
        store.get(keys::SESSION_TOKEN).await.unwrap().as_deref(),
        Some("token")
    );
}

#[tokio::test]
async fn storage_sqlite_keeps_partitions_separate() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_partitions?mode=memory&cache=shared")
        .await
        .expect("storage");

    storage
        .kv
        .set(&keys::user_bio("ada@studio.dev"), "Analyst")
        .await
        .unwrap();
    storage
        .kv
        .set(&keys::user_bio("grace@studio.dev"), "Admiral")
        .await
        .unwrap();

    assert_eq!(
        storage
            .kv
            .get(&keys::user_bio("ada@studio.dev"))
            .await
            .unwrap()
            .as_deref(),
        Some("Analyst")
    );
    assert_eq!(
        storage
            .kv
            .get(&keys::user_bio("grace@studio.dev"))
            .await
            .unwrap()
            .as_deref(),
        Some("Admiral")
    );
}
