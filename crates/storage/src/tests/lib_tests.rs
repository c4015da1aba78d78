use super::*;

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"))
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn missing_key_reads_as_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert_eq!(storage.get_value("search").await.expect("get"), None);
}

#[tokio::test]
async fn set_value_overwrites_previous_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set_value("search", "Rust").await.expect("first write");
    storage.set_value("search", "Redux").await.expect("second write");

    assert_eq!(
        storage.get_value("search").await.expect("get"),
        Some("Redux".to_string())
    );
}

#[tokio::test]
async fn keys_are_independent() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set_value("search", "Rust").await.expect("write");
    storage.set_value("other", "Go").await.expect("write");

    assert_eq!(
        storage.get_value("search").await.expect("get"),
        Some("Rust".to_string())
    );
    assert!(storage.delete_value("other").await.expect("delete"));
    assert!(!storage.delete_value("other").await.expect("delete again"));
    assert_eq!(storage.get_value("other").await.expect("get"), None);
}

#[tokio::test]
async fn empty_string_is_stored_verbatim() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set_value("search", "").await.expect("write");
    assert_eq!(
        storage.get_value("search").await.expect("get"),
        Some(String::new())
    );
}

#[tokio::test]
async fn entry_records_update_time() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let before = Utc::now() - chrono::Duration::seconds(1);
    storage.set_value("search", "React").await.expect("write");

    let entry = storage
        .get_entry("search")
        .await
        .expect("entry")
        .expect("some entry");
    assert_eq!(entry.key, "search");
    assert_eq!(entry.value, "React");
    assert!(entry.updated_at >= before);
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("stories.db");

    let storage = Storage::new(&sqlite_url(&db_path)).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn value_survives_reopening_the_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let database_url = sqlite_url(&temp_root.path().join("stories.db"));

    {
        let storage = Storage::new(&database_url).await.expect("db");
        storage.set_value("search", "Svelte").await.expect("write");
        storage.pool().close().await;
    }

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(
        reopened.get_value("search").await.expect("get"),
        Some("Svelte".to_string())
    );
}

#[test]
fn memory_urls_have_no_file_path() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/stories.db?mode=rwc"),
        Some(PathBuf::from("./data/stories.db"))
    );
}
