//! Tests for StateManager

use super::*;
use tempfile::tempdir;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/test-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/test-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_from_json() {
    let manager = StateManager::from_json(
        r#"{"bookmarks": {"orders": "2024-01-01T00:00:00Z", "currently_sync_stream": "orders"}}"#,
    )
    .unwrap();

    assert!(manager.is_in_memory());
    assert_eq!(
        manager.get_bookmark("orders").await,
        Some("2024-01-01T00:00:00Z".to_string())
    );
    assert_eq!(manager.currently_syncing().await, Some("orders".to_string()));
}

#[tokio::test]
async fn test_from_json_empty_string() {
    let manager = StateManager::from_json("  ").unwrap();
    assert_eq!(manager.snapshot().await, State::new());
}

#[test]
fn test_from_json_invalid() {
    let err = StateManager::from_json("{ nope").unwrap_err();
    assert!(err.to_string().contains("Failed to parse state"));
}

// ============================================================================
// Bookmark Tests
// ============================================================================

#[tokio::test]
async fn test_get_set_bookmark() {
    let manager = StateManager::in_memory();
    assert!(manager.get_bookmark("orders").await.is_none());

    manager
        .set_bookmark("orders", "2024-01-01T00:00:00.000000Z".to_string())
        .await;
    assert_eq!(
        manager.get_bookmark("orders").await,
        Some("2024-01-01T00:00:00.000000Z".to_string())
    );

    manager
        .set_bookmark("orders", "2024-02-01T00:00:00.000000Z".to_string())
        .await;
    assert_eq!(
        manager.get_bookmark("orders").await,
        Some("2024-02-01T00:00:00.000000Z".to_string())
    );
}

#[tokio::test]
async fn test_currently_syncing() {
    let manager = StateManager::in_memory();
    manager.set_currently_syncing(Some("orders")).await;
    assert_eq!(manager.currently_syncing().await, Some("orders".to_string()));

    manager.set_currently_syncing(None).await;
    assert!(manager.currently_syncing().await.is_none());
}

#[tokio::test]
async fn test_clone_shares_state() {
    let manager = StateManager::in_memory();
    let clone = manager.clone();
    clone.set_bookmark("orders", "2024-01-01".to_string()).await;

    assert_eq!(
        manager.get_bookmark("orders").await,
        Some("2024-01-01".to_string())
    );
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::new(&path);
    manager
        .set_bookmark("orders", "2024-03-01T00:00:00.000000Z".to_string())
        .await;
    manager.save().await.unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_bookmark("orders").await,
        Some("2024-03-01T00:00:00.000000Z".to_string())
    );
}

#[tokio::test]
async fn test_from_file_missing_starts_empty() {
    let dir = tempdir().unwrap();
    let manager = StateManager::from_file(dir.path().join("missing.json")).unwrap();
    assert_eq!(manager.snapshot().await, State::new());
}

#[tokio::test]
async fn test_with_output_redirects_save() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.json");

    let manager = StateManager::from_json(r#"{"bookmarks": {"orders": "2024-01-01"}}"#)
        .unwrap()
        .with_output(&output);
    manager.save().await.unwrap();

    let contents = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["bookmarks"]["orders"], "2024-01-01");
}

#[tokio::test]
async fn test_in_memory_save_is_noop() {
    let manager = StateManager::in_memory();
    manager.set_bookmark("orders", "x".to_string()).await;
    manager.save().await.unwrap();
}

#[tokio::test]
async fn test_to_json() {
    let manager = StateManager::in_memory();
    manager.set_bookmark("orders", "2024-01-01".to_string()).await;

    let json = manager.to_json().await.unwrap();
    assert_eq!(json, r#"{"bookmarks":{"orders":"2024-01-01"}}"#);
}
