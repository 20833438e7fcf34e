//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations, config persistence, and a cart surviving a
//! restart through file-backed storage.

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::cart_store::CartStore;
use crate::config::{CartConfig, CorruptDataPolicy};
use crate::error::StoreError;
use crate::persistence::{load_json, save_json};
use crate::storage::FileStorage;
use gomarket_core::{Cart, KeyValueStorage, ProductInput};

fn file_config(temp_dir: &TempDir) -> CartConfig {
    CartConfig {
        storage_path: Some(temp_dir.path().join("storage.json")),
        ..Default::default()
    }
}

async fn open_file_store(config: &CartConfig) -> CartStore {
    let storage = Arc::new(FileStorage::new(config.storage_path()));
    CartStore::open(storage, config).await.unwrap()
}

// ============================================================================
// Config Files
// ============================================================================

#[tokio::test]
async fn test_config_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let config = CartConfig {
        namespace: "@Staging".to_string(),
        corrupt_data: CorruptDataPolicy::Reset,
        coalesce_writes: true,
        storage_path: Some(PathBuf::from("/srv/cart/storage.json")),
    };
    config.save_to(&path).await.unwrap();

    assert_eq!(CartConfig::load_from(&path).await.unwrap(), config);
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_partial_config_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    tokio::fs::write(&path, r#"{"corrupt_data": "reset", "theme": "dark"}"#)
        .await
        .unwrap();

    let loaded = CartConfig::load_from(&path).await.unwrap();
    assert_eq!(loaded.corrupt_data, CorruptDataPolicy::Reset);
    assert_eq!(loaded.storage_key(), "@GoMarketplace:products");
}

#[tokio::test]
async fn test_blank_namespace_in_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    tokio::fs::write(&path, r#"{"namespace": "  "}"#).await.unwrap();

    let result = CartConfig::load_from(&path).await;
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[tokio::test]
async fn test_save_json_overwrites_previous_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doc.json");

    save_json(&path, &vec![1, 2, 3]).await.unwrap();
    save_json(&path, &vec![4]).await.unwrap();

    let loaded: Vec<u32> = load_json(&path).await.unwrap();
    assert_eq!(loaded, vec![4]);
}

// ============================================================================
// Cart Across Restarts
// ============================================================================

#[tokio::test]
async fn test_cart_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);

    let expected = {
        let store = open_file_store(&config).await;
        store
            .add_to_cart(ProductInput::new("p1", "Shirt", "u", 10.0))
            .await
            .unwrap();
        store
            .add_to_cart(ProductInput::new("p2", "Hat", "u2", 5.0))
            .await
            .unwrap();
        let last = store.increment("p2").await.unwrap();
        store.flush().await.unwrap();
        last
    };

    let reopened = open_file_store(&config).await;
    assert_eq!(*reopened.products().await, *expected);
}

#[tokio::test]
async fn test_restart_reads_snapshot_written_by_other_process() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);

    FileStorage::new(config.storage_path())
        .set(
            &config.storage_key(),
            r#"[{"id":"p2","title":"Hat","image_url":"u2","price":5,"quantity":2}]"#.to_string(),
        )
        .await
        .unwrap();

    let store = open_file_store(&config).await;
    let expected = ProductInput::new("p2", "Hat", "u2", 5.0).into_product(2);
    assert_eq!(store.products().await.products(), &[expected]);
}

#[tokio::test]
async fn test_unicode_titles_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);

    let title = "Camiseta 🚀 日本語";
    {
        let store = open_file_store(&config).await;
        store
            .add_to_cart(ProductInput::new("p1", title, "https://img/ü.png", 49.9))
            .await
            .unwrap();
        store.flush().await.unwrap();
    }

    let raw = FileStorage::new(config.storage_path())
        .get(&config.storage_key())
        .await
        .unwrap()
        .unwrap();
    let cart = Cart::from_json(&raw).unwrap();
    assert_eq!(cart.get("p1").unwrap().title, title);
}
