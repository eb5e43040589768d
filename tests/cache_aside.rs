mod common;

use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tmdb_proxy::application::services::CacheAside;
use tmdb_proxy::domain::{CacheEntry, RequestDescriptor};
use tmdb_proxy::infrastructure::cache::{CacheBackend, FileCache, Namespace, derive_key};

fn search(query: &str) -> RequestDescriptor {
    RequestDescriptor::new("/search/movie").param("query", query)
}

#[tokio::test]
async fn test_aged_file_entry_is_absent_and_removed() {
    let temp_dir = TempDir::new().unwrap();
    let files = FileCache::open(temp_dir.path(), Duration::from_secs(86_400))
        .await
        .unwrap();
    let key = derive_key(&Namespace::new("tmdb").unwrap(), &search("batman"));

    // Written directly so the record carries a stored_at far in the past.
    let record = json!({ "stored_at": "2001-01-01T00:00:00Z", "value": {"page": 1} });
    std::fs::write(files.entry_path(&key), record.to_string()).unwrap();

    assert!(files.get(&key).await.unwrap().is_none());
    assert!(!files.entry_path(&key).exists());
}

#[tokio::test]
async fn test_expired_entry_is_recomputed() {
    let temp_dir = TempDir::new().unwrap();
    let ttl = Duration::from_secs(60);
    let files = Arc::new(FileCache::open(temp_dir.path(), ttl).await.unwrap());
    let cache = CacheAside::new(files.clone(), ttl);
    let ns = Namespace::new("tmdb").unwrap();
    let request = search("batman");

    let stale = CacheEntry::stored_at(json!("stale"), Utc::now() - ChronoDuration::seconds(61));
    files
        .set(&derive_key(&ns, &request), &stale, ttl)
        .await
        .unwrap();

    let value: Value = cache
        .get_or_compute(&ns, &request, || async { Ok::<_, String>(json!("fresh")) })
        .await
        .unwrap();

    assert_eq!(value, json!("fresh"));
    let stored = files.get(&derive_key(&ns, &request)).await.unwrap().unwrap();
    assert_eq!(stored.value, json!("fresh"));
}

#[tokio::test]
async fn test_concurrent_misses_each_compute_without_corruption() {
    let temp_dir = TempDir::new().unwrap();
    let files = Arc::new(FileCache::open(temp_dir.path(), common::TTL).await.unwrap());
    let cache = CacheAside::new(files.clone(), common::TTL);
    let ns = Namespace::new("tmdb").unwrap();
    let computes = Arc::new(AtomicUsize::new(0));
    let payload = json!({ "results": vec![json!({"title": "Batman"}); 2_000] });

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        let ns = ns.clone();
        let computes = computes.clone();
        let payload = payload.clone();
        tasks.push(tokio::spawn(async move {
            cache
                .get_or_compute(&ns, &search("batman"), || async move {
                    computes.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok::<_, String>(payload)
                })
                .await
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), payload);
    }

    assert!(computes.load(Ordering::SeqCst) >= 1);
    let stored = files
        .get(&derive_key(&ns, &search("batman")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, payload);
    assert_eq!(files.stats().await.unwrap().entries, 1);
}

#[tokio::test]
async fn test_unwritable_cache_still_returns_value() {
    let temp_dir = TempDir::new().unwrap();
    let files = FileCache::open(temp_dir.path().join("cache"), common::TTL)
        .await
        .unwrap();
    std::fs::remove_dir(files.dir()).unwrap();

    let cache = CacheAside::new(Arc::new(files), common::TTL);
    let value: Value = cache
        .get_or_compute(&Namespace::new("tmdb").unwrap(), &search("x"), || async {
            Ok::<_, String>(json!(7))
        })
        .await
        .unwrap();

    assert_eq!(value, json!(7));
}
