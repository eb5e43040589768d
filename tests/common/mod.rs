#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tmdb_proxy::application::services::{CacheAside, TmdbService};
use tmdb_proxy::domain::{RequestDescriptor, UpstreamClient, UpstreamError};
use tmdb_proxy::infrastructure::cache::FileCache;
use tmdb_proxy::state::AppState;

pub const TTL: Duration = Duration::from_secs(3600);

/// Upstream stand-in that records every request it receives.
#[derive(Default)]
pub struct FakeUpstream {
    calls: Mutex<Vec<RequestDescriptor>>,
    fail_with: Mutex<Option<fn() -> UpstreamError>>,
    delay: Mutex<Option<Duration>>,
}

impl FakeUpstream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(make_error: fn() -> UpstreamError) -> Arc<Self> {
        let upstream = Self::default();
        *upstream.fail_with.lock().unwrap() = Some(make_error);
        Arc::new(upstream)
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        let upstream = Self::default();
        *upstream.delay.lock().unwrap() = Some(delay);
        Arc::new(upstream)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<Value, UpstreamError> {
        self.calls.lock().unwrap().push(request.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let fail_with = *self.fail_with.lock().unwrap();
        if let Some(make_error) = fail_with {
            return Err(make_error());
        }

        let params: serde_json::Map<String, Value> = request
            .params()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();

        Ok(json!({ "path": request.path(), "params": params }))
    }
}

/// Builds handler state over a file cache in a fresh temp directory.
pub async fn create_test_state(upstream: Arc<FakeUpstream>) -> (AppState, FileCache, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let files = FileCache::open(temp_dir.path(), TTL).await.unwrap();

    let cache = CacheAside::new(Arc::new(files.clone()), TTL);
    let service = TmdbService::new(cache, upstream).unwrap();

    (AppState::new(Arc::new(service)), files, temp_dir)
}

/// Number of entry files in the cache directory.
pub fn cached_entries(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .count()
}
