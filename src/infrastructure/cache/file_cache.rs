//! Filesystem cache used when no Redis is configured.
//!
//! Each entry is one JSON file inside the cache directory:
//!
//! ```json
//! {"stored_at": "2026-10-19T09:00:00Z", "value": { ... }}
//! ```
//!
//! The filename is the percent-encoded cache key. Writes go to a temporary
//! file first and are renamed into place, so readers see either the old
//! record or the new one, never a partial write.

use super::key::CacheKey;
use super::service::{CacheBackend, CacheResult};
use crate::domain::CacheEntry;
use async_trait::async_trait;
use chrono::Utc;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::{debug, info, warn};

/// Bytes left as-is in filenames. Everything else, including `.` and `/`, is
/// percent-encoded.
const FILENAME_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Prefix of in-flight write files. Encoded keys never start with `.`.
const TEMP_PREFIX: &str = ".tmp-";

/// Encodes a cache key into a filename that stays inside the cache directory.
pub fn encode_file_name(key: &str) -> String {
    utf8_percent_encode(key, FILENAME_SAFE).to_string()
}

/// Reverses [`encode_file_name`]. Returns `None` for names it did not produce.
pub fn decode_file_name(name: &str) -> Option<String> {
    if name.starts_with('.') {
        return None;
    }
    percent_decode_str(name)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// Result of a [`FileCache::sweep`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub removed: usize,
}

/// Size of the cache directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub bytes: u64,
}

/// Outcome of reading a single entry file.
enum Record {
    Missing,
    Fresh(CacheEntry),
    Stale,
    Corrupt(String),
}

/// One-file-per-entry cache with lazy TTL expiry.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    /// Opens the cache directory, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`super::CacheError::Io`] if the directory cannot be created. This is
    /// meant to abort startup.
    pub async fn open(dir: impl Into<PathBuf>, ttl: Duration) -> CacheResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!("File cache at {} (TTL: {}s)", dir.display(), ttl.as_secs());
        Ok(Self { dir, ttl })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Path of the file holding `key`.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(encode_file_name(key.as_str()))
    }

    async fn read_record(&self, path: &Path) -> CacheResult<Record> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Record::Missing),
            Err(e) => return Err(e.into()),
        };

        let entry = match serde_json::from_slice::<CacheEntry>(&raw) {
            Ok(entry) => entry,
            Err(e) => return Ok(Record::Corrupt(e.to_string())),
        };

        if entry.is_expired(self.ttl, Utc::now()) {
            Ok(Record::Stale)
        } else {
            Ok(Record::Fresh(entry))
        }
    }

    /// Deletes a file, ignoring one that is already gone.
    async fn remove(path: &Path) -> CacheResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes expired entries, corrupt records and abandoned temp files.
    ///
    /// Lookups already expire entries lazily; sweeping only reclaims disk
    /// space for keys that are never requested again.
    pub async fn sweep(&self) -> CacheResult<SweepReport> {
        let mut report = SweepReport::default();
        let mut dir = fs::read_dir(&self.dir).await?;

        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            let name = item.file_name();
            let name = name.to_string_lossy();

            if !item.file_type().await?.is_file() {
                continue;
            }
            report.scanned += 1;

            if name.starts_with(TEMP_PREFIX) {
                if self.is_abandoned(&item).await {
                    Self::remove(&path).await?;
                    report.removed += 1;
                }
                continue;
            }

            match self.read_record(&path).await? {
                Record::Stale | Record::Corrupt(_) => {
                    Self::remove(&path).await?;
                    report.removed += 1;
                }
                Record::Missing | Record::Fresh(_) => {}
            }
        }

        debug!(
            "File cache sweep: scanned {}, removed {}",
            report.scanned, report.removed
        );
        Ok(report)
    }

    /// A temp file older than the TTL belongs to a write that never finished.
    async fn is_abandoned(&self, item: &fs::DirEntry) -> bool {
        let modified = match item.metadata().await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };
        SystemTime::now()
            .duration_since(modified)
            .map(|age| age > self.ttl)
            .unwrap_or(false)
    }

    /// Counts entry files and their total size. Temp files are skipped.
    pub async fn stats(&self) -> CacheResult<CacheStats> {
        let mut stats = CacheStats::default();
        let mut dir = fs::read_dir(&self.dir).await?;

        while let Some(item) = dir.next_entry().await? {
            let meta = item.metadata().await?;
            if !meta.is_file() || item.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            stats.entries += 1;
            stats.bytes += meta.len();
        }

        Ok(stats)
    }

    /// Lists the cache keys stored in the directory, sorted.
    ///
    /// Temp files and names that do not decode are skipped. Entries are
    /// listed whether or not they have expired.
    pub async fn keys(&self) -> CacheResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut dir = fs::read_dir(&self.dir).await?;

        while let Some(item) = dir.next_entry().await? {
            if !item.file_type().await?.is_file() {
                continue;
            }
            if let Some(key) = item.file_name().to_str().and_then(decode_file_name) {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl CacheBackend for FileCache {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        let path = self.entry_path(key);

        match self.read_record(&path).await? {
            Record::Missing => Ok(None),
            Record::Fresh(entry) => Ok(Some(entry)),
            Record::Stale => {
                debug!("File cache entry {} expired, removing", key);
                Self::remove(&path).await?;
                Ok(None)
            }
            Record::Corrupt(reason) => {
                warn!("Removing corrupt file cache entry {}: {}", key, reason);
                Self::remove(&path).await?;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, entry: &CacheEntry, _ttl: Duration) -> CacheResult<()> {
        let payload = serde_json::to_vec(entry)?;
        let target = self.entry_path(key);
        let temp = self
            .dir
            .join(format!("{}{:016x}", TEMP_PREFIX, rand::random::<u64>()));

        if let Err(e) = fs::write(&temp, &payload).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!("File cache SET {}", key);
        Ok(())
    }
}
