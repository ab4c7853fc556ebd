//! Collection payload caching
//!
//! One file per (account, collection) pair holds the raw coalesced JSON of
//! the last successful fetch. Freshness comes from the file's modification
//! time, never from its contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::cache::CacheEntryStatus;
use crate::error::Result;

const MINUTE_IN_MS: i64 = 60 * 1000;

/// Identifies the collection a cache file belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub account: String,
    pub collection: String,
}

impl CacheKey {
    pub fn new(account: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            collection: collection.into(),
        }
    }

    /// Cache file name for this key
    pub fn file_name(&self) -> String {
        format!(
            "{}_components_addon_collection_{}.json",
            file_safe(&self.account),
            file_safe(&self.collection)
        )
    }
}

/// Percent-encode every byte outside `[A-Za-z0-9-_.@]` (and a leading dot)
///
/// `%` is itself encoded, so distinct identifiers never share a file name.
fn file_safe(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for (i, byte) in part.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_' | b'@')
            || (byte == b'.' && i > 0);
        if keep {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// A previously committed payload
#[derive(Debug, Clone)]
pub struct CachedPayload {
    /// File contents exactly as written
    pub raw: String,
    /// Parsed document
    pub document: Value,
    pub last_modified: SystemTime,
}

/// File-backed cache of raw collection payloads
///
/// Every file operation holds the same lock, so a read never overlaps a
/// write or delete made through this instance.
#[derive(Debug)]
pub struct CollectionCache {
    cache_dir: PathBuf,
    lock: Mutex<()>,
}

impl CollectionCache {
    /// Create a cache rooted at `cache_dir` (created lazily on first write)
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the cache file for a key
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded state lives on disk, so a panic elsewhere leaves nothing to repair
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Commit a payload for `key`, replacing any previous one
    ///
    /// The payload is written to a sibling temp file and renamed into place,
    /// so readers see either the old file or the new one.
    pub fn write(&self, key: &CacheKey, raw: &str) -> Result<()> {
        let _guard = self.guard();

        fs::create_dir_all(&self.cache_dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        if let Err(e) = fs::write(&tmp, raw).and_then(|_| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), bytes = raw.len(), "collection cache written");
        Ok(())
    }

    /// Read the committed payload for `key`
    ///
    /// A missing, unreadable or unparseable file is a miss.
    pub fn read(&self, key: &CacheKey) -> Option<CachedPayload> {
        let _guard = self.guard();

        let path = self.path_for(key);
        let raw = fs::read_to_string(&path).ok()?;
        let last_modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        let document = match serde_json::from_str::<Value>(&raw) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt collection cache");
                return None;
            }
        };

        Some(CachedPayload {
            raw,
            document,
            last_modified,
        })
    }

    /// Modification time of the cache file, if it exists
    pub fn last_modified(&self, key: &CacheKey) -> Option<SystemTime> {
        let _guard = self.guard();
        fs::metadata(self.path_for(key))
            .and_then(|m| m.modified())
            .ok()
    }

    /// Modification time in milliseconds since the epoch, or -1 if there is no file
    pub fn last_modified_millis(&self, key: &CacheKey) -> i64 {
        self.last_modified(key).map(epoch_millis).unwrap_or(-1)
    }

    /// Whether the cached payload is younger than `ttl_minutes`
    ///
    /// A TTL of zero or less disables caching and is never fresh.
    pub fn is_fresh(&self, key: &CacheKey, ttl_minutes: i64) -> bool {
        self.is_fresh_at(key, ttl_minutes, SystemTime::now())
    }

    /// [`CollectionCache::is_fresh`] evaluated at `now`
    pub fn is_fresh_at(&self, key: &CacheKey, ttl_minutes: i64, now: SystemTime) -> bool {
        if ttl_minutes <= 0 {
            return false;
        }
        let modified = self.last_modified_millis(key);
        if modified < 0 {
            return false;
        }
        let age = epoch_millis(now) - modified;
        age < ttl_minutes.saturating_mul(MINUTE_IN_MS)
    }

    /// Delete the cache file for `key`; `true` if a file was removed
    pub fn delete(&self, key: &CacheKey) -> bool {
        let _guard = self.guard();
        let path = self.path_for(key);
        path.exists() && fs::remove_file(&path).is_ok()
    }

    /// Describe the cache entry for `key`
    pub fn status(&self, key: &CacheKey, ttl_minutes: i64) -> CacheEntryStatus {
        let path = self.path_for(key);
        let Some(modified) = self.last_modified(key) else {
            return CacheEntryStatus {
                path,
                exists: false,
                age_secs: None,
                count: None,
                fresh: false,
            };
        };

        let age_secs = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        let count = self
            .read(key)
            .and_then(|p| p.document.get("results").and_then(Value::as_array).map(Vec::len));

        CacheEntryStatus {
            path,
            exists: true,
            age_secs: Some(age_secs),
            count,
            fresh: self.is_fresh(key, ttl_minutes),
        }
    }
}

fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX),
    }
}
