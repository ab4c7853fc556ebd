//! Cache module for reducing API calls
//!
//! Provides on-disk caching of raw collection payloads under a TTL policy.

mod collection;

pub use collection::{CacheKey, CachedPayload, CollectionCache};

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Clear all cached data
///
/// Removes the directory's entries; the directory itself and its
/// permissions stay as they are.
pub fn clear_all(cache_dir: &Path) -> Result<()> {
    if !cache_dir.exists() {
        return Ok(());
    }
    for entry in std::fs::read_dir(cache_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Get cache status information for one collection
pub fn status(cache_dir: &Path, key: &CacheKey, ttl_minutes: i64) -> CacheStatus {
    let collection = CollectionCache::new(cache_dir).status(key, ttl_minutes);

    CacheStatus {
        cache_dir: cache_dir.to_path_buf(),
        key: key.clone(),
        ttl_minutes,
        collection,
    }
}

/// Overall cache status
#[derive(Debug)]
pub struct CacheStatus {
    pub cache_dir: PathBuf,
    pub key: CacheKey,
    pub ttl_minutes: i64,
    pub collection: CacheEntryStatus,
}

/// Status of a single cache entry
#[derive(Debug)]
pub struct CacheEntryStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub age_secs: Option<u64>,
    /// Number of records in the cached payload, if it parses
    pub count: Option<usize>,
    pub fresh: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clear_all_empties_directory() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CollectionCache::new(temp_dir.path());
        let key = CacheKey::new("mozilla", "abc123");
        cache.write(&key, r#"{"results": []}"#).unwrap();
        cache
            .write(&CacheKey::new("someone", "else"), r#"{"results": []}"#)
            .unwrap();

        clear_all(temp_dir.path()).unwrap();

        assert!(temp_dir.path().exists());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_clear_all_keeps_directory_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let cache_dir = temp_dir.path().join("cache");
        std::fs::create_dir_all(cache_dir.join("nested")).unwrap();
        std::fs::set_permissions(&cache_dir, std::fs::Permissions::from_mode(0o700)).unwrap();
        CollectionCache::new(&cache_dir)
            .write(&CacheKey::new("mozilla", "abc123"), r#"{"results": []}"#)
            .unwrap();

        clear_all(&cache_dir).unwrap();

        let mode = std::fs::metadata(&cache_dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
        assert_eq!(std::fs::read_dir(&cache_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_clear_all_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        clear_all(&temp_dir.path().join("never-created")).unwrap();
    }

    #[test]
    fn test_status_reports_key_and_ttl() {
        let temp_dir = TempDir::new().unwrap();
        let key = CacheKey::new("mozilla", "abc123");

        let status = status(temp_dir.path(), &key, 30);
        assert_eq!(status.key, key);
        assert_eq!(status.ttl_minutes, 30);
        assert!(!status.collection.exists);
        assert!(status.collection.path.ends_with(key.file_name()));
    }
}
