//! Add-on collection provider
//!
//! Serves the records of one remote collection, either from the disk cache
//! (when allowed and fresh) or by fetching every page from the server.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::amo::{
    collection_url, map_page, AmoClient, CollectionRecord, FetchOptions, Icon,
    DEFAULT_READ_TIMEOUT,
};
use crate::cache::{CacheKey, CollectionCache};
use crate::error::Result;

pub const DEFAULT_SERVER_URL: &str = "https://addons.mozilla.org";
pub const DEFAULT_COLLECTION_ACCOUNT: &str = "mozilla";
pub const DEFAULT_COLLECTION_NAME: &str = "7e8d6dc651b54ab385fb8791bf9dac";

/// Where a collection is fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSource {
    pub server_url: String,
    pub key: CacheKey,
}

impl CollectionSource {
    /// URL of the first page of the collection
    pub fn url(&self) -> String {
        collection_url(&self.server_url, &self.key)
    }
}

/// Construction options for [`CollectionProvider`]
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub server_url: String,
    pub account: String,
    pub collection: String,
    /// Maximum cache age; zero or negative disables caching
    pub max_cache_age_minutes: i64,
    /// Optional ceiling on the number of pages per fetch
    pub max_pages: Option<usize>,
    /// Read timeout used when a call does not pass its own
    pub read_timeout: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            account: DEFAULT_COLLECTION_ACCOUNT.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            max_cache_age_minutes: -1,
            max_pages: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Provides the add-ons of a remote collection, backed by a TTL disk cache
///
/// The collection source can be changed at any time through the setters;
/// each call to [`CollectionProvider::get_available_records`] works against
/// the source it observed when it started.
pub struct CollectionProvider {
    client: AmoClient,
    cache: CollectionCache,
    source: RwLock<Arc<CollectionSource>>,
    max_cache_age_minutes: i64,
    max_pages: Option<usize>,
    read_timeout: Duration,
}

impl CollectionProvider {
    /// Create a provider caching into `cache_dir`
    pub fn new(cache_dir: &Path, options: ProviderOptions) -> Result<Self> {
        Ok(Self {
            client: AmoClient::new()?,
            cache: CollectionCache::new(cache_dir),
            source: RwLock::new(Arc::new(CollectionSource {
                server_url: options.server_url,
                key: CacheKey::new(options.account, options.collection),
            })),
            max_cache_age_minutes: options.max_cache_age_minutes,
            max_pages: options.max_pages,
            read_timeout: options.read_timeout,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Source
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of the current source
    pub fn source(&self) -> Arc<CollectionSource> {
        let guard = self.source.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Current cache key
    pub fn key(&self) -> CacheKey {
        self.source().key.clone()
    }

    fn update_source(&self, update: impl FnOnce(&mut CollectionSource)) {
        let mut slot = self.source.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = CollectionSource::clone(&**slot);
        update(&mut next);
        tracing::debug!(
            account = %next.key.account,
            collection = %next.key.collection,
            server = %next.server_url,
            "collection source changed"
        );
        *slot = Arc::new(next);
    }

    /// Point at another account's collection; the old cache file is left on disk
    pub fn set_collection_account(&self, account: impl Into<String>) {
        let account = account.into();
        self.update_source(|s| s.key.account = account);
    }

    /// Point at another collection; the old cache file is left on disk
    pub fn set_collection_name(&self, collection: impl Into<String>) {
        let collection = collection.into();
        self.update_source(|s| s.key.collection = collection);
    }

    /// Replace account and collection in one step
    pub fn set_collection(&self, key: CacheKey) {
        self.update_source(|s| s.key = key);
    }

    pub fn set_server_url(&self, server_url: impl Into<String>) {
        let server_url = server_url.into();
        self.update_source(|s| s.server_url = server_url);
    }

    pub fn max_cache_age_minutes(&self) -> i64 {
        self.max_cache_age_minutes
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the collection's add-ons
    ///
    /// With `allow_cache`, a fresh cached payload is served without touching
    /// the network. Otherwise every page is fetched, the raw document is
    /// cached (when caching is enabled) and mapped. Network and parse failures
    /// are returned; cache failures only fall back or skip the write.
    pub fn get_available_records(
        &self,
        allow_cache: bool,
        read_timeout: Option<Duration>,
    ) -> Result<Vec<CollectionRecord>> {
        self.get_available_records_with(allow_cache, read_timeout, None)
    }

    /// [`CollectionProvider::get_available_records`] with a cancellation flag
    /// checked between pages
    pub fn get_available_records_with(
        &self,
        allow_cache: bool,
        read_timeout: Option<Duration>,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<CollectionRecord>> {
        let source = self.source();
        let ttl = self.max_cache_age_minutes;

        if allow_cache && self.cache.is_fresh(&source.key, ttl) {
            match self.cache.read(&source.key) {
                Some(cached) => {
                    tracing::debug!(
                        account = %source.key.account,
                        collection = %source.key.collection,
                        "serving collection from cache"
                    );
                    return Ok(map_page(&cached.document));
                }
                None => tracing::warn!("collection cache unreadable, fetching from server"),
            }
        }

        let options = FetchOptions {
            max_pages: self.max_pages,
            cancel,
        };
        let url = source.url();
        tracing::info!(url = %url, "fetching collection");
        let document = self.client.fetch_all_pages_with(
            &url,
            read_timeout.unwrap_or(self.read_timeout),
            options,
        )?;

        // Cache the raw document before mapping it
        if ttl > 0 {
            if let Err(e) = self.cache.write(&source.key, &document.to_string()) {
                tracing::warn!(error = %e, "failed to write collection cache");
            }
        }

        Ok(map_page(&document))
    }

    /// Fetch a record's icon; not cached
    pub fn fetch_icon(&self, record: &CollectionRecord) -> Result<Option<Icon>> {
        self.client.fetch_record_icon(record)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cache
    // ─────────────────────────────────────────────────────────────────────────

    pub fn cache(&self) -> &CollectionCache {
        &self.cache
    }

    /// Last modification of the current key's cache file in epoch millis, or -1
    pub fn cache_last_updated(&self) -> i64 {
        self.cache.last_modified_millis(&self.source().key)
    }

    /// Whether the current key's cache is unusable under the configured TTL
    pub fn cache_expired(&self) -> bool {
        !self.cache.is_fresh(&self.source().key, self.max_cache_age_minutes)
    }

    /// Delete the current key's cache file; `true` if one was removed
    pub fn delete_cache(&self) -> bool {
        self.cache.delete(&self.source().key)
    }
}
