//! Common utilities shared across CLI commands

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::amo::CollectionRecord;
use crate::cli::args::SourceArgs;
use crate::config::{Config, Paths};
use crate::error::{Result, ShelfError};
use crate::provider::CollectionProvider;

/// Apply per-invocation overrides on top of the loaded configuration.
///
/// Overrides go through the same validation as `config set`, but are never
/// saved.
pub fn apply_overrides(config: &Config, source: &SourceArgs) -> Result<Config> {
    let mut effective = config.clone();
    if let Some(server) = &source.server {
        effective.set("server.url", server)?;
    }
    if let Some(account) = &source.account {
        effective.set("collection.account", account)?;
    }
    if let Some(collection) = &source.collection {
        effective.set("collection.name", collection)?;
    }
    if let Some(timeout) = source.timeout {
        effective.set("server.timeout_secs", &timeout.to_string())?;
    }
    Ok(effective)
}

/// Build a provider for the effective configuration
pub fn build_provider(config: &Config, paths: &Paths) -> Result<CollectionProvider> {
    CollectionProvider::new(&paths.cache_dir, config.provider_options())
}

/// Fetch the collection, aborting between pages on Ctrl+C
pub fn load_records(provider: &CollectionProvider, allow_cache: bool) -> Result<Vec<CollectionRecord>> {
    let interrupted = setup_interrupt_handler();
    provider.get_available_records_with(allow_cache, None, Some(interrupted.as_ref()))
}

/// Find a record by id, exact match first, then case-insensitive
pub fn find_record(records: Vec<CollectionRecord>, id: &str) -> Result<CollectionRecord> {
    let id_lower = id.to_lowercase();
    let mut fallback = None;

    for record in records {
        if record.id == id {
            return Ok(record);
        }
        if fallback.is_none() && record.id.to_lowercase() == id_lower {
            fallback = Some(record);
        }
    }

    fallback.ok_or_else(|| ShelfError::RecordNotFound(id.to_string()))
}

/// Set up a Ctrl+C handler that sets an atomic flag.
///
/// # Returns
/// An `Arc<AtomicBool>` that should be checked periodically. When the
/// value is `true`, the operation should terminate.
///
/// # Note
/// If a handler is already set (e.g., from a previous call), the new
/// handler registration will silently fail but the returned atomic
/// will still work for the current operation.
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);

    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
    })
    .ok(); // Ignore error if handler already set

    interrupted
}
