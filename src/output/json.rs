use serde::Serialize;

use crate::amo::CollectionRecord;
use crate::cache::CacheStatus;
use crate::error::Result;

/// Format records as JSON
pub fn format_records(records: &[CollectionRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Format a single record as JSON
pub fn format_record(record: &CollectionRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Format cache status as JSON
pub fn format_cache_status(status: &CacheStatus) -> Result<String> {
    let entry = &status.collection;
    format_json(&serde_json::json!({
        "cache_dir": status.cache_dir.to_string_lossy(),
        "account": status.key.account,
        "collection": status.key.collection,
        "ttl_minutes": status.ttl_minutes,
        "file": entry.path.to_string_lossy(),
        "exists": entry.exists,
        "age_secs": entry.age_secs,
        "count": entry.count,
        "fresh": entry.fresh,
    }))
}

/// Format any serializable value as JSON
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
