pub mod json;
pub mod pretty;

use crate::amo::CollectionRecord;
use crate::cache::CacheStatus;
use crate::cli::OutputFormat;
use crate::error::Result;

/// Format a list of records based on output format
pub fn format_records(records: &[CollectionRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_records(records)),
        OutputFormat::Json => json::format_records(records),
    }
}

/// Format a single record based on output format
pub fn format_record(record: &CollectionRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_record(record)),
        OutputFormat::Json => json::format_record(record),
    }
}

/// Format cache status based on output format
pub fn format_cache_status(status: &CacheStatus, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_cache_status(status)),
        OutputFormat::Json => json::format_cache_status(status),
    }
}
