use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::Result;
use crate::output;
use crate::provider::CollectionProvider;

use super::common::load_records;

/// Handle the list command
pub fn list(provider: &CollectionProvider, args: &ListArgs, format: OutputFormat) -> Result<String> {
    let records = load_records(provider, !args.no_cache)?;

    // Apply filter if provided
    let records: Vec<_> = match &args.filter {
        Some(filter) => {
            let filter_lower = filter.to_lowercase();
            records
                .into_iter()
                .filter(|r| {
                    r.id.to_lowercase().contains(&filter_lower)
                        || r.translatable_name
                            .values()
                            .any(|name| name.to_lowercase().contains(&filter_lower))
                })
                .collect()
        }
        None => records,
    };

    let records: Vec<_> = match args.limit {
        Some(limit) => records.into_iter().take(limit).collect(),
        None => records,
    };

    output::format_records(&records, format)
}
