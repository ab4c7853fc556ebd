use crate::cli::args::{OutputFormat, ShowArgs};
use crate::error::Result;
use crate::output;
use crate::provider::CollectionProvider;

use super::common::{find_record, load_records};

/// Handle the show command
pub fn show(provider: &CollectionProvider, args: &ShowArgs, format: OutputFormat) -> Result<String> {
    let records = load_records(provider, !args.no_cache)?;
    let record = find_record(records, &args.id)?;

    output::format_record(&record, format)
}
