use std::path::PathBuf;

use colored::Colorize;

use crate::cli::args::{IconArgs, OutputFormat};
use crate::error::Result;
use crate::provider::CollectionProvider;

use super::common::{find_record, load_records};

/// Handle the icon command
pub fn icon(provider: &CollectionProvider, args: &IconArgs, format: OutputFormat) -> Result<String> {
    let records = load_records(provider, true)?;
    let record = find_record(records, &args.id)?;

    let Some(icon) = provider.fetch_icon(&record)? else {
        return match format {
            OutputFormat::Pretty => Ok(format!(
                "{} No icon available for {}",
                "!".yellow(),
                record.display_name().bold()
            )),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "id": record.id,
                "icon_url": record.icon_url,
                "saved": false,
            }))?),
        };
    };

    let path = match &args.save {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(format!(
            "{}.{}",
            file_stem(&record.id),
            icon.format.extension()
        )),
    };
    icon.save(&path)?;

    match format {
        OutputFormat::Pretty => Ok(format!(
            "{} Saved {} icon ({}, {} bytes) to {}",
            "✓".green(),
            record.display_name().bold(),
            icon.format.mime_type(),
            icon.len(),
            path.display()
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "id": record.id,
            "icon_url": record.icon_url,
            "saved": true,
            "path": path.display().to_string(),
            "mime_type": icon.format.mime_type(),
            "bytes": icon.len(),
        }))?),
    }
}

/// Turn an add-on id into a safe file stem
fn file_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "icon".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("uBlock0@raymondhill.net"), "uBlock0_raymondhill_net");
        assert_eq!(file_stem("{446900e4-71c2-419f-a6a7-df9c091e268b}"), "_446900e4-71c2-419f-a6a7-df9c091e268b_");
        assert_eq!(file_stem(""), "icon");
    }
}
