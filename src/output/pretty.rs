use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::amo::CollectionRecord;
use crate::cache::CacheStatus;

/// Safely truncate a string to n characters, appending "..." if truncated.
/// Works correctly with multi-byte UTF-8 characters.
fn truncate_str(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max_chars {
        let truncated: String = chars.iter().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Render an API timestamp as a date, or pass it through if it doesn't parse
fn format_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Utc).format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Format age in human-readable form
pub fn format_age(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

fn format_rating(record: &CollectionRecord) -> String {
    match record.rating {
        Some(r) => format!("★ {:.1} ({} reviews)", r.average, r.reviews),
        None => "not rated".dimmed().to_string(),
    }
}

/// Format a list of records for pretty output
pub fn format_records(records: &[CollectionRecord]) -> String {
    if records.is_empty() {
        return "No add-ons found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{} ({})\n", "Add-ons".bold(), records.len()));
    output.push_str(&"─".repeat(70));
    output.push('\n');

    for record in records {
        output.push_str(&format!(
            "{} {}\n",
            record.display_name().bold(),
            record.version.dimmed()
        ));
        output.push_str(&format!("  {} {}\n", "Id:".cyan(), record.id));
        if let Some(summary) = record.display_summary() {
            output.push_str(&format!("  {}\n", truncate_str(summary, 66)));
        }
        output.push_str(&format!("  {} {}\n", "Rating:".cyan(), format_rating(record)));
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Format a single record for pretty output
pub fn format_record(record: &CollectionRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n",
        record.display_name().bold(),
        record.version.dimmed()
    ));
    output.push_str(&"─".repeat(50));
    output.push('\n');

    output.push_str(&format!("{} {}\n", "Id:".cyan(), record.id));

    if !record.authors.is_empty() {
        let authors: Vec<_> = record.authors.iter().map(|a| a.name.as_str()).collect();
        output.push_str(&format!("{} {}\n", "Authors:".cyan(), authors.join(", ")));
    }
    if !record.categories.is_empty() {
        output.push_str(&format!(
            "{} {}\n",
            "Categories:".cyan(),
            record.categories.join(", ")
        ));
    }
    output.push_str(&format!("{} {}\n", "Rating:".cyan(), format_rating(record)));
    if !record.created_at.is_empty() {
        output.push_str(&format!(
            "{} {}\n",
            "Created:".cyan(),
            format_date(&record.created_at)
        ));
    }
    if !record.updated_at.is_empty() {
        output.push_str(&format!(
            "{} {}\n",
            "Updated:".cyan(),
            format_date(&record.updated_at)
        ));
    }
    if !record.site_url.is_empty() {
        output.push_str(&format!("{} {}\n", "Page:".cyan(), record.site_url));
    }
    match record.download_url.as_deref() {
        Some(url) if record.is_downloadable() => {
            output.push_str(&format!("{} {}\n", "Download:".cyan(), url.dimmed()));
        }
        _ => output.push_str(&format!("{} {}\n", "Download:".cyan(), "none".yellow())),
    }
    if !record.permissions.is_empty() {
        output.push_str(&format!("{}\n", "Permissions:".cyan()));
        for permission in &record.permissions {
            output.push_str(&format!("  - {}\n", permission));
        }
    }
    if let Some(summary) = record.display_summary() {
        output.push('\n');
        output.push_str(summary);
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Format cache status for pretty output
pub fn format_cache_status(status: &CacheStatus) -> String {
    let entry = &status.collection;
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Cache Status".bold()));
    output.push_str(&format!("Location: {}\n", status.cache_dir.display()));
    output.push_str(&format!(
        "Collection: {}/{}\n",
        status.key.account, status.key.collection
    ));
    if status.ttl_minutes > 0 {
        output.push_str(&format!("Max age: {} min\n\n", status.ttl_minutes));
    } else {
        output.push_str(&format!("Max age: {}\n\n", "caching disabled".yellow()));
    }

    if !entry.exists {
        output.push_str(&format!("  {}\n", "Not cached".dimmed()));
        return output.trim_end().to_string();
    }

    match entry.count {
        Some(count) => output.push_str(&format!("  Entries: {}\n", count)),
        None => output.push_str(&format!("  Entries: {}\n", "unreadable".red())),
    }
    if let Some(age) = entry.age_secs {
        let verdict = if entry.fresh {
            "(fresh)".green()
        } else {
            "(stale)".yellow()
        };
        output.push_str(&format!("  Age: {} {}\n", format_age(age), verdict));
    }

    output.trim_end().to_string()
}
