//! Cache management commands

use colored::Colorize;

use crate::cache::{self, CacheKey, CollectionCache};
use crate::cli::args::{CacheArgs, CacheCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::output;

/// Handle cache commands for the effective collection
pub fn handle(paths: &Paths, config: &Config, args: &CacheArgs, format: OutputFormat) -> Result<String> {
    let key = CacheKey::new(&config.collection.account, &config.collection.name);

    match &args.command {
        CacheCommands::Status => status(paths, config, &key, format),
        CacheCommands::Clear { all } => clear(paths, &key, *all, format),
    }
}

fn status(paths: &Paths, config: &Config, key: &CacheKey, format: OutputFormat) -> Result<String> {
    let status = cache::status(
        &paths.cache_dir,
        key,
        config.collection.max_cache_age_minutes,
    );
    output::format_cache_status(&status, format)
}

fn clear(paths: &Paths, key: &CacheKey, all: bool, format: OutputFormat) -> Result<String> {
    let removed = if all {
        cache::clear_all(&paths.cache_dir)?;
        true
    } else {
        CollectionCache::new(&paths.cache_dir).delete(key)
    };

    match format {
        OutputFormat::Pretty => {
            let message = match (all, removed) {
                (true, _) => "Cache cleared".to_string(),
                (false, true) => format!("Cache cleared for {}/{}", key.account, key.collection),
                (false, false) => {
                    return Ok(format!(
                        "{} Nothing cached for {}/{}",
                        "-".dimmed(),
                        key.account,
                        key.collection
                    ))
                }
            };
            Ok(format!("{} {}", "✓".green(), message))
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "status": if removed { "cleared" } else { "empty" },
                "scope": if all { "all" } else { "collection" },
            });
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}
