use colored::Colorize;

use crate::cache::CacheKey;
use crate::cli::args::{CollectionArgs, CollectionCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::provider::CollectionSource;

/// Handle the collection command
///
/// `show` reports the effective source, including per-invocation overrides;
/// `set` edits and saves the stored configuration.
pub fn collection(
    paths: &Paths,
    config: &mut Config,
    effective: &Config,
    args: &CollectionArgs,
    format: OutputFormat,
) -> Result<String> {
    match &args.command {
        None | Some(CollectionCommands::Show) => collection_show(effective, format),
        Some(CollectionCommands::Set { account, name }) => collection_set(
            paths,
            config,
            account.as_deref(),
            name.as_deref(),
            format,
        ),
    }
}

fn source_of(config: &Config) -> CollectionSource {
    CollectionSource {
        server_url: config.server.url.clone(),
        key: CacheKey::new(&config.collection.account, &config.collection.name),
    }
}

/// Show the collection that commands will browse
fn collection_show(config: &Config, format: OutputFormat) -> Result<String> {
    let source = source_of(config);

    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("{}\n", "Collection".bold()));
            output.push_str(&format!("  {} {}\n", "Account:".cyan(), source.key.account));
            output.push_str(&format!("  {} {}\n", "Name:".cyan(), source.key.collection));
            output.push_str(&format!("  {} {}\n", "Server:".cyan(), source.server_url));
            output.push_str(&format!("  {} {}", "URL:".cyan(), source.url().dimmed()));
            Ok(output)
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "account": source.key.account,
                "collection": source.key.collection,
                "server": source.server_url,
                "url": source.url(),
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Persist a different collection; cached files of the previous one stay on disk
fn collection_set(
    paths: &Paths,
    config: &mut Config,
    account: Option<&str>,
    name: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    config.set_collection(account, name)?;
    config.save_to(paths)?;

    match format {
        OutputFormat::Pretty => Ok(format!(
            "{} Collection set to: {}/{}",
            "✓".green(),
            config.collection.account.bold(),
            config.collection.name.bold()
        )),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": true,
                "account": config.collection.account,
                "collection": config.collection.name,
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}
