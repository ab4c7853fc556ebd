use colored::Colorize;

use crate::cli::args::{ConfigArgs, ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::Result;

/// Handle the config command
pub fn config(
    paths: &Paths,
    config: &mut Config,
    args: &ConfigArgs,
    format: OutputFormat,
) -> Result<String> {
    match &args.command {
        ConfigCommands::Show => config_show(config, format),
        ConfigCommands::Set { key, value } => config_set(paths, config, key, value, format),
        ConfigCommands::Path => config_path(paths, format),
    }
}

/// Show current configuration
fn config_show(config: &Config, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("{}\n", "Configuration".bold()));
            output.push_str(&"─".repeat(40));
            output.push('\n');

            output.push_str(&format!("\n{}\n", "[server]".cyan()));
            output.push_str(&format!("  url = {}\n", config.server.url));
            output.push_str(&format!("  timeout_secs = {}\n", config.server.timeout_secs));

            output.push_str(&format!("\n{}\n", "[collection]".cyan()));
            output.push_str(&format!("  account = {}\n", config.collection.account));
            output.push_str(&format!("  name = {}\n", config.collection.name));
            let max_age = config.collection.max_cache_age_minutes;
            if max_age > 0 {
                output.push_str(&format!("  max_cache_age_minutes = {}\n", max_age));
            } else {
                output.push_str(&format!(
                    "  max_cache_age_minutes = {} {}\n",
                    max_age,
                    "(caching disabled)".dimmed()
                ));
            }
            output.push_str(&format!(
                "  max_pages = {}\n",
                config
                    .collection
                    .max_pages
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "(unlimited)".dimmed().to_string())
            ));

            output.push_str(&format!("\n{}\n", "[output]".cyan()));
            output.push_str(&format!("  format = {}\n", config.output.format));

            Ok(output)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
    }
}

/// Set a configuration value and save it
fn config_set(
    paths: &Paths,
    config: &mut Config,
    key: &str,
    value: &str,
    format: OutputFormat,
) -> Result<String> {
    config.set(key, value)?;
    config.save_to(paths)?;

    match format {
        OutputFormat::Pretty => Ok(format!("{} Set {} = {}", "✓".green(), key, value)),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": true,
                "key": key,
                "value": value
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Show configuration file path
fn config_path(paths: &Paths, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("Config file: {}\n", paths.config_file.display()));
            output.push_str(&format!("Cache dir: {}\n", paths.cache_dir.display()));
            output.push_str(&format!(
                "Exists: {}\n",
                if paths.config_exists() {
                    "yes".green()
                } else {
                    "no".yellow()
                }
            ));
            Ok(output)
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "path": paths.config_file.display().to_string(),
                "cache_dir": paths.cache_dir.display().to_string(),
                "exists": paths.config_exists()
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}
