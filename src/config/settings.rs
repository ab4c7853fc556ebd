use serde::{Deserialize, Serialize};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

use super::paths::Paths;
use crate::error::{Result, ShelfError};
use crate::provider::{
    ProviderOptions, DEFAULT_COLLECTION_ACCOUNT, DEFAULT_COLLECTION_NAME, DEFAULT_SERVER_URL,
};

/// Keys accepted by [`Config::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "server.url",
    "server.timeout_secs",
    "collection.account",
    "collection.name",
    "collection.max_cache_age_minutes",
    "collection.max_pages",
    "output.format",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Which collection to browse and how long to cache it
    #[serde(default)]
    pub collection: CollectionConfig,

    /// Output preferences
    #[serde(default)]
    pub output: OutputConfig,
}

/// Server-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the add-ons server
    #[serde(default = "default_server_url")]
    pub url: String,
    /// Per-request read timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Collection selection and caching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Account owning the collection
    #[serde(default = "default_account")]
    pub account: String,
    /// Collection name or id
    #[serde(default = "default_collection")]
    pub name: String,
    /// Cache TTL in minutes; zero or negative disables caching
    #[serde(default = "default_max_cache_age")]
    pub max_cache_age_minutes: i64,
    /// Optional ceiling on pages fetched per request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
}

fn default_account() -> String {
    DEFAULT_COLLECTION_ACCOUNT.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION_NAME.to_string()
}

fn default_max_cache_age() -> i64 {
    -1
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
            name: default_collection(),
            max_cache_age_minutes: default_max_cache_age(),
            max_pages: None,
        }
    }
}

/// Output formatting preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration from a specific paths instance
    pub fn load_from(paths: &Paths) -> Result<Self> {
        if !paths.config_exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&paths.config_file)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific paths instance
    pub fn save_to(&self, paths: &Paths) -> Result<()> {
        paths.ensure_dirs()?;
        let contents = toml::to_string_pretty(self)?;
        fs::write(&paths.config_file, &contents)?;

        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&paths.config_file, perms)?;
        }

        Ok(())
    }

    /// Per-request read timeout
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    /// Point at another collection; either part may be left unchanged
    pub fn set_collection(&mut self, account: Option<&str>, name: Option<&str>) -> Result<()> {
        if account.is_none() && name.is_none() {
            return Err(ShelfError::InvalidArgument(
                "collection set needs --user and/or --name".to_string(),
            ));
        }
        if let Some(account) = account {
            self.collection.account = non_empty("collection.account", account)?;
        }
        if let Some(name) = name {
            self.collection.name = non_empty("collection.name", name)?;
        }
        Ok(())
    }

    /// Options for building a [`crate::provider::CollectionProvider`]
    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            server_url: self.server.url.clone(),
            account: self.collection.account.clone(),
            collection: self.collection.name.clone(),
            max_cache_age_minutes: self.collection.max_cache_age_minutes,
            max_pages: self.collection.max_pages,
            read_timeout: self.read_timeout(),
        }
    }

    /// Set a value by dotted key, validating it
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.url" => self.server.url = validate_server_url(value)?,
            "server.timeout_secs" => {
                let secs: u64 = parse_number(key, value)?;
                if secs == 0 {
                    return Err(ShelfError::InvalidArgument(
                        "server.timeout_secs must be greater than 0".to_string(),
                    ));
                }
                self.server.timeout_secs = secs;
            }
            "collection.account" => self.collection.account = non_empty(key, value)?,
            "collection.name" => self.collection.name = non_empty(key, value)?,
            "collection.max_cache_age_minutes" => {
                self.collection.max_cache_age_minutes = parse_number(key, value)?;
            }
            "collection.max_pages" => {
                self.collection.max_pages = match value {
                    "" | "none" | "unlimited" => None,
                    _ => match parse_number::<usize>(key, value)? {
                        0 => {
                            return Err(ShelfError::InvalidArgument(
                                "collection.max_pages must be at least 1".to_string(),
                            ))
                        }
                        n => Some(n),
                    },
                };
            }
            "output.format" => {
                if value != "pretty" && value != "json" {
                    return Err(ShelfError::InvalidArgument(
                        "output.format must be 'pretty' or 'json'".to_string(),
                    ));
                }
                self.output.format = value.to_string();
            }
            _ => {
                return Err(ShelfError::InvalidArgument(format!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ShelfError::InvalidArgument(format!("{key} must be a number, got '{value}'"))
    })
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ShelfError::InvalidArgument(format!("{key} cannot be empty")));
    }
    Ok(value.to_string())
}

fn validate_server_url(value: &str) -> Result<String> {
    let parsed = url::Url::parse(value.trim())
        .map_err(|e| ShelfError::InvalidArgument(format!("Invalid server URL '{value}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ShelfError::InvalidArgument(format!(
            "Server URL must be an http(s) URL with a host: {value}"
        )));
    }
    Ok(value.trim().trim_end_matches('/').to_string())
}
