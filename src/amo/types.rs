//! Collection wire types and the domain model they map onto
//!
//! The `Raw*` types mirror the collections API response and decode every
//! field with a lenient deserializer: absent, `null` or mistyped values
//! collapse to the field's default instead of failing the whole entry.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Locale used when an add-on does not declare one
pub const DEFAULT_LOCALE: &str = "en-US";

/// An add-on as exposed to callers of the collection provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    /// Stable identifier (the add-on's `guid`)
    pub id: String,
    pub authors: Vec<Author>,
    pub categories: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub version: String,
    /// Present only when the current version published a file
    pub download_id: Option<String>,
    pub download_url: Option<String>,
    pub permissions: Vec<String>,
    pub translatable_name: HashMap<String, String>,
    pub translatable_description: HashMap<String, String>,
    pub translatable_summary: HashMap<String, String>,
    pub icon_url: String,
    pub site_url: String,
    pub rating: Option<Rating>,
    pub default_locale: String,
}

impl CollectionRecord {
    /// Name in the add-on's default locale, falling back to any locale, then the id
    pub fn display_name(&self) -> &str {
        localized(&self.translatable_name, &self.default_locale).unwrap_or(&self.id)
    }

    /// Summary in the add-on's default locale, if any
    pub fn display_summary(&self) -> Option<&str> {
        localized(&self.translatable_summary, &self.default_locale)
    }

    /// Whether a downloadable file was published for the current version
    pub fn is_downloadable(&self) -> bool {
        self.download_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

fn localized<'a>(map: &'a HashMap<String, String>, locale: &str) -> Option<&'a str> {
    map.get(locale)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            let mut values: Vec<_> = map.iter().filter(|(_, v)| !v.is_empty()).collect();
            values.sort_by(|a, b| a.0.cmp(b.0));
            values.into_iter().next().map(|(_, v)| v)
        })
        .map(String::as_str)
}

/// Add-on author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub username: String,
    pub url: String,
}

/// Aggregate user rating
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Number of reviews
    pub reviews: u32,
    /// Average score (0-5)
    pub average: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

/// One element of a page's `results` array
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawEntry {
    #[serde(deserialize_with = "lenient_opt")]
    pub addon: Option<RawAddon>,
}

/// The `addon` object of a collection entry
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAddon {
    #[serde(deserialize_with = "lenient_string")]
    pub guid: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub authors: Vec<RawAuthor>,
    #[serde(deserialize_with = "lenient")]
    pub categories: RawCategories,
    #[serde(deserialize_with = "lenient_string")]
    pub created: String,
    #[serde(deserialize_with = "lenient_string")]
    pub last_updated: String,
    #[serde(deserialize_with = "lenient_opt")]
    pub current_version: Option<RawVersion>,
    #[serde(deserialize_with = "lenient_locale_map")]
    pub name: HashMap<String, String>,
    #[serde(deserialize_with = "lenient_locale_map")]
    pub description: HashMap<String, String>,
    #[serde(deserialize_with = "lenient_locale_map")]
    pub summary: HashMap<String, String>,
    #[serde(deserialize_with = "lenient_string")]
    pub icon_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(deserialize_with = "lenient_opt")]
    pub ratings: Option<RawRatings>,
    #[serde(deserialize_with = "lenient_string")]
    pub default_locale: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAuthor {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
}

/// Categories keyed by application; only `android` is read
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCategories {
    #[serde(deserialize_with = "lenient_string_vec")]
    pub android: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawVersion {
    #[serde(deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub files: Vec<RawFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawFile {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(deserialize_with = "lenient_string_vec")]
    pub permissions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRatings {
    #[serde(deserialize_with = "lenient_u32")]
    pub count: u32,
    #[serde(deserialize_with = "lenient_f32")]
    pub average: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Lenient decoding
// ─────────────────────────────────────────────────────────────────────────────

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

fn lenient_string_vec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    })
}

fn lenient_locale_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => map
            .iter()
            .map(|(locale, text)| (locale.clone(), scalar_to_string(text).unwrap_or_default()))
            .collect(),
        _ => HashMap::new(),
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or_default())
}

fn lenient_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().map(|n| n as f32).unwrap_or_default())
}

/// Decode `T`, or `T::default()` when the value is null or has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode `Some(T)` only for a well-shaped object
fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Decode an array, dropping elements that are not well-shaped objects
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
