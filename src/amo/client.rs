use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

use super::icon::Icon;
use super::types::CollectionRecord;
use crate::cache::CacheKey;
use crate::error::{Result, ShelfError};

/// Collections API version path segment
pub const API_VERSION: &str = "api/v4";

/// Default per-request read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(20);

const USER_AGENT: &str = concat!("amoshelf/", env!("CARGO_PKG_VERSION"));

/// Build the first-page URL of a collection's add-on listing
pub fn collection_url(server_url: &str, key: &CacheKey) -> String {
    [
        server_url.trim_end_matches('/'),
        API_VERSION,
        "accounts/account",
        key.account.as_str(),
        "collections",
        key.collection.as_str(),
        "addons",
    ]
    .join("/")
}

/// Controls for a paginated fetch
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchOptions<'a> {
    /// Fail with [`ShelfError::PageLimit`] instead of requesting more pages than this
    pub max_pages: Option<usize>,
    /// Checked before every page request; when set the fetch fails with [`ShelfError::Cancelled`]
    pub cancel: Option<&'a AtomicBool>,
}

/// HTTP client for the add-ons collections API
pub struct AmoClient {
    client: Client,
}

impl AmoClient {
    /// Create a new client
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// GET a URL and parse the body as a JSON object
    fn get_json(&self, url: &str, timeout: Duration) -> Result<Value> {
        let response = self.client.get(url).timeout(timeout).send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                url,
                "Failed to fetch addon collection"
            );
            return Err(ShelfError::remote(status.as_u16(), url));
        }

        let body = response.text()?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ShelfError::malformed(format!("{url}: {e}")))?;
        if !value.is_object() {
            return Err(ShelfError::malformed(format!("{url}: expected a JSON object")));
        }
        Ok(value)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pagination
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch every page starting at `start_url` and coalesce them
    ///
    /// See [`AmoClient::fetch_all_pages_with`].
    pub fn fetch_all_pages(&self, start_url: &str, timeout: Duration) -> Result<Value> {
        self.fetch_all_pages_with(start_url, timeout, FetchOptions::default())
    }

    /// Fetch every page starting at `start_url`, following each page's `next`
    /// link until it is absent or null.
    ///
    /// The returned document is the first page with the `results` of all later
    /// pages appended in order. Any failing page fails the whole fetch; no
    /// partial result is returned and nothing is retried.
    pub fn fetch_all_pages_with(
        &self,
        start_url: &str,
        timeout: Duration,
        options: FetchOptions<'_>,
    ) -> Result<Value> {
        let mut compiled: Option<Value> = None;
        let mut next_url = Some(start_url.to_string());
        let mut pages = 0usize;

        while let Some(url) = next_url.take() {
            check_cancelled(&options, pages)?;
            if let Some(max) = options.max_pages {
                if pages >= max {
                    return Err(ShelfError::PageLimit(max));
                }
            }
            pages += 1;
            tracing::debug!(page = pages, url = %url, "fetching collection page");

            let mut page = self.get_json(&url, timeout)?;
            // A page that arrives after cancellation is discarded
            check_cancelled(&options, pages)?;
            next_url = next_page_url(&url, &page)?;

            match compiled.as_mut() {
                None => {
                    results_of(&mut page, &url)?;
                    compiled = Some(page);
                }
                Some(doc) => {
                    let more = std::mem::take(results_of(&mut page, &url)?);
                    results_of(doc, start_url)?.extend(more);
                }
            }
        }

        tracing::debug!(pages, "collection fetch complete");
        compiled.ok_or_else(|| ShelfError::malformed("no pages fetched"))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Icons
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the icon of a record
    pub fn fetch_record_icon(&self, record: &CollectionRecord) -> Result<Option<Icon>> {
        self.fetch_icon(&record.icon_url)
    }

    /// Fetch an icon image
    ///
    /// Returns `Ok(None)` for an empty URL, a non-success status or a body that
    /// is not an image. Only transport failures are errors.
    pub fn fetch_icon(&self, url: &str) -> Result<Option<Icon>> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(None);
        }
        if Url::parse(url).is_err() {
            tracing::warn!(url, "ignoring invalid icon URL");
            return Ok(None);
        }

        let response = self
            .client
            .get(url)
            .timeout(DEFAULT_READ_TIMEOUT)
            .send()?;
        if !response.status().is_success() {
            tracing::debug!(status = response.status().as_u16(), url, "icon not available");
            return Ok(None);
        }

        let bytes = response.bytes()?;
        Ok(Icon::decode(bytes.to_vec()))
    }
}

fn check_cancelled(options: &FetchOptions<'_>, pages: usize) -> Result<()> {
    if options.cancel.is_some_and(|c| c.load(Ordering::SeqCst)) {
        tracing::info!(pages, "collection fetch cancelled");
        return Err(ShelfError::Cancelled);
    }
    Ok(())
}

/// Resolve the page's `next` link against the URL it was fetched from
fn next_page_url(current: &str, page: &Value) -> Result<Option<String>> {
    match page.get("next") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(next)) if next.trim().is_empty() => Ok(None),
        Some(Value::String(next)) => {
            let base = Url::parse(current)
                .map_err(|e| ShelfError::InvalidArgument(format!("Invalid URL {current}: {e}")))?;
            let resolved = base
                .join(next)
                .map_err(|e| ShelfError::malformed(format!("invalid next link {next:?}: {e}")))?;
            Ok(Some(resolved.into()))
        }
        Some(other) => Err(ShelfError::malformed(format!(
            "next link is not a string: {other}"
        ))),
    }
}

fn results_of<'a>(page: &'a mut Value, url: &str) -> Result<&'a mut Vec<Value>> {
    page.get_mut("results")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| ShelfError::malformed(format!("{url}: page has no results array")))
}
