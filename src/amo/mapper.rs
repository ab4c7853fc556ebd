//! Maps a raw (page-coalesced) collection document into domain records
//!
//! Mapping never fails: missing or malformed fields degrade to their
//! defaults, and only entries that carry no `addon` object at all are
//! skipped.

use serde::Deserialize;
use serde_json::Value;

use super::types::{Author, CollectionRecord, RawAddon, RawEntry, Rating, DEFAULT_LOCALE};

/// Map every entry of the document's `results` array
pub fn map_page(page: &Value) -> Vec<CollectionRecord> {
    let Some(results) = page.get("results").and_then(Value::as_array) else {
        tracing::warn!("collection document has no results array");
        return Vec::new();
    };

    results
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let addon = RawEntry::deserialize(entry).ok().and_then(|e| e.addon);
            if addon.is_none() {
                tracing::warn!(index, "skipping collection entry without an addon object");
            }
            addon
        })
        .map(to_record)
        .collect()
}

/// Convert one decoded add-on into a record
pub fn to_record(addon: RawAddon) -> CollectionRecord {
    let (version, download, permissions) = match addon.current_version {
        Some(current) => {
            let mut files = current.files.into_iter();
            match files.next() {
                Some(file) => (
                    current.version,
                    Some((file.id, file.url)),
                    file.permissions,
                ),
                None => (current.version, None, Vec::new()),
            }
        }
        None => (String::new(), None, Vec::new()),
    };
    let (download_id, download_url) = match download {
        Some((id, url)) => (Some(id), Some(url)),
        None => (None, None),
    };

    let default_locale = if addon.default_locale.is_empty() {
        DEFAULT_LOCALE.to_string()
    } else {
        addon.default_locale
    };

    CollectionRecord {
        id: addon.guid,
        authors: addon
            .authors
            .into_iter()
            .map(|a| Author {
                id: a.id,
                name: a.name,
                username: a.username,
                url: a.url,
            })
            .collect(),
        categories: addon.categories.android,
        created_at: addon.created,
        updated_at: addon.last_updated,
        version,
        download_id,
        download_url,
        permissions,
        translatable_name: addon.name,
        translatable_description: addon.description,
        translatable_summary: addon.summary,
        icon_url: addon.icon_url,
        site_url: addon.url,
        rating: addon.ratings.map(|r| Rating {
            reviews: r.count,
            average: r.average,
        }),
        default_locale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_addon() -> Value {
        json!({
            "addon": {
                "guid": "uBlock0@raymondhill.net",
                "authors": [
                    {"id": 11423598, "name": "Raymond Hill", "username": "gorhill", "url": "https://addons.mozilla.org/user/11423598/"}
                ],
                "categories": {"android": ["security-privacy"], "firefox": ["privacy"]},
                "created": "2015-04-25T07:26:22Z",
                "last_updated": "2024-01-02T03:04:05Z",
                "current_version": {
                    "version": "1.55.0",
                    "files": [{
                        "id": 4216633,
                        "url": "https://addons.mozilla.org/firefox/downloads/file/4216633/ublock.xpi",
                        "permissions": ["dns", "storage", "<all_urls>"]
                    }]
                },
                "name": {"en-US": "uBlock Origin", "de": "uBlock Origin DE"},
                "description": {"en-US": "Finally, an efficient blocker."},
                "summary": {"en-US": "Easy on CPU and memory."},
                "icon_url": "https://addons.mozilla.org/user-media/addon_icons/607/607454-64.png",
                "url": "https://addons.mozilla.org/en-US/android/addon/ublock-origin/",
                "ratings": {"count": 15000, "average": 4.7},
                "default_locale": "en-US"
            }
        })
    }

    fn page(results: Vec<Value>) -> Value {
        json!({"count": results.len(), "next": null, "results": results})
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Full Record Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_map_full_addon() {
        let records = map_page(&page(vec![full_addon()]));
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.id, "uBlock0@raymondhill.net");
        assert_eq!(r.authors.len(), 1);
        assert_eq!(r.authors[0].id, "11423598");
        assert_eq!(r.authors[0].name, "Raymond Hill");
        assert_eq!(r.authors[0].username, "gorhill");
        assert_eq!(r.categories, vec!["security-privacy".to_string()]);
        assert_eq!(r.created_at, "2015-04-25T07:26:22Z");
        assert_eq!(r.updated_at, "2024-01-02T03:04:05Z");
        assert_eq!(r.version, "1.55.0");
        assert_eq!(r.download_id.as_deref(), Some("4216633"));
        assert!(r.download_url.as_deref().unwrap().ends_with("ublock.xpi"));
        assert_eq!(r.permissions, vec!["dns", "storage", "<all_urls>"]);
        assert_eq!(r.translatable_name.get("de").unwrap(), "uBlock Origin DE");
        assert_eq!(
            r.translatable_summary.get("en-US").unwrap(),
            "Easy on CPU and memory."
        );
        assert!(r.icon_url.ends_with("607454-64.png"));
        assert!(r.site_url.contains("ublock-origin"));
        let rating = r.rating.unwrap();
        assert_eq!(rating.reviews, 15000);
        assert!((rating.average - 4.7).abs() < f32::EPSILON);
        assert_eq!(r.default_locale, "en-US");
    }

    #[test]
    fn test_map_preserves_result_order() {
        let ids = ["a@x", "b@x", "c@x"];
        let results = ids
            .iter()
            .map(|id| json!({"addon": {"guid": id}}))
            .collect();

        let records = map_page(&page(results));
        let mapped: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(mapped, ids);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Defensive Mapping Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_ratings_yields_no_rating() {
        let mut entry = full_addon();
        entry["addon"].as_object_mut().unwrap().remove("ratings");

        let records = map_page(&page(vec![entry]));
        assert!(records[0].rating.is_none());
    }

    #[test]
    fn test_ratings_with_missing_fields_default_to_zero() {
        let entry = json!({"addon": {"guid": "a@x", "ratings": {}}});

        let records = map_page(&page(vec![entry]));
        assert_eq!(records[0].rating, Some(Rating::default()));
    }

    #[test]
    fn test_missing_categories_yields_empty_list() {
        let mut entry = full_addon();
        entry["addon"].as_object_mut().unwrap().remove("categories");

        let records = map_page(&page(vec![entry]));
        assert!(records[0].categories.is_empty());
    }

    #[test]
    fn test_null_categories_and_missing_android_key() {
        let null_categories = json!({"addon": {"guid": "a@x", "categories": null}});
        let firefox_only = json!({"addon": {"guid": "b@x", "categories": {"firefox": ["x"]}}});

        let records = map_page(&page(vec![null_categories, firefox_only]));
        assert!(records[0].categories.is_empty());
        assert!(records[1].categories.is_empty());
    }

    #[test]
    fn test_missing_locale_maps_yield_empty_maps() {
        let mut entry = full_addon();
        let addon = entry["addon"].as_object_mut().unwrap();
        addon.remove("name");
        addon.insert("description".to_string(), Value::Null);
        addon.remove("summary");

        let records = map_page(&page(vec![entry]));
        assert!(records[0].translatable_name.is_empty());
        assert!(records[0].translatable_description.is_empty());
        assert!(records[0].translatable_summary.is_empty());
    }

    #[test]
    fn test_null_locale_values_become_empty_strings() {
        let entry = json!({"addon": {"guid": "a@x", "name": {"en-US": "Name", "fr": null}}});

        let records = map_page(&page(vec![entry]));
        assert_eq!(records[0].translatable_name.get("fr").unwrap(), "");
        assert_eq!(records[0].translatable_name.get("en-US").unwrap(), "Name");
    }

    #[test]
    fn test_missing_strings_default_to_empty() {
        let entry = json!({"addon": {}});

        let records = map_page(&page(vec![entry]));
        let r = &records[0];
        assert_eq!(r.id, "");
        assert_eq!(r.created_at, "");
        assert_eq!(r.updated_at, "");
        assert_eq!(r.version, "");
        assert_eq!(r.icon_url, "");
        assert_eq!(r.site_url, "");
        assert!(r.authors.is_empty());
        assert!(r.permissions.is_empty());
    }

    #[test]
    fn test_default_locale_fallback() {
        let missing = json!({"addon": {"guid": "a@x"}});
        let empty = json!({"addon": {"guid": "b@x", "default_locale": ""}});
        let set = json!({"addon": {"guid": "c@x", "default_locale": "de"}});

        let records = map_page(&page(vec![missing, empty, set]));
        assert_eq!(records[0].default_locale, DEFAULT_LOCALE);
        assert_eq!(records[1].default_locale, DEFAULT_LOCALE);
        assert_eq!(records[2].default_locale, "de");
    }

    #[test]
    fn test_no_files_means_no_download() {
        let entry = json!({"addon": {"guid": "a@x", "current_version": {"version": "2.0", "files": []}}});

        let records = map_page(&page(vec![entry]));
        let r = &records[0];
        assert_eq!(r.version, "2.0");
        assert!(r.download_id.is_none());
        assert!(r.download_url.is_none());
        assert!(r.permissions.is_empty());
        assert!(!r.is_downloadable());
    }

    #[test]
    fn test_missing_current_version() {
        let entry = json!({"addon": {"guid": "a@x"}});

        let records = map_page(&page(vec![entry]));
        assert_eq!(records[0].version, "");
        assert!(records[0].download_url.is_none());
    }

    #[test]
    fn test_only_first_file_is_used() {
        let entry = json!({"addon": {"guid": "a@x", "current_version": {"version": "1", "files": [
            {"id": 1, "url": "https://x/1.xpi", "permissions": ["tabs"]},
            {"id": 2, "url": "https://x/2.xpi", "permissions": ["cookies"]}
        ]}}});

        let records = map_page(&page(vec![entry]));
        assert_eq!(records[0].download_id.as_deref(), Some("1"));
        assert_eq!(records[0].permissions, vec!["tabs"]);
    }

    #[test]
    fn test_entries_without_addon_are_skipped() {
        let results = vec![
            json!({"addon": {"guid": "a@x"}}),
            json!({"notes": "no addon here"}),
            json!("not an object"),
            json!({"addon": null}),
            json!({"addon": {"guid": "b@x"}}),
        ];

        let records = map_page(&page(results));
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a@x", "b@x"]);
    }

    #[test]
    fn test_document_without_results() {
        assert!(map_page(&json!({"next": null})).is_empty());
        assert!(map_page(&json!({"results": null})).is_empty());
        assert!(map_page(&json!([])).is_empty());
    }
}
