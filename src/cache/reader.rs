use super::tables::{CategoryCache, CountryBundle, VideoCache};
use crate::error::Result;
use crate::model::CategoryLookup;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Render a JSON id as a lookup key. Ids show up both as strings and numbers.
pub(crate) fn value_as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse video cache content
pub fn parse_video_cache(content: &str) -> Result<VideoCache> {
    let raw: Map<String, Value> = serde_json::from_str(content)?;
    let mut cache = VideoCache::default();
    for (key, value) in raw {
        let bundle: CountryBundle = serde_json::from_value(value)?;
        cache.bundles.push((key, bundle));
    }
    Ok(cache)
}

/// Parse category cache content into a lookup
pub fn parse_category_lookup(content: &str) -> Result<CategoryLookup> {
    let raw: CategoryCache = serde_json::from_str(content)?;
    let mut lookup = CategoryLookup::new();
    for item in raw.items {
        match value_as_key(&item.id) {
            Some(id) => lookup.insert(id, item.snippet.title),
            None => log::warn!("Ignoring category with unusable id {}", item.id),
        }
    }
    Ok(lookup)
}

/// Read and parse the video cache file
pub fn read_video_cache(path: &Path) -> Result<VideoCache> {
    let content = fs::read_to_string(path)?;
    parse_video_cache(&content)
}

/// Read and parse the category cache file
pub fn read_category_lookup(path: &Path) -> Result<CategoryLookup> {
    let content = fs::read_to_string(path)?;
    parse_category_lookup(&content)
}

/// Read the video cache, falling back to an empty cache when the file is
/// missing or malformed
pub fn load_video_cache(path: &Path) -> VideoCache {
    match read_video_cache(path) {
        Ok(cache) => {
            log::info!(
                "Loaded {} country bundles ({} videos) from {}",
                cache.bundles.len(),
                cache.item_count(),
                path.display()
            );
            cache
        }
        Err(e) => {
            log::warn!("Cannot read video data from {}: {}", path.display(), e);
            VideoCache::default()
        }
    }
}

/// Read the category lookup, falling back to an empty lookup when the file is
/// missing or malformed
pub fn load_category_lookup(path: &Path) -> CategoryLookup {
    match read_category_lookup(path) {
        Ok(lookup) => {
            log::info!("Loaded {} categories from {}", lookup.len(), path.display());
            lookup
        }
        Err(e) => {
            log::warn!("Cannot read category data from {}: {}", path.display(), e);
            CategoryLookup::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VIDEOS: &str = r#"{
        "b": {"code": "US", "resp": [{"id": "v1"}, {"id": "v2"}]},
        "a": {"code": "KR", "resp": []}
    }"#;

    const CATEGORIES: &str = r#"{"items": [
        {"id": "10", "snippet": {"title": "Music"}},
        {"id": 24, "snippet": {"title": "Entertainment"}}
    ]}"#;

    #[test]
    fn test_parse_video_cache_keeps_file_order() {
        let cache = parse_video_cache(VIDEOS).unwrap();
        let keys: Vec<&str> = cache.bundles.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(cache.bundles[0].1.code, "US");
        assert_eq!(cache.item_count(), 2);
    }

    #[test]
    fn test_parse_category_lookup_accepts_numeric_ids() {
        let lookup = parse_category_lookup(CATEGORIES).unwrap();
        assert_eq!(lookup.get("10"), Some("Music"));
        assert_eq!(lookup.get("24"), Some("Entertainment"));
        assert_eq!(lookup.get("1"), None);
    }

    #[test]
    fn test_parse_rejects_malformed_documents() {
        assert!(parse_video_cache("[1, 2]").is_err());
        assert!(parse_video_cache(r#"{"x": {"resp": []}}"#).is_err());
        assert!(parse_category_lookup(r#"{"kind": "none"}"#).is_err());
    }

    #[test]
    fn test_load_degrades_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_video_cache(&missing).is_empty());
        assert!(load_category_lookup(&missing).is_empty());
    }

    #[test]
    fn test_load_degrades_on_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(load_video_cache(file.path()).is_empty());
        assert!(load_category_lookup(file.path()).is_empty());
    }

    #[test]
    fn test_load_reads_valid_files() {
        let dir = tempfile::tempdir().unwrap();
        let videos = dir.path().join("videos.json");
        let categories = dir.path().join("categories.json");
        fs::write(&videos, VIDEOS).unwrap();
        fs::write(&categories, CATEGORIES).unwrap();

        assert_eq!(load_video_cache(&videos).bundles.len(), 2);
        assert_eq!(load_category_lookup(&categories).len(), 2);
    }
}
