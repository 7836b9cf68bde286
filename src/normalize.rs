//! Flattening of the nested video cache into a [`VideoTable`].
//!
//! Every optional field of a video item is extracted into a [`FieldOutcome`],
//! so the degrade-or-abort decision for each field is made in one place:
//!
//! - restriction data: missing or malformed counts as 0 blocked regions
//! - statistics: missing, non-numeric or zero-divisor ratios are `None`
//! - category: resolved through the lookup, a miss follows [`CategoryMissPolicy`]
//! - id, title and category id are required; without them the pass fails

use crate::cache::reader::value_as_key;
use crate::cache::VideoCache;
use crate::config::{AnalysisConfig, CategoryMissPolicy, RegionGroups};
use crate::error::{AnalyzerError, Result};
use crate::model::{CategoryLookup, Region, VideoRecord, VideoTable};
use serde_json::Value;

/// Why a field produced no value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    Absent,
    NotNumeric,
    ZeroDivisor,
    Malformed,
}

/// Result of extracting one optional field from a video item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldOutcome<T> {
    Value(T),
    Missing(MissingReason),
}

impl<T> FieldOutcome<T> {
    pub fn value(self) -> Option<T> {
        match self {
            FieldOutcome::Value(v) => Some(v),
            FieldOutcome::Missing(_) => None,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.value().unwrap_or(default)
    }
}

/// Number of regions that block the video
pub fn restricted_count(item: &Value) -> FieldOutcome<usize> {
    match item.pointer("/contentDetails/regionRestriction/blocked") {
        None | Some(Value::Null) => FieldOutcome::Missing(MissingReason::Absent),
        Some(Value::Array(blocked)) => FieldOutcome::Value(blocked.len()),
        Some(_) => FieldOutcome::Missing(MissingReason::Malformed),
    }
}

/// A numeric statistic, stored by the API as a decimal string
pub fn statistic(item: &Value, name: &str) -> FieldOutcome<f64> {
    let parsed = match item.get("statistics").and_then(|s| s.get(name)) {
        None | Some(Value::Null) => return FieldOutcome::Missing(MissingReason::Absent),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => FieldOutcome::Value(v),
        _ => FieldOutcome::Missing(MissingReason::NotNumeric),
    }
}

/// `numerator / denominator`, missing if either side is or the divisor is 0
pub fn ratio(numerator: FieldOutcome<f64>, denominator: FieldOutcome<f64>) -> FieldOutcome<f64> {
    match (numerator, denominator) {
        (FieldOutcome::Missing(reason), _) | (_, FieldOutcome::Missing(reason)) => {
            FieldOutcome::Missing(reason)
        }
        (FieldOutcome::Value(_), FieldOutcome::Value(d)) if d == 0.0 => {
            FieldOutcome::Missing(MissingReason::ZeroDivisor)
        }
        (FieldOutcome::Value(n), FieldOutcome::Value(d)) => FieldOutcome::Value(n / d),
    }
}

/// Counters collected during a normalization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeSummary {
    pub bundles: usize,
    pub rows: usize,
    pub skipped: usize,
    pub missing_dislike_like: usize,
    pub missing_like_view: usize,
}

/// Converts cached bundles into flat records
pub struct Normalizer<'a> {
    lookup: &'a CategoryLookup,
    regions: &'a RegionGroups,
    on_missing_category: &'a CategoryMissPolicy,
}

impl<'a> Normalizer<'a> {
    pub fn new(lookup: &'a CategoryLookup, config: &'a AnalysisConfig) -> Self {
        Self {
            lookup,
            regions: &config.regions,
            on_missing_category: &config.on_missing_category,
        }
    }

    /// Normalize every bundle, keeping bundle and item order
    pub fn normalize(&self, cache: &VideoCache) -> Result<(VideoTable, NormalizeSummary)> {
        let mut records = Vec::with_capacity(cache.item_count());
        let mut summary = NormalizeSummary::default();

        for (_, bundle) in &cache.bundles {
            summary.bundles += 1;
            let region = self.regions.region_of(&bundle.code);

            for item in &bundle.resp {
                match self.normalize_item(&bundle.code, region, item)? {
                    Some(record) => {
                        if record.dislike_like_ratio.is_none() {
                            summary.missing_dislike_like += 1;
                        }
                        if record.like_view_ratio.is_none() {
                            summary.missing_like_view += 1;
                        }
                        records.push(record);
                    }
                    None => summary.skipped += 1,
                }
            }
        }

        summary.rows = records.len();
        Ok((VideoTable::new(records), summary))
    }

    /// Build one record. `Ok(None)` means the record was dropped by the
    /// category miss policy.
    fn normalize_item(&self, code: &str, region: Region, item: &Value) -> Result<Option<VideoRecord>> {
        let malformed = |reason: &str| AnalyzerError::MalformedVideo {
            country_code: code.to_string(),
            reason: reason.to_string(),
        };

        let video_id = item
            .get("id")
            .and_then(value_as_key)
            .ok_or_else(|| malformed("missing id"))?;
        let title = item
            .pointer("/snippet/title")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(&format!("video {} has no snippet.title", video_id)))?;
        let category_id = item
            .pointer("/snippet/categoryId")
            .and_then(value_as_key)
            .ok_or_else(|| malformed(&format!("video {} has no snippet.categoryId", video_id)))?;

        let category = match self.lookup.get(&category_id) {
            Some(name) => name.to_string(),
            None => match self.on_missing_category {
                CategoryMissPolicy::Abort => {
                    return Err(AnalyzerError::MissingCategory {
                        country_code: code.to_string(),
                        video_id,
                        category_id,
                    });
                }
                CategoryMissPolicy::Skip => {
                    log::warn!(
                        "Skipping video {} ({}): unknown category id {}",
                        video_id,
                        code,
                        category_id
                    );
                    return Ok(None);
                }
                CategoryMissPolicy::Placeholder(label) => {
                    log::debug!("Video {} ({}): unknown category id {}", video_id, code, category_id);
                    label.clone()
                }
            },
        };

        let restricted = restricted_count(item);
        if let FieldOutcome::Missing(MissingReason::Malformed) = restricted {
            log::debug!("Video {} ({}): unreadable restriction list", video_id, code);
        }

        let dislikes = statistic(item, "dislikeCount");
        let likes = statistic(item, "likeCount");
        let views = statistic(item, "viewCount");
        let dislike_like = ratio(dislikes, likes);
        let like_view = ratio(likes, views);
        if let FieldOutcome::Missing(reason) = dislike_like {
            log::debug!("Video {} ({}): dislike/like ratio missing ({:?})", video_id, code, reason);
        }
        if let FieldOutcome::Missing(reason) = like_view {
            log::debug!("Video {} ({}): like/view ratio missing ({:?})", video_id, code, reason);
        }

        let record = VideoRecord::new(code, region, video_id, title, category)
            .with_restricted(restricted.unwrap_or(0))
            .with_ratios(dislike_like.value(), like_view.value());

        Ok(Some(record))
    }
}

/// Normalize with the configured policies
pub fn normalize(
    cache: &VideoCache,
    lookup: &CategoryLookup,
    config: &AnalysisConfig,
) -> Result<(VideoTable, NormalizeSummary)> {
    Normalizer::new(lookup, config).normalize(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::parse_video_cache;
    use serde_json::json;

    fn lookup() -> CategoryLookup {
        [("10", "Music"), ("24", "Entertainment")].into_iter().collect()
    }

    fn item(id: &str, category: &str) -> Value {
        json!({"id": id, "snippet": {"title": format!("title {}", id), "categoryId": category}})
    }

    fn cache_of(bundles: Value) -> VideoCache {
        parse_video_cache(&bundles.to_string()).unwrap()
    }

    #[test]
    fn test_one_row_per_item_in_input_order() {
        let cache = cache_of(json!({
            "k1": {"code": "US", "resp": [item("v1", "10"), item("v2", "24")]},
            "k2": {"code": "KR", "resp": [item("v3", "10")]},
            "k3": {"code": "CA", "resp": []}
        }));
        let (table, summary) = normalize(&cache, &lookup(), &AnalysisConfig::default()).unwrap();

        assert_eq!(table.len(), cache.item_count());
        assert_eq!(summary.bundles, 3);
        assert_eq!(summary.rows, 3);
        let ids: Vec<&str> = table.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
        assert_eq!(table.records()[0].region, Region::Western);
        assert_eq!(table.records()[2].region, Region::Asia);
        assert_eq!(table.records()[1].category, "Entertainment");
    }

    #[test]
    fn test_unknown_country_is_asia() {
        let cache = cache_of(json!({"k": {"code": "BR", "resp": [item("v1", "10")]}}));
        let (table, _) = normalize(&cache, &lookup(), &AnalysisConfig::default()).unwrap();
        assert_eq!(table.records()[0].region, Region::Asia);
    }

    #[test]
    fn test_restricted_count() {
        let blocked = json!({"contentDetails": {"regionRestriction": {"blocked": ["DE", "AT", "CH"]}}});
        assert_eq!(restricted_count(&blocked), FieldOutcome::Value(3));

        let absent = json!({"contentDetails": {}});
        assert_eq!(restricted_count(&absent), FieldOutcome::Missing(MissingReason::Absent));
        assert_eq!(restricted_count(&absent).unwrap_or(0), 0);

        let not_a_list = json!({"contentDetails": {"regionRestriction": {"blocked": "DE"}}});
        assert_eq!(restricted_count(&not_a_list), FieldOutcome::Missing(MissingReason::Malformed));
    }

    #[test]
    fn test_statistic_parsing() {
        let video = json!({"statistics": {"likeCount": "120", "viewCount": 4000, "dislikeCount": "n/a"}});
        assert_eq!(statistic(&video, "likeCount"), FieldOutcome::Value(120.0));
        assert_eq!(statistic(&video, "viewCount"), FieldOutcome::Value(4000.0));
        assert_eq!(statistic(&video, "dislikeCount"), FieldOutcome::Missing(MissingReason::NotNumeric));
        assert_eq!(statistic(&video, "commentCount"), FieldOutcome::Missing(MissingReason::Absent));
        assert_eq!(statistic(&json!({}), "likeCount"), FieldOutcome::Missing(MissingReason::Absent));
    }

    #[test]
    fn test_zero_over_zero_is_missing_not_zero() {
        let zero = FieldOutcome::Value(0.0);
        assert_eq!(ratio(zero, zero), FieldOutcome::Missing(MissingReason::ZeroDivisor));
        assert_eq!(ratio(zero, FieldOutcome::Value(5.0)), FieldOutcome::Value(0.0));
        assert_eq!(
            ratio(FieldOutcome::Value(5.0), FieldOutcome::Missing(MissingReason::Absent)),
            FieldOutcome::Missing(MissingReason::Absent)
        );
    }

    #[test]
    fn test_ratios_on_records() {
        let mut video = item("v1", "10");
        video["statistics"] = json!({"dislikeCount": "10", "likeCount": "100", "viewCount": "1000"});
        let mut zeros = item("v2", "10");
        zeros["statistics"] = json!({"dislikeCount": "0", "likeCount": "0", "viewCount": "50"});
        let bare = item("v3", "10");

        let cache = cache_of(json!({"k": {"code": "US", "resp": [video, zeros, bare]}}));
        let (table, summary) = normalize(&cache, &lookup(), &AnalysisConfig::default()).unwrap();
        let rows = table.records();

        assert_eq!(rows[0].dislike_like_ratio, Some(0.1));
        assert_eq!(rows[0].like_view_ratio, Some(0.1));
        assert_eq!(rows[1].dislike_like_ratio, None);
        assert_eq!(rows[1].like_view_ratio, Some(0.0));
        assert_eq!(rows[2].dislike_like_ratio, None);
        assert_eq!(rows[2].like_view_ratio, None);
        assert_eq!(rows[2].restricted_count, 0);
        assert_eq!(summary.missing_dislike_like, 2);
        assert_eq!(summary.missing_like_view, 1);
    }

    #[test]
    fn test_missing_category_aborts_by_default() {
        let cache = cache_of(json!({"k": {"code": "US", "resp": [item("v1", "10"), item("v2", "99")]}}));
        let err = normalize(&cache, &lookup(), &AnalysisConfig::default()).unwrap_err();
        match err {
            AnalyzerError::MissingCategory { video_id, category_id, .. } => {
                assert_eq!(video_id, "v2");
                assert_eq!(category_id, "99");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_category_skip_policy() {
        let cache = cache_of(json!({"k": {"code": "US", "resp": [item("v1", "10"), item("v2", "99")]}}));
        let config = AnalysisConfig::default().with_miss_policy(CategoryMissPolicy::Skip);
        let (table, summary) = normalize(&cache, &lookup(), &config).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_missing_category_placeholder_policy() {
        let cache = cache_of(json!({"k": {"code": "US", "resp": [item("v2", "99")]}}));
        let config = AnalysisConfig::default()
            .with_miss_policy(CategoryMissPolicy::Placeholder("Unknown".to_string()));
        let (table, _) = normalize(&cache, &lookup(), &config).unwrap();
        assert_eq!(table.records()[0].category, "Unknown");
    }

    #[test]
    fn test_empty_lookup_with_placeholder_keeps_all_rows() {
        let cache = cache_of(json!({"k": {"code": "JP", "resp": [item("v1", "10"), item("v2", "24")]}}));
        let config = AnalysisConfig::default()
            .with_miss_policy(CategoryMissPolicy::Placeholder("Unknown".to_string()));
        let (table, _) = normalize(&cache, &CategoryLookup::new(), &config).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_item_without_snippet_is_malformed() {
        let cache = cache_of(json!({"k": {"code": "US", "resp": [{"id": "v1"}]}}));
        let err = normalize(&cache, &lookup(), &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedVideo { .. }));
    }

    #[test]
    fn test_empty_cache_gives_empty_table() {
        let (table, summary) =
            normalize(&VideoCache::default(), &lookup(), &AnalysisConfig::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(summary, NormalizeSummary::default());
    }

    #[test]
    fn test_numeric_category_id() {
        let cache = cache_of(json!({"k": {"code": "US", "resp": [
            {"id": "v1", "snippet": {"title": "t", "categoryId": 24}}
        ]}}));
        let (table, _) = normalize(&cache, &lookup(), &AnalysisConfig::default()).unwrap();
        assert_eq!(table.records()[0].category, "Entertainment");
    }
}
