//! Run configuration: input/output locations, region membership and the
//! policy applied when a video references an unknown category.

use crate::error::Result;
use crate::model::Region;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_VIDEO_CACHE: &str = "video_cache_file.json";
pub const DEFAULT_CATEGORY_CACHE: &str = "video_category.json";
pub const TABLE_EXPORT_NAME: &str = "video_df.csv";
pub const DEFAULT_PLACEHOLDER_CATEGORY: &str = "Unknown";

const WESTERN: [&str; 4] = ["US", "CA", "SE", "FR"];
const ASIA: [&str; 4] = ["KR", "JP", "ID", "TW"];

/// The two fixed country groupings
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGroups {
    pub western: Vec<String>,
    pub asia: Vec<String>,
}

impl Default for RegionGroups {
    fn default() -> Self {
        Self {
            western: WESTERN.iter().map(|c| c.to_string()).collect(),
            asia: ASIA.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl RegionGroups {
    /// Region for a country code. Anything outside the western list is asia,
    /// including codes that appear in neither list.
    pub fn region_of(&self, code: &str) -> Region {
        if self.western.iter().any(|c| c == code) {
            Region::Western
        } else {
            Region::Asia
        }
    }

    /// Member codes of a region, in configured order
    pub fn members(&self, region: Region) -> &[String] {
        match region {
            Region::Western => &self.western,
            Region::Asia => &self.asia,
        }
    }
}

/// What to do with a video whose category id is not in the lookup
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CategoryMissPolicy {
    /// Fail the whole normalization pass
    #[default]
    Abort,
    /// Drop the record and keep going
    Skip,
    /// Keep the record under the given label
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub video_cache_path: PathBuf,
    pub category_path: PathBuf,
    pub output_dir: PathBuf,
    pub export_csv: bool,
    pub regions: RegionGroups,
    pub on_missing_category: CategoryMissPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            video_cache_path: PathBuf::from(DEFAULT_VIDEO_CACHE),
            category_path: PathBuf::from(DEFAULT_CATEGORY_CACHE),
            output_dir: PathBuf::from("."),
            export_csv: true,
            regions: RegionGroups::default(),
            on_missing_category: CategoryMissPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_miss_policy(mut self, policy: CategoryMissPolicy) -> Self {
        self.on_missing_category = policy;
        self
    }

    /// Path of a named artifact inside the output directory
    pub fn artifact(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    pub fn table_export_path(&self) -> PathBuf {
        self.artifact(TABLE_EXPORT_NAME)
    }

    /// Create the output directory if it does not exist yet
    pub fn ensure_output_dir(&self) -> Result<()> {
        if !self.output_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.output_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_of_known_codes() {
        let groups = RegionGroups::default();
        for code in ["US", "CA", "SE", "FR"] {
            assert_eq!(groups.region_of(code), Region::Western);
        }
        for code in ["KR", "JP", "ID", "TW"] {
            assert_eq!(groups.region_of(code), Region::Asia);
        }
    }

    #[test]
    fn test_region_of_unknown_code_falls_back_to_asia() {
        let groups = RegionGroups::default();
        assert_eq!(groups.region_of("BR"), Region::Asia);
        assert_eq!(groups.region_of(""), Region::Asia);
        // membership is case sensitive
        assert_eq!(groups.region_of("us"), Region::Asia);
    }

    #[test]
    fn test_artifact_paths() {
        let config = AnalysisConfig::default().with_output_dir("/tmp/out");
        assert_eq!(config.artifact("ratios.png"), PathBuf::from("/tmp/out/ratios.png"));
        assert_eq!(config.table_export_path(), PathBuf::from("/tmp/out/video_df.csv"));
    }

    #[test]
    fn test_ensure_output_dir_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts").join("2024");
        let config = AnalysisConfig::default().with_output_dir(&out);

        config.ensure_output_dir().unwrap();
        assert!(out.is_dir());
        // already present is fine
        config.ensure_output_dir().unwrap();
    }
}
