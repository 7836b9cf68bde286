use super::record::VideoRecord;
use super::region::RatioKind;
use std::collections::BTreeMap;

/// The flattened, read-only collection of video observations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoTable {
    records: Vec<VideoRecord>,
}

impl VideoTable {
    pub fn new(records: Vec<VideoRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &VideoRecord> {
        self.records.iter()
    }

    /// Distinct country codes in ascending order
    pub fn country_codes(&self) -> Vec<&str> {
        self.by_country().into_keys().collect()
    }

    /// Records grouped by country code (codes ascending, rows in table order)
    pub fn by_country(&self) -> BTreeMap<&str, Vec<&VideoRecord>> {
        let mut groups: BTreeMap<&str, Vec<&VideoRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.country_code.as_str()).or_default().push(record);
        }
        groups
    }

    /// Video ids seen under each country code, duplicates kept
    pub fn ids_by_country(&self) -> BTreeMap<&str, Vec<&str>> {
        self.by_country()
            .into_iter()
            .map(|(code, rows)| (code, rows.iter().map(|r| r.video_id.as_str()).collect()))
            .collect()
    }

    /// Present values of one ratio for one country, missing values dropped
    pub fn ratios_for(&self, code: &str, kind: RatioKind) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| r.country_code == code)
            .filter_map(|r| r.ratio(kind))
            .collect()
    }

    pub fn has_country(&self, code: &str) -> bool {
        self.records.iter().any(|r| r.country_code == code)
    }
}

impl From<Vec<VideoRecord>> for VideoTable {
    fn from(records: Vec<VideoRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a VideoTable {
    type Item = &'a VideoRecord;
    type IntoIter = std::slice::Iter<'a, VideoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
