use serde::Deserialize;
use serde_json::Value;

/// One country's trending snapshot in the video cache
#[derive(Debug, Clone, Deserialize)]
pub struct CountryBundle {
    pub code: String,
    /// Raw video items; their nested fields are irregular and are extracted
    /// one by one during normalization
    #[serde(default)]
    pub resp: Vec<Value>,
}

/// The whole video cache, bundles in file order
#[derive(Debug, Clone, Default)]
pub struct VideoCache {
    pub bundles: Vec<(String, CountryBundle)>,
}

impl VideoCache {
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Total number of video items over all bundles
    pub fn item_count(&self) -> usize {
        self.bundles.iter().map(|(_, b)| b.resp.len()).sum()
    }
}

/// The category taxonomy snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCache {
    pub items: Vec<CategoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryItem {
    pub id: Value,
    pub snippet: CategorySnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySnippet {
    pub title: String,
}
