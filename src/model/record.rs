use super::region::{RatioKind, Region};

/// One observation of a video in one country's trending snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub country_code: String,
    pub region: Region,
    pub video_id: String,
    pub title: String,
    pub category: String,
    pub restricted_count: usize,
    /// `None` when the ratio could not be computed
    pub dislike_like_ratio: Option<f64>,
    pub like_view_ratio: Option<f64>,
}

impl VideoRecord {
    pub fn new(
        country_code: impl Into<String>,
        region: Region,
        video_id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            region,
            video_id: video_id.into(),
            title: title.into(),
            category: category.into(),
            restricted_count: 0,
            dislike_like_ratio: None,
            like_view_ratio: None,
        }
    }

    pub fn with_restricted(mut self, count: usize) -> Self {
        self.restricted_count = count;
        self
    }

    pub fn with_ratios(mut self, dislike_like: Option<f64>, like_view: Option<f64>) -> Self {
        self.dislike_like_ratio = dislike_like;
        self.like_view_ratio = like_view;
        self
    }

    pub fn ratio(&self, kind: RatioKind) -> Option<f64> {
        match kind {
            RatioKind::DislikeLike => self.dislike_like_ratio,
            RatioKind::LikeView => self.like_view_ratio,
        }
    }
}
