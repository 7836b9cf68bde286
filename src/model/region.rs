use crate::error::AnalyzerError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Western,
    Asia,
}

impl Region {
    /// Order in which region-level results are reported
    pub const REPORT_ORDER: [Region; 2] = [Region::Asia, Region::Western];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Western => "western",
            Region::Asia => "asia",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Western => "Western",
            Region::Asia => "Asia",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Region {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "western" => Ok(Region::Western),
            "asia" => Ok(Region::Asia),
            other => Err(AnalyzerError::InvalidRegion(other.to_string())),
        }
    }
}

/// The two per-video popularity ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatioKind {
    DislikeLike,
    LikeView,
}

impl RatioKind {
    pub const ALL: [RatioKind; 2] = [RatioKind::DislikeLike, RatioKind::LikeView];

    /// Column name in the exported table
    pub fn column(&self) -> &'static str {
        match self {
            RatioKind::DislikeLike => "ratio_dislike_like",
            RatioKind::LikeView => "ratio_like_view",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            RatioKind::DislikeLike => "dislike/like count ratio",
            RatioKind::LikeView => "like/view count ratio",
        }
    }

    pub fn chart_subject(&self) -> &'static str {
        match self {
            RatioKind::DislikeLike => "Dislike/Like",
            RatioKind::LikeView => "Like/View",
        }
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
