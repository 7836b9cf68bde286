//! Distribution of the dislike/like and like/view ratios.
//!
//! Missing ratios never take part: they are dropped before density
//! estimation and before any summary statistic is computed.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::model::{RatioKind, Region, VideoTable};
use crate::plots::{self, BarSeries, ChartLabels, Curve};
use crate::stats::{self, Describe};
use tabled::{Table, Tabled};

pub const MEANS_CHART_FILE: &str = "ratios.png";

/// Descriptive statistics of both ratios for one country
#[derive(Debug, Clone, PartialEq)]
pub struct RatioSummary {
    pub code: String,
    pub dislike_like: Describe,
    pub like_view: Describe,
}

impl RatioSummary {
    pub fn get(&self, kind: RatioKind) -> &Describe {
        match kind {
            RatioKind::DislikeLike => &self.dislike_like,
            RatioKind::LikeView => &self.like_view,
        }
    }
}

/// One row of the long-form table of mean ratios
#[derive(Debug, Clone, PartialEq)]
pub struct MeanRatio {
    pub code: String,
    pub ratio: RatioKind,
    pub value: Option<f64>,
}

#[derive(Tabled)]
struct SummaryRow {
    code: String,
    ratio: String,
    count: usize,
    min: String,
    mean: String,
    std: String,
    max: String,
}

#[derive(Tabled)]
struct MeanRow {
    code: String,
    ratio: String,
    ratio_value: String,
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_else(|| "NaN".to_string())
}

pub fn distribution_file(kind: RatioKind, region: Region) -> String {
    format!("dist_{}_{}.png", kind.column(), region)
}

/// One density curve per listed code that has enough values
pub fn density_curves(table: &VideoTable, kind: RatioKind, codes: &[String]) -> Vec<Curve> {
    let mut curves = Vec::new();
    for code in codes {
        if !table.has_country(code) {
            log::warn!("No videos for {}, leaving it out of the {} density plot", code, kind);
            continue;
        }
        let values = table.ratios_for(code, kind);
        match stats::gaussian_kde(&values, stats::KDE_GRID_POINTS) {
            Some(points) => curves.push(Curve {
                name: code.clone(),
                points,
            }),
            None => log::debug!(
                "{}: {} values of {} without spread, no density curve",
                code,
                values.len(),
                kind
            ),
        }
    }
    curves
}

/// Per-country statistics for both ratios, countries ascending
pub fn summaries(table: &VideoTable) -> Vec<RatioSummary> {
    table
        .country_codes()
        .into_iter()
        .map(|code| RatioSummary {
            code: code.to_string(),
            dislike_like: Describe::of(&table.ratios_for(code, RatioKind::DislikeLike)),
            like_view: Describe::of(&table.ratios_for(code, RatioKind::LikeView)),
        })
        .collect()
}

/// Means in long form: every country for the first ratio, then the second
pub fn mean_ratios_long(summaries: &[RatioSummary]) -> Vec<MeanRatio> {
    RatioKind::ALL
        .into_iter()
        .flat_map(|kind| {
            summaries.iter().map(move |s| MeanRatio {
                code: s.code.clone(),
                ratio: kind,
                value: s.get(kind).mean,
            })
        })
        .collect()
}

pub fn format_summaries(summaries: &[RatioSummary]) -> String {
    let rows: Vec<SummaryRow> = summaries
        .iter()
        .flat_map(|s| {
            RatioKind::ALL.into_iter().map(move |kind| {
                let d = s.get(kind);
                SummaryRow {
                    code: s.code.clone(),
                    ratio: kind.column().to_string(),
                    count: d.count,
                    min: fmt_stat(d.min),
                    mean: fmt_stat(d.mean),
                    std: fmt_stat(d.std),
                    max: fmt_stat(d.max),
                }
            })
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn format_means(means: &[MeanRatio]) -> String {
    let rows: Vec<MeanRow> = means
        .iter()
        .map(|m| MeanRow {
            code: m.code.clone(),
            ratio: m.ratio.column().to_string(),
            ratio_value: fmt_stat(m.value),
        })
        .collect();
    Table::new(rows).to_string()
}

fn draw_distributions(table: &VideoTable, config: &AnalysisConfig) -> Result<()> {
    for kind in RatioKind::ALL {
        for region in [Region::Western, Region::Asia] {
            let curves = density_curves(table, kind, config.regions.members(region));
            let file = distribution_file(kind, region);
            if curves.is_empty() {
                log::warn!("No density curves for {}, skipping {}", region, file);
                continue;
            }
            let title = format!(
                "Distribution of Video {} Count of {} Countries",
                kind.chart_subject(),
                region.display_name()
            );
            let path = config.artifact(&file);
            plots::draw_density_chart(
                &curves,
                ChartLabels {
                    title: &title,
                    x_label: kind.axis_label(),
                    y_label: "distribution",
                },
                &path,
            )?;
            log::info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn draw_means(means: &[MeanRatio], config: &AnalysisConfig) -> Result<()> {
    let mut groups: Vec<String> = Vec::new();
    for m in means {
        if !groups.contains(&m.code) {
            groups.push(m.code.clone());
        }
    }
    if groups.is_empty() {
        log::warn!("No videos in the table, skipping {}", MEANS_CHART_FILE);
        return Ok(());
    }

    let series: Vec<BarSeries> = RatioKind::ALL
        .iter()
        .map(|kind| BarSeries {
            name: kind.column().to_string(),
            values: groups
                .iter()
                .map(|code| {
                    means
                        .iter()
                        .find(|m| m.ratio == *kind && &m.code == code)
                        .and_then(|m| m.value)
                        .unwrap_or(0.0)
                })
                .collect(),
        })
        .collect();

    let path = config.artifact(MEANS_CHART_FILE);
    plots::draw_grouped_bar_chart(
        &groups,
        &series,
        ChartLabels {
            title: "Ratios of Video dislikes/likes and likes/views",
            x_label: "country",
            y_label: "ratios of dislike/like and like/views",
        },
        &path,
    )?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Density plots per region group, summary tables and the mean ratio chart
pub fn run(table: &VideoTable, config: &AnalysisConfig) -> Result<Vec<RatioSummary>> {
    config.ensure_output_dir()?;
    draw_distributions(table, config)?;

    let summaries = summaries(table);
    println!("{}", format_summaries(&summaries));

    let means = mean_ratios_long(&summaries);
    println!("{}", format_means(&means));
    draw_means(&means, config)?;

    Ok(summaries)
}
