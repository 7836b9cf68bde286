//! Same-video overlap between country pairs.
//!
//! The rate for `(a, b)` is the share of `a`'s rows whose video id also shows
//! up under `b`. The denominator is always the first code's row count, so the
//! measure is not symmetric. Only the pair order produced by walking the
//! ascending code list is reported.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::model::VideoTable;
use crate::plots::{self, ChartLabels};
use std::collections::HashSet;
use tabled::{Table, Tabled};

pub const CHART_FILE: &str = "same_video_rate.png";

#[derive(Debug, Clone, PartialEq)]
pub struct OverlapRate {
    pub first: String,
    pub second: String,
    pub rate: f64,
}

impl OverlapRate {
    pub fn pair_label(&self) -> String {
        format!("{}-{}", self.first, self.second)
    }
}

#[derive(Tabled)]
struct OverlapRow {
    #[tabled(rename = "pair")]
    pair: String,
    #[tabled(rename = "rate")]
    rate: String,
}

fn rate_between(first_ids: &[&str], second_ids: &[&str]) -> Option<f64> {
    if first_ids.is_empty() {
        return None;
    }
    let first: HashSet<&str> = first_ids.iter().copied().collect();
    let second: HashSet<&str> = second_ids.iter().copied().collect();
    let shared = first.intersection(&second).count();
    Some(shared as f64 / first_ids.len() as f64)
}

/// Overlap rate for one ordered pair, `None` if `first` has no rows
pub fn overlap_rate(table: &VideoTable, first: &str, second: &str) -> Option<f64> {
    let ids = table.ids_by_country();
    let empty = Vec::new();
    let first_ids = ids.get(first).unwrap_or(&empty);
    let second_ids = ids.get(second).unwrap_or(&empty);
    rate_between(first_ids, second_ids)
}

/// Rates for every code combination, highest first (ties keep pair order)
pub fn same_video_rates(table: &VideoTable) -> Vec<OverlapRate> {
    let ids = table.ids_by_country();
    let codes: Vec<&str> = ids.keys().copied().collect();
    let mut rates = Vec::new();

    for (i, first) in codes.iter().enumerate() {
        for second in &codes[i + 1..] {
            match rate_between(&ids[first], &ids[second]) {
                Some(rate) => rates.push(OverlapRate {
                    first: first.to_string(),
                    second: second.to_string(),
                    rate,
                }),
                None => log::warn!("Skipping pair {}-{}: {} has no videos", first, second, first),
            }
        }
    }

    rates.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    rates
}

pub fn format_rates(rates: &[OverlapRate]) -> String {
    let rows: Vec<OverlapRow> = rates
        .iter()
        .map(|r| OverlapRow {
            pair: r.pair_label(),
            rate: format!("{:.6}", r.rate),
        })
        .collect();
    Table::new(rows).to_string()
}

/// Compute, print and chart the overlap rates
pub fn run(table: &VideoTable, config: &AnalysisConfig) -> Result<Vec<OverlapRate>> {
    config.ensure_output_dir()?;
    let rates = same_video_rates(table);
    if rates.is_empty() {
        println!("Fewer than two countries in the table, no pairs to compare");
        return Ok(rates);
    }

    println!("{}", format_rates(&rates));

    let bars: Vec<(String, f64)> = rates.iter().map(|r| (r.pair_label(), r.rate)).collect();
    let path = config.artifact(CHART_FILE);
    plots::draw_bar_chart(
        &bars,
        ChartLabels {
            title: "Rate of Same Video between Two Countries",
            x_label: "country pair",
            y_label: "rates of same video",
        },
        &path,
    )?;
    log::info!("Wrote {}", path.display());
    Ok(rates)
}
