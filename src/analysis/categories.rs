//! Category distribution per country and per region, and the chi-squared
//! comparison of the two regions.

use crate::config::AnalysisConfig;
use crate::error::{AnalyzerError, Result};
use crate::model::{Region, VideoTable};
use crate::plots;
use crate::stats::{self, ChiSquaredResult};
use std::collections::{BTreeMap, BTreeSet};
use tabled::{Table, Tabled};

/// Category counts for one group (a country or a region), largest first
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCounts {
    pub group: String,
    /// Sorted by count descending, then category name ascending
    pub counts: Vec<(String, usize)>,
}

impl CategoryCounts {
    fn from_map(group: String, counts: BTreeMap<&str, usize>) -> Self {
        let mut counts: Vec<(String, usize)> =
            counts.into_iter().map(|(c, n)| (c.to_string(), n)).collect();
        // stable sort over name-ordered entries keeps ties alphabetical
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Self { group, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, category: &str) -> usize {
        self.counts
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    fn slices(&self) -> Vec<(String, f64)> {
        self.counts.iter().map(|(c, n)| (c.clone(), *n as f64)).collect()
    }
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "group")]
    group: String,
    #[tabled(rename = "category")]
    category: String,
    #[tabled(rename = "count")]
    count: usize,
}

/// Per-country category counts, countries ascending
pub fn counts_by_country(table: &VideoTable) -> Vec<CategoryCounts> {
    let mut groups: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for record in table {
        *groups
            .entry(record.country_code.as_str())
            .or_default()
            .entry(record.category.as_str())
            .or_insert(0) += 1;
    }
    groups
        .into_iter()
        .map(|(code, counts)| CategoryCounts::from_map(code.to_string(), counts))
        .collect()
}

/// Category counts for one region; empty when the region has no rows
pub fn counts_for_region(table: &VideoTable, region: Region) -> CategoryCounts {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in table.iter().filter(|r| r.region == region) {
        *counts.entry(record.category.as_str()).or_insert(0) += 1;
    }
    CategoryCounts::from_map(region.to_string(), counts)
}

/// Per-region category counts in report order (asia, western)
pub fn counts_by_region(table: &VideoTable) -> Vec<CategoryCounts> {
    Region::REPORT_ORDER
        .iter()
        .map(|region| counts_for_region(table, *region))
        .collect()
}

/// Align two distributions on the union of their categories, absent
/// categories counting as zero. Categories come out in ascending order.
pub fn align_counts(first: &CategoryCounts, second: &CategoryCounts) -> (Vec<String>, Vec<f64>, Vec<f64>) {
    let categories: BTreeSet<&str> = first
        .counts
        .iter()
        .chain(second.counts.iter())
        .map(|(c, _)| c.as_str())
        .collect();
    let first_row = categories.iter().map(|c| first.get(c) as f64).collect();
    let second_row = categories.iter().map(|c| second.get(c) as f64).collect();
    let names = categories.into_iter().map(String::from).collect();
    (names, first_row, second_row)
}

/// Chi-squared test of independence between two category distributions
pub fn compare_distributions(first: &CategoryCounts, second: &CategoryCounts) -> Result<ChiSquaredResult> {
    if first.total() == 0 || second.total() == 0 {
        return Err(AnalyzerError::DegenerateContingency(format!(
            "{} has {} videos and {} has {}",
            first.group,
            first.total(),
            second.group,
            second.total()
        )));
    }
    let (_, first_row, second_row) = align_counts(first, second);
    stats::chi_squared_two_rows(&first_row, &second_row)
}

pub fn format_counts(groups: &[CategoryCounts]) -> String {
    let rows: Vec<CountRow> = groups
        .iter()
        .flat_map(|g| {
            g.counts.iter().map(move |(category, count)| CountRow {
                group: g.group.clone(),
                category: category.clone(),
                count: *count,
            })
        })
        .collect();
    Table::new(rows).to_string()
}

fn draw_pie(counts: &CategoryCounts, config: &AnalysisConfig) -> Result<()> {
    let path = config.artifact(&format!("pie_chart_{}.png", counts.group));
    plots::draw_pie_chart(&counts.slices(), &format!("Category_{}", counts.group), &path)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Print the distributions, draw one pie chart per country and region, and
/// report the chi-squared p-value between the regions
pub fn run(table: &VideoTable, config: &AnalysisConfig) -> Result<ChiSquaredResult> {
    config.ensure_output_dir()?;
    let by_country = counts_by_country(table);
    println!("{}", format_counts(&by_country));
    for counts in &by_country {
        draw_pie(counts, config)?;
    }

    let by_region = counts_by_region(table);
    println!("{}", format_counts(&by_region));
    for counts in &by_region {
        if counts.total() == 0 {
            log::warn!("No videos in region {}, skipping its pie chart", counts.group);
            continue;
        }
        draw_pie(counts, config)?;
    }

    let result = compare_distributions(&by_region[0], &by_region[1])?;
    println!("p-value {}", result.p_value);
    Ok(result)
}
