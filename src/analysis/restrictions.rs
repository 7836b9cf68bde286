//! Regional restriction counts per video and per country.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::model::{VideoRecord, VideoTable};
use crate::plots::{self, ChartLabels};
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

pub const CHART_FILE: &str = "restriction_by_country.png";

#[derive(Tabled)]
struct RestrictedVideoRow {
    code: String,
    title: String,
    restricted: usize,
}

#[derive(Tabled)]
struct CountryTotalRow {
    code: String,
    sum: usize,
}

/// Videos ordered by restriction count, most restricted first
pub fn most_restricted(table: &VideoTable) -> Vec<&VideoRecord> {
    let mut rows: Vec<&VideoRecord> = table.iter().collect();
    rows.sort_by(|a, b| b.restricted_count.cmp(&a.restricted_count));
    rows
}

/// Total restriction count per country, largest first (ties by code)
pub fn totals_by_country(table: &VideoTable) -> Vec<(String, usize)> {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for record in table {
        *totals.entry(record.country_code.as_str()).or_insert(0) += record.restricted_count;
    }
    let mut totals: Vec<(String, usize)> =
        totals.into_iter().map(|(code, sum)| (code.to_string(), sum)).collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

pub fn format_videos(rows: &[&VideoRecord]) -> String {
    let rows: Vec<RestrictedVideoRow> = rows
        .iter()
        .map(|r| RestrictedVideoRow {
            code: r.country_code.clone(),
            title: r.title.clone(),
            restricted: r.restricted_count,
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn format_totals(totals: &[(String, usize)]) -> String {
    let rows: Vec<CountryTotalRow> = totals
        .iter()
        .map(|(code, sum)| CountryTotalRow {
            code: code.clone(),
            sum: *sum,
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn run(table: &VideoTable, config: &AnalysisConfig) -> Result<Vec<(String, usize)>> {
    config.ensure_output_dir()?;
    println!("{}", format_videos(&most_restricted(table)));

    let totals = totals_by_country(table);
    println!("{}", format_totals(&totals));
    if totals.is_empty() {
        log::warn!("No videos in the table, skipping {}", CHART_FILE);
        return Ok(totals);
    }

    let bars: Vec<(String, f64)> = totals.iter().map(|(c, n)| (c.clone(), *n as f64)).collect();
    let path = config.artifact(CHART_FILE);
    plots::draw_bar_chart(
        &bars,
        ChartLabels {
            title: "Total Number of Restricted Countries that Each Video Has",
            x_label: "country",
            y_label: "total number of restricted",
        },
        &path,
    )?;
    log::info!("Wrote {}", path.display());
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Region;

    fn sample() -> VideoTable {
        VideoTable::new(vec![
            VideoRecord::new("US", Region::Western, "v1", "first", "Music").with_restricted(2),
            VideoRecord::new("JP", Region::Asia, "v2", "second", "Music").with_restricted(5),
            VideoRecord::new("US", Region::Western, "v3", "third", "Music").with_restricted(3),
            VideoRecord::new("CA", Region::Western, "v4", "fourth", "Music"),
            VideoRecord::new("FR", Region::Western, "v5", "fifth", "Music").with_restricted(5),
        ])
    }

    #[test]
    fn test_most_restricted_order() {
        let table = sample();
        let titles: Vec<&str> = most_restricted(&table).iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "fifth", "third", "first", "fourth"]);
    }

    #[test]
    fn test_totals_by_country() {
        let totals = totals_by_country(&sample());
        assert_eq!(
            totals,
            vec![
                ("FR".to_string(), 5),
                ("JP".to_string(), 5),
                ("US".to_string(), 5),
                ("CA".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_run_writes_chart() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts");
        let config = AnalysisConfig::default().with_output_dir(&out);

        let totals = run(&sample(), &config).unwrap();
        assert_eq!(totals.len(), 4);
        assert_eq!(crate::analysis::written_files(&out), vec![CHART_FILE]);
    }

    #[test]
    fn test_empty_table() {
        assert!(totals_by_country(&VideoTable::default()).is_empty());
        assert!(most_restricted(&VideoTable::default()).is_empty());
    }
}
