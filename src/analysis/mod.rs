//! Reporting routines over a normalized [`VideoTable`](crate::model::VideoTable).
//!
//! Each routine computes its result first (plain functions, no I/O) and its
//! `run` function prints the tables and writes the charts.

pub mod categories;
pub mod overlap;
pub mod ratios;
pub mod restrictions;

use crate::model::{Region, VideoTable};
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct OverviewRow {
    code: String,
    region: String,
    videos: usize,
    distinct_ids: usize,
}

/// Row counts per country and region
pub fn format_overview(table: &VideoTable) -> String {
    let rows: Vec<OverviewRow> = table
        .by_country()
        .into_iter()
        .map(|(code, records)| {
            let mut ids: Vec<&str> = records.iter().map(|r| r.video_id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            OverviewRow {
                code: code.to_string(),
                region: records[0].region.to_string(),
                videos: records.len(),
                distinct_ids: ids.len(),
            }
        })
        .collect();

    let mut per_region: BTreeMap<Region, usize> = BTreeMap::new();
    for record in table {
        *per_region.entry(record.region).or_insert(0) += 1;
    }
    let totals: Vec<String> = Region::REPORT_ORDER
        .iter()
        .map(|r| format!("{}: {}", r, per_region.get(r).copied().unwrap_or(0)))
        .collect();

    format!(
        "{}\nRows: {} ({})",
        Table::new(rows),
        table.len(),
        totals.join(", ")
    )
}

/// Sorted file names in a directory
#[cfg(test)]
pub(crate) fn written_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VideoRecord;

    #[test]
    fn test_format_overview() {
        let table = VideoTable::new(vec![
            VideoRecord::new("US", Region::Western, "v1", "t", "Music"),
            VideoRecord::new("US", Region::Western, "v1", "t", "Music"),
            VideoRecord::new("JP", Region::Asia, "v2", "t", "Music"),
        ]);
        let out = format_overview(&table);
        assert!(out.contains("Rows: 3 (asia: 1, western: 2)"));
        assert!(out.contains("distinct_ids"));
    }
}
