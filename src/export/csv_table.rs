use crate::error::Result;
use crate::model::{Region, VideoRecord, VideoTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// One line of the exported table. The first column is the row index and
/// has an empty header.
#[derive(Debug, Serialize, Deserialize)]
struct TableRow {
    #[serde(rename = "")]
    index: usize,
    code: String,
    region: String,
    id: String,
    title: String,
    restricted: usize,
    category: String,
    ratio_dislike_like: Option<f64>,
    ratio_like_view: Option<f64>,
}

impl TableRow {
    fn from_record(index: usize, record: &VideoRecord) -> Self {
        Self {
            index,
            code: record.country_code.clone(),
            region: record.region.to_string(),
            id: record.video_id.clone(),
            title: record.title.clone(),
            restricted: record.restricted_count,
            category: record.category.clone(),
            ratio_dislike_like: record.dislike_like_ratio,
            ratio_like_view: record.like_view_ratio,
        }
    }

    fn into_record(self) -> Result<VideoRecord> {
        let region: Region = self.region.parse()?;
        Ok(VideoRecord::new(self.code, region, self.id, self.title, self.category)
            .with_restricted(self.restricted)
            .with_ratios(self.ratio_dislike_like, self.ratio_like_view))
    }
}

/// Write the table as CSV to any writer
pub fn write_table<W: Write>(table: &VideoTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, record) in table.iter().enumerate() {
        csv_writer.serialize(TableRow::from_record(index, record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the table to a CSV file, creating parent directories as needed
pub fn write_table_csv(table: &VideoTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    write_table(table, file)?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Read a table previously written by [`write_table`]
pub fn read_table<R: Read>(reader: R) -> Result<VideoTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let row: TableRow = row?;
        records.push(row.into_record()?);
    }
    Ok(VideoTable::new(records))
}

/// Read an exported table from a CSV file
pub fn read_table_csv(path: &Path) -> Result<VideoTable> {
    let file = fs::File::open(path)?;
    let table = read_table(file)?;
    log::info!("Loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;

    fn sample() -> VideoTable {
        VideoTable::new(vec![
            VideoRecord::new("US", Region::Western, "v1", "Plain title", "Music")
                .with_restricted(3)
                .with_ratios(Some(0.0125), Some(0.04)),
            VideoRecord::new("JP", Region::Asia, "v2", "Comma, \"quotes\" and 日本語", "Gaming")
                .with_ratios(None, Some(1.0 / 3.0)),
            VideoRecord::new("KR", Region::Asia, "v3", "Line\nbreak", "Entertainment"),
        ])
    }

    #[test]
    fn test_header_and_missing_fields() {
        let mut out = Vec::new();
        write_table(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some(",code,region,id,title,restricted,category,ratio_dislike_like,ratio_like_view")
        );
        assert_eq!(lines.next(), Some("0,US,western,v1,Plain title,3,Music,0.0125,0.04"));
        assert!(text.ends_with("2,KR,asia,v3,\"Line\nbreak\",0,Entertainment,,\n"));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("video_df.csv");
        let table = sample();

        write_table_csv(&table, &path).unwrap();
        let restored = read_table_csv(&path).unwrap();

        assert_eq!(restored.len(), table.len());
        for (a, b) in table.iter().zip(restored.iter()) {
            assert_eq!(a.country_code, b.country_code);
            assert_eq!(a.region, b.region);
            assert_eq!(a.video_id, b.video_id);
            assert_eq!(a.title, b.title);
            assert_eq!(a.restricted_count, b.restricted_count);
            assert_eq!(a.category, b.category);
            for (x, y) in [
                (a.dislike_like_ratio, b.dislike_like_ratio),
                (a.like_view_ratio, b.like_view_ratio),
            ] {
                match (x, y) {
                    (Some(x), Some(y)) => assert!((x - y).abs() < 1e-12),
                    (None, None) => {}
                    other => panic!("ratio mismatch: {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_read_rejects_unknown_region() {
        let csv = ",code,region,id,title,restricted,category,ratio_dislike_like,ratio_like_view\n\
                   0,US,mars,v1,t,0,Music,,\n";
        let err = read_table(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidRegion(_)));
    }

    #[test]
    fn test_empty_table_roundtrip() {
        let mut out = Vec::new();
        write_table(&VideoTable::default(), &mut out).unwrap();
        let restored = read_table(out.as_slice()).unwrap();
        assert!(restored.is_empty());
    }
}
