//! Run summary and CSV export.

use crate::aggregate::EnrichedRecord;
use crate::search::SearchQuery;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};

/// Human-readable end-of-run summary
pub struct Summary<'a> {
    pub query: &'a SearchQuery,
    pub record_count: usize,
    pub errored: bool,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errored {
            writeln!(f, "Finished with errors!")?;
        } else {
            writeln!(f, "Finished!")?;
        }
        writeln!(f, "-------Results-------")?;
        writeln!(f, "Search Term: {}", self.query.term)?;
        if let Some(after) = &self.query.after {
            writeln!(f, "After Date: {after}")?;
        }
        if let Some(before) = &self.query.before {
            writeln!(f, "Before Date: {before}")?;
        }
        write!(f, "Number of results: {}", self.record_count)
    }
}

/// Report file name for a given moment, e.g. `2024-03-09 141502.csv`
pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("{}.csv", now.format("%Y-%m-%d %H%M%S"))
}

/// Write `records` to a timestamped CSV file in `dir`.
///
/// Nothing is written for an empty slice and `Ok(None)` is returned.
pub fn save_csv(records: &[EnrichedRecord], dir: &Path) -> Result<Option<PathBuf>> {
    save_csv_at(records, dir, Local::now())
}

/// Same as [`save_csv`] with an explicit timestamp for the file name
pub fn save_csv_at(
    records: &[EnrichedRecord],
    dir: &Path,
    now: DateTime<Local>,
) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        tracing::debug!("no records, skipping csv export");
        return Ok(None);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = dir.join(report_file_name(now));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;

    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record: {}", record.url))?;
    }
    writer.flush().context("Failed to flush report file")?;

    tracing::info!(path = %path.display(), records = records.len(), "report written");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_file_name_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 15, 2).unwrap();
        assert_eq!(report_file_name(now), "2024-03-09 141502.csv");
    }

    #[test]
    fn test_summary_without_bounds() {
        let query = SearchQuery::new("test", None, None).unwrap();
        let summary = Summary {
            query: &query,
            record_count: 2,
            errored: false,
        };
        assert_eq!(
            summary.to_string(),
            "Finished!\n-------Results-------\nSearch Term: test\nNumber of results: 2"
        );
    }

    #[test]
    fn test_summary_with_bounds_and_error() {
        let query = SearchQuery::new("test", Some("2022-01-01"), Some("2022-02-01")).unwrap();
        let text = Summary {
            query: &query,
            record_count: 0,
            errored: true,
        }
        .to_string();

        assert!(text.starts_with("Finished with errors!"));
        assert!(text.contains("After Date: 2022-01-01T00:00:00Z"));
        assert!(text.contains("Before Date: 2022-02-01T00:00:00Z"));
        assert!(text.ends_with("Number of results: 0"));
    }
}
