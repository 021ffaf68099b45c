//! Assertions over written CSV reports.

use anyhow::{Context, Result};
use std::path::Path;

/// Parsed CSV report: header plus rows, empty fields kept as `""`.
#[derive(Debug)]
pub struct Report {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.header.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }
}

/// Reads a report written by the CLI.
pub fn read_report(path: &Path) -> Result<Report> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Report not written: {}", path.display()))?;

    let header = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.context("Malformed CSV row")?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Report { header, rows })
}

/// Asserts that the report header starts with the fixed gear-run columns.
pub fn assert_base_columns(report: &Report) {
    const BASE: [&str; 8] = [
        "subject",
        "session",
        "gear_name",
        "gear_version",
        "run_label",
        "run_datetime",
        "run_runtime_mins",
        "run_status",
    ];
    assert!(
        report.header.len() >= BASE.len(),
        "header too short: {:?}",
        report.header
    );
    assert_eq!(&report.header[..BASE.len()], &BASE[..]);
}
