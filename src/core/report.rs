// src/core/report.rs

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{error, info};

use crate::core::models::Report;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serializes the report as JSON with two-space indentation.
pub fn to_pretty_json(report: &Report) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// `digital_sleuth_report_{target}_{YYYYMMDD_HHMMSS}.json`
pub fn file_name(target: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "digital_sleuth_report_{}_{}.json",
        target,
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Writes the report to `dir`, named after the target and the current local time.
pub fn save(report: &Report, target: &str, dir: &Path) -> Result<PathBuf, ReportError> {
    save_at(report, target, dir, Local::now().naive_local())
}

fn save_at(
    report: &Report,
    target: &str,
    dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<PathBuf, ReportError> {
    let json = to_pretty_json(report)?;
    let path = dir.join(file_name(target, timestamp));
    std::fs::write(&path, json).map_err(|source| {
        error!(path = %path.display(), error = %source, "Failed to write report.");
        ReportError::Io { path: path.clone(), source }
    })?;
    info!(path = %path.display(), "Report saved.");
    Ok(path)
}
