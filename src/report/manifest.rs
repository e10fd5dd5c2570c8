//! Run manifest export
//!
//! Writes a JSON description of a feature build next to the output table so
//! downstream modeling code knows which indicator columns exist and which
//! dates were flagged.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::pipeline::{BuildStats, UsFederalHolidayCalendar};

/// Metadata about the run
#[derive(Debug, Serialize)]
pub struct ManifestMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    /// Dayfeat version
    pub dayfeat_version: String,
    pub input_file: String,
    pub output_file: String,
}

/// Row and date statistics of the run
#[derive(Debug, Serialize)]
pub struct ManifestSummary {
    pub rows_loaded: usize,
    pub rows_dropped_missing: usize,
    pub rows_dropped_final: usize,
    pub rows_output: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_date: Option<String>,
    pub holiday_rows: usize,
}

/// An output column and its polars dtype
#[derive(Debug, Serialize)]
pub struct ManifestColumn {
    pub name: String,
    pub dtype: String,
}

/// An observed federal holiday inside the data range
#[derive(Debug, Serialize)]
pub struct ManifestHoliday {
    pub date: String,
    pub name: String,
}

/// Complete manifest of a feature build
#[derive(Debug, Serialize)]
pub struct RunManifest {
    pub metadata: ManifestMetadata,
    pub summary: ManifestSummary,
    pub columns: Vec<ManifestColumn>,
    pub holidays: Vec<ManifestHoliday>,
}

impl RunManifest {
    pub fn new(
        input: &Path,
        output: &Path,
        df: &DataFrame,
        stats: &BuildStats,
        calendar: &UsFederalHolidayCalendar,
    ) -> Self {
        let columns = df
            .get_columns()
            .iter()
            .map(|c| ManifestColumn {
                name: c.name().to_string(),
                dtype: c.dtype().to_string(),
            })
            .collect();

        let holidays = match (stats.first_date, stats.last_date) {
            (Some(first), Some(last)) => calendar
                .observed(first, last)
                .into_iter()
                .map(|(date, name)| ManifestHoliday {
                    date: date.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            metadata: ManifestMetadata {
                timestamp: Utc::now().to_rfc3339(),
                dayfeat_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input.display().to_string(),
                output_file: output.display().to_string(),
            },
            summary: ManifestSummary {
                rows_loaded: stats.rows_loaded,
                rows_dropped_missing: stats.rows_dropped_missing,
                rows_dropped_final: stats.rows_dropped_final,
                rows_output: stats.rows_output,
                first_date: stats.first_date.map(|d| d.to_string()),
                last_date: stats.last_date.map(|d| d.to_string()),
                holiday_rows: stats.holiday_rows,
            },
            columns,
            holidays,
        }
    }

    /// Write the manifest as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
        Ok(())
    }
}
