//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "raw/github_dau_2011-2018.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "processed/github_dau_2011-2018.parquet";

/// Dayfeat - Build calendar features (weekday, month, US federal holidays) from daily counts
#[derive(Parser, Debug)]
#[command(name = "dayfeat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input table (CSV or Parquet) with `date` and `count` columns
    #[arg(
        short,
        long = "data_path",
        visible_alias = "data-path",
        default_value = DEFAULT_DATA_PATH
    )]
    pub data_path: PathBuf,

    /// Output table path (Parquet or CSV, determined by extension).
    /// Missing parent directories are created.
    #[arg(
        short,
        long = "output_path",
        visible_alias = "output-path",
        default_value = DEFAULT_OUTPUT_PATH,
        value_parser = validate_output_path
    )]
    pub output_path: PathBuf,

    /// Optional JSON manifest describing the run (columns, row counts, holidays)
    #[arg(long = "manifest_path", visible_alias = "manifest-path")]
    pub manifest_path: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Suppress the banner, progress spinners and summary table
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Directory the output table is written into, if the path has one
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Validator for output_path: the extension decides the format
fn validate_output_path(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "parquet" | "pq" | "csv" => Ok(path),
        _ => Err(format!(
            "'{}' has unsupported extension '{}'. Supported formats: parquet, csv",
            s, extension
        )),
    }
}
