//! Shared test utilities and fixture generators

#![allow(dead_code)]

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Write raw CSV lines (header first) into a fresh temp directory
pub fn write_csv(lines: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("counts.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }

    (temp_dir, csv_path)
}

/// Daily series from `start` for `days` days with deterministic counts
pub fn create_daily_series(start: NaiveDate, days: usize) -> DataFrame {
    let dates: Vec<String> = start
        .iter_days()
        .take(days)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let counts: Vec<i64> = (0..days as i64).map(|i| 100 + (i * 37) % 250).collect();

    df! {
        "date" => dates,
        "count" => counts,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Values of the `date` column as calendar dates
pub fn dates_of(df: &DataFrame) -> Vec<NaiveDate> {
    df.column("date")
        .unwrap()
        .cast(&DataType::Int32)
        .unwrap()
        .i32()
        .unwrap()
        .into_no_null_iter()
        .map(|days| NaiveDate::from_num_days_from_ce_opt(days + 719_163).unwrap())
        .collect()
}

pub fn i64_values(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

pub fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

/// Sum of all columns starting with `prefix`, per row
pub fn indicator_row_sums(df: &DataFrame, prefix: &str) -> Vec<i64> {
    let mut sums = vec![0i64; df.height()];
    for name in column_names(df) {
        let suffix = &name[prefix.len().min(name.len())..];
        if name.starts_with(prefix) && suffix.parse::<u32>().is_ok() {
            for (sum, v) in sums.iter_mut().zip(i64_values(df, &name)) {
                *sum += v;
            }
        }
    }
    sums
}

pub fn weekday_index(d: NaiveDate) -> i64 {
    d.weekday().num_days_from_monday() as i64
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
