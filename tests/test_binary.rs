//! End-to-end tests running the dayfeat binary

use assert_cmd::Command;
use polars::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn dayfeat() -> Command {
    Command::cargo_bin("dayfeat").unwrap()
}

fn read_parquet(path: &std::path::Path) -> DataFrame {
    LazyFrame::scan_parquet(path, Default::default())
        .unwrap()
        .collect()
        .unwrap()
}

#[test]
fn test_builds_and_writes_parquet() {
    let (temp_dir, csv_path) = write_csv(&["date,count", "2016-01-01,10", "2016-01-04,20"]);
    let output = temp_dir.path().join("processed").join("features.parquet");

    dayfeat()
        .arg("--data_path")
        .arg(&csv_path)
        .arg("--output_path")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Feature build complete"));

    let df = read_parquet(&output);
    assert_eq!(
        column_names(&df),
        vec!["date", "count", "holiday", "month1", "day0", "day4"]
    );
    assert_eq!(i64_values(&df, "holiday"), vec![1, 0]);
}

#[test]
fn test_default_paths_relative_to_working_dir() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir(temp_dir.path().join("raw")).unwrap();
    let mut raw = create_daily_series(date(2011, 1, 1), 40);
    let mut file = std::fs::File::create(temp_dir.path().join("raw/github_dau_2011-2018.csv")).unwrap();
    CsvWriter::new(&mut file).finish(&mut raw).unwrap();
    drop(file);

    dayfeat()
        .current_dir(temp_dir.path())
        .arg("--quiet")
        .assert()
        .success();

    let output = temp_dir.path().join("processed/github_dau_2011-2018.parquet");
    assert!(output.exists(), "Default output should be created");
    assert_eq!(read_parquet(&output).height(), 40);
}

#[test]
fn test_missing_input_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.csv");
    let output_dir = temp_dir.path().join("processed");
    let output = output_dir.join("features.parquet");

    dayfeat()
        .arg("--data_path")
        .arg(&missing)
        .arg("--output_path")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!output.exists());
    assert!(!output_dir.exists(), "Output directory should not be created on failure");
}

#[test]
fn test_invalid_date_fails_without_output() {
    let (temp_dir, csv_path) = write_csv(&["date,count", "2016-01-01,10", "someday,20"]);
    let output = temp_dir.path().join("out").join("features.parquet");

    dayfeat()
        .arg("-d")
        .arg(&csv_path)
        .arg("-o")
        .arg(&output)
        .arg("-q")
        .assert()
        .failure()
        .stderr(predicate::str::contains("someday"));

    assert!(!output.exists());
}

#[test]
fn test_missing_column_reports_schema_error() {
    let (temp_dir, csv_path) = write_csv(&["day,count", "2016-01-01,10"]);
    let output = temp_dir.path().join("features.parquet");

    dayfeat()
        .arg("-d")
        .arg(&csv_path)
        .arg("-o")
        .arg(&output)
        .arg("-q")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Required column 'date'"));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let mut raw = create_daily_series(date(2014, 6, 1), 400);
    let (temp_dir, csv_path) = create_temp_csv(&mut raw);
    let first = temp_dir.path().join("first.parquet");
    let second = temp_dir.path().join("second.parquet");

    for output in [&first, &second] {
        dayfeat()
            .arg("-d")
            .arg(&csv_path)
            .arg("-o")
            .arg(output)
            .arg("-q")
            .assert()
            .success();
    }

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_csv_output_and_manifest() {
    let (temp_dir, csv_path) = write_csv(&[
        "date,count",
        "2016-11-23,5",
        "2016-11-24,",
        "2016-11-24,7",
        "2016-11-25,8",
    ]);
    let output = temp_dir.path().join("features.csv");
    let manifest = temp_dir.path().join("reports").join("manifest.json");

    dayfeat()
        .arg("-d")
        .arg(&csv_path)
        .arg("-o")
        .arg(&output)
        .arg("--manifest_path")
        .arg(&manifest)
        .arg("-q")
        .assert()
        .success();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("date,count,holiday,month11,day2,day3,day4"));
    assert_eq!(text.lines().count(), 4);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(json["summary"]["rows_loaded"], 4);
    assert_eq!(json["summary"]["rows_dropped_missing"], 1);
    assert_eq!(json["summary"]["rows_output"], 3);
    assert_eq!(json["summary"]["holiday_rows"], 1);
    assert_eq!(json["holidays"][0]["date"], "2016-11-24");
    assert_eq!(json["holidays"][0]["name"], "Thanksgiving Day");

    let columns: Vec<&str> = json["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        columns,
        vec!["date", "count", "holiday", "month11", "day2", "day3", "day4"]
    );
}
