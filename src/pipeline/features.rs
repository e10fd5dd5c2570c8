//! Calendar feature construction for daily count series
//!
//! Turns a raw `date`/`count` table into a modeling table:
//! 1. Drop rows with any null
//! 2. Parse dates and derive position, weekday, month and holiday flag
//! 3. One-hot encode month and weekday
//! 4. Log-transform the count and drop helper columns
//! 5. Drop rows with any null again

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

use super::calendar::UsFederalHolidayCalendar;
use super::encoding::one_hot;
use super::error::FeatureError;
use super::loader::load_dataset;
use super::missing::{drop_missing_rows, null_counts};

pub const DATE_COLUMN: &str = "date";
pub const COUNT_COLUMN: &str = "count";
pub const AGE_COLUMN: &str = "age";
pub const MONTH_COLUMN: &str = "month";
pub const DAY_COLUMN: &str = "day";
pub const HOLIDAY_COLUMN: &str = "holiday";

/// Columns of the intermediate table, in order
pub const INTERMEDIATE_COLUMNS: [&str; 6] = [
    DATE_COLUMN,
    COUNT_COLUMN,
    AGE_COLUMN,
    MONTH_COLUMN,
    DAY_COLUMN,
    HOLIDAY_COLUMN,
];

/// Days from 0001-01-01 to 1970-01-01
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Bookkeeping gathered while building features
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStats {
    pub rows_loaded: usize,
    pub source_columns: Vec<String>,
    pub source_null_counts: Vec<(String, usize)>,
    /// Rows removed by the null pass before feature derivation
    pub rows_dropped_missing: usize,
    /// Rows removed by the null pass after feature derivation
    pub rows_dropped_final: usize,
    pub rows_output: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Federal holidays observed between the first and last date
    pub holidays_in_range: Vec<NaiveDate>,
    /// Rows flagged as holidays
    pub holiday_rows: usize,
    pub month_columns: Vec<String>,
    pub day_columns: Vec<String>,
}

/// Builds the calendar feature table from a daily count series
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    calendar: UsFederalHolidayCalendar,
    infer_schema_length: usize,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self {
            calendar: UsFederalHolidayCalendar::new(),
            infer_schema_length: 10_000,
        }
    }

    /// Rows used for CSV schema inference; 0 scans the whole file
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn calendar(&self) -> &UsFederalHolidayCalendar {
        &self.calendar
    }

    /// Load the raw source table
    pub fn load(&self, source: &Path) -> Result<DataFrame> {
        load_dataset(source, self.infer_schema_length)
    }

    /// Load `source` and build the output feature table
    pub fn build(&self, source: &Path) -> Result<DataFrame> {
        self.build_with_stats(source).map(|(df, _)| df)
    }

    /// Load `source` and build the output feature table, with run statistics
    pub fn build_with_stats(&self, source: &Path) -> Result<(DataFrame, BuildStats)> {
        let raw = self.load(source)?;
        Ok(self.build_frame(&raw)?)
    }

    /// Build the output feature table from an already loaded raw table
    pub fn build_frame(&self, raw: &DataFrame) -> Result<(DataFrame, BuildStats), FeatureError> {
        let mut stats = BuildStats::default();
        let intermediate = self.derive_into(raw, &mut stats)?;
        let output = self.expand_into(&intermediate, &mut stats)?;
        Ok((output, stats))
    }

    /// Null-filter the raw table and derive the intermediate columns
    /// `date`, `count`, `age`, `month`, `day`, `holiday`.
    ///
    /// Any other source column is dropped here.
    pub fn derive(&self, raw: &DataFrame) -> Result<DataFrame, FeatureError> {
        self.derive_into(raw, &mut BuildStats::default())
    }

    /// One-hot encode month and weekday, log-transform the count and drop
    /// the helper columns.
    pub fn expand(&self, intermediate: &DataFrame) -> Result<DataFrame, FeatureError> {
        self.expand_into(intermediate, &mut BuildStats::default())
    }

    fn derive_into(&self, raw: &DataFrame, stats: &mut BuildStats) -> Result<DataFrame, FeatureError> {
        require_columns(raw, &[DATE_COLUMN, COUNT_COLUMN])?;

        stats.rows_loaded = raw.height();
        stats.source_columns = raw
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        stats.source_null_counts = null_counts(raw);

        let (df, dropped) = drop_missing_rows(raw)?;
        stats.rows_dropped_missing = dropped;

        let dates = parse_dates(df.column(DATE_COLUMN)?)?;
        let counts = numeric_counts(df.column(COUNT_COLUMN)?)?;

        // Position after null removal, not elapsed time
        let age: Vec<i64> = (0..dates.len() as i64).collect();
        let day: Vec<i32> = dates
            .iter()
            .map(|d| d.weekday().num_days_from_monday() as i32)
            .collect();
        let month: Vec<i32> = dates.iter().map(|d| d.month() as i32).collect();

        stats.first_date = dates.iter().min().copied();
        stats.last_date = dates.iter().max().copied();
        let holidays = match (stats.first_date, stats.last_date) {
            (Some(first), Some(last)) => self.calendar.holidays(first, last),
            _ => BTreeSet::new(),
        };
        stats.holidays_in_range = holidays.iter().copied().collect();

        let holiday: Vec<i64> = dates
            .iter()
            .map(|d| i64::from(holidays.contains(d)))
            .collect();
        stats.holiday_rows = holiday.iter().filter(|&&h| h == 1).count();

        let df = DataFrame::new(vec![
            date_column(&dates)?,
            Column::new(COUNT_COLUMN.into(), counts),
            Column::new(AGE_COLUMN.into(), age),
            Column::new(MONTH_COLUMN.into(), month),
            Column::new(DAY_COLUMN.into(), day),
            Column::new(HOLIDAY_COLUMN.into(), holiday),
        ])?;

        Ok(df)
    }

    fn expand_into(
        &self,
        intermediate: &DataFrame,
        stats: &mut BuildStats,
    ) -> Result<DataFrame, FeatureError> {
        require_columns(intermediate, &INTERMEDIATE_COLUMNS)?;

        let month_dummies = one_hot(intermediate.column(MONTH_COLUMN)?, MONTH_COLUMN)?;
        let day_dummies = one_hot(intermediate.column(DAY_COLUMN)?, DAY_COLUMN)?;
        stats.month_columns = month_dummies.iter().map(|c| c.name().to_string()).collect();
        stats.day_columns = day_dummies.iter().map(|c| c.name().to_string()).collect();

        let mut columns: Vec<Column> = intermediate.get_columns().to_vec();
        columns.extend(month_dummies);
        columns.extend(day_dummies);
        let mut df = DataFrame::new(columns)?;

        let log_count = log1p_counts(df.column(COUNT_COLUMN)?)?;
        df.with_column(log_count)?;

        let df = df.drop_many([AGE_COLUMN, MONTH_COLUMN, DAY_COLUMN]);

        let (df, dropped) = drop_missing_rows(&df)?;
        stats.rows_dropped_final = dropped;
        stats.rows_output = df.height();

        Ok(df)
    }
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), FeatureError> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    match required.iter().find(|name| !available.iter().any(|a| a == *name)) {
        Some(missing) => Err(FeatureError::MissingColumn {
            column: missing.to_string(),
            available,
        }),
        None => Ok(()),
    }
}

/// Parse a single date cell.
///
/// Accepts ISO, slash-separated and compact `YYYYMMDD` dates, plus
/// date-times whose time part is discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year = value[0..4].parse().ok()?;
        let month = value[4..6].parse().ok()?;
        let day = value[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

fn epoch_days(date: &NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

fn parse_dates(column: &Column) -> Result<Vec<NaiveDate>, FeatureError> {
    let dtype = column.dtype().clone();

    match dtype {
        DataType::Date | DataType::Datetime(_, _) => {
            let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    v.and_then(date_from_epoch_days)
                        .ok_or_else(|| FeatureError::InvalidDate {
                            row,
                            value: v.map_or_else(|| "null".to_string(), |d| d.to_string()),
                        })
                })
                .collect()
        }
        DataType::String => parse_date_strings(column),
        dt if dt.is_integer() => parse_date_strings(&column.cast(&DataType::String)?),
        other => Err(FeatureError::UnsupportedDateType {
            column: column.name().to_string(),
            dtype: other.to_string(),
        }),
    }
}

fn parse_date_strings(column: &Column) -> Result<Vec<NaiveDate>, FeatureError> {
    column
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.and_then(parse_date).ok_or_else(|| FeatureError::InvalidDate {
                row,
                value: v.unwrap_or("null").to_string(),
            })
        })
        .collect()
}

fn date_column(dates: &[NaiveDate]) -> PolarsResult<Column> {
    let days: Vec<i32> = dates.iter().map(epoch_days).collect();
    Column::new(DATE_COLUMN.into(), days).cast(&DataType::Date)
}

fn numeric_counts(column: &Column) -> Result<Vec<f64>, FeatureError> {
    let invalid = |reason: String| FeatureError::InvalidCount {
        column: column.name().to_string(),
        reason,
    };

    let values = column
        .as_materialized_series()
        .strict_cast(&DataType::Float64)
        .map_err(|e| invalid(e.to_string()))?;

    values
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| invalid(format!("null value in row {}", row))))
        .collect()
}

/// `ln(1 + count)` per row; a non-finite result is an error
fn log1p_counts(column: &Column) -> Result<Column, FeatureError> {
    let counts = column.cast(&DataType::Float64)?;

    let transformed = counts
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(value) => {
                let log = value.ln_1p();
                if log.is_finite() {
                    Ok(Some(log))
                } else {
                    Err(FeatureError::InvalidLogCount { row, value })
                }
            }
            None => Ok(None),
        })
        .collect::<Result<Vec<Option<f64>>, FeatureError>>()?;

    Ok(Column::new(column.name().clone(), transformed))
}
