//! Missing value handling - row-wise null removal

use polars::prelude::*;

/// Turn floating point NaN cells into nulls so they count as missing.
///
/// Only float columns that actually contain NaN are rewritten; they come back
/// as `Float64`.
fn nan_to_null(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut out = df.clone();

    for column in df.get_columns() {
        if !matches!(column.dtype(), DataType::Float32 | DataType::Float64) {
            continue;
        }

        let cast = column.cast(&DataType::Float64)?;
        let values = cast.f64()?;
        if !values.into_iter().any(|v| v.is_some_and(f64::is_nan)) {
            continue;
        }

        let cleaned: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        out.with_column(Column::new(column.name().clone(), cleaned))?;
    }

    Ok(out)
}

/// Drop every row that has a null (or NaN) in any column.
///
/// Row order of the surviving rows is preserved.
///
/// # Returns
/// The filtered DataFrame and the number of rows removed
pub fn drop_missing_rows(df: &DataFrame) -> PolarsResult<(DataFrame, usize)> {
    let filtered = nan_to_null(df)?.lazy().drop_nulls(None).collect()?;
    let dropped = df.height() - filtered.height();
    Ok((filtered, dropped))
}

/// Count rows that `drop_missing_rows` would remove
pub fn count_missing_rows(df: &DataFrame) -> PolarsResult<usize> {
    drop_missing_rows(df).map(|(_, dropped)| dropped)
}

/// Null count per column, in column order
pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|c| (c.name().to_string(), c.null_count()))
        .collect()
}
