//! One-hot encoding of integer category columns

use std::collections::BTreeSet;

use polars::prelude::*;

/// Distinct non-null values of an integer column, ascending
fn categories(column: &Column) -> PolarsResult<(Vec<Option<i64>>, BTreeSet<i64>)> {
    let cast = column.cast(&DataType::Int64)?;
    let values: Vec<Option<i64>> = cast.i64()?.into_iter().collect();
    let distinct: BTreeSet<i64> = values.iter().flatten().copied().collect();
    Ok((values, distinct))
}

/// Names of the indicator columns `one_hot` would produce, in output order
pub fn one_hot_names(column: &Column, prefix: &str) -> PolarsResult<Vec<String>> {
    let (_, distinct) = categories(column)?;
    Ok(distinct
        .into_iter()
        .map(|value| format!("{}{}", prefix, value))
        .collect())
}

/// Expand an integer category column into 0/1 indicator columns.
///
/// One `UInt8` column named `{prefix}{value}` is emitted per distinct value
/// actually present, in ascending value order. Each non-null row has exactly
/// one indicator set; null rows get zeros everywhere.
///
/// # Arguments
/// * `column` - Integer-typed (or integer-castable) category column
/// * `prefix` - Prefix for the generated column names
pub fn one_hot(column: &Column, prefix: &str) -> PolarsResult<Vec<Column>> {
    let (values, distinct) = categories(column)?;

    let dummies = distinct
        .into_iter()
        .map(|category| {
            let indicator: Vec<u8> = values
                .iter()
                .map(|value| u8::from(*value == Some(category)))
                .collect();
            Column::new(format!("{}{}", prefix, category).into(), indicator)
        })
        .collect();

    Ok(dummies)
}
