//! Missing-marker handling applied right after parsing.

use polars::prelude::*;
use tracing::debug;

/// Cell texts read as missing values.
pub(crate) const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Check if a raw cell is a missing marker. Matching is exact: no trimming,
/// no case folding.
#[inline]
pub(crate) fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

/// Turn missing markers in every string column into nulls.
///
/// Float columns get the same treatment: a `NaN` token in an otherwise
/// numeric column is parsed as a float NaN, which becomes null here.
/// Returns the table and the number of cells replaced.
pub(crate) fn replace_missing_markers(df: DataFrame) -> PolarsResult<(DataFrame, usize)> {
    let mut df = df;
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut total_replacements = 0;

    for col_name in &column_names {
        let replaced = {
            let series = df.column(col_name)?.as_materialized_series();
            match series.dtype() {
                DataType::String => replace_markers_in_series(series)?,
                DataType::Float32 | DataType::Float64 => replace_nan_in_series(series)?,
                _ => continue,
            }
        };
        if let Some((cleaned, count)) = replaced {
            total_replacements += count;
            df.replace(col_name, cleaned)?;
        }
    }

    if total_replacements > 0 {
        debug!("Read {} missing-marker cells as null", total_replacements);
    }

    Ok((df, total_replacements))
}

/// Replace markers in one string series; `None` when nothing matched.
fn replace_markers_in_series(series: &Series) -> PolarsResult<Option<(Series, usize)>> {
    let str_series = series.str()?;
    let mut cleaned_values: Vec<Option<&str>> = Vec::with_capacity(str_series.len());
    let mut replacement_count = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) if is_missing_marker(val) => {
                cleaned_values.push(None);
                replacement_count += 1;
            }
            other => cleaned_values.push(other),
        }
    }

    if replacement_count == 0 {
        return Ok(None);
    }

    Ok(Some((
        Series::new(series.name().clone(), cleaned_values),
        replacement_count,
    )))
}

/// Replace float NaN with null; `None` when the series holds no NaN.
fn replace_nan_in_series(series: &Series) -> PolarsResult<Option<(Series, usize)>> {
    let (cleaned, replacement_count) = match series.dtype() {
        DataType::Float32 => {
            let values: Vec<Option<f32>> = series.f32()?.into_iter().collect();
            let count = values.iter().flatten().filter(|v| v.is_nan()).count();
            let values: Vec<Option<f32>> =
                values.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect();
            (Series::new(series.name().clone(), values), count)
        }
        _ => {
            let values: Vec<Option<f64>> = series.f64()?.into_iter().collect();
            let count = values.iter().flatten().filter(|v| v.is_nan()).count();
            let values: Vec<Option<f64>> =
                values.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect();
            (Series::new(series.name().clone(), values), count)
        }
    };

    if replacement_count == 0 {
        return Ok(None);
    }
    Ok(Some((cleaned, replacement_count)))
}
