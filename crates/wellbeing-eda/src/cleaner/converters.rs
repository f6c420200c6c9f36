//! Type conversion functions for data cleaning.

use crate::utils::numeric_values;
use polars::prelude::*;

/// Convert a column to Float64.
///
/// Text cells are parsed after trimming; anything unparsable becomes missing.
/// Returns the converted series and the number of present cells that could
/// not be converted.
pub(crate) fn coerce_to_float(series: &Series) -> PolarsResult<(Series, usize)> {
    let values = numeric_values(series)?;
    let before_missing = series.null_count();
    let after_missing = values.iter().filter(|v| v.is_none()).count();

    let converted = Series::new(series.name().clone(), values);
    Ok((converted, after_missing.saturating_sub(before_missing)))
}
