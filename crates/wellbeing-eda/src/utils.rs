//! Shared utilities for the analysis pipeline.
//!
//! This module contains the small numeric and text helpers used by several
//! stages so that parsing, rounding and summary statistics behave the same
//! everywhere.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// String Utilities
// =============================================================================

/// Parse a cell as a float. Unparsable text and NaN both yield `None`.
///
/// # Example
///
/// ```rust,ignore
/// use wellbeing_eda::utils::parse_float;
///
/// assert_eq!(parse_float(" 7.5 "), Some(7.5));
/// assert_eq!(parse_float("seven"), None);
/// ```
pub fn parse_float(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Title-case a label: the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased.
///
/// `"low"` and `"LOW"` become `"Low"`, `"medium-high"` becomes `"Medium-High"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}

// =============================================================================
// Series Utilities
// =============================================================================

/// Read a series as optional floats.
///
/// String cells are parsed with [`parse_float`], numeric and boolean columns
/// are cast, NaN becomes `None`. Columns of any other type yield all `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_float))
            .collect()),
        dtype if is_numeric_dtype(dtype) || matches!(dtype, DataType::Boolean) => {
            let cast = series.cast(&DataType::Float64)?;
            Ok(cast
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect())
        }
        _ => Ok(vec![None; series.len()]),
    }
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Round to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Pearson correlation over the rows where both inputs are present.
///
/// Returns `None` when fewer than two complete pairs exist or either side
/// has zero variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}
