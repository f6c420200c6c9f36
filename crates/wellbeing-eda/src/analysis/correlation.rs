//! Pairwise-complete Pearson correlation.

use crate::schema::{CGPA, CORRELATION_FEATURES, DIRECTIONAL_FEATURES, has_column, present_columns};
use crate::types::{CorrelationEntry, CorrelationMatrix};
use crate::utils::{numeric_values, pearson, round_to};
use polars::prelude::*;
use tracing::debug;

/// Build the correlation matrix over the feature columns present in `df`.
///
/// Each entry uses only the rows where both columns hold a value. Returns
/// `None` when no feature column is present.
pub(crate) fn correlation_matrix(
    df: &DataFrame,
    decimals: u32,
) -> PolarsResult<Option<CorrelationMatrix>> {
    let labels = present_columns(df, &CORRELATION_FEATURES);
    if labels.is_empty() {
        return Ok(None);
    }

    let columns = labels
        .iter()
        .map(|name| numeric_values(df.column(name)?.as_materialized_series()))
        .collect::<PolarsResult<Vec<_>>>()?;

    let n = labels.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i], &columns[j]).map(|r| round_to(r, decimals));
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!("Correlation matrix over {} columns", n);
    Ok(Some(CorrelationMatrix {
        labels: labels.iter().map(|s| s.to_string()).collect(),
        values,
    }))
}

/// Unrounded coefficient of each directional feature with CGPA, computed on
/// that column pair alone. Empty when CGPA is absent.
pub(crate) fn directional_correlations(df: &DataFrame) -> PolarsResult<Vec<CorrelationEntry>> {
    if !has_column(df, CGPA) {
        return Ok(Vec::new());
    }
    let target = numeric_values(df.column(CGPA)?.as_materialized_series())?;

    let mut entries = Vec::new();
    for (feature, _) in DIRECTIONAL_FEATURES {
        if !has_column(df, feature) {
            continue;
        }
        let values = numeric_values(df.column(feature)?.as_materialized_series())?;
        entries.push(CorrelationEntry {
            feature: feature.to_string(),
            coefficient: pearson(&values, &target),
        });
    }
    Ok(entries)
}
