//! Statistical imputation methods.
//!
//! Missing numeric values are replaced by the column median.

use crate::config::EmptyColumnPolicy;
use crate::error::{EdaError, Result};
use crate::types::{ActionType, CleaningAction};
use polars::prelude::*;
use tracing::{debug, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill every missing entry of a numeric column with its median.
    ///
    /// The median is computed once over the non-missing values before any
    /// row is filled. A column without missing entries is left alone and
    /// yields no action. A column with missing entries and no observed value
    /// fails or is skipped according to `policy`.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        policy: EmptyColumnPolicy,
    ) -> Result<Option<CleaningAction>> {
        let (median_val, series) = {
            let series = df
                .column(col_name)
                .map_err(|_| EdaError::ColumnNotFound(col_name.to_string()))?
                .as_materialized_series();
            if series.null_count() == 0 {
                debug!("'{}' has no missing values", col_name);
                return Ok(None);
            }
            (series.median(), series.clone())
        };

        let missing = series.null_count();
        let Some(median_val) = median_val else {
            return match policy {
                EmptyColumnPolicy::Fail => Err(EdaError::ImputationFailed {
                    column: col_name.to_string(),
                    reason: format!("all {} values are missing, median is undefined", missing),
                }),
                EmptyColumnPolicy::Skip => {
                    warn!(
                        "'{}' has no observed values; leaving {} entries missing",
                        col_name, missing
                    );
                    Ok(Some(
                        CleaningAction::new(
                            ActionType::ImputationSkipped,
                            col_name,
                            format!("No observed values; {} entries left missing", missing),
                        )
                        .with_details("median undefined"),
                    ))
                }
            };
        };

        let filled = Self::fill_with_value(&series, median_val)?;
        df.replace(col_name, filled)?;
        debug!(
            "Filled {} missing values in '{}' with median {}",
            missing, col_name, median_val
        );

        Ok(Some(
            CleaningAction::new(
                ActionType::ValueImputed,
                col_name,
                format!("Filled {} missing values with the column median", missing),
            )
            .with_details(format!("median: {}", median_val)),
        ))
    }

    /// Fill numeric column with a specific value.
    fn fill_with_value(series: &Series, fill_value: f64) -> Result<Series> {
        let values = series.cast(&DataType::Float64)?;
        let filled: Vec<Option<f64>> = values
            .f64()?
            .into_iter()
            .map(|v| Some(v.unwrap_or(fill_value)))
            .collect();
        Ok(Series::new(series.name().clone(), filled))
    }
}
