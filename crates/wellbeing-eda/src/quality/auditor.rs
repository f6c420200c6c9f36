use crate::config::EdaConfig;
use crate::error::Result;
use crate::schema::{ColumnRange, STUDENT_ID, has_column};
use crate::types::{AuditReport, ColumnInfo, ColumnMissingness, RangeViolation, TablePreview};
use crate::utils::{numeric_values, round_to};
use polars::prelude::*;
use tracing::{debug, info};

pub struct DataAuditor;

impl DataAuditor {
    /// Run every check and bundle the findings. The table is never modified.
    pub fn audit(df: &DataFrame, config: &EdaConfig) -> Result<AuditReport> {
        info!("Auditing {} rows x {} columns", df.height(), df.width());

        let id_duplicates = if has_column(df, STUDENT_ID) {
            Some(Self::duplicate_count(df, Some([STUDENT_ID].as_slice()))?)
        } else {
            None
        };

        let report = AuditReport {
            shape: Self::shape(df),
            columns: Self::column_info(df),
            head: Self::head(df, config.head_rows)?,
            missingness: Self::missingness(df),
            exact_duplicates: Self::duplicate_count(df, None)?,
            id_duplicates,
            range_violations: Self::range_violations(df, &config.numeric_ranges)?,
        };

        debug!(
            "Audit found {} exact duplicates, {} range violation groups",
            report.exact_duplicates,
            report.range_violations.len()
        );
        Ok(report)
    }

    /// (rows, columns)
    pub fn shape(df: &DataFrame) -> (usize, usize) {
        df.shape()
    }

    pub fn column_info(df: &DataFrame) -> Vec<ColumnInfo> {
        df.get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                non_null: col.len() - col.null_count(),
            })
            .collect()
    }

    /// First `n` rows rendered as text. Missing cells show as `NaN`.
    pub fn head(df: &DataFrame, n: usize) -> Result<TablePreview> {
        let preview = df.head(Some(n));
        let columns: Vec<String> = preview
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::with_capacity(preview.height());
        for i in 0..preview.height() {
            let mut row = Vec::with_capacity(columns.len());
            for col in preview.get_columns() {
                row.push(format_cell(&col.get(i)?));
            }
            rows.push(row);
        }

        Ok(TablePreview { columns, rows })
    }

    /// Missing count and percentage per column, most-missing first.
    ///
    /// Columns with equal counts keep their table order.
    pub fn missingness(df: &DataFrame) -> Vec<ColumnMissingness> {
        let total_rows = df.height();
        let mut result: Vec<ColumnMissingness> = df
            .get_columns()
            .iter()
            .map(|col| {
                let missing_count = col.null_count();
                let missing_percentage = if total_rows > 0 {
                    round_to(missing_count as f64 / total_rows as f64 * 100.0, 2)
                } else {
                    0.0
                };
                ColumnMissingness {
                    column: col.name().to_string(),
                    missing_count,
                    missing_percentage,
                }
            })
            .collect();

        result.sort_by(|a, b| b.missing_count.cmp(&a.missing_count));
        result
    }

    /// Rows equal to an earlier row, across all columns or on a key subset.
    pub fn duplicate_count(df: &DataFrame, subset: Option<&[&str]>) -> Result<usize> {
        let keyed = match subset {
            Some(columns) if !columns.is_empty() => df.select(columns.iter().copied())?,
            _ => df.clone(),
        };
        let unique = keyed.unique_stable(None, UniqueKeepStrategy::First, None)?;
        Ok(keyed.height() - unique.height())
    }

    /// Count values strictly outside each present column's bounds.
    ///
    /// Raw cells are read leniently: text that does not parse as a number and
    /// missing cells are excluded instead of failing the comparison.
    pub fn range_violations(
        df: &DataFrame,
        ranges: &[ColumnRange],
    ) -> Result<Vec<RangeViolation>> {
        let mut violations = Vec::new();

        for range in ranges {
            if !has_column(df, &range.column) {
                debug!("Skipping range check for absent column '{}'", range.column);
                continue;
            }

            let series = df.column(&range.column)?.as_materialized_series();
            let count = numeric_values(series)?
                .into_iter()
                .flatten()
                .filter(|v| range.violated_by(*v))
                .count();

            violations.push(RangeViolation {
                column: range.column.clone(),
                lo: range.lo,
                hi: range.hi,
                count,
            });
        }

        Ok(violations)
    }
}

fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "NaN".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => format!("{}", other),
    }
}

// =============================================================================
// Tests
// =============================================================================
