//! Data cleaning module for producing the canonical table.
//!
//! The cleaner runs five steps in a fixed order, each feeding the next:
//! 1. Categorical label normalization
//! 2. Numeric coercion
//! 3. Median imputation
//! 4. Categorical encoding
//! 5. Exact-duplicate removal
//!
//! Every step is deterministic and running the cleaner on its own output
//! changes nothing. Out-of-range values are never corrected here.

mod converters;
mod encoders;
mod normalizers;

use crate::config::{EmptyColumnPolicy, MissingLabelPolicy};
use crate::error::{Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::schema::{
    CATEGORICAL_COLUMNS, EXTRA_BIN, EXTRACURRICULAR, NUMERIC_COLUMNS, STRESS_LEVEL, STRESS_ORD,
    encode_extracurricular, encode_stress_level, has_column, present_columns,
};
use crate::types::{ActionType, CleaningAction};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Data cleaner for the fixed cleaning sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner {
    missing_label_policy: MissingLabelPolicy,
    empty_column_policy: EmptyColumnPolicy,
}

impl DataCleaner {
    pub fn new(
        missing_label_policy: MissingLabelPolicy,
        empty_column_policy: EmptyColumnPolicy,
    ) -> Self {
        Self {
            missing_label_policy,
            empty_column_policy,
        }
    }

    /// Run all cleaning steps and return the canonical table with the
    /// actions taken.
    ///
    /// Columns a step depends on are optional: when absent, that step's
    /// contribution is skipped.
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, Vec<CleaningAction>)> {
        let mut df = df;
        let mut actions = Vec::new();

        info!("Cleaning {} rows...", df.height());

        self.normalize_categoricals(&mut df, &mut actions)
            .context("Normalizing labels")?;
        Self::coerce_numerics(&mut df, &mut actions).context("Coercing numeric columns")?;
        self.impute_numerics(&mut df, &mut actions)?;
        Self::encode_categoricals(&mut df, &mut actions).context("Encoding categories")?;
        let df = Self::remove_duplicates(df, &mut actions).context("Removing duplicates")?;

        info!(
            "Cleaning complete: {} rows x {} columns, {} actions",
            df.height(),
            df.width(),
            actions.len()
        );
        Ok((df, actions))
    }

    // 1. Trim and title-case label columns
    fn normalize_categoricals(
        &self,
        df: &mut DataFrame,
        actions: &mut Vec<CleaningAction>,
    ) -> Result<()> {
        for col_name in present_columns(df, &CATEGORICAL_COLUMNS) {
            let (normalized, changed) = {
                let series = df.column(col_name)?.as_materialized_series();
                normalizers::normalize_labels(series, self.missing_label_policy)?
            };
            df.replace(col_name, normalized)?;

            debug!("Normalized '{}': {} labels changed", col_name, changed);
            actions.push(
                CleaningAction::new(
                    ActionType::LabelsNormalized,
                    col_name,
                    format!("Trimmed and title-cased labels ({} changed)", changed),
                )
                .with_details(format!("missing labels: {:?}", self.missing_label_policy)),
            );
        }
        Ok(())
    }

    // 2. Parse numeric columns as floats
    fn coerce_numerics(df: &mut DataFrame, actions: &mut Vec<CleaningAction>) -> Result<()> {
        for col_name in present_columns(df, &NUMERIC_COLUMNS) {
            let (converted, invalid) = {
                let series = df.column(col_name)?.as_materialized_series();
                converters::coerce_to_float(series)?
            };
            df.replace(col_name, converted)?;

            if invalid > 0 {
                warn!(
                    "'{}': {} unparsable values set to missing",
                    col_name, invalid
                );
            }
            actions.push(CleaningAction::new(
                ActionType::TypeCoerced,
                col_name,
                format!("Converted to float; {} unparsable values set to missing", invalid),
            ));
        }
        Ok(())
    }

    // 3. Fill missing numerics with the column median
    fn impute_numerics(&self, df: &mut DataFrame, actions: &mut Vec<CleaningAction>) -> Result<()> {
        for col_name in present_columns(df, &NUMERIC_COLUMNS) {
            if let Some(action) =
                StatisticalImputer::apply_numeric_median(df, col_name, self.empty_column_policy)?
            {
                actions.push(action);
            }
        }
        Ok(())
    }

    // 4. Derive Extra_bin and Stress_ord; the label columns are kept
    fn encode_categoricals(df: &mut DataFrame, actions: &mut Vec<CleaningAction>) -> Result<()> {
        let encodings: [(&str, &str, fn(&str) -> Option<i32>); 2] = [
            (EXTRACURRICULAR, EXTRA_BIN, encode_extracurricular),
            (STRESS_LEVEL, STRESS_ORD, encode_stress_level),
        ];

        for (source, target, lookup) in encodings {
            if !has_column(df, source) {
                debug!("Skipping '{}' encoding: '{}' is absent", target, source);
                continue;
            }

            let encoded = {
                let series = df.column(source)?.as_materialized_series();
                encoders::encode_labels(series, target, lookup)?
            };

            let mut action = CleaningAction::new(
                ActionType::CategoriesEncoded,
                target,
                format!(
                    "Encoded '{}' ({} unmapped values set to missing)",
                    source, encoded.unmapped_count
                ),
            );
            if encoded.unmapped_count > 0 {
                warn!(
                    "'{}' has {} values with no code: {:?}",
                    source, encoded.unmapped_count, encoded.unmapped
                );
                action = action.with_details(format!("unmapped: {:?}", encoded.unmapped));
            }

            df.with_column(encoded.series)?;
            actions.push(action);
        }
        Ok(())
    }

    // 5. Keep the first of each group of identical rows
    fn remove_duplicates(
        df: DataFrame,
        actions: &mut Vec<CleaningAction>,
    ) -> Result<DataFrame> {
        let before = df.height();
        let df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - df.height();

        if removed > 0 {
            debug!("Removed {} duplicate rows", removed);
        } else {
            debug!("No duplicate rows found");
        }
        actions.push(CleaningAction::new(
            ActionType::DuplicatesRemoved,
            "dataset",
            format!("Removed {} exact duplicate rows", removed),
        ));
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;
    use crate::schema::{ATTENDANCE, CGPA, HOURS_STUDY, SCREEN_TIME, SLEEP_HOURS};

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn ints(df: &DataFrame, name: &str) -> Vec<Option<i32>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect()
    }

    fn messy_df() -> DataFrame {
        df![
            HOURS_STUDY => [Some("5"), Some("x"), Some("7"), Some("5")],
            SLEEP_HOURS => [Some(7.0), None, Some(6.0), Some(7.0)],
            SCREEN_TIME => [Some(3.0), Some(4.0), None, Some(3.0)],
            ATTENDANCE => [Some(90i64), Some(80), Some(70), Some(90)],
            CGPA => [Some(8.0), Some(7.0), None, Some(8.0)],
            EXTRACURRICULAR => [Some(" yes"), Some("NO"), None, Some("Yes")],
            STRESS_LEVEL => [Some("low "), Some("LOW"), Some("Medium"), Some("Low")],
        ]
        .unwrap()
    }

    #[test]
    fn test_no_missing_numerics_after_clean() {
        let (df, _) = DataCleaner::default().clean(messy_df()).unwrap();
        for col in NUMERIC_COLUMNS {
            assert_eq!(df.column(col).unwrap().null_count(), 0, "{col} has nulls");
        }
    }

    #[test]
    fn test_stress_levels_normalized_and_encoded() {
        let (df, _) = DataCleaner::default().clean(messy_df()).unwrap();

        // Row 0 and row 3 become identical and collapse
        assert_eq!(df.height(), 3);
        assert_eq!(
            strings(&df, STRESS_LEVEL),
            vec![
                Some("Low".to_string()),
                Some("Low".to_string()),
                Some("Medium".to_string())
            ]
        );
        assert_eq!(ints(&df, STRESS_ORD), vec![Some(1), Some(1), Some(2)]);
        assert_eq!(ints(&df, EXTRA_BIN), vec![Some(1), Some(0), None]);
    }

    #[test]
    fn test_unparsable_values_imputed_with_median() {
        let (df, _) = DataCleaner::default().clean(messy_df()).unwrap();
        // Observed Hours_Study values are 5, 7, 5 so the median is 5
        assert_eq!(floats(&df, HOURS_STUDY), vec![Some(5.0), Some(5.0), Some(7.0)]);
    }

    #[test]
    fn test_stringify_policy_keeps_nan_label() {
        let cleaner = DataCleaner::new(MissingLabelPolicy::Stringify, EmptyColumnPolicy::Fail);
        let (df, _) = cleaner.clean(messy_df()).unwrap();

        assert_eq!(strings(&df, EXTRACURRICULAR)[2], Some("Nan".to_string()));
        assert_eq!(ints(&df, EXTRA_BIN)[2], None);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let cleaner = DataCleaner::default();
        let (once, _) = cleaner.clean(messy_df()).unwrap();
        let (twice, _) = cleaner.clean(once.clone()).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_duplicate_example_keeps_out_of_range_values() {
        let df = df![
            HOURS_STUDY => [5.0, 5.0, 30.0],
            CGPA => [8.0, 8.0, 9.0],
        ]
        .unwrap();

        let (df, actions) = DataCleaner::default().clean(df).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(floats(&df, HOURS_STUDY), vec![Some(5.0), Some(30.0)]);

        let dedup = actions
            .iter()
            .find(|a| a.action_type == ActionType::DuplicatesRemoved)
            .unwrap();
        assert!(dedup.description.contains('1'));
    }

    #[test]
    fn test_appended_duplicate_removed() {
        let base = df![
            HOURS_STUDY => [2.0, 4.0, 6.0],
            CGPA => [6.0, 7.0, 8.0],
        ]
        .unwrap();
        let mut with_dup = base.clone();
        with_dup.vstack_mut(&base.slice(1, 1)).unwrap();

        let (df, _) = DataCleaner::default().clean(with_dup).unwrap();
        assert_eq!(df.height(), base.height());
        assert_eq!(floats(&df, CGPA), vec![Some(6.0), Some(7.0), Some(8.0)]);
    }

    #[test]
    fn test_all_missing_numeric_column_fails() {
        let df = df![
            HOURS_STUDY => [None::<f64>, None],
            CGPA => [8.0, 7.0],
        ]
        .unwrap();

        let err = DataCleaner::default().clean(df).unwrap_err();
        assert!(matches!(err, EdaError::ImputationFailed { .. }));
    }

    #[test]
    fn test_absent_columns_skip_their_steps() {
        let df = df![CGPA => [Some(8.0), None]].unwrap();
        let (df, actions) = DataCleaner::default().clean(df).unwrap();

        assert_eq!(df.width(), 1);
        assert!(
            !actions
                .iter()
                .any(|a| a.action_type == ActionType::CategoriesEncoded)
        );
    }
}
