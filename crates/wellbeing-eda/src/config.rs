//! Configuration types for the analysis pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use crate::charts::ChartStyle;
use crate::schema::{ColumnRange, default_ranges};
use serde::{Deserialize, Serialize};

/// How missing values in categorical label columns are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissingLabelPolicy {
    /// Missing labels stay missing and encode to missing.
    #[default]
    Preserve,
    /// Missing labels become the literal text "Nan" before trimming and
    /// title-casing, as the stringify-then-normalize approach does.
    Stringify,
}

/// What to do when a numeric column has missing entries and no observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmptyColumnPolicy {
    /// Abort with an imputation error.
    #[default]
    Fail,
    /// Leave the column untouched and log a warning.
    Skip,
}

/// Configuration for the analysis pipeline.
///
/// Use [`EdaConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use wellbeing_eda::config::{EdaConfig, MissingLabelPolicy};
///
/// let config = EdaConfig::builder()
///     .missing_label_policy(MissingLabelPolicy::Stringify)
///     .top_correlates(3)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaConfig {
    /// Nominal bounds checked by the auditor.
    /// Default: Hours_Study/Sleep_Hours/Screen_Time in [0, 24],
    /// Attendance in [0, 100], CGPA in [0, 10]
    pub numeric_ranges: Vec<ColumnRange>,

    /// Handling of missing categorical labels.
    /// Default: Preserve
    pub missing_label_policy: MissingLabelPolicy,

    /// Handling of numeric columns with nothing to impute from.
    /// Default: Fail
    pub empty_column_policy: EmptyColumnPolicy,

    /// Decimal places for correlation coefficients and group statistics.
    /// Default: 3
    pub round_decimals: u32,

    /// Number of headline correlates reported against CGPA.
    /// Default: 2
    pub top_correlates: usize,

    /// Minimum number of canonical stress levels required for group statistics.
    /// Default: 2
    pub min_stress_groups: usize,

    /// Number of rows shown in the data preview.
    /// Default: 5
    pub head_rows: usize,

    /// Styling handed to the chart surface.
    pub chart_style: ChartStyle,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            numeric_ranges: default_ranges(),
            missing_label_policy: MissingLabelPolicy::default(),
            empty_column_policy: EmptyColumnPolicy::default(),
            round_decimals: 3,
            top_correlates: 2,
            min_stress_groups: 2,
            head_rows: 5,
            chart_style: ChartStyle::default(),
        }
    }
}

impl EdaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for range in &self.numeric_ranges {
            if !range.lo.is_finite() || !range.hi.is_finite() || range.lo > range.hi {
                return Err(ConfigValidationError::InvalidRange {
                    column: range.column.clone(),
                    lo: range.lo,
                    hi: range.hi,
                });
            }
        }

        if self.round_decimals > 10 {
            return Err(ConfigValidationError::InvalidDecimals(self.round_decimals));
        }

        if self.min_stress_groups == 0 {
            return Err(ConfigValidationError::InvalidGroupMinimum(
                self.min_stress_groups,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid range for '{column}': [{lo}, {hi}] (bounds must be finite and lo <= hi)")]
    InvalidRange { column: String, lo: f64, hi: f64 },

    #[error("Invalid rounding precision: {0} (must be at most 10)")]
    InvalidDecimals(u32),

    #[error("Invalid stress group minimum: {0} (must be at least 1)")]
    InvalidGroupMinimum(usize),
}

/// Builder for [`EdaConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    numeric_ranges: Option<Vec<ColumnRange>>,
    missing_label_policy: Option<MissingLabelPolicy>,
    empty_column_policy: Option<EmptyColumnPolicy>,
    round_decimals: Option<u32>,
    top_correlates: Option<usize>,
    min_stress_groups: Option<usize>,
    head_rows: Option<usize>,
    chart_style: Option<ChartStyle>,
}

impl EdaConfigBuilder {
    /// Replace the nominal bounds checked by the auditor.
    pub fn numeric_ranges(mut self, ranges: Vec<ColumnRange>) -> Self {
        self.numeric_ranges = Some(ranges);
        self
    }

    /// Set how missing categorical labels are normalized.
    pub fn missing_label_policy(mut self, policy: MissingLabelPolicy) -> Self {
        self.missing_label_policy = Some(policy);
        self
    }

    /// Set what happens to numeric columns with nothing to impute from.
    pub fn empty_column_policy(mut self, policy: EmptyColumnPolicy) -> Self {
        self.empty_column_policy = Some(policy);
        self
    }

    /// Set the rounding precision of correlations and group statistics.
    pub fn round_decimals(mut self, decimals: u32) -> Self {
        self.round_decimals = Some(decimals);
        self
    }

    /// Set how many headline correlates are reported.
    pub fn top_correlates(mut self, count: usize) -> Self {
        self.top_correlates = Some(count);
        self
    }

    /// Set the minimum number of stress levels for group statistics.
    pub fn min_stress_groups(mut self, count: usize) -> Self {
        self.min_stress_groups = Some(count);
        self
    }

    /// Set the number of preview rows.
    pub fn head_rows(mut self, rows: usize) -> Self {
        self.head_rows = Some(rows);
        self
    }

    /// Set the chart styling.
    pub fn chart_style(mut self, style: ChartStyle) -> Self {
        self.chart_style = Some(style);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EdaConfig` or an error if validation fails.
    pub fn build(self) -> Result<EdaConfig, ConfigValidationError> {
        let config = EdaConfig {
            numeric_ranges: self.numeric_ranges.unwrap_or_else(default_ranges),
            missing_label_policy: self.missing_label_policy.unwrap_or_default(),
            empty_column_policy: self.empty_column_policy.unwrap_or_default(),
            round_decimals: self.round_decimals.unwrap_or(3),
            top_correlates: self.top_correlates.unwrap_or(2),
            min_stress_groups: self.min_stress_groups.unwrap_or(2),
            head_rows: self.head_rows.unwrap_or(5),
            chart_style: self.chart_style.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
