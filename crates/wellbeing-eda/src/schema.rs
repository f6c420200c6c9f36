//! Column names, nominal value domains and categorical encodings of the
//! student wellbeing dataset.
//!
//! No schema is enforced when a table is loaded: every recognized column is
//! optional, and callers check presence before acting on it.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

pub const STUDENT_ID: &str = "Student_ID";
pub const HOURS_STUDY: &str = "Hours_Study";
pub const SLEEP_HOURS: &str = "Sleep_Hours";
pub const SCREEN_TIME: &str = "Screen_Time";
pub const ATTENDANCE: &str = "Attendance";
pub const CGPA: &str = "CGPA";
pub const EXTRACURRICULAR: &str = "Extracurricular";
pub const STRESS_LEVEL: &str = "Stress_Level";

/// Derived 0/1 column built from [`EXTRACURRICULAR`].
pub const EXTRA_BIN: &str = "Extra_bin";
/// Derived 1/2/3 column built from [`STRESS_LEVEL`].
pub const STRESS_ORD: &str = "Stress_ord";

/// Continuous columns that are coerced to floats and median-imputed.
pub const NUMERIC_COLUMNS: [&str; 5] = [HOURS_STUDY, SLEEP_HOURS, SCREEN_TIME, ATTENDANCE, CGPA];

/// Free-text label columns that are trimmed and title-cased.
pub const CATEGORICAL_COLUMNS: [&str; 2] = [EXTRACURRICULAR, STRESS_LEVEL];

/// Candidate columns of the correlation matrix, in display order.
pub const CORRELATION_FEATURES: [&str; 7] = [
    HOURS_STUDY,
    SLEEP_HOURS,
    SCREEN_TIME,
    ATTENDANCE,
    STRESS_ORD,
    EXTRA_BIN,
    CGPA,
];

/// Predictors plotted against CGPA.
pub const SCATTER_PREDICTORS: [&str; 4] = [HOURS_STUDY, SLEEP_HOURS, SCREEN_TIME, ATTENDANCE];

/// Features that get an individual directional insight.
pub const DIRECTIONAL_FEATURES: [(&str, &str); 3] = [
    (HOURS_STUDY, "Study hours"),
    (SLEEP_HOURS, "Sleep hours"),
    (SCREEN_TIME, "Screen time"),
];

/// Nominal closed interval `[lo, hi]` for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub column: String,
    pub lo: f64,
    pub hi: f64,
}

impl ColumnRange {
    pub fn new(column: impl Into<String>, lo: f64, hi: f64) -> Self {
        Self {
            column: column.into(),
            lo,
            hi,
        }
    }

    /// True when `value` lies strictly outside `[lo, hi]`.
    #[inline]
    pub fn violated_by(&self, value: f64) -> bool {
        value < self.lo || value > self.hi
    }
}

/// The fixed bounds checked by the auditor.
pub fn default_ranges() -> Vec<ColumnRange> {
    vec![
        ColumnRange::new(HOURS_STUDY, 0.0, 24.0),
        ColumnRange::new(SLEEP_HOURS, 0.0, 24.0),
        ColumnRange::new(SCREEN_TIME, 0.0, 24.0),
        ColumnRange::new(ATTENDANCE, 0.0, 100.0),
        ColumnRange::new(CGPA, 0.0, 10.0),
    ]
}

/// Canonical stress levels, in their natural order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    pub const ALL: [StressLevel; 3] = [StressLevel::Low, StressLevel::Medium, StressLevel::High];

    /// Look up a normalized label. Anything but the exact canonical text is unmapped.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Ordinal code stored in [`STRESS_ORD`].
    pub fn ordinal(&self) -> i32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// Map a normalized `Extracurricular` label to its `Extra_bin` code.
pub fn encode_extracurricular(label: &str) -> Option<i32> {
    match label {
        "Yes" => Some(1),
        "No" => Some(0),
        _ => None,
    }
}

/// Map a normalized `Stress_Level` label to its `Stress_ord` code.
pub fn encode_stress_level(label: &str) -> Option<i32> {
    StressLevel::from_label(label).map(|level| level.ordinal())
}

/// Check whether a column is present in the table.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Keep only the names present in `df`, preserving their order.
pub fn present_columns<'a>(df: &DataFrame, names: &[&'a str]) -> Vec<&'a str> {
    names
        .iter()
        .copied()
        .filter(|name| has_column(df, name))
        .collect()
}
