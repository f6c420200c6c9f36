use crate::schema::StressLevel;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

// ============================================================================
// Audit Types
// ============================================================================

/// Name, type and non-null count of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
}

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissingness {
    pub column: String,
    pub missing_count: usize,
    /// Share of rows with a missing value, in percent, rounded to 2 decimals.
    pub missing_percentage: f64,
}

/// Rows whose numeric value falls strictly outside a column's nominal bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeViolation {
    pub column: String,
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// First rows of a table rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read-only data-quality findings on the raw table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// (rows, columns)
    pub shape: (usize, usize),
    pub columns: Vec<ColumnInfo>,
    pub head: TablePreview,
    /// Ordered by descending missing count.
    pub missingness: Vec<ColumnMissingness>,
    /// Rows equal to an earlier row across all columns.
    pub exact_duplicates: usize,
    /// Rows repeating an earlier `Student_ID`; `None` when the column is absent.
    pub id_duplicates: Option<usize>,
    pub range_violations: Vec<RangeViolation>,
}

// ============================================================================
// Cleaning Types
// ============================================================================

/// A single action taken while cleaning.
///
/// Actions are logged by every cleaning step to provide an audit trail
/// of what was done to the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningAction {
    /// Type of action performed.
    pub action_type: ActionType,
    /// Target of the action (column name or "dataset").
    pub target: String,
    /// Human-readable description of the action.
    pub description: String,
    /// Additional details (e.g., fill value, unmapped labels).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CleaningAction {
    /// Create a new cleaning action.
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    /// Add details to the action.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Types of actions the cleaner can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Label text was trimmed and title-cased.
    LabelsNormalized,
    /// A column was coerced to floats.
    TypeCoerced,
    /// Missing values were imputed.
    ValueImputed,
    /// Imputation was skipped for a column with no observed values.
    ImputationSkipped,
    /// Categories were encoded.
    CategoriesEncoded,
    /// Duplicate rows were removed.
    DuplicatesRemoved,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LabelsNormalized => "Labels Normalized",
            Self::TypeCoerced => "Type Coerced",
            Self::ValueImputed => "Value Imputed",
            Self::ImputationSkipped => "Imputation Skipped",
            Self::CategoriesEncoded => "Categories Encoded",
            Self::DuplicatesRemoved => "Duplicates Removed",
        }
    }
}

// ============================================================================
// Analysis Types
// ============================================================================

/// Square, symmetric matrix of pairwise-complete Pearson coefficients.
///
/// Entries are `None` when a pair has fewer than two complete rows or either
/// column is constant over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Coefficient between two labelled columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.values[i][j]
    }

    /// The `target` column sorted by descending coefficient, self excluded.
    ///
    /// Undefined coefficients sort last, keeping their column order.
    pub fn ranking_for(&self, target: &str) -> Vec<CorrelationEntry> {
        let Some(t) = self.index_of(target) else {
            return Vec::new();
        };

        let mut entries: Vec<CorrelationEntry> = self
            .labels
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != t)
            .map(|(i, label)| CorrelationEntry {
                feature: label.clone(),
                coefficient: self.values[i][t],
            })
            .collect();

        entries.sort_by(|a, b| match (a.coefficient, b.coefficient) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        entries
    }
}

/// One feature's coefficient against a target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub feature: String,
    pub coefficient: Option<f64>,
}

/// CGPA summary for one stress level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub level: StressLevel,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation; `None` below two rows.
    pub std: Option<f64>,
    /// Mean before rounding. Not serialized.
    #[serde(skip)]
    pub raw_mean: Option<f64>,
}

/// Everything the analyzer derives from the canonical table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// `None` when no correlation feature is present.
    pub correlation: Option<CorrelationMatrix>,
    /// CGPA column of the matrix, sorted, self excluded.
    pub cgpa_ranking: Vec<CorrelationEntry>,
    /// Unrounded coefficient of each directional feature with CGPA, computed
    /// on that column pair alone.
    pub directional: Vec<CorrelationEntry>,
    /// `None` when fewer than the required stress levels are present.
    pub group_statistics: Option<Vec<GroupStatistics>>,
}

impl AnalysisReport {
    /// Group statistics row for a stress level, if computed.
    pub fn group(&self, level: StressLevel) -> Option<&GroupStatistics> {
        self.group_statistics
            .as_ref()?
            .iter()
            .find(|g| g.level == level)
    }
}

// ============================================================================
// Pipeline Output
// ============================================================================

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct EdaOutcome {
    /// The table as loaded, before cleaning.
    pub raw: DataFrame,
    pub audit: AuditReport,
    /// The canonical table.
    pub cleaned: DataFrame,
    pub cleaning_actions: Vec<CleaningAction>,
    pub analysis: AnalysisReport,
    pub insights: Vec<String>,
}

impl EdaOutcome {
    /// (rows, columns) of the canonical table.
    pub fn post_clean_shape(&self) -> (usize, usize) {
        self.cleaned.shape()
    }
}

// ============================================================================
// Tests
// ============================================================================
