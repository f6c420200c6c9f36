//! Student Wellbeing EDA Library
//!
//! Data cleaning and exploratory analysis of a student wellbeing dataset,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! A run moves one table through five stages:
//!
//! - **Loading**: CSV parsing with fallbacks and missing-marker normalization
//! - **Auditing**: Shape, column info, missingness, duplicates and range violations
//! - **Cleaning**: Label normalization, numeric coercion, median imputation,
//!   categorical encoding and duplicate removal
//! - **Analysis**: Pearson correlations and CGPA statistics by stress level
//! - **Insights**: Short text statements derived from the analysis
//!
//! Reports and chart payloads are built from the results afterwards.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wellbeing_eda::{EdaReport, Pipeline};
//!
//! let outcome = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run_file("data/students.csv")?;
//!
//! let report = EdaReport::from_outcome(&outcome, Some("data/students.csv"));
//! report.write_text(&mut std::io::stdout())?;
//! ```
//!
//! # Configuration
//!
//! Use [`EdaConfig`] to adjust behavior that the data leaves open:
//!
//! ```rust,ignore
//! use wellbeing_eda::config::*;
//!
//! let config = EdaConfig::builder()
//!     .missing_label_policy(MissingLabelPolicy::Stringify) // "Nan" label for missing categories
//!     .empty_column_policy(EmptyColumnPolicy::Skip)        // Warn instead of failing
//!     .top_correlates(3)
//!     .build()?;
//! ```
//!
//! # Charts
//!
//! Rendering is delegated to a [`ChartSurface`]. [`ChartPayloads`] gathers
//! the data for every chart from the already computed outputs:
//!
//! ```rust,ignore
//! use wellbeing_eda::{ChartPayloads, JsonChartSurface};
//!
//! let payloads = ChartPayloads::from_outputs(&outcome.raw, &outcome.cleaned, &outcome.analysis)?;
//! let mut surface = JsonChartSurface::new("charts")?;
//! payloads.render_all(&mut surface, &config.chart_style)?;
//! ```

pub mod analysis;
pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod insights;
pub mod loader;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::Analyzer;
pub use charts::{ChartPayloads, ChartStyle, ChartSurface, JsonChartSurface};
pub use cleaner::DataCleaner;
pub use config::{
    ConfigValidationError, EdaConfig, EdaConfigBuilder, EmptyColumnPolicy, MissingLabelPolicy,
};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use insights::InsightGenerator;
pub use loader::CsvLoader;
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate,
};
pub use quality::DataAuditor;
pub use reporting::{EdaReport, ReportGenerator};
pub use schema::{ColumnRange, StressLevel};
pub use types::{
    ActionType, AnalysisReport, AuditReport, CleaningAction, ColumnInfo, ColumnMissingness,
    CorrelationEntry, CorrelationMatrix, EdaOutcome, GroupStatistics, RangeViolation,
    TablePreview,
};
