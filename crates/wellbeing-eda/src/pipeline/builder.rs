//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating load, audit, clean, analyze and insight generation.

use crate::analysis::Analyzer;
use crate::cleaner::DataCleaner;
use crate::config::EdaConfig;
use crate::error::{EdaError, Result};
use crate::insights::InsightGenerator;
use crate::loader::CsvLoader;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::quality::DataAuditor;
use crate::types::EdaOutcome;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The main analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// Each stage consumes the previous stage's output. The auditor only reads
/// the raw table; the cleaner works on its own copy.
///
/// # Example
///
/// ```rust,ignore
/// use wellbeing_eda::{EdaConfig, Pipeline};
///
/// let outcome = Pipeline::builder()
///     .config(EdaConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run_file("data/students.csv")?;
///
/// for insight in &outcome.insights {
///     println!("{}", insight);
/// }
/// ```
pub struct Pipeline {
    config: EdaConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
    insights: InsightGenerator,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &EdaConfig {
        &self.config
    }

    /// Load a CSV file and run every stage on it.
    ///
    /// # Errors
    ///
    /// Returns [`EdaError::LoadFailed`] when the file is missing, unreadable
    /// or unparsable, and any error [`run`](Self::run) returns.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<EdaOutcome> {
        let path = path.as_ref();
        self.report_progress(ProgressUpdate::with_sub_stage(
            PipelineStage::Loading,
            path.display().to_string(),
            0.0,
            "Loading dataset...",
        ));

        let df = match CsvLoader::load(path) {
            Ok(df) => df,
            Err(e) => return Err(self.fail(e)),
        };

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            1.0,
            format!("Loaded {} rows x {} columns", df.height(), df.width()),
        ));
        self.run(df)
    }

    /// Run audit, cleaning, analysis and insight generation on a loaded table.
    ///
    /// # Errors
    ///
    /// Returns [`EdaError::ImputationFailed`] when a numeric column has
    /// nothing to impute from and the configuration does not skip it.
    pub fn run(&self, df: DataFrame) -> Result<EdaOutcome> {
        match self.run_internal(df) {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(outcome)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&self, e: EdaError) -> EdaError {
        self.report_progress(ProgressUpdate::failed(e.to_string()));
        error!("Pipeline error: {}", e);
        e
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, df: DataFrame) -> Result<EdaOutcome> {
        let start_time = Instant::now();
        info!("Starting analysis pipeline...");

        // Step 1: Audit the raw table
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Auditing,
            0.0,
            "Auditing data quality...",
        ));
        let audit = DataAuditor::audit(&df, &self.config)?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Auditing,
            1.0,
            format!(
                "{} exact duplicates, {} columns with missing values",
                audit.exact_duplicates,
                audit.missingness.iter().filter(|m| m.missing_count > 0).count()
            ),
        ));

        // Step 2: Clean a copy; the raw table is kept for the report
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            0.0,
            "Cleaning data...",
        ));
        let (cleaned, cleaning_actions) = self.cleaner.clean(df.clone())?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            1.0,
            format!(
                "Canonical table: {} rows x {} columns",
                cleaned.height(),
                cleaned.width()
            ),
        ));

        // Step 3: Correlations and group statistics
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Analyzing,
            0.0,
            "Computing correlations and group statistics...",
        ));
        let analysis = Analyzer::analyze(&cleaned, &self.config)?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Analyzing,
            1.0,
            "Analysis complete",
        ));

        // Step 4: Insights
        self.report_progress(ProgressUpdate::new(
            PipelineStage::GeneratingInsights,
            0.0,
            "Generating insights...",
        ));
        let insights = self.insights.generate(&analysis);
        self.report_progress(ProgressUpdate::new(
            PipelineStage::GeneratingInsights,
            1.0,
            format!("{} insights", insights.len()),
        ));

        info!(
            "Pipeline finished in {} ms",
            start_time.elapsed().as_millis()
        );

        Ok(EdaOutcome {
            raw: df,
            audit,
            cleaned,
            cleaning_actions,
            analysis,
            insights,
        })
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<EdaConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure PipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: EdaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use wellbeing_eda::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct MyReporter;
    ///
    /// impl ProgressReporter for MyReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         println!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(MyReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns [`EdaError::InvalidConfig`] if the configuration is invalid.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let cleaner = DataCleaner::new(config.missing_label_policy, config.empty_column_policy);
        let insights = InsightGenerator::new(config.top_correlates);

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            cleaner,
            insights,
        })
    }
}
