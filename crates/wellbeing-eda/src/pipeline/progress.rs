//! Progress reporting for the analysis pipeline.
//!
//! The pipeline runs synchronously to completion or failure; progress updates
//! let a caller follow it stage by stage.
//!
//! # Example
//!
//! ```rust,ignore
//! use wellbeing_eda::Pipeline;
//!
//! let outcome = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .run_file("students.csv")?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the analysis pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the input file
    Loading,
    /// Measuring data quality on the raw table
    Auditing,
    /// Normalizing, coercing, imputing, encoding and deduplicating
    Cleaning,
    /// Computing correlations and group statistics
    Analyzing,
    /// Deriving text statements
    GeneratingInsights,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Auditing => "Auditing Quality",
            Self::Cleaning => "Cleaning Data",
            Self::Analyzing => "Analyzing",
            Self::GeneratingInsights => "Generating Insights",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the typical weight of this stage in the overall pipeline (0.0 - 1.0).
    ///
    /// The weights of the working stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.15,
            Self::Auditing => 0.15,
            Self::Cleaning => 0.35,
            Self::Analyzing => 0.30,
            Self::GeneratingInsights => 0.05,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Auditing => 0.15,
            Self::Cleaning => 0.30,
            Self::Analyzing => 0.65,
            Self::GeneratingInsights => 0.95,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// One progress update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: PipelineStage,
    /// Optional sub-stage description (e.g., "Column: CGPA")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,
    /// Overall progress (0.0 - 1.0)
    pub progress: f32,
    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,
    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage without sub-stage info.
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a new progress update with sub-stage information.
    pub fn with_sub_stage(
        stage: PipelineStage,
        sub_stage: impl Into<String>,
        stage_progress: f32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sub_stage: Some(sub_stage.into()),
            ..Self::new(stage, stage_progress, message)
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            sub_stage: None,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            sub_stage: None,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Trait for receiving progress updates.
///
/// Implementations must be `Send + Sync` so a configured pipeline can be
/// moved to a worker thread.
pub trait ProgressReporter: Send + Sync {
    /// Called at the start and end of every stage.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
