//! Visual report hand-off.
//!
//! Rendering lives outside this crate. The pipeline only assembles the data
//! each chart needs from results it has already computed and passes it,
//! with an explicit [`ChartStyle`], to a [`ChartSurface`].

mod json_surface;

pub use json_surface::JsonChartSurface;

use crate::error::Result;
use crate::schema::{CGPA, SCATTER_PREDICTORS, STRESS_LEVEL, StressLevel, has_column, present_columns};
use crate::types::{AnalysisReport, CorrelationMatrix};
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chart styling passed to every surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub theme: String,
    pub context: String,
    /// Default figure (width, height) in inches.
    pub figure_size: (f64, f64),
    pub heatmap_cmap: String,
    /// Colour scale (min, max) of the heatmap.
    pub heatmap_bounds: (f64, f64),
    pub scatter_alpha: f64,
    pub trendline_color: String,
    pub strip_alpha: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            theme: "whitegrid".to_string(),
            context: "notebook".to_string(),
            figure_size: (7.5, 4.5),
            heatmap_cmap: "coolwarm".to_string(),
            heatmap_bounds: (-1.0, 1.0),
            scatter_alpha: 0.4,
            trendline_color: "red".to_string(),
            strip_alpha: 0.15,
        }
    }
}

/// Missing-value mask of the raw table, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingnessMatrix {
    pub columns: Vec<String>,
    pub missing: Vec<Vec<bool>>,
}

/// Complete (predictor, CGPA) pairs for one scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPayload {
    pub predictor: String,
    pub points: Vec<(f64, f64)>,
}

/// CGPA values of one stress level for the box/strip plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressGroupValues {
    pub level: StressLevel,
    pub cgpa: Vec<f64>,
}

/// A charting backend.
pub trait ChartSurface {
    fn missingness_matrix(&mut self, data: &MissingnessMatrix, style: &ChartStyle) -> Result<()>;

    fn correlation_heatmap(&mut self, matrix: &CorrelationMatrix, style: &ChartStyle)
    -> Result<()>;

    /// Scatter of one predictor against CGPA, with a trendline drawn by the surface.
    fn scatter_vs_cgpa(&mut self, data: &ScatterPayload, style: &ChartStyle) -> Result<()>;

    fn cgpa_by_stress(&mut self, groups: &[StressGroupValues], style: &ChartStyle) -> Result<()>;
}

/// Everything the visual report needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartPayloads {
    pub missingness: Option<MissingnessMatrix>,
    pub heatmap: Option<CorrelationMatrix>,
    pub scatters: Vec<ScatterPayload>,
    /// In Low, Medium, High order; empty levels are left out. Empty when
    /// the analysis skipped group statistics.
    pub stress_groups: Vec<StressGroupValues>,
}

impl ChartPayloads {
    /// Collect chart data from the raw table, the canonical table and the
    /// analysis. Charts whose columns are absent are left out.
    pub fn from_outputs(
        raw: &DataFrame,
        cleaned: &DataFrame,
        analysis: &AnalysisReport,
    ) -> Result<Self> {
        let missingness = if raw.width() > 0 {
            Some(missingness_mask(raw))
        } else {
            None
        };

        let mut scatters = Vec::new();
        let mut stress_groups = Vec::new();
        if has_column(cleaned, CGPA) {
            let cgpa = numeric_values(cleaned.column(CGPA)?.as_materialized_series())?;

            for predictor in present_columns(cleaned, &SCATTER_PREDICTORS) {
                let values = numeric_values(cleaned.column(predictor)?.as_materialized_series())?;
                let points = values
                    .iter()
                    .zip(&cgpa)
                    .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                    .collect();
                scatters.push(ScatterPayload {
                    predictor: predictor.to_string(),
                    points,
                });
            }

            if analysis.group_statistics.is_some() && has_column(cleaned, STRESS_LEVEL) {
                stress_groups = group_cgpa_by_stress(cleaned, &cgpa)?;
            }
        }

        Ok(Self {
            missingness,
            heatmap: analysis.correlation.clone(),
            scatters,
            stress_groups,
        })
    }

    /// Hand every payload to `surface`. Returns the number of charts rendered.
    pub fn render_all(&self, surface: &mut dyn ChartSurface, style: &ChartStyle) -> Result<usize> {
        let mut rendered = 0;

        if let Some(missingness) = &self.missingness {
            surface.missingness_matrix(missingness, style)?;
            rendered += 1;
        }
        if let Some(matrix) = &self.heatmap {
            surface.correlation_heatmap(matrix, style)?;
            rendered += 1;
        }
        for scatter in &self.scatters {
            surface.scatter_vs_cgpa(scatter, style)?;
            rendered += 1;
        }
        if !self.stress_groups.is_empty() {
            surface.cgpa_by_stress(&self.stress_groups, style)?;
            rendered += 1;
        }

        debug!("Rendered {} charts", rendered);
        Ok(rendered)
    }
}

fn missingness_mask(df: &DataFrame) -> MissingnessMatrix {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let masks: Vec<Vec<bool>> = df
        .get_columns()
        .iter()
        .map(|col| {
            col.as_materialized_series()
                .is_null()
                .into_iter()
                .map(|v| v.unwrap_or(false))
                .collect()
        })
        .collect();

    let missing = (0..df.height())
        .map(|row| masks.iter().map(|mask| mask[row]).collect())
        .collect();

    MissingnessMatrix { columns, missing }
}

fn group_cgpa_by_stress(df: &DataFrame, cgpa: &[Option<f64>]) -> Result<Vec<StressGroupValues>> {
    let labels = df
        .column(STRESS_LEVEL)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let labels: Vec<Option<StressLevel>> = labels
        .str()?
        .into_iter()
        .map(|l| l.and_then(StressLevel::from_label))
        .collect();

    Ok(StressLevel::ALL
        .iter()
        .map(|&level| StressGroupValues {
            level,
            cgpa: labels
                .iter()
                .zip(cgpa)
                .filter(|(l, _)| **l == Some(level))
                .filter_map(|(_, v)| *v)
                .collect(),
        })
        .filter(|g| !g.cgpa.is_empty())
        .collect())
}
