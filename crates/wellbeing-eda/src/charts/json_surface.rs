use super::{ChartStyle, ChartSurface, MissingnessMatrix, ScatterPayload, StressGroupValues};
use crate::error::{EdaError, Result};
use crate::types::CorrelationMatrix;
use serde::Serialize;
use serde_json::json;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Chart surface that writes one JSON document per chart into a directory,
/// for an external renderer to pick up.
pub struct JsonChartSurface {
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonChartSurface {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            written: Vec::new(),
        })
    }

    /// Paths of the documents written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_chart<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        kind: &str,
        data: &T,
        style: &ChartStyle,
    ) -> Result<()> {
        let document = json!({
            "chart": kind,
            "style": style,
            "data": data,
        });

        let path = self.output_dir.join(format!("{}.json", name));
        let mut file = File::create(&path)
            .map_err(|e| EdaError::ChartRenderFailed(format!("{}: {}", path.display(), e)))?;
        file.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;

        info!("Chart saved: {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

impl ChartSurface for JsonChartSurface {
    fn missingness_matrix(&mut self, data: &MissingnessMatrix, style: &ChartStyle) -> Result<()> {
        self.write_chart("missingness_matrix", "missingness_matrix", data, style)
    }

    fn correlation_heatmap(
        &mut self,
        matrix: &CorrelationMatrix,
        style: &ChartStyle,
    ) -> Result<()> {
        self.write_chart("correlation_heatmap", "heatmap", matrix, style)
    }

    fn scatter_vs_cgpa(&mut self, data: &ScatterPayload, style: &ChartStyle) -> Result<()> {
        let name = format!("scatter_{}_vs_cgpa", data.predictor.to_lowercase());
        self.write_chart(&name, "scatter_trendline", data, style)
    }

    fn cgpa_by_stress(&mut self, groups: &[StressGroupValues], style: &ChartStyle) -> Result<()> {
        self.write_chart("cgpa_by_stress", "box_strip", groups, style)
    }
}
