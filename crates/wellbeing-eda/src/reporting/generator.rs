use crate::error::{EdaError, Result};
use crate::types::{AnalysisReport, AuditReport, CleaningAction, EdaOutcome};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report Type
// ============================================================================

/// Full result of one analysis run, for text, JSON and file output.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file, when the table came from one
    pub input_file: Option<String>,

    /// Read-only findings on the raw table
    pub audit: AuditReport,
    /// Shape of the canonical table
    pub post_clean_shape: (usize, usize),
    /// What the cleaner did, in order
    pub cleaning_actions: Vec<CleaningAction>,
    pub analysis: AnalysisReport,
    pub insights: Vec<String>,
}

impl EdaReport {
    pub fn from_outcome(outcome: &EdaOutcome, input_file: Option<&str>) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.map(String::from),
            audit: outcome.audit.clone(),
            post_clean_shape: outcome.post_clean_shape(),
            cleaning_actions: outcome.cleaning_actions.clone(),
            analysis: outcome.analysis.clone(),
            insights: outcome.insights.clone(),
        }
    }

    /// Write the human-readable report, one section per computation in
    /// pipeline order.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let audit = &self.audit;

        section(out, "Shape")?;
        writeln!(out, "Rows: {}, Columns: {}", audit.shape.0, audit.shape.1)?;

        section(out, "Column Info")?;
        let name_width = audit
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);
        for col in &audit.columns {
            writeln!(
                out,
                "  {:<width$}  {:>8}  {} non-null",
                col.name,
                col.dtype,
                col.non_null,
                width = name_width
            )?;
        }

        section(out, "Head")?;
        if !audit.head.columns.is_empty() {
            writeln!(out, "  {}", audit.head.columns.join(" | "))?;
            for row in &audit.head.rows {
                writeln!(out, "  {}", row.join(" | "))?;
            }
        }

        section(out, "Missing Values")?;
        for m in &audit.missingness {
            writeln!(
                out,
                "  {:<width$}  {:>6}  {:>6.2}%",
                m.column,
                m.missing_count,
                m.missing_percentage,
                width = name_width
            )?;
        }

        section(out, "Duplicates")?;
        writeln!(out, "Exact duplicate rows: {}", audit.exact_duplicates)?;
        if let Some(ids) = audit.id_duplicates {
            writeln!(out, "Duplicate Student_ID values: {}", ids)?;
        }

        section(out, "Range Violations")?;
        if audit.range_violations.is_empty() {
            writeln!(out, "No range-checked columns present")?;
        }
        for v in &audit.range_violations {
            writeln!(
                out,
                "{} outside [{}, {}]: {}",
                v.column, v.lo, v.hi, v.count
            )?;
        }

        section(out, "Post-Clean Shape")?;
        writeln!(
            out,
            "Rows: {}, Columns: {}",
            self.post_clean_shape.0, self.post_clean_shape.1
        )?;

        section(out, "Correlation with CGPA")?;
        if self.analysis.cgpa_ranking.is_empty() {
            writeln!(out, "Not available")?;
        }
        for entry in &self.analysis.cgpa_ranking {
            match entry.coefficient {
                Some(r) => writeln!(out, "  {:<12} {:>7.3}", entry.feature, r)?,
                None => writeln!(out, "  {:<12} {:>7}", entry.feature, "NaN")?,
            }
        }

        section(out, "CGPA by Stress Level")?;
        match &self.analysis.group_statistics {
            Some(groups) => {
                writeln!(
                    out,
                    "  {:<8} {:>5} {:>7} {:>7} {:>7}",
                    "Level", "count", "mean", "median", "std"
                )?;
                for g in groups {
                    writeln!(
                        out,
                        "  {:<8} {:>5} {:>7} {:>7} {:>7}",
                        g.level.label(),
                        g.count,
                        fmt_stat(g.mean),
                        fmt_stat(g.median),
                        fmt_stat(g.std)
                    )?;
                }
            }
            None => writeln!(out, "Skipped (fewer than the required stress levels)")?,
        }

        section(out, "Insights")?;
        for (i, insight) in self.insights.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, insight)?;
        }

        Ok(())
    }

    /// Render the text report into a string.
    pub fn to_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_text(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| EdaError::ReportGenerationFailed(e.to_string()))
    }
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== {} ===", title)
}

fn fmt_stat(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "NaN".to_string())
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes reports to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write a report to a JSON file.
    ///
    /// For example, if `report_base_name` is "students", the file will be
    /// "students_eda_report.json".
    pub fn write_report_to_file(
        &self,
        report: &EdaReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_eda_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
