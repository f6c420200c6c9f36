//! Plain-language statements derived from the analysis.
//!
//! Statements are produced in a fixed order: headline correlates of CGPA,
//! one directional statement per lifestyle feature, then the Low vs High
//! stress gap. Nothing new is computed beyond sign and difference checks.

use crate::schema::{DIRECTIONAL_FEATURES, StressLevel};
use crate::types::AnalysisReport;
use tracing::debug;

/// Turns an [`AnalysisReport`] into ordered text statements.
pub struct InsightGenerator {
    top_correlates: usize,
}

impl InsightGenerator {
    pub fn new(top_correlates: usize) -> Self {
        Self { top_correlates }
    }

    pub fn generate(&self, analysis: &AnalysisReport) -> Vec<String> {
        let mut insights = Vec::new();

        // Headline correlates; undefined coefficients are never reported
        for entry in analysis
            .cgpa_ranking
            .iter()
            .filter(|e| e.coefficient.is_some())
            .take(self.top_correlates)
        {
            if let Some(r) = entry.coefficient {
                insights.push(format!(
                    "{} shows correlation r={:.2} with CGPA.",
                    entry.feature, r
                ));
            }
        }

        for (feature, label) in DIRECTIONAL_FEATURES {
            let Some(r) = analysis
                .directional
                .iter()
                .find(|e| e.feature == feature)
                .and_then(|e| e.coefficient)
            else {
                debug!("No directional insight for '{}'", feature);
                continue;
            };
            insights.push(format!(
                "{} vs CGPA correlation is {} at r={:.2}.",
                label,
                direction(r),
                r
            ));
        }

        // Unrounded means when available; rounded ones after deserialization
        let mean_of = |level| analysis.group(level).and_then(|g| g.raw_mean.or(g.mean));
        let low = mean_of(StressLevel::Low);
        let high = mean_of(StressLevel::High);
        if let (Some(low), Some(high)) = (low, high) {
            insights.push(format!(
                "Average CGPA in Low-stress exceeds High-stress by ≈ {:.2} points.",
                low - high
            ));
        }

        insights
    }
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Zero counts as positive.
fn direction(r: f64) -> &'static str {
    if r < 0.0 { "negative" } else { "positive" }
}
