//! Statistical summaries of the canonical table.
//!
//! Two independent computations:
//! - A correlation matrix over the wellbeing features and CGPA, with the
//!   CGPA column exposed as a ranking
//! - CGPA statistics per stress level

mod correlation;
mod groups;

use crate::config::EdaConfig;
use crate::error::{Result, ResultExt};
use crate::schema::CGPA;
use crate::types::AnalysisReport;
use polars::prelude::DataFrame;
use tracing::{info, warn};

/// Computes the correlation and group summaries.
pub struct Analyzer;

impl Analyzer {
    pub fn analyze(df: &DataFrame, config: &EdaConfig) -> Result<AnalysisReport> {
        info!("Analyzing {} rows", df.height());

        let correlation = correlation::correlation_matrix(df, config.round_decimals)
            .context("Computing correlation matrix")?;
        let cgpa_ranking = correlation
            .as_ref()
            .map(|m| m.ranking_for(CGPA))
            .unwrap_or_default();
        if correlation.is_some() && cgpa_ranking.is_empty() {
            warn!("CGPA is absent; no correlation ranking");
        }

        let directional = correlation::directional_correlations(df)
            .context("Computing directional correlations")?;

        let group_statistics = groups::stress_group_statistics(
            df,
            config.min_stress_groups,
            config.round_decimals,
        )
        .context("Computing stress group statistics")?;
        if group_statistics.is_none() {
            info!("Stress group statistics skipped");
        }

        Ok(AnalysisReport {
            correlation,
            cgpa_ranking,
            directional,
            group_statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{HOURS_STUDY, SCREEN_TIME, STRESS_LEVEL, STRESS_ORD, StressLevel};
    use polars::prelude::*;

    fn canonical_df() -> DataFrame {
        df![
            HOURS_STUDY => [2.0, 4.0, 6.0, 8.0, 5.0],
            SCREEN_TIME => [7.0, 6.0, 2.0, 1.0, 5.0],
            STRESS_LEVEL => ["High", "High", "Low", "Low", "Medium"],
            STRESS_ORD => [3i32, 3, 1, 1, 2],
            CGPA => [6.0, 6.5, 8.5, 9.0, 7.5],
        ]
        .unwrap()
    }

    #[test]
    fn test_analyze_bundles_both_summaries() {
        let report = Analyzer::analyze(&canonical_df(), &EdaConfig::default()).unwrap();

        let matrix = report.correlation.as_ref().unwrap();
        assert_eq!(matrix.labels.len(), 4);
        assert_eq!(report.cgpa_ranking.len(), 3);
        assert_eq!(report.cgpa_ranking[0].feature, HOURS_STUDY);
        assert_eq!(report.cgpa_ranking.last().unwrap().feature, SCREEN_TIME);

        let levels: Vec<_> = report
            .group_statistics
            .as_ref()
            .unwrap()
            .iter()
            .map(|g| g.level)
            .collect();
        assert_eq!(
            levels,
            vec![StressLevel::Low, StressLevel::Medium, StressLevel::High]
        );
        assert_eq!(report.group(StressLevel::Low).unwrap().mean, Some(8.75));
    }

    #[test]
    fn test_min_stress_groups_respected() {
        let config = EdaConfig::builder().min_stress_groups(4).build().unwrap();
        let report = Analyzer::analyze(&canonical_df(), &config).unwrap();
        assert!(report.group_statistics.is_none());
    }

    #[test]
    fn test_analyze_without_cgpa() {
        let df = df![HOURS_STUDY => [1.0, 2.0, 3.0]].unwrap();
        let report = Analyzer::analyze(&df, &EdaConfig::default()).unwrap();

        assert!(report.correlation.is_some());
        assert!(report.cgpa_ranking.is_empty());
        assert!(report.directional.is_empty());
        assert!(report.group_statistics.is_none());
    }
}
