//! CGPA statistics grouped by stress level.

use crate::schema::{CGPA, STRESS_LEVEL, StressLevel, has_column};
use crate::types::GroupStatistics;
use crate::utils::{numeric_values, round_to};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Per-level CGPA summary, in Low, Medium, High order.
///
/// Only canonical levels are grouped and `count` covers observed CGPA values
/// only. Returns `None` when either column is absent or fewer than
/// `min_groups` levels occur.
pub(crate) fn stress_group_statistics(
    df: &DataFrame,
    min_groups: usize,
    decimals: u32,
) -> PolarsResult<Option<Vec<GroupStatistics>>> {
    if !has_column(df, STRESS_LEVEL) || !has_column(df, CGPA) {
        debug!("Group statistics skipped: stress level or CGPA column absent");
        return Ok(None);
    }

    let labels = df
        .column(STRESS_LEVEL)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let cgpa = numeric_values(df.column(CGPA)?.as_materialized_series())?;

    let mut groups: BTreeMap<StressLevel, Vec<f64>> = BTreeMap::new();
    for (label, value) in labels.str()?.into_iter().zip(cgpa) {
        let Some(level) = label.and_then(StressLevel::from_label) else {
            continue;
        };
        let values = groups.entry(level).or_default();
        if let Some(v) = value {
            values.push(v);
        }
    }

    if groups.len() < min_groups {
        debug!(
            "Group statistics skipped: {} stress levels present, {} required",
            groups.len(),
            min_groups
        );
        return Ok(None);
    }

    let stats = groups
        .into_iter()
        .map(|(level, values)| summarize(level, &values, decimals))
        .collect();

    Ok(Some(stats))
}

fn summarize(level: StressLevel, values: &[f64], decimals: u32) -> GroupStatistics {
    let series = Series::new(CGPA.into(), values);
    let round = |v: Option<f64>| v.map(|x| round_to(x, decimals));

    let mean = series.mean();
    // Sample std is undefined below two values
    let std = if values.len() < 2 {
        None
    } else {
        series.std(1).filter(|s| s.is_finite())
    };

    GroupStatistics {
        level,
        count: values.len(),
        mean: round(mean),
        median: round(series.median()),
        std: round(std),
        raw_mean: mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_in_canonical_order() {
        let df = df![
            STRESS_LEVEL => ["High", "Low", "Low", "Extreme", "High", "Low"],
            CGPA => [6.0, 8.0, 9.0, 1.0, 7.0, 7.0],
        ]
        .unwrap();

        let stats = stress_group_statistics(&df, 2, 3).unwrap().unwrap();
        let levels: Vec<_> = stats.iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![StressLevel::Low, StressLevel::High]);

        let low = &stats[0];
        assert_eq!(low.count, 3);
        assert_eq!(low.mean, Some(8.0));
        assert_eq!(low.median, Some(8.0));
        assert_eq!(low.std, Some(1.0));

        let high = &stats[1];
        assert_eq!(high.count, 2);
        assert_eq!(high.mean, Some(6.5));
        assert_eq!(high.std, Some(0.707));
    }

    #[test]
    fn test_single_level_skipped() {
        let df = df![
            STRESS_LEVEL => ["Low", "Low", "Unknown"],
            CGPA => [8.0, 7.0, 6.0],
        ]
        .unwrap();
        assert!(stress_group_statistics(&df, 2, 3).unwrap().is_none());
    }

    #[test]
    fn test_single_row_group_has_no_std() {
        let df = df![
            STRESS_LEVEL => ["Low", "Medium", "Medium"],
            CGPA => [8.0, 7.0, 6.0],
        ]
        .unwrap();

        let stats = stress_group_statistics(&df, 2, 3).unwrap().unwrap();
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].std, None);
        assert_eq!(stats[1].mean, Some(6.5));
    }

    #[test]
    fn test_count_excludes_missing_cgpa() {
        let df = df![
            STRESS_LEVEL => ["Low", "Low", "Low", "High", "High"],
            CGPA => [Some(8.0), None, Some(9.0), None, None],
        ]
        .unwrap();

        let stats = stress_group_statistics(&df, 2, 3).unwrap().unwrap();
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].mean, Some(8.5));
        assert_eq!(stats[0].median, Some(8.5));

        let high = &stats[1];
        assert_eq!(high.level, StressLevel::High);
        assert_eq!(high.count, 0);
        assert_eq!(high.mean, None);
        assert_eq!(high.median, None);
        assert_eq!(high.std, None);
    }

    #[test]
    fn test_unrounded_mean_kept() {
        let df = df![
            STRESS_LEVEL => ["Low", "Low", "Low", "High"],
            CGPA => [8.0, 8.0, 8.0005, 6.0],
        ]
        .unwrap();

        let stats = stress_group_statistics(&df, 2, 3).unwrap().unwrap();
        let low = &stats[0];
        assert_eq!(low.mean, Some(8.0));
        assert!((low.raw_mean.unwrap() - 8.000_166_666).abs() < 1e-6);
    }

    #[test]
    fn test_even_group_median_averages_middle() {
        let df = df![
            STRESS_LEVEL => ["Medium", "Medium", "Medium", "Medium", "Low"],
            CGPA => [9.0, 6.0, 7.0, 8.0, 5.0],
        ]
        .unwrap();

        let stats = stress_group_statistics(&df, 2, 3).unwrap().unwrap();
        assert_eq!(stats[1].level, StressLevel::Medium);
        assert_eq!(stats[1].median, Some(7.5));
        assert_eq!(stats[1].std, Some(1.291));
    }

    #[test]
    fn test_missing_columns_skip() {
        let df = df![CGPA => [8.0, 7.0]].unwrap();
        assert!(stress_group_statistics(&df, 2, 3).unwrap().is_none());
    }
}
