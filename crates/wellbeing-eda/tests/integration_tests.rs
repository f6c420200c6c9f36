//! Integration tests for the analysis pipeline.
//!
//! These tests verify end-to-end behavior of the pipeline using small CSV fixtures.

use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wellbeing_eda::{
    ActionType, ChartPayloads, CsvLoader, DataAuditor, EdaConfig, EdaError, EdaOutcome, EdaReport,
    EmptyColumnPolicy, JsonChartSurface, MissingLabelPolicy, Pipeline, PipelineStage,
    ReportGenerator, StressLevel,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run_fixture(filename: &str) -> EdaOutcome {
    Pipeline::builder()
        .build()
        .unwrap()
        .run_file(fixtures_path().join(filename))
        .expect("Pipeline should complete successfully")
}

fn run_fixture_with(filename: &str, config: EdaConfig) -> Result<EdaOutcome, EdaError> {
    Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run_file(fixtures_path().join(filename))
}

fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn i32_values(df: &DataFrame, name: &str) -> Vec<Option<i32>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .i32()
        .unwrap()
        .into_iter()
        .collect()
}

fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(String::from))
        .collect()
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("wellbeing_eda_{}_{}", name, std::process::id()))
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_full_pipeline_sample() {
    let outcome = run_fixture("students_sample.csv");

    assert_eq!(outcome.audit.shape, (8, 8));
    assert_eq!(outcome.post_clean_shape(), (7, 10));
    assert_eq!(outcome.raw.height(), 8);

    // No numeric nulls remain after imputation
    for col in ["Hours_Study", "Sleep_Hours", "Screen_Time", "Attendance", "CGPA"] {
        assert_eq!(outcome.cleaned.column(col).unwrap().null_count(), 0, "{}", col);
    }

    // Medians are taken before deduplication
    let hours = f64_values(&outcome.cleaned, "Hours_Study");
    assert_eq!(hours[3], Some(4.0));
    let sleep = f64_values(&outcome.cleaned, "Sleep_Hours");
    assert_eq!(sleep[4], Some(6.0));

    // Out-of-range values are reported but kept
    assert_eq!(hours[6], Some(26.0));
}

#[test]
fn test_audit_on_raw_table() {
    let outcome = run_fixture("students_sample.csv");
    let audit = &outcome.audit;

    assert_eq!(audit.exact_duplicates, 1);
    assert_eq!(audit.id_duplicates, Some(1));

    let first = &audit.missingness[0];
    assert_eq!(first.column, "Hours_Study");
    assert_eq!(first.missing_count, 1);
    assert_eq!(first.missing_percentage, 12.5);

    let hours = audit
        .range_violations
        .iter()
        .find(|v| v.column == "Hours_Study")
        .unwrap();
    assert_eq!(hours.count, 1);
    assert!(
        audit
            .range_violations
            .iter()
            .filter(|v| v.column != "Hours_Study")
            .all(|v| v.count == 0)
    );

    assert_eq!(audit.head.rows.len(), 5);
    assert_eq!(audit.head.rows[3][1], "NaN");
}

#[test]
fn test_labels_normalized_and_encoded() {
    let outcome = run_fixture("students_sample.csv");
    let df = &outcome.cleaned;

    assert_eq!(
        str_values(df, "Stress_Level"),
        ["Low", "High", "Medium", "Low", "High", "Medium", "Medium"]
            .iter()
            .map(|s| Some(s.to_string()))
            .collect::<Vec<_>>()
    );
    assert_eq!(
        i32_values(df, "Stress_ord"),
        vec![Some(1), Some(3), Some(2), Some(1), Some(3), Some(2), Some(2)]
    );
    assert_eq!(
        i32_values(df, "Extra_bin"),
        vec![Some(1), Some(0), Some(1), Some(0), Some(1), Some(0), Some(1)]
    );
}

#[test]
fn test_analysis_and_insights() {
    let outcome = run_fixture("students_sample.csv");
    let analysis = &outcome.analysis;

    let matrix = analysis.correlation.as_ref().unwrap();
    assert_eq!(matrix.labels.len(), 7);
    assert_eq!(analysis.cgpa_ranking.len(), 6);
    let defined: Vec<f64> = analysis
        .cgpa_ranking
        .iter()
        .filter_map(|e| e.coefficient)
        .collect();
    assert!(defined.windows(2).all(|w| w[0] >= w[1]));

    let low = analysis.group(StressLevel::Low).unwrap();
    assert_eq!(low.count, 2);
    assert_eq!(low.mean, Some(8.8));
    let high = analysis.group(StressLevel::High).unwrap();
    assert_eq!(high.count, 2);
    assert_eq!(high.mean, Some(6.5));

    // Two headline correlates, three directional statements, one stress gap
    assert_eq!(outcome.insights.len(), 6);
    assert_eq!(
        outcome.insights.last().unwrap(),
        "Average CGPA in Low-stress exceeds High-stress by ≈ 2.30 points."
    );
    assert!(outcome.insights[2].starts_with("Study hours vs CGPA correlation is"));
}

#[test]
fn test_cleaning_actions_in_step_order() {
    let outcome = run_fixture("students_sample.csv");
    let kinds: Vec<ActionType> = outcome
        .cleaning_actions
        .iter()
        .map(|a| a.action_type)
        .collect();

    let first_of = |kind: ActionType| kinds.iter().position(|k| *k == kind).unwrap();
    assert!(first_of(ActionType::LabelsNormalized) < first_of(ActionType::TypeCoerced));
    assert!(first_of(ActionType::TypeCoerced) < first_of(ActionType::ValueImputed));
    assert!(first_of(ActionType::ValueImputed) < first_of(ActionType::CategoriesEncoded));
    assert_eq!(kinds.last(), Some(&ActionType::DuplicatesRemoved));

    let imputed: Vec<&str> = outcome
        .cleaning_actions
        .iter()
        .filter(|a| a.action_type == ActionType::ValueImputed)
        .map(|a| a.target.as_str())
        .collect();
    assert_eq!(imputed, vec!["Hours_Study", "Sleep_Hours"]);
}

// ============================================================================
// Duplicate Handling Tests
// ============================================================================

#[test]
fn test_duplicates_counted_and_removed() {
    let outcome = run_fixture("duplicates.csv");

    assert_eq!(outcome.audit.exact_duplicates, 1);
    assert_eq!(outcome.audit.id_duplicates, Some(2));
    assert_eq!(outcome.cleaned.height(), 3);
    assert_eq!(
        str_values(&outcome.cleaned, "Student_ID"),
        vec![Some("A1".into()), Some("A2".into()), Some("A2".into())]
    );
}

#[test]
fn test_cleaning_twice_changes_nothing() {
    let outcome = run_fixture("students_sample.csv");
    let again = Pipeline::builder()
        .build()
        .unwrap()
        .run(outcome.cleaned.clone())
        .unwrap();

    assert!(again.cleaned.equals_missing(&outcome.cleaned));
    assert_eq!(again.audit.exact_duplicates, 0);
}

// ============================================================================
// Label Policy Tests
// ============================================================================

#[test]
fn test_missing_labels_preserved_by_default() {
    let outcome = run_fixture("messy_labels.csv");
    let df = &outcome.cleaned;

    assert_eq!(
        str_values(df, "Extracurricular"),
        vec![Some("Yes".into()), Some("No".into()), None, Some("Maybe".into())]
    );
    assert_eq!(i32_values(df, "Extra_bin"), vec![Some(1), Some(0), None, None]);
    assert_eq!(
        str_values(df, "Stress_Level"),
        vec![Some("Low".into()), Some("Medium".into()), Some("High".into()), None]
    );
    assert_eq!(i32_values(df, "Stress_ord"), vec![Some(1), Some(2), Some(3), None]);

    let unmapped = outcome
        .cleaning_actions
        .iter()
        .find(|a| a.action_type == ActionType::CategoriesEncoded && a.target == "Extra_bin")
        .unwrap();
    assert!(unmapped.details.as_deref().unwrap().contains("Maybe"));
}

#[test]
fn test_legacy_missing_labels_stringified() {
    let config = EdaConfig::builder()
        .missing_label_policy(MissingLabelPolicy::Stringify)
        .build()
        .unwrap();
    let outcome = run_fixture_with("messy_labels.csv", config).unwrap();
    let df = &outcome.cleaned;

    assert_eq!(str_values(df, "Extracurricular")[2], Some("Nan".into()));
    assert_eq!(str_values(df, "Stress_Level")[3], Some("Nan".into()));
    assert_eq!(i32_values(df, "Extra_bin")[2], None);
    assert_eq!(i32_values(df, "Stress_ord")[3], None);
}

// ============================================================================
// Edge Case Tests
// ============================================================================

#[test]
fn test_single_stress_level_skips_groups() {
    let outcome = run_fixture("single_stress_level.csv");

    assert!(outcome.analysis.group_statistics.is_none());
    assert!(
        !outcome
            .insights
            .iter()
            .any(|s| s.starts_with("Average CGPA"))
    );

    let text = EdaReport::from_outcome(&outcome, None).to_text().unwrap();
    assert!(text.contains("Skipped"));

    let payloads =
        ChartPayloads::from_outputs(&outcome.raw, &outcome.cleaned, &outcome.analysis).unwrap();
    assert!(payloads.stress_groups.is_empty());
}

#[test]
fn test_empty_file_fails_to_load() {
    let err = CsvLoader::load(fixtures_path().join("empty.csv")).unwrap_err();
    assert_eq!(err.error_code(), "LOAD_ERROR");
    assert!(err.to_string().contains("empty.csv"));
}

#[test]
fn test_missing_file_names_path() {
    let err = run_fixture_with("does_not_exist.csv", EdaConfig::default()).unwrap_err();
    assert_eq!(err.error_code(), "LOAD_ERROR");
    assert!(err.to_string().contains("does_not_exist.csv"));
}

#[test]
fn test_all_missing_column_fails_by_default() {
    let err = run_fixture_with("all_missing_column.csv", EdaConfig::default()).unwrap_err();
    assert_eq!(err.error_code(), "IMPUTATION_ERROR");
    assert!(err.to_string().contains("Sleep_Hours"));
}

#[test]
fn test_all_missing_column_skipped_when_configured() {
    let config = EdaConfig::builder()
        .empty_column_policy(EmptyColumnPolicy::Skip)
        .build()
        .unwrap();
    let outcome = run_fixture_with("all_missing_column.csv", config).unwrap();

    assert_eq!(outcome.cleaned.column("Sleep_Hours").unwrap().null_count(), 3);
    assert!(
        outcome
            .cleaning_actions
            .iter()
            .any(|a| a.action_type == ActionType::ImputationSkipped && a.target == "Sleep_Hours")
    );
}

#[test]
fn test_loader_reads_from_memory() {
    let csv = "Hours_Study,CGPA\n5,8.0\nNA,7.0\n";
    let df = CsvLoader::load_from_reader(csv.as_bytes(), "inline").unwrap();

    let audit = DataAuditor::audit(&df, &EdaConfig::default()).unwrap();
    assert_eq!(audit.shape, (2, 2));
    assert_eq!(audit.id_duplicates, None);
    assert_eq!(audit.missingness[0].missing_count, 1);
}

#[test]
fn test_nan_token_in_numeric_column_counted_and_imputed() {
    let csv = "Student_ID,Sleep_Hours,CGPA\nS1,7,8.0\nS2,NaN,7.0\nS3,6,9.0\n";
    let df = CsvLoader::load_from_str(csv, "inline").unwrap();
    let outcome = Pipeline::builder().build().unwrap().run(df).unwrap();

    let sleep = outcome
        .audit
        .missingness
        .iter()
        .find(|m| m.column == "Sleep_Hours")
        .unwrap();
    assert_eq!(sleep.missing_count, 1);
    assert_eq!(sleep.missing_percentage, 33.33);

    assert_eq!(
        f64_values(&outcome.cleaned, "Sleep_Hours"),
        vec![Some(7.0), Some(6.5), Some(6.0)]
    );
    assert!(
        outcome
            .cleaning_actions
            .iter()
            .any(|a| a.action_type == ActionType::ValueImputed && a.target == "Sleep_Hours")
    );
}

// ============================================================================
// Progress Reporting Tests
// ============================================================================

#[test]
fn test_progress_reports_every_stage() {
    let stages = Arc::new(Mutex::new(Vec::new()));
    let stages_clone = Arc::clone(&stages);

    Pipeline::builder()
        .on_progress(move |update| {
            stages_clone.lock().unwrap().push(update.stage);
        })
        .build()
        .unwrap()
        .run_file(fixtures_path().join("students_sample.csv"))
        .unwrap();

    let mut seen = stages.lock().unwrap().clone();
    seen.dedup();
    assert_eq!(
        seen,
        vec![
            PipelineStage::Loading,
            PipelineStage::Auditing,
            PipelineStage::Cleaning,
            PipelineStage::Analyzing,
            PipelineStage::GeneratingInsights,
            PipelineStage::Complete,
        ]
    );
}

#[test]
fn test_progress_is_monotonic() {
    let last = Arc::new(Mutex::new(0.0f32));
    let regressions = Arc::new(AtomicUsize::new(0));
    let last_clone = Arc::clone(&last);
    let regressions_clone = Arc::clone(&regressions);

    Pipeline::builder()
        .on_progress(move |update| {
            let mut last = last_clone.lock().unwrap();
            if update.progress + 1e-6 < *last {
                regressions_clone.fetch_add(1, Ordering::SeqCst);
            }
            *last = update.progress;
        })
        .build()
        .unwrap()
        .run_file(fixtures_path().join("students_sample.csv"))
        .unwrap();

    assert_eq!(regressions.load(Ordering::SeqCst), 0);
    assert_eq!(*last.lock().unwrap(), 1.0);
}

// ============================================================================
// Output Tests
// ============================================================================

#[test]
fn test_report_written_and_parsed() {
    let outcome = run_fixture("students_sample.csv");
    let report = EdaReport::from_outcome(&outcome, Some("students_sample.csv"));

    let dir = temp_dir("report");
    let path = ReportGenerator::new(dir.clone())
        .write_report_to_file(&report, "students_sample")
        .unwrap();

    let parsed: EdaReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.post_clean_shape, (7, 10));
    assert_eq!(parsed.insights, outcome.insights);
    assert_eq!(parsed.input_file.as_deref(), Some("students_sample.csv"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_charts_written_for_every_payload() {
    let outcome = run_fixture("students_sample.csv");
    let config = EdaConfig::default();

    let payloads =
        ChartPayloads::from_outputs(&outcome.raw, &outcome.cleaned, &outcome.analysis).unwrap();
    assert_eq!(payloads.scatters.len(), 4);
    assert_eq!(payloads.stress_groups.len(), 3);

    let dir = temp_dir("charts");
    let mut surface = JsonChartSurface::new(&dir).unwrap();
    let rendered = payloads.render_all(&mut surface, &config.chart_style).unwrap();

    assert_eq!(rendered, 7);
    assert_eq!(surface.written().len(), 7);
    assert!(dir.join("correlation_heatmap.json").exists());
    assert!(dir.join("scatter_hours_study_vs_cgpa.json").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
