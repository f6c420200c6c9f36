//! CLI entry point for the student wellbeing analysis.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wellbeing_eda::{
    ChartPayloads, EdaConfig, EdaOutcome, EdaReport, EdaResult, EmptyColumnPolicy,
    JsonChartSurface, MissingLabelPolicy, Pipeline, ReportGenerator,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Student Wellbeing Data Cleaning and Exploratory Analysis",
    long_about = "Audits, cleans and analyzes a student wellbeing CSV file, then prints \
                  a sectioned text report.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG              Log filter (overrides --log-level; may be set in .env)\n\n\
                  EXAMPLES:\n  \
                  # Text report to stdout\n  \
                  wellbeing-eda students.csv\n\n  \
                  # Machine-readable report\n  \
                  wellbeing-eda students.csv --json\n\n  \
                  # Save the JSON report and chart payloads\n  \
                  wellbeing-eda students.csv --emit-report outputs --charts outputs/charts"
)]
struct Args {
    /// Path to the CSV file to analyze
    input: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the report)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the text report
    ///
    /// Disables all logs; only outputs the final JSON report.
    /// Useful for piping to other tools: `... --json | jq .insights`
    #[arg(long)]
    json: bool,

    /// Write the JSON report into this directory
    ///
    /// The report will be saved as <input_name>_eda_report.json
    #[arg(short = 'r', long, value_name = "DIR")]
    emit_report: Option<PathBuf>,

    /// Write one JSON chart document per chart into this directory
    #[arg(long, value_name = "DIR")]
    charts: Option<PathBuf>,

    /// Turn missing categorical labels into the literal label "Nan"
    #[arg(long)]
    legacy_missing_labels: bool,

    /// Leave all-missing numeric columns unimputed instead of failing
    #[arg(long)]
    skip_empty_columns: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Load environment variables from .env file before the filter reads RUST_LOG
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let pipeline = build_pipeline(&args, config.clone())?;

    let outcome = match pipeline.run_file(&args.input) {
        Ok(outcome) => outcome,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::json!({ "error": e }));
            }
            return Err(e.into());
        }
    };

    let input_display = args.input.display().to_string();
    let report = EdaReport::from_outcome(&outcome, Some(&input_display));

    // Non-fatal output failures are logged and the report still printed
    if let Some(ref dir) = args.charts {
        keep_going(render_charts(&outcome, &config, dir), "Charts not written")?;
    }

    if let Some(ref dir) = args.emit_report {
        let generator = ReportGenerator::new(dir.clone());
        let written = generator
            .write_report_to_file(&report, &extract_file_stem(&args.input))
            .map(|path| info!("Report written to: {}", path.display()));
        keep_going(written, "Report file not written")?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report
        .write_text(&mut out)
        .context("Failed to write report to stdout")?;
    out.flush()?;

    Ok(())
}

/// Map the output-only flags onto the configuration.
fn build_config(args: &Args) -> Result<EdaConfig> {
    let mut builder = EdaConfig::builder();

    if args.legacy_missing_labels {
        builder = builder.missing_label_policy(MissingLabelPolicy::Stringify);
    }
    if args.skip_empty_columns {
        builder = builder.empty_column_policy(EmptyColumnPolicy::Skip);
    }

    Ok(builder.build()?)
}

fn build_pipeline(args: &Args, config: EdaConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Downgrade a non-fatal error to a warning.
fn keep_going(result: EdaResult<()>, what: &str) -> EdaResult<()> {
    match result {
        Err(e) if !e.is_fatal() => {
            warn!("{} [{}]: {}", what, e.error_code(), e);
            Ok(())
        }
        other => other,
    }
}

fn render_charts(outcome: &EdaOutcome, config: &EdaConfig, dir: &Path) -> EdaResult<()> {
    let payloads = ChartPayloads::from_outputs(&outcome.raw, &outcome.cleaned, &outcome.analysis)?;
    let mut surface = JsonChartSurface::new(dir)?;
    let rendered = payloads.render_all(&mut surface, &config.chart_style)?;
    info!("{} charts written to: {}", rendered, dir.display());
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
