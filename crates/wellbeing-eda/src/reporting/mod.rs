//! Report generation module.
//!
//! [`EdaReport`] gathers one run's results for:
//! - The text report written to any sink
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//!
//! # Example
//!
//! ```rust,ignore
//! use wellbeing_eda::reporting::{EdaReport, ReportGenerator};
//!
//! let report = EdaReport::from_outcome(&outcome, Some("data/students.csv"));
//! report.write_text(&mut std::io::stdout())?;
//!
//! let generator = ReportGenerator::new(PathBuf::from("output"));
//! generator.write_report_to_file(&report, "students")?;
//! ```

mod generator;

pub use generator::{EdaReport, ReportGenerator};
