//! Data quality audit module.
//!
//! This module measures the raw table (missing values, duplicate rows and
//! values outside their nominal bounds) without changing it.

mod auditor;

pub use auditor::DataAuditor;
