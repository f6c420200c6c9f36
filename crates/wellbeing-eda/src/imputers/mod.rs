//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their median.

mod statistical;

pub use statistical::StatisticalImputer;
