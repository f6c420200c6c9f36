//! Categorical-to-integer encodings.

use polars::prelude::*;
use std::collections::BTreeSet;

/// Outcome of encoding one label column.
pub(crate) struct Encoded {
    pub series: Series,
    /// Present labels with no code, in sorted order.
    pub unmapped: BTreeSet<String>,
    pub unmapped_count: usize,
}

/// Derive an Int32 column named `target` from the labels of `source`.
///
/// `lookup` is a partial mapping: labels it does not know, and missing
/// labels, encode to missing.
pub(crate) fn encode_labels(
    source: &Series,
    target: &str,
    lookup: fn(&str) -> Option<i32>,
) -> PolarsResult<Encoded> {
    let text = source.cast(&DataType::String)?;
    let str_series = text.str()?;

    let mut unmapped = BTreeSet::new();
    let mut unmapped_count = 0;
    let codes: Vec<Option<i32>> = str_series
        .into_iter()
        .map(|value| {
            let label = value?;
            let code = lookup(label);
            if code.is_none() {
                unmapped.insert(label.to_string());
                unmapped_count += 1;
            }
            code
        })
        .collect();

    Ok(Encoded {
        series: Series::new(target.into(), codes),
        unmapped,
        unmapped_count,
    })
}
