//! Label normalization for categorical columns.

use crate::config::MissingLabelPolicy;
use crate::utils::title_case;
use polars::prelude::*;

/// Trim and title-case every label of a column.
///
/// The column is read as text first. Missing labels stay missing under
/// [`MissingLabelPolicy::Preserve`]; under [`MissingLabelPolicy::Stringify`]
/// they become the text `"Nan"`. Returns the normalized series and the number
/// of cells whose value changed.
pub(crate) fn normalize_labels(
    series: &Series,
    policy: MissingLabelPolicy,
) -> PolarsResult<(Series, usize)> {
    let text = series.cast(&DataType::String)?;
    let str_series = text.str()?;

    let mut changed = 0;
    let normalized: Vec<Option<String>> = str_series
        .into_iter()
        .map(|value| {
            let raw = match (value, policy) {
                (Some(v), _) => v,
                (None, MissingLabelPolicy::Preserve) => return None,
                (None, MissingLabelPolicy::Stringify) => "nan",
            };
            let label = title_case(raw.trim());
            if value != Some(label.as_str()) {
                changed += 1;
            }
            Some(label)
        })
        .collect();

    Ok((Series::new(series.name().clone(), normalized), changed))
}
