//! Column-parallel application of a single-vector filter.

use rayon::prelude::*;
use tsmill_series::{Column, TimeSeries};

use crate::error::FilterError;

/// Apply `filter` to every column of `series` independently, in parallel.
///
/// Columns holding NaN or infinity are rejected up front so the error names
/// the column rather than a bare index.
pub(crate) fn filter_columns<F>(series: &TimeSeries, filter: F) -> Result<TimeSeries, FilterError>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, FilterError> + Sync,
{
    if let Some((column, index)) = series
        .columns()
        .iter()
        .find_map(|c| c.first_non_finite().map(|i| (c.name(), i)))
    {
        return Err(FilterError::NonFiniteColumn {
            column: column.to_string(),
            index,
        });
    }

    let filtered: Vec<Column> = series
        .columns()
        .par_iter()
        .map(|c| filter(c.values()).map(|values| c.with_values(values)))
        .collect::<Result<_, _>>()?;

    Ok(series.with_columns(filtered)?)
}

/// Validate that a vector is non-empty and finite.
pub(crate) fn check_input(values: &[f64]) -> Result<(), FilterError> {
    if values.is_empty() {
        return Err(FilterError::EmptyInput);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(FilterError::NonFiniteValue { index });
    }
    Ok(())
}
