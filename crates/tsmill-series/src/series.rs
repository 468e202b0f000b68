//! Timestamp-indexed table with validation guarantees.

use std::collections::HashSet;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::column::Column;
use crate::error::SeriesError;
use crate::frequency::Frequency;

/// Ordered, validated time series.
///
/// Guarantees:
/// - at least one column
/// - timestamps strictly increasing (so unique)
/// - every column has one value per timestamp
/// - column names are unique
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TimeSeries {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl TimeSeries {
    /// Create a new time series, validating ordering, shape and column names.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::NoColumns`] | `columns` is empty |
    /// | [`SeriesError::UnorderedIndex`] | a timestamp is not after its predecessor |
    /// | [`SeriesError::LengthMismatch`] | a column length differs from the index length |
    /// | [`SeriesError::DuplicateColumn`] | two columns share a name |
    pub fn new(index: Vec<NaiveDateTime>, columns: Vec<Column>) -> Result<Self, SeriesError> {
        if columns.is_empty() {
            return Err(SeriesError::NoColumns);
        }
        if let Some(row) = index.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SeriesError::UnorderedIndex {
                row: row + 1,
                previous: index[row],
                current: index[row + 1],
            });
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.len() != index.len() {
                return Err(SeriesError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: index.len(),
                    got: column.len(),
                });
            }
            if !seen.insert(column.name()) {
                return Err(SeriesError::DuplicateColumn {
                    column: column.name().to_string(),
                });
            }
        }
        Ok(Self { index, columns })
    }

    /// Create a series with an evenly spaced index starting at `start`.
    ///
    /// The number of rows is taken from the first column; the usual
    /// validation of [`TimeSeries::new`] applies to the rest.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::NonPositiveStep`] if `step` is zero or negative,
    /// otherwise the same errors as [`TimeSeries::new`].
    pub fn regular(
        start: NaiveDateTime,
        step: TimeDelta,
        columns: Vec<Column>,
    ) -> Result<Self, SeriesError> {
        if step <= TimeDelta::zero() {
            return Err(SeriesError::NonPositiveStep { step });
        }
        let n = columns.first().map_or(0, Column::len);
        let index = (0..n)
            .scan(start, |ts, _| {
                let current = *ts;
                *ts += step;
                Some(current)
            })
            .collect();
        Self::new(index, columns)
    }

    /// Build a new series on the same index with different columns.
    ///
    /// # Errors
    ///
    /// Same as [`TimeSeries::new`], except the index is already known to be ordered.
    pub fn with_columns(&self, columns: Vec<Column>) -> Result<Self, SeriesError> {
        Self::new(self.index.clone(), columns)
    }

    /// Return the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Return true if the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Return the timestamps.
    #[must_use]
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Return all columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Return the number of value columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Look up a column by zero-based position.
    #[must_use]
    pub fn column_at(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    /// Return the column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Infer the sampling frequency from the index spacing.
    ///
    /// Returns `Some` only when every consecutive spacing maps to the same
    /// [`Frequency`]. Monthly and annual spacings may vary in length
    /// (28–31 and 365–366 days) and still agree.
    #[must_use]
    pub fn infer_frequency(&self) -> Option<Frequency> {
        let mut spacings = self
            .index
            .windows(2)
            .map(|w| (w[1] - w[0]).num_nanoseconds().and_then(Frequency::from_nanos));
        let first = spacings.next()??;
        let agreed = spacings.all(|f| f == Some(first));
        debug!(alias = first.alias(), agreed, "frequency inference");
        agreed.then_some(first)
    }
}
