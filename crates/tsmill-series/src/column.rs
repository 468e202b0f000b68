//! Named numeric column.

use std::ops::Index;

/// A named column of `f64` values. NaN marks a missing cell.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Column {
    name: String,
    values: Vec<f64>,
}

impl Column {
    /// Create a column from a name and its values.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Return the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the column values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Return the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return true if the column holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the position of the first NaN or infinite value, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_finite())
    }

    /// Return a column with the same name and different values.
    #[must_use]
    pub fn with_values(&self, values: Vec<f64>) -> Self {
        Self {
            name: self.name.clone(),
            values,
        }
    }
}

impl Index<usize> for Column {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl AsRef<[f64]> for Column {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}
