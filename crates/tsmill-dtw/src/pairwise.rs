//! Pairwise distance table over the columns of a series.

use crate::distance::DtwDistance;

/// One unordered column pair and its distance.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PairwiseRow {
    /// Name of the earlier column.
    pub name_a: String,
    /// Name of the later column.
    pub name_b: String,
    /// DTW distance between the two columns.
    pub distance: DtwDistance,
}

/// Distances for every unordered pair of distinct columns.
///
/// Rows follow column order: `(c0, c1), (c0, c2), ..., (c1, c2), ...`.
/// Lookup is symmetric: `get(a, b) == get(b, a)`.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PairwiseTable {
    rows: Vec<PairwiseRow>,
}

impl PairwiseTable {
    pub(crate) fn new(rows: Vec<PairwiseRow>) -> Self {
        Self { rows }
    }

    /// Return the rows in column order.
    #[must_use]
    pub fn rows(&self) -> &[PairwiseRow] {
        &self.rows
    }

    /// Return the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return true if the table holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return the distance between columns `a` and `b` in either order.
    ///
    /// Returns `None` for unknown names and for `a == b`, which is never a
    /// pair in the table.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<DtwDistance> {
        self.rows
            .iter()
            .find(|r| (r.name_a == a && r.name_b == b) || (r.name_a == b && r.name_b == a))
            .map(|r| r.distance)
    }

    /// Iterate over `(name_a, name_b, distance)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, DtwDistance)> + '_ {
        self.rows
            .iter()
            .map(|r| (r.name_a.as_str(), r.name_b.as_str(), r.distance))
    }
}

impl<'a> IntoIterator for &'a PairwiseTable {
    type Item = &'a PairwiseRow;
    type IntoIter = std::slice::Iter<'a, PairwiseRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(a: &str, b: &str, d: f64) -> PairwiseRow {
        PairwiseRow {
            name_a: a.to_string(),
            name_b: b.to_string(),
            distance: DtwDistance::new(d),
        }
    }

    #[test]
    fn lookup_is_symmetric() {
        let table = PairwiseTable::new(vec![row("a", "b", 1.0), row("a", "c", 2.0)]);
        assert_eq!(table.get("a", "c"), table.get("c", "a"));
        assert_eq!(table.get("c", "a").map(DtwDistance::value), Some(2.0));
        assert_eq!(table.get("a", "a"), None);
        assert_eq!(table.get("a", "z"), None);
    }

    #[test]
    fn serializes_as_row_list() {
        let table = PairwiseTable::new(vec![row("q", "p", 0.5)]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"name_a":"q","name_b":"p","distance":0.5}]"#);
        let back: PairwiseTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
