//! The [`LocusKey`] type and the distinct-key locus index.
//!
//! A locus key is the sole addressing mechanism for "which mutation group
//! is under review": the colon-joined string representations of a row's
//! grouping-column values. The grouping-column *order* is part of the key,
//! so the index and per-row re-derivation must use the same ordered list;
//! [`crate::review::ReviewData`] stores that order once so the two sides
//! cannot disagree.

use std::fmt;

use indexmap::IndexSet;

use crate::error::ReviewError;
use crate::frame::Frame;

/// A derived string key addressing one mutation group.
///
/// Equal grouping-value tuples always produce identical keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocusKey(String);

impl LocusKey {
    /// Join the string representations of grouping-column values with `:`.
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        LocusKey(
            values
                .iter()
                .map(|value| value.as_ref())
                .collect::<Vec<_>>()
                .join(":"),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LocusKey {
    fn from(value: &str) -> Self {
        LocusKey(value.to_string())
    }
}

impl From<String> for LocusKey {
    fn from(value: String) -> Self {
        LocusKey(value)
    }
}

/// Derive the key for a single row of the table.
pub fn row_locus_key(frame: &Frame, row: &[String], group_by: &[String]) -> LocusKey {
    let values: Vec<&str> = group_by
        .iter()
        .map(|column| {
            // columns were validated at construction
            let index = frame.column_index(column).unwrap();
            row[index].as_str()
        })
        .collect();
    LocusKey::from_values(&values)
}

/// Build the distinct-key index for a mutations table: one [`LocusKey`]
/// per distinct combination of grouping-column values, in first-encounter
/// row order.
pub fn locus_index(frame: &Frame, group_by: &[String]) -> Result<Vec<LocusKey>, ReviewError> {
    if group_by.is_empty() {
        return Err(ReviewError::EmptyGroupBy);
    }
    frame.require_columns("mutations", group_by)?;

    let mut keys: IndexSet<LocusKey> = IndexSet::new();
    for row in frame.iter_rows() {
        keys.insert(row_locus_key(frame, row, group_by));
    }
    Ok(keys.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::test_mutations_frame;

    #[test]
    fn test_key_from_values() {
        let key = LocusKey::from_values(&["17", "7571820", "P1"]);
        assert_eq!(key.as_str(), "17:7571820:P1");
    }

    #[test]
    fn test_index_distinct_and_ordered() {
        let frame = test_mutations_frame();
        let group_by = vec![
            "chrom".to_string(),
            "pos".to_string(),
            "patient".to_string(),
        ];
        let index = locus_index(&frame, &group_by).unwrap();
        // two samples of P1 share a locus, so four rows give three keys
        assert_eq!(
            index,
            vec![
                LocusKey::from("17:7571820:P1"),
                LocusKey::from("2:29443600:P1"),
                LocusKey::from("17:7571820:P2"),
            ]
        );
    }

    #[test]
    fn test_every_row_key_is_in_index() {
        let frame = test_mutations_frame();
        let group_by = vec![
            "chrom".to_string(),
            "pos".to_string(),
            "patient".to_string(),
        ];
        let index = locus_index(&frame, &group_by).unwrap();
        for row in frame.iter_rows() {
            let key = row_locus_key(&frame, row, &group_by);
            assert!(index.contains(&key));
        }
    }

    #[test]
    fn test_missing_group_column_fails() {
        let frame = test_mutations_frame();
        let group_by = vec!["chrom".to_string(), "nonexistent".to_string()];
        assert!(matches!(
            locus_index(&frame, &group_by),
            Err(ReviewError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_empty_group_by_fails() {
        let frame = test_mutations_frame();
        assert!(matches!(
            locus_index(&frame, &[]),
            Err(ReviewError::EmptyGroupBy)
        ));
    }
}
