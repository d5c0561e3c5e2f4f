//! The [`ReviewData`] object: the two session tables plus their validated
//! column configuration.
//!
//! Column names are configured once, up front, as explicit structures
//! ([`MutationColumns`], [`BamColumns`]) rather than passed as loose string
//! lists on every call. Construction checks that every configured column
//! exists in its table and that paired column lists line up; on failure the
//! error names all offending columns and nothing is partially built. After
//! construction the tables are read-only for the life of the session.

use crate::error::ReviewError;
use crate::frame::Frame;
use crate::locus::{locus_index, row_locus_key, LocusKey};

/// Column configuration for the mutations table.
#[derive(Clone, Debug)]
pub struct MutationColumns {
    /// Ordered grouping columns; their combined values define one
    /// reviewable unit, and their order is part of the derived key.
    pub group_by: Vec<String>,
    /// Column joining a mutation row to rows of the BAM table.
    pub bam_ref: String,
    /// Chromosome column(s); more than one when reviewing structural
    /// variants with multiple breakpoints.
    pub chrom: Vec<String>,
    /// Position column(s), positionally paired with `chrom`.
    pub pos: Vec<String>,
}

impl MutationColumns {
    fn required(&self) -> Vec<String> {
        let mut required = self.group_by.clone();
        required.push(self.bam_ref.clone());
        required.extend(self.chrom.iter().cloned());
        required.extend(self.pos.iter().cloned());
        required
    }

    fn validate(&self) -> Result<(), ReviewError> {
        if self.group_by.is_empty() {
            return Err(ReviewError::EmptyGroupBy);
        }
        if self.chrom.len() != self.pos.len() {
            return Err(ReviewError::UnpairedLocusColumns {
                chrom: self.chrom.len(),
                pos: self.pos.len(),
            });
        }
        Ok(())
    }
}

/// Column configuration for the BAM reference table.
#[derive(Clone, Debug)]
pub struct BamColumns {
    /// Column joined against the mutations table's `bam_ref` values.
    pub bam_ref: String,
    /// Ordered BAM file path/URL columns.
    pub bam: Vec<String>,
    /// Ordered BAI index path/URL columns, positionally paired with `bam`.
    pub bai: Vec<String>,
}

impl BamColumns {
    fn required(&self) -> Vec<String> {
        let mut required = vec![self.bam_ref.clone()];
        required.extend(self.bam.iter().cloned());
        required.extend(self.bai.iter().cloned());
        required
    }

    fn validate(&self) -> Result<(), ReviewError> {
        if self.bam.len() != self.bai.len() {
            return Err(ReviewError::UnpairedTrackColumns {
                bam: self.bam.len(),
                bai: self.bai.len(),
            });
        }
        Ok(())
    }

    /// The positionally paired (bam column, bai column) names.
    pub fn pairs(&self) -> impl Iterator<Item = (&String, &String)> {
        self.bam.iter().zip(self.bai.iter())
    }
}

/// The data object for one review session: a mutations table, a BAM
/// reference table, and the column configuration tying them together.
#[derive(Clone, Debug)]
pub struct ReviewData {
    mutations: Frame,
    bams: Frame,
    mutation_columns: MutationColumns,
    bam_columns: BamColumns,
}

impl ReviewData {
    /// Validate the configuration against both tables and build the
    /// session data object.
    pub fn new(
        mutations: Frame,
        mutation_columns: MutationColumns,
        bams: Frame,
        bam_columns: BamColumns,
    ) -> Result<Self, ReviewError> {
        mutation_columns.validate()?;
        bam_columns.validate()?;
        mutations.require_columns("mutations", &mutation_columns.required())?;
        bams.require_columns("bams", &bam_columns.required())?;
        Ok(Self {
            mutations,
            bams,
            mutation_columns,
            bam_columns,
        })
    }

    pub fn mutations(&self) -> &Frame {
        &self.mutations
    }

    pub fn bams(&self) -> &Frame {
        &self.bams
    }

    pub fn mutation_columns(&self) -> &MutationColumns {
        &self.mutation_columns
    }

    pub fn bam_columns(&self) -> &BamColumns {
        &self.bam_columns
    }

    /// The distinct locus keys, in first-encounter row order. This is the
    /// selectable list of reviewable units.
    pub fn locus_index(&self) -> Vec<LocusKey> {
        // group_by columns were validated at construction
        locus_index(&self.mutations, &self.mutation_columns.group_by).unwrap()
    }

    /// Filter the mutations table to exactly the rows whose derived key
    /// equals `key`. Unknown keys yield an empty table, never an error.
    pub fn mutations_at(&self, key: &LocusKey) -> Frame {
        self.mutations.filter(|row| {
            row_locus_key(&self.mutations, row, &self.mutation_columns.group_by) == *key
        })
    }

    /// The distinct BAM reference values among the mutations at `key`,
    /// in row order.
    pub fn bam_refs_at(&self, key: &LocusKey) -> Vec<String> {
        let matched = self.mutations_at(key);
        let mut refs: Vec<String> = Vec::new();
        for row in 0..matched.len() {
            // bam_ref column was validated at construction
            let value = matched.get(row, &self.mutation_columns.bam_ref).unwrap();
            if !refs.iter().any(|existing| existing == value) {
                refs.push(value.to_string());
            }
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{test_bam_columns, test_bams_frame, test_mutation_columns, test_mutations_frame};

    #[test]
    fn test_construction_validates_mutation_columns() {
        let mut mcols = test_mutation_columns();
        mcols.bam_ref = "sample_id".to_string();
        let result = ReviewData::new(
            test_mutations_frame(),
            mcols,
            test_bams_frame(),
            test_bam_columns(),
        );
        match result {
            Err(ReviewError::MissingColumns { table, columns }) => {
                assert_eq!(table, "mutations");
                assert_eq!(columns, vec!["sample_id"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_construction_validates_pairing() {
        let mut bcols = test_bam_columns();
        bcols.bai.pop();
        let result = ReviewData::new(
            test_mutations_frame(),
            test_mutation_columns(),
            test_bams_frame(),
            bcols,
        );
        assert!(matches!(
            result,
            Err(ReviewError::UnpairedTrackColumns { bam: 2, bai: 1 })
        ));
    }

    #[test]
    fn test_mutations_at_unknown_key_is_empty() {
        let data = crate::test_utilities::test_review_data();
        let matched = data.mutations_at(&"X:1:none".into());
        assert!(matched.is_empty());
    }

    #[test]
    fn test_bam_refs_are_distinct() {
        let data = crate::test_utilities::test_review_data();
        // two P1 samples share this locus but reference the same patient
        let refs = data.bam_refs_at(&"17:7571820:P1".into());
        assert_eq!(refs, vec!["P1"]);
    }
}
