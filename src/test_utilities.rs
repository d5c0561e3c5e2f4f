//! Test cases and test utility functions.
//!

use crate::frame::Frame;
use crate::review::{BamColumns, MutationColumns, ReviewData};

fn owned(row: &[&str]) -> Vec<String> {
    row.iter().map(|cell| cell.to_string()).collect()
}

/// A small mutations table: two patients, one shared locus, one locus
/// private to P1, and two P1 samples covering the shared locus.
pub fn test_mutations_frame() -> Frame {
    Frame::from_rows(
        owned(&["chrom", "pos", "sample", "patient", "ref", "alt"]),
        vec![
            owned(&["17", "7571820", "P1-T1", "P1", "C", "T"]),
            owned(&["2", "29443600", "P1-T1", "P1", "G", "A"]),
            owned(&["17", "7571820", "P1-T2", "P1", "C", "T"]),
            owned(&["17", "7571820", "P2-T1", "P2", "C", "G"]),
        ],
    )
    .unwrap()
}

/// A wide BAM table: one row per patient, tumor and normal bam/bai pairs.
pub fn test_bams_frame() -> Frame {
    Frame::from_rows(
        owned(&[
            "patient",
            "sequencing_center",
            "bam_tumor",
            "bai_tumor",
            "bam_normal",
            "bai_normal",
        ]),
        vec![
            owned(&[
                "P1",
                "broad",
                "gs://bams/p1_tumor.bam",
                "gs://bams/p1_tumor.bai",
                "gs://bams/p1_normal.bam",
                "gs://bams/p1_normal.bai",
            ]),
            owned(&[
                "P2",
                "broad",
                "gs://bams/p2_tumor.bam",
                "gs://bams/p2_tumor.bai",
                "gs://bams/p2_normal.bam",
                "gs://bams/p2_normal.bai",
            ]),
        ],
    )
    .unwrap()
}

pub fn test_mutation_columns() -> MutationColumns {
    MutationColumns {
        group_by: vec![
            "chrom".to_string(),
            "pos".to_string(),
            "patient".to_string(),
        ],
        bam_ref: "patient".to_string(),
        chrom: vec!["chrom".to_string()],
        pos: vec!["pos".to_string()],
    }
}

pub fn test_bam_columns() -> BamColumns {
    BamColumns {
        bam_ref: "patient".to_string(),
        bam: vec!["bam_tumor".to_string(), "bam_normal".to_string()],
        bai: vec!["bai_tumor".to_string(), "bai_normal".to_string()],
    }
}

/// A fully constructed [`ReviewData`] over the canned tables.
pub fn test_review_data() -> ReviewData {
    ReviewData::new(
        test_mutations_frame(),
        test_mutation_columns(),
        test_bams_frame(),
        test_bam_columns(),
    )
    .unwrap()
}
