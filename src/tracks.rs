//! The track table builder: reshape the wide BAM table into one row per
//! (reference, track-source) pair for a selected locus, plus the selection
//! clamp applied whenever the table is rebuilt.
//!
//! The BAM table is wide: one row per sample/patient, with several parallel
//! bam/bai column pairs (e.g. tumor and normal). Display and viewer loading
//! both want it long: one row per individual track. Rebuilding is a pure
//! re-scan of the session tables; nothing is cached between calls.

use crate::error::ReviewError;
use crate::frame::Frame;
use crate::locus::LocusKey;
use crate::review::ReviewData;

/// Output column carrying the resolved BAM path/URL.
pub const BAM_COLUMN: &str = "bam";
/// Output column carrying the paired BAI path/URL.
pub const BAI_COLUMN: &str = "bai";
/// Output column labeling which bam/bai column pair a row came from.
pub const SOURCE_COLUMN: &str = "bam_source";

/// Build the long track table for the mutation group at `key`.
///
/// The mutations table is filtered to the group, the distinct BAM
/// reference values are collected, the BAM table is filtered to those
/// references, and each matching row is stacked into one output row per
/// bam/bai column pair. With N matching BAM rows and K configured pairs
/// the output has exactly N×K rows. `display_columns` are carried through
/// from the BAM table; a column contributing under an already-present name
/// is not duplicated, and a carried column named after one of the
/// synthesized output columns is rejected. Missing loci and unmatched
/// references produce an empty table, never an error.
pub fn track_table(
    data: &ReviewData,
    key: &LocusKey,
    display_columns: &[String],
) -> Result<Frame, ReviewError> {
    let bam_columns = data.bam_columns();
    data.bams().require_columns("bams", display_columns)?;

    // The reference and display columns land in the output alongside the
    // synthesized source/bam/bai columns; a carried column reusing one of
    // those names would shift every cell after it under the wrong header.
    let reserved = [SOURCE_COLUMN, BAM_COLUMN, BAI_COLUMN];
    for name in std::iter::once(&bam_columns.bam_ref).chain(display_columns) {
        if reserved.contains(&name.as_str()) {
            return Err(ReviewError::ReservedColumn(name.clone()));
        }
    }

    let refs = data.bam_refs_at(key);
    let ref_index = data
        .bams()
        .column_index(&bam_columns.bam_ref)
        .expect("bam_ref column validated at construction");
    let matched_bams = data
        .bams()
        .filter(|row| refs.iter().any(|value| *value == row[ref_index]));

    // Assemble the output header, deduplicating repeated contributions
    // by name (e.g. a display column that is also the reference column).
    let mut columns: Vec<String> = Vec::new();
    let push_unique = |name: &str, columns: &mut Vec<String>| {
        if !columns.iter().any(|existing| existing == name) {
            columns.push(name.to_string());
        }
    };
    push_unique(&bam_columns.bam_ref, &mut columns);
    for name in display_columns {
        push_unique(name, &mut columns);
    }
    push_unique(SOURCE_COLUMN, &mut columns);
    push_unique(BAM_COLUMN, &mut columns);
    push_unique(BAI_COLUMN, &mut columns);

    let carried: Vec<String> = columns
        .iter()
        .filter(|name| {
            name.as_str() != SOURCE_COLUMN
                && name.as_str() != BAM_COLUMN
                && name.as_str() != BAI_COLUMN
        })
        .cloned()
        .collect();
    let carried_indices: Vec<usize> = carried
        .iter()
        .map(|name| {
            matched_bams
                .column_index(name)
                .expect("carried columns checked above")
        })
        .collect();

    let mut stacked = Frame::new(columns)?;
    for row in matched_bams.iter_rows() {
        for (bam_column, bai_column) in bam_columns.pairs() {
            let bam_index = matched_bams
                .column_index(bam_column)
                .expect("bam columns validated at construction");
            let bai_index = matched_bams
                .column_index(bai_column)
                .expect("bai columns validated at construction");

            let mut cells: Vec<String> =
                carried_indices.iter().map(|&i| row[i].clone()).collect();
            cells.push(bam_column.clone());
            cells.push(row[bam_index].clone());
            cells.push(row[bai_index].clone());
            stacked.push_row(cells)?;
        }
    }
    Ok(stacked)
}

/// Retain only the previously selected row indices still within bounds of
/// a rebuilt table of `len` rows, preserving order. Stale indices are
/// dropped silently; selection state outlives any one table.
pub fn clamp_selection(selected: &[usize], len: usize) -> Vec<usize> {
    selected
        .iter()
        .copied()
        .filter(|&index| index < len)
        .collect()
}

/// The selection used on first display of a newly chosen mutation group:
/// the first `init_max` rows, capped at the available row count. Prior
/// selection is deliberately ignored so a default view is always surfaced.
pub fn initial_selection(init_max: usize, len: usize) -> Vec<usize> {
    (0..init_max.min(len)).collect()
}
