//! The command functions behind the `mutrev` command line tool.
//!
//! Each function loads the session tables from delimited files, runs one
//! review operation, and writes its result to a file or standard output,
//! returning a [`CommandOutput`] with notices for the user.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ReviewError;
use crate::frame::Frame;
use crate::igv::{
    IgvDesktop, IgvJs, IgvSession, TokenProvider, TrackSettings, ViewMode, ViewerBackend,
};
use crate::io::OutputFile;
use crate::locus::{locus_index, row_locus_key, LocusKey};
use crate::reporting::{CommandOutput, Report};
use crate::review::{BamColumns, MutationColumns, ReviewData};
use crate::tracks::{initial_selection, track_table};

/// How the `tracks` command serializes the reshaped table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TableFormat {
    #[default]
    Tsv,
    Json,
}

fn load_data(
    mutations: &PathBuf,
    mutation_columns: MutationColumns,
    bams: &PathBuf,
    bam_columns: BamColumns,
) -> Result<ReviewData, ReviewError> {
    let mutations = Frame::from_path(mutations, b'\t')?;
    let bams = Frame::from_path(bams, b'\t')?;
    ReviewData::new(mutations, mutation_columns, bams, bam_columns)
}

/// List the locus index of a mutations table: one key per line, in
/// first-encounter row order.
pub fn review_loci(
    mutations: &PathBuf,
    group_by: &[String],
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, ReviewError> {
    let frame = Frame::from_path(mutations, b'\t')?;
    let index = locus_index(&frame, group_by)?;

    let output_file = output.map_or(OutputFile::new_stdout(), OutputFile::new);
    let mut writer = output_file.writer()?;
    for key in &index {
        writeln!(writer, "{}", key)?;
    }

    let mut report = Report::new();
    report.add_issue(format!(
        "{} distinct loci over {} mutation rows",
        index.len(),
        frame.len()
    ));
    Ok(CommandOutput::new((), report))
}

/// Write the mutation rows belonging to one locus key, optionally
/// restricted to a set of display columns.
pub fn review_mutations(
    mutations: &PathBuf,
    group_by: &[String],
    key: &LocusKey,
    display_columns: &[String],
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, ReviewError> {
    let frame = Frame::from_path(mutations, b'\t')?;
    frame.require_columns("mutations", group_by)?;
    frame.require_columns("mutations", display_columns)?;
    let matched = frame.filter(|row| row_locus_key(&frame, row, group_by) == *key);
    let table = if display_columns.is_empty() {
        matched
    } else {
        matched.select(display_columns)?
    };

    let mut report = Report::new();
    if table.is_empty() {
        report.add_issue(format!("no mutations matched locus '{}'", key));
    }
    table.to_tsv(output)?;
    Ok(CommandOutput::new((), report))
}

/// Build and write the reshaped track table for one locus key.
pub fn review_tracks(
    mutations: &PathBuf,
    mutation_columns: MutationColumns,
    bams: &PathBuf,
    bam_columns: BamColumns,
    key: &LocusKey,
    display_columns: &[String],
    format: TableFormat,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, ReviewError> {
    let data = load_data(mutations, mutation_columns, bams, bam_columns)?;
    let table = track_table(&data, key, display_columns)?;

    let mut report = Report::new();
    if table.is_empty() {
        report.add_issue(format!("no tracks matched locus '{}'", key));
    }

    match format {
        TableFormat::Tsv => table.to_tsv(output)?,
        TableFormat::Json => {
            let output_file = output.map_or(OutputFile::new_stdout(), OutputFile::new);
            let mut writer = output_file.writer()?;
            serde_json::to_writer_pretty(&mut writer, &table.to_records())?;
            writeln!(writer)?;
        }
    }
    Ok(CommandOutput::new((), report))
}

/// Assemble and write the igv.js session JSON for one locus key, with the
/// initial selection policy applied to the rebuilt track table.
#[allow(clippy::too_many_arguments)]
pub fn review_session(
    mutations: &PathBuf,
    mutation_columns: MutationColumns,
    bams: &PathBuf,
    bam_columns: BamColumns,
    key: &LocusKey,
    display_columns: &[String],
    init_max: usize,
    settings: TrackSettings,
    token_provider: Box<dyn TokenProvider>,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<IgvSession>, ReviewError> {
    let data = load_data(mutations, mutation_columns, bams, bam_columns)?;
    let table = track_table(&data, key, display_columns)?;
    let selection = initial_selection(init_max, table.len());

    let mut backend = IgvJs::new(settings, token_provider);
    let session = backend.show(&data, key, &table, &selection)?;

    let output_file = output.map_or(OutputFile::new_stdout(), OutputFile::new);
    let mut writer = output_file.writer()?;
    writeln!(writer, "{}", session.to_json()?)?;

    let mut report = Report::new();
    if session.tracks.is_empty() {
        report.add_issue(format!("no tracks matched locus '{}'", key));
    } else {
        report.add_issue(format!(
            "session with {} tracks at {}",
            session.tracks.len(),
            session.locus.join(", ")
        ));
    }
    Ok(CommandOutput::new(session, report))
}

/// Drive a locally running desktop IGV to one locus key, loading the
/// initially selected tracks.
#[allow(clippy::too_many_arguments)]
pub fn review_igv(
    mutations: &PathBuf,
    mutation_columns: MutationColumns,
    bams: &PathBuf,
    bam_columns: BamColumns,
    key: &LocusKey,
    init_max: usize,
    addr: &str,
    view: ViewMode,
    recv_timeout: Duration,
) -> Result<CommandOutput<usize>, ReviewError> {
    let data = load_data(mutations, mutation_columns, bams, bam_columns)?;
    let table = track_table(&data, key, &[])?;
    let selection = initial_selection(init_max, table.len());

    let mut backend = IgvDesktop::new(addr, recv_timeout, view);
    let loaded = backend.show(&data, key, &table, &selection)?;

    let mut report = Report::new();
    if loaded == 0 {
        report.add_issue("no bams selected".to_string());
    } else {
        report.add_issue(format!("loaded {} tracks into IGV at {}", loaded, addr));
    }
    Ok(CommandOutput::new(loaded, report))
}
