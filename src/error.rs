//! The [`ReviewError`] `enum` definition and error messages.
//!
use thiserror::Error;

/// The [`ReviewError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum ReviewError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Delimited table parsing error: {0}")]
    CsvError(#[from] csv::Error),

    // Table construction errors
    #[error("Column '{0}' is duplicated in the table header")]
    DuplicateColumn(String),
    #[error("Column '{0}' collides with a generated track table column")]
    ReservedColumn(String),
    #[error("Row has {found} fields but the table has {expected} columns")]
    RowWidthMismatch { expected: usize, found: usize },
    #[error("Following columns do not exist in the {table} table: {columns:?}")]
    MissingColumns { table: String, columns: Vec<String> },

    // Column configuration errors
    #[error("No grouping columns were configured; at least one is required")]
    EmptyGroupBy,
    #[error("Chromosome and position column lists differ in length ({chrom} vs {pos}); they must be positionally paired")]
    UnpairedLocusColumns { chrom: usize, pos: usize },
    #[error("BAM and BAI column lists differ in length ({bam} vs {bai}); they must be positionally paired")]
    UnpairedTrackColumns { bam: usize, bai: usize },

    // Credential fetch errors
    #[error("Token command '{command}' exited with {status}: {stderr}")]
    TokenCommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("Token command '{0}' produced an empty token")]
    EmptyToken(String),

    // Desktop IGV errors
    #[error("IGV at {0} refused the connection: {1}")]
    IgvConnection(String, std::io::Error),
    #[error("IGV rejected command '{command}': {response}")]
    IgvCommand { command: String, response: String },
    #[error("IGV closed the connection mid-command")]
    IgvDisconnected,

    // Serialization errors
    #[error("Session serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    // Command line tool related errors
    #[error("Command line argument error: {0}")]
    ArgumentError(#[from] clap::error::Error),
}
