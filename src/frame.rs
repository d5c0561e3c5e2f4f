//! The [`Frame`] type, a minimal in-memory table of named string columns.
//!
//! Mutation and BAM reference tables arrive as delimited text with an
//! arbitrary set of columns, only some of which are named by the review
//! configuration. [`Frame`] stores that data row-oriented, with every cell
//! as its string representation. This matches how the tables are consumed:
//! locus keys are string joins of cell values, and track tables are handed
//! back to the display layer as records of strings. Frames are read-only
//! for the life of a review session; every lookup re-derives its result
//! from the full table.

use std::io::Write;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::ReviewError;
use crate::io::{InputFile, OutputFile};

/// An ordered mapping of column name to cell value, one per row. This is
/// the row-oriented "records" shape the hosting layer renders.
pub type Record = IndexMap<String, String>;

/// An in-memory table with named columns and string cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    /// Create an empty [`Frame`] with the given column names.
    ///
    /// Duplicated column names are rejected, since columns are addressed
    /// by name.
    pub fn new(columns: Vec<String>) -> Result<Self, ReviewError> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(ReviewError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a [`Frame`] from column names and rows, validating row widths.
    pub fn from_rows(
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, ReviewError> {
        let mut frame = Self::new(columns)?;
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Read a [`Frame`] from a delimited text file with a header line.
    /// Gzip-compressed input is handled transparently.
    pub fn from_path(
        filepath: impl Into<PathBuf>,
        delimiter: u8,
    ) -> Result<Self, ReviewError> {
        let input_file = InputFile::new(filepath);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(input_file.reader()?);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut frame = Self::new(columns)?;
        for result in reader.records() {
            let record = result?;
            frame.push_row(record.iter().map(|cell| cell.to_string()).collect())?;
        }
        Ok(frame)
    }

    /// Append one row; its width must match the column count.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), ReviewError> {
        if row.len() != self.columns.len() {
            return Err(ReviewError::RowWidthMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Get the column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the total number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return whether the [`Frame`] contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the positional index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Check that every named column exists, reporting *all* missing
    /// columns at once in the error.
    pub fn require_columns(
        &self,
        table: &str,
        names: &[String],
    ) -> Result<(), ReviewError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReviewError::MissingColumns {
                table: table.to_string(),
                columns: missing,
            })
        }
    }

    /// Get a cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let column_index = self.column_index(column)?;
        self.rows.get(row).map(|cells| cells[column_index].as_str())
    }

    /// Get a full row of cells by index.
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|cells| cells.as_slice())
    }

    /// Iterate over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|cells| cells.as_slice())
    }

    /// Build a new [`Frame`] with the same columns, keeping only the rows
    /// for which the predicate returns `true`.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&[String]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|cells| predicate(cells.as_slice()))
                .cloned()
                .collect(),
        }
    }

    /// Build a new [`Frame`] containing only the named columns, in the
    /// given order.
    pub fn select(&self, names: &[String]) -> Result<Self, ReviewError> {
        self.require_columns("selected", names)?;
        let indices: Vec<usize> = names
            .iter()
            .map(|name| self.column_index(name).unwrap())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|cells| indices.iter().map(|&i| cells[i].clone()).collect())
            .collect();
        Ok(Self {
            columns: names.to_vec(),
            rows,
        })
    }

    /// Convert to row-oriented records, preserving column order.
    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|cells| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(cells.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Write the table as TSV, header included, to a file or standard output.
    pub fn to_tsv(&self, output: Option<impl Into<PathBuf>>) -> Result<(), ReviewError> {
        let output_file = output.map_or(OutputFile::new_stdout(), OutputFile::new);
        let mut writer = output_file.writer()?;
        writeln!(writer, "{}", self.columns.join("\t"))?;
        for cells in &self.rows {
            writeln!(writer, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
