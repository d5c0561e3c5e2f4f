//! Types for standardized reports to the user about review operations.
//!
//! Lookup misses are not errors in this crate (an unknown locus simply
//! yields an empty table), so commands use a [`Report`] to tell the user
//! *why* their output is empty, alongside ordinary notices like row counts.

/// The [`CommandOutput<U>`] type is generic over some data output from a
/// command, plus a [`Report`] of notices for the user.
pub struct CommandOutput<U> {
    pub value: U,
    pub report: Report,
}

impl<U> CommandOutput<U> {
    pub fn new(value: U, report: Report) -> Self {
        Self { value, report }
    }
}

/// A collection of user-facing notices accumulated while a command ran.
#[derive(Default)]
pub struct Report {
    entries: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, message: String) {
        self.entries.push(message)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Print every notice to standard error.
    pub fn print(&self) {
        for entry in &self.entries {
            eprintln!("{}", entry);
        }
    }
}
