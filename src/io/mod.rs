//! Types and methods for reading and writing delimited table files.

pub mod file;

pub use file::{InputFile, OutputFile};
