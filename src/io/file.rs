//! Input/Output file handling with [`InputFile`] and [`OutputFile`].
//!
//! These types abstract over reading/writing both plaintext and gzip-compressed
//! input/output.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::io::{self, BufWriter};
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// Check if a file is gzipped by looking for the magic numbers
fn is_gzipped_file(file_path: impl Into<PathBuf>) -> io::Result<bool> {
    let mut file = File::open(file_path.into())?;
    let mut buffer = [0; 2];
    Ok(match file.read_exact(&mut buffer) {
        Ok(()) => buffer == [0x1f, 0x8b],
        // too short to carry the magic numbers, so not gzipped
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => false,
        Err(err) => return Err(err),
    })
}

/// Represents an input table file.
///
/// This abstracts how data is read in, allowing both plaintext and
/// gzip-compressed input to be read through a common interface.
#[derive(Clone, Debug)]
pub struct InputFile {
    pub filepath: PathBuf,
}

impl InputFile {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    /// Opens the file and returns a buffered reader, decompressing
    /// transparently when the content is gzipped.
    pub fn reader(&self) -> io::Result<BufReader<Box<dyn Read>>> {
        let file = File::open(&self.filepath)?;
        let is_gzipped = is_gzipped_file(&self.filepath)?;
        let reader: Box<dyn Read> = if is_gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(BufReader::new(reader))
    }
}

enum OutputDestination {
    File(PathBuf),
    Stdout,
}

/// Represents an output file.
///
/// This abstracts writing both plaintext and gzip-compressed files, with
/// standard output as a destination when no file is given.
pub struct OutputFile {
    destination: OutputDestination,
}

impl OutputFile {
    /// Constructs a new [`OutputFile`]. If the file extension is `.gz`,
    /// the output will be gzip-compressed.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            destination: OutputDestination::File(filepath.into()),
        }
    }

    /// Constructs a new [`OutputFile`] for standard output.
    pub fn new_stdout() -> Self {
        Self {
            destination: OutputDestination::Stdout,
        }
    }

    /// Opens the destination and returns a writer.
    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        let writer: Box<dyn Write> = match &self.destination {
            OutputDestination::File(path) => {
                let is_gzip = path.extension().is_some_and(|ext| ext == "gz");
                if is_gzip {
                    Box::new(BufWriter::new(GzEncoder::new(
                        File::create(path)?,
                        Compression::default(),
                    )))
                } else {
                    Box::new(BufWriter::new(File::create(path)?))
                }
            }
            OutputDestination::Stdout => Box::new(BufWriter::new(io::stdout())),
        };
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_gzip_roundtrip_detection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.tsv.gz");

        let output = OutputFile::new(&path);
        let mut writer = output.writer().unwrap();
        writeln!(writer, "chrom\tpos").unwrap();
        writer.flush().unwrap();
        drop(writer);

        let input = InputFile::new(&path);
        let mut contents = String::new();
        input.reader().unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "chrom\tpos\n");
    }

    #[test]
    fn test_plaintext_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.tsv");
        std::fs::write(&path, "a\tb\n").unwrap();

        let input = InputFile::new(&path);
        let mut contents = String::new();
        input.reader().unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "a\tb\n");
    }
}
