//! Readers for the two evaluation inputs.
//!
//! - **Truth file** ([`truth`]): two lines per simulated read; the first line
//!   holds `name, chromosome, start, end, cigar, ..., sequence`
//! - **Called file** ([`called`]): aligner output in SAM layout; only
//!   `QNAME` (0), `RNAME` (2), `POS` (3) and `CIGAR` (5) are used
//!
//! Lines whose first field is not a simulated read name (`seq.<integer>`),
//! such as SAM `@` header lines, are skipped by both readers.
//!
//! Files ending in `.gz` are decompressed on the fly.
//!
//! ## Example
//!
//! ```rust
//! use align_eval::parsing::called::parse_called_line;
//!
//! let line = "seq.1a\t83\tchr10\t123502684\t255\t100M\t=\t123502530\t-254\tACGT\t*";
//! let record = parse_called_line(line, 1).unwrap().unwrap();
//! assert_eq!(record.read_id, 1);
//! assert_eq!(record.cigar, "100M");
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::core::cigar::CigarError;

pub mod called;
pub mod truth;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line_number} ({reason}): '{line}'")]
    MalformedRecord {
        line_number: usize,
        line: String,
        reason: String,
    },

    /// `line_number` and `line` locate the record that needed the missing
    /// truth unit
    #[error("Truth file ended before a record for read {read_id} could be read (line {line_number}: '{line}')")]
    TruncatedInput {
        read_id: u64,
        line_number: usize,
        line: String,
    },

    #[error("Truth and called files are out of sync: expected read {expected}, truth file has '{found}' (called line {line_number}: '{line}')")]
    ReadIdMismatch {
        expected: u64,
        found: String,
        line_number: usize,
        line: String,
    },

    #[error("Invalid operation string for read '{name}': {source}")]
    Cigar {
        name: String,
        #[source]
        source: CigarError,
    },
}

impl ParseError {
    pub(crate) fn malformed(line_number: usize, line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line_number,
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

/// Is `path` gzip-compressed, judging by its extension?
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Open a plain or gzip-compressed text file for line-oriented reading
///
/// # Errors
///
/// Returns `std::io::Error` if the file cannot be opened.
pub fn open_input(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Split a line on tabs, dropping a trailing carriage return
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n']).split('\t').collect()
}

/// Parse a 1-based coordinate field
pub(crate) fn parse_position(
    field: &str,
    what: &str,
    line_number: usize,
    line: &str,
) -> Result<u64, ParseError> {
    field
        .trim()
        .parse()
        .map_err(|_| ParseError::malformed(line_number, line, format!("invalid {what} '{field}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("truth.cig.gz")));
        assert!(is_gzipped(Path::new("/data/Aligned.SAM.GZ")));
        assert!(!is_gzipped(Path::new("truth.cig")));
        assert!(!is_gzipped(Path::new("called.sam")));
    }

    #[test]
    fn test_open_gzipped_input() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".sam.gz").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"seq.1a\t0\tchr1\n").unwrap();
        temp.write_all(&encoder.finish().unwrap()).unwrap();
        temp.flush().unwrap();

        let mut text = String::new();
        open_input(temp.path())
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "seq.1a\t0\tchr1\n");
    }

    #[test]
    fn test_split_fields_strips_crlf() {
        assert_eq!(split_fields("a\tb\tc\r\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("100", "start", 1, "").unwrap(), 100);
        let err = parse_position("abc", "start", 7, "seq.1\tchr1\tabc").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("invalid start 'abc'"));
        assert!(msg.contains("seq.1\tchr1\tabc"));
    }
}
