use std::io::BufRead;

use crate::core::record::{parse_read_id, TruthRecord};
use crate::parsing::{parse_position, split_fields, ParseError};

/// Minimum number of tab-delimited fields on a truth line
pub(crate) const MIN_TRUTH_FIELDS: usize = 5;

/// Parse the first line of a truth pair.
///
/// Returns `Ok(None)` for lines that are not truth records (blank lines,
/// headers).
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` if the line starts with a read name
/// but has too few fields or non-numeric coordinates.
pub fn parse_truth_line(
    line: &str,
    line_number: usize,
) -> Result<Option<TruthRecord>, ParseError> {
    let fields = split_fields(line);
    let Some(read_id) = fields.first().and_then(|name| parse_read_id(name)) else {
        return Ok(None);
    };

    if fields.len() < MIN_TRUTH_FIELDS {
        return Err(ParseError::malformed(
            line_number,
            line,
            format!(
                "expected at least {MIN_TRUTH_FIELDS} fields, found {}",
                fields.len()
            ),
        ));
    }

    let start = parse_position(fields[2], "start", line_number, line)?;
    let end = parse_position(fields[3], "end", line_number, line)?;

    let sequence = if fields.len() > MIN_TRUTH_FIELDS {
        fields.last().map(|s| (*s).to_string())
    } else {
        None
    };

    Ok(Some(TruthRecord {
        name: fields[0].to_string(),
        read_id,
        chromosome: fields[1].to_string(),
        start,
        end,
        cigar: fields[4].to_string(),
        sequence,
    }))
}

/// Streams truth records from a truth file.
///
/// Each simulated read occupies exactly two lines; only the first is parsed,
/// the second (the mate) is consumed and discarded.
pub struct TruthReader<R> {
    inner: R,
    buf: String,
    mate: String,
    line_number: usize,
}

impl<R: BufRead> TruthReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            mate: String::new(),
            line_number: 0,
        }
    }

    /// Number of lines consumed so far
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn read_line(&mut self) -> Result<bool, ParseError> {
        self.buf.clear();
        let n = self.inner.read_line(&mut self.buf)?;
        if n > 0 {
            self.line_number += 1;
        }
        Ok(n > 0)
    }

    /// Consume the mate line into its own buffer, keeping `buf` intact
    fn skip_mate(&mut self) -> Result<bool, ParseError> {
        self.mate.clear();
        let n = self.inner.read_line(&mut self.mate)?;
        if n > 0 {
            self.line_number += 1;
        }
        Ok(n > 0)
    }

    /// Read the next two-line unit and return its first record.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MalformedRecord` for unparseable lines, or
    /// `ParseError::TruncatedInput` if the file ends between the two lines of
    /// a unit.
    pub fn next_record(&mut self) -> Result<Option<TruthRecord>, ParseError> {
        let record = loop {
            if !self.read_line()? {
                return Ok(None);
            }
            let line = self.buf.trim_end_matches(['\r', '\n']);
            if let Some(record) = parse_truth_line(line, self.line_number)? {
                break record;
            }
        };

        if !self.skip_mate()? {
            return Err(ParseError::TruncatedInput {
                read_id: record.read_id,
                line_number: self.line_number,
                line: self.buf.trim_end_matches(['\r', '\n']).to_string(),
            });
        }

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUTH: &str = "seq.1a\tchr10\t123502684\t123502783\t100M\t123502684-123502783\t-\tCTTAAGTATG
seq.1b\tchr10\t123502530\t123502629\t100M\t123502530-123502629\t+\tAGGGAGTACT
seq.2a\tchr1\t500\t603\t50M3I47M\t500-603\t+\tACGTACGTAA
seq.2b\tchr1\t900\t999\t100M\t900-999\t-\tTTTTTTTTTT
";

    #[test]
    fn test_parse_truth_line() {
        let line = TRUTH.lines().next().unwrap();
        let record = parse_truth_line(line, 1).unwrap().unwrap();
        assert_eq!(record.name, "seq.1a");
        assert_eq!(record.read_id, 1);
        assert_eq!(record.chromosome, "chr10");
        assert_eq!(record.start, 123_502_684);
        assert_eq!(record.end, 123_502_783);
        assert_eq!(record.cigar, "100M");
        assert_eq!(record.sequence.as_deref(), Some("CTTAAGTATG"));
    }

    #[test]
    fn test_minimal_line_has_no_sequence() {
        let record = parse_truth_line("seq.3a\tchr2\t10\t110\t100M", 1)
            .unwrap()
            .unwrap();
        assert!(record.sequence.is_none());
    }

    #[test]
    fn test_non_record_lines_skipped() {
        assert!(parse_truth_line("", 1).unwrap().is_none());
        assert!(parse_truth_line("# comment", 1).unwrap().is_none());
    }

    #[test]
    fn test_malformed_lines() {
        let err = parse_truth_line("seq.1a\tchr1\t100", 4).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedRecord { line_number: 4, .. }
        ));

        let err = parse_truth_line("seq.1a\tchr1\tx\t200\t100M", 1).unwrap_err();
        assert!(err.to_string().contains("invalid start"));
    }

    #[test]
    fn test_reader_reads_pairs() {
        let mut reader = TruthReader::new(TRUTH.as_bytes());
        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.name, "seq.1a");
        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.name, "seq.2a");
        assert_eq!(second.cigar, "50M3I47M");
        assert_eq!(reader.line_number(), 4);
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn test_reader_truncated_pair() {
        let text = "seq.1a\tchr1\t1\t100\t100M\tx\t+\tACGT\n";
        let mut reader = TruthReader::new(text.as_bytes());
        match reader.next_record().unwrap_err() {
            ParseError::TruncatedInput {
                read_id,
                line_number,
                line,
            } => {
                assert_eq!(read_id, 1);
                assert_eq!(line_number, 1);
                assert_eq!(line, "seq.1a\tchr1\t1\t100\t100M\tx\t+\tACGT");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reader_on_empty() {
        let mut reader = TruthReader::new("".as_bytes());
        assert!(reader.next_record().unwrap().is_none());
    }
}
