use std::io::BufRead;

use crate::core::record::{parse_read_id, CalledRecord};
use crate::parsing::{parse_position, split_fields, ParseError};

/// Fields needed up to and including CIGAR (index 5)
const MIN_CALLED_FIELDS: usize = 6;

/// Parse one line of aligner output.
///
/// Returns `Ok(None)` for lines that are not alignment records of a simulated
/// read (SAM headers, blank lines).
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` if a record line is too short or has
/// a non-numeric position.
pub fn parse_called_line(
    line: &str,
    line_number: usize,
) -> Result<Option<CalledRecord>, ParseError> {
    let fields = split_fields(line);
    let Some(read_id) = fields.first().and_then(|name| parse_read_id(name)) else {
        return Ok(None);
    };

    if fields.len() < MIN_CALLED_FIELDS {
        return Err(ParseError::malformed(
            line_number,
            line,
            format!(
                "expected at least {MIN_CALLED_FIELDS} fields, found {}",
                fields.len()
            ),
        ));
    }

    Ok(Some(CalledRecord {
        name: fields[0].to_string(),
        read_id,
        chromosome: fields[2].to_string(),
        start: parse_position(fields[3], "position", line_number, line)?,
        cigar: fields[5].to_string(),
    }))
}

/// Iterator over the alignment records of a called file
pub struct CalledReader<R> {
    inner: R,
    buf: String,
    line_number: usize,
}

impl<R: BufRead> CalledReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            line_number: 0,
        }
    }

    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Text of the line most recently read, without its line terminator
    #[must_use]
    pub fn last_line(&self) -> &str {
        self.buf.trim_end_matches(['\r', '\n'])
    }
}

impl<R: BufRead> Iterator for CalledReader<R> {
    type Item = Result<CalledRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_number += 1,
                Err(e) => return Some(Err(e.into())),
            }

            let line = self.buf.trim_end_matches(['\r', '\n']);
            match parse_called_line(line, self.line_number) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAM: &str = "@HD\tVN:1.4\tSO:queryname
@SQ\tSN:chr10\tLN:135534747
seq.1a\t83\tchr10\t123502684\t255\t100M\t=\t123502530\t-254\tATTT\t*\tNH:i:1
seq.1b\t163\tchr10\t123502530\t255\t100M\t=\t123502684\t254\tAGGG\t*\tNH:i:1
seq.2a\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\t*
";

    #[test]
    fn test_parse_called_line() {
        let line = SAM.lines().nth(2).unwrap();
        let record = parse_called_line(line, 3).unwrap().unwrap();
        assert_eq!(record.name, "seq.1a");
        assert_eq!(record.read_id, 1);
        assert_eq!(record.chromosome, "chr10");
        assert_eq!(record.start, 123_502_684);
        assert_eq!(record.cigar, "100M");
        assert!(!record.is_unmapped());
    }

    #[test]
    fn test_unmapped_record() {
        let line = SAM.lines().nth(4).unwrap();
        let record = parse_called_line(line, 5).unwrap().unwrap();
        assert!(record.is_unmapped());
        assert_eq!(record.cigar, "*");
    }

    #[test]
    fn test_header_lines_skipped() {
        assert!(parse_called_line("@HD\tVN:1.4", 1).unwrap().is_none());
        assert!(parse_called_line("", 1).unwrap().is_none());
    }

    #[test]
    fn test_short_record_is_malformed() {
        let err = parse_called_line("seq.9a\t0\tchr1\t100", 12).unwrap_err();
        match err {
            ParseError::MalformedRecord {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 12);
                assert_eq!(line, "seq.9a\t0\tchr1\t100");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reader_yields_records_only() {
        let reader = CalledReader::new(SAM.as_bytes());
        let names: Vec<String> = reader.map(|r| r.unwrap().name).collect();
        assert_eq!(names, vec!["seq.1a", "seq.1b", "seq.2a"]);
    }

    #[test]
    fn test_reader_reports_error_line() {
        let text = "seq.1a\t0\tchr1\t100\t60\t10M\nseq.2a\t0\tchr1\tnope\t60\t10M\n";
        let mut reader = CalledReader::new(text.as_bytes());
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert_eq!(reader.line_number(), 2);
        assert_eq!(reader.last_line(), "seq.2a\t0\tchr1\tnope\t60\t10M");
    }
}
