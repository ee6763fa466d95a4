//! Pre-flight checks run once per input file before evaluation.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::core::record::parse_read_id;
use crate::parsing::truth::MIN_TRUTH_FIELDS;
use crate::parsing::{open_input, split_fields};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No read records found in {}", .path.display())]
    NoRecords { path: PathBuf },

    #[error(
        "Truth file covers reads {truth_first}..={truth_last} but called file covers \
         {called_first}..={called_last}; both must start and end with the same read"
    )]
    IdRangeMismatch {
        truth_first: u64,
        truth_last: u64,
        called_first: u64,
        called_last: u64,
    },

    #[error("Cannot infer read length: first record of {} has no sequence field", .path.display())]
    ReadLengthUnavailable { path: PathBuf },
}

/// First and last read id found in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdRange {
    pub first: u64,
    pub last: u64,
}

/// Summary of one scanned input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileScan {
    pub ids: IdRange,

    /// Length of the last field of the first record line, when that line
    /// carries fields beyond the operation string
    pub first_sequence_length: Option<u64>,
}

/// Scan `reader` for the first and last read ids.
///
/// Returns `Ok(None)` if no line starts with a read name.
///
/// # Errors
///
/// Returns `std::io::Error` if reading fails.
pub fn scan_records<R: BufRead>(reader: R) -> std::io::Result<Option<FileScan>> {
    let mut scan: Option<FileScan> = None;

    for line in reader.lines() {
        let line = line?;
        let fields = split_fields(&line);
        let Some(id) = fields.first().and_then(|name| parse_read_id(name)) else {
            continue;
        };

        match scan.as_mut() {
            Some(s) => s.ids.last = id,
            None => {
                let first_sequence_length = if fields.len() > MIN_TRUTH_FIELDS {
                    fields.last().map(|s| s.len() as u64)
                } else {
                    None
                };
                scan = Some(FileScan {
                    ids: IdRange { first: id, last: id },
                    first_sequence_length,
                });
            }
        }
    }

    Ok(scan)
}

/// Open and scan one file
///
/// # Errors
///
/// Returns `ValidationError::Io` if the file cannot be read or
/// `ValidationError::NoRecords` if it has no read records.
pub fn scan_file(path: &Path) -> Result<FileScan, ValidationError> {
    let io_err = |source| ValidationError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = open_input(path).map_err(io_err)?;
    let scan = scan_records(reader)
        .map_err(io_err)?
        .ok_or_else(|| ValidationError::NoRecords {
            path: path.to_path_buf(),
        })?;
    debug!(path = %path.display(), first = scan.ids.first, last = scan.ids.last, "Scanned");
    Ok(scan)
}

/// Result of a successful pre-validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    pub truth: FileScan,
    pub called: FileScan,
}

impl InputSummary {
    /// Read length taken from the first truth record's sequence
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ReadLengthUnavailable` if the first truth
    /// record has no sequence.
    pub fn inferred_read_length(&self, truth_path: &Path) -> Result<u64, ValidationError> {
        self.truth
            .first_sequence_length
            .filter(|len| *len > 0)
            .ok_or_else(|| ValidationError::ReadLengthUnavailable {
                path: truth_path.to_path_buf(),
            })
    }
}

/// Check that both files start and end with the same read id
///
/// # Errors
///
/// Returns `ValidationError::IdRangeMismatch` if the ranges differ, or any
/// error from [`scan_file`].
pub fn validate_inputs(truth: &Path, called: &Path) -> Result<InputSummary, ValidationError> {
    let truth_scan = scan_file(truth)?;
    let called_scan = scan_file(called)?;
    check_id_ranges(truth_scan.ids, called_scan.ids)?;
    Ok(InputSummary {
        truth: truth_scan,
        called: called_scan,
    })
}

/// Compare the id ranges of the two inputs
///
/// # Errors
///
/// Returns `ValidationError::IdRangeMismatch` if the ranges differ.
pub fn check_id_ranges(truth: IdRange, called: IdRange) -> Result<(), ValidationError> {
    if truth == called {
        Ok(())
    } else {
        Err(ValidationError::IdRangeMismatch {
            truth_first: truth.first,
            truth_last: truth.last,
            called_first: called.first,
            called_last: called.last,
        })
    }
}
