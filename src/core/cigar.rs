use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarError {
    #[error("Empty operation string")]
    Empty,

    #[error("Operation '{op}' at offset {offset} has no length in '{cigar}'")]
    MissingLength {
        op: char,
        offset: usize,
        cigar: String,
    },

    #[error("Trailing length without an operation in '{0}'")]
    DanglingLength(String),

    #[error("Operation length overflows in '{0}'")]
    LengthOverflow(String),

    #[error("Alignment starting at {start} runs past the end of the coordinate space")]
    CoordinateOverflow { start: u64 },
}

/// Kind of a single CIGAR operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// `M`: aligned bases, consumes reference
    Match,
    /// `I`: bases present in the read only
    Insertion,
    /// `D`: bases present in the reference only
    Deletion,
    /// `N`: skipped reference region (intron)
    Skip,
    /// `S` or `H`: soft or hard clip
    Clip,
    /// Any other operation character; carried through so callers can report it
    Unsupported(char),
}

impl OpKind {
    #[must_use]
    pub fn from_char(c: char) -> Self {
        match c {
            'M' => Self::Match,
            'I' => Self::Insertion,
            'D' => Self::Deletion,
            'N' => Self::Skip,
            'S' | 'H' => Self::Clip,
            other => Self::Unsupported(other),
        }
    }

    /// Does this operation advance the reference position?
    #[must_use]
    pub fn consumes_reference(self) -> bool {
        matches!(self, Self::Match | Self::Deletion | Self::Skip)
    }
}

/// A (kind, length) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OpKind,
    pub len: u64,
}

impl Operation {
    #[must_use]
    pub fn new(kind: OpKind, len: u64) -> Self {
        Self { kind, len }
    }
}

/// Tokenize an operation string such as `95M3I4D123N30S` into ordered operations.
///
/// Unknown operation characters are kept as [`OpKind::Unsupported`]; only
/// structural problems (a kind with no length, a length with no kind) fail.
///
/// # Errors
///
/// Returns `CigarError` if the string is empty or not a sequence of
/// `<digits><letter>` tokens.
pub fn parse_operations(cigar: &str) -> Result<Vec<Operation>, CigarError> {
    if cigar.is_empty() {
        return Err(CigarError::Empty);
    }

    let mut ops = Vec::new();
    let mut len: Option<u64> = None;

    for (offset, c) in cigar.char_indices() {
        if let Some(digit) = c.to_digit(10) {
            let current = len.unwrap_or(0);
            len = Some(
                current
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(digit)))
                    .ok_or_else(|| CigarError::LengthOverflow(cigar.to_string()))?,
            );
        } else {
            let Some(n) = len.take() else {
                return Err(CigarError::MissingLength {
                    op: c,
                    offset,
                    cigar: cigar.to_string(),
                });
            };
            ops.push(Operation::new(OpKind::from_char(c), n));
        }
    }

    if len.is_some() {
        return Err(CigarError::DanglingLength(cigar.to_string()));
    }

    Ok(ops)
}

/// Sum of the lengths of all operations of one kind
#[must_use]
pub fn total_len(ops: &[Operation], kind: OpKind) -> u64 {
    ops.iter()
        .filter(|op| op.kind == kind)
        .fold(0, |acc, op| acc.saturating_add(op.len))
}
