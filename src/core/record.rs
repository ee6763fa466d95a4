use serde::{Deserialize, Serialize};

/// Chromosome value used by aligners for reads they could not place
pub const UNMAPPED_CHROMOSOME: &str = "*";

/// Prefix shared by all simulated read names (`seq.1a`, `seq.1b`, `seq.2a`, ...)
pub const READ_NAME_PREFIX: &str = "seq";

/// Extract the integer read id from a read name of the form `seq.<integer>...`.
///
/// Mate suffixes are ignored, so `seq.12a` and `seq.12b` both yield `12`.
/// Returns `None` if the token does not look like a simulated read name.
///
/// ```
/// use align_eval::core::record::parse_read_id;
///
/// assert_eq!(parse_read_id("seq.12a"), Some(12));
/// assert_eq!(parse_read_id("@HD"), None);
/// ```
#[must_use]
pub fn parse_read_id(token: &str) -> Option<u64> {
    let rest = token.strip_prefix(READ_NAME_PREFIX)?;
    // any single separator character
    let mut chars = rest.chars();
    chars.next()?;
    let rest = chars.as_str();

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    rest[..digits_end].parse().ok()
}

/// Ground-truth placement of one simulated read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthRecord {
    /// Full read name, including any mate suffix
    pub name: String,

    /// Integer id shared by all records of this read
    pub read_id: u64,

    pub chromosome: String,

    pub start: u64,

    pub end: u64,

    /// CIGAR-style operation string
    pub cigar: String,

    /// Read sequence (last field of the line), when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
}

/// One alignment reported by the aligner under evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalledRecord {
    pub name: String,
    pub read_id: u64,

    /// Reference name, or [`UNMAPPED_CHROMOSOME`]
    pub chromosome: String,

    pub start: u64,
    pub cigar: String,
}

impl CalledRecord {
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.chromosome == UNMAPPED_CHROMOSOME
    }
}
