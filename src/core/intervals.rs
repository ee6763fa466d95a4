use serde::{Deserialize, Serialize};

use crate::core::cigar::{parse_operations, CigarError, OpKind, Operation};

/// Half-open reference interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "interval end before start");
        Self { start, end }
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of reference positions shared with `other`
    #[must_use]
    pub fn overlap(&self, other: &Interval) -> u64 {
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
    }
}

/// Operation that does not consume the reference, anchored at the reference
/// position where it occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchoredSpan {
    pub position: u64,
    pub length: u64,
}

/// Reference-space layout of one alignment, split by operation kind.
///
/// Built by walking the operations with a cursor that starts at the
/// alignment start and advances only over reference-consuming operations.
///
/// ```
/// use align_eval::core::intervals::{AnchoredSpan, Interval, MappingIntervals};
///
/// let mi = MappingIntervals::parse("95M3I4D123N30S", 100).unwrap();
/// assert_eq!(mi.matches, vec![Interval::new(100, 195)]);
/// assert_eq!(mi.insertions, vec![AnchoredSpan { position: 195, length: 3 }]);
/// assert_eq!(mi.deletions, vec![Interval::new(195, 199)]);
/// assert_eq!(mi.skipped, vec![Interval::new(199, 322)]);
/// assert_eq!(mi.unaligned, vec![AnchoredSpan { position: 322, length: 30 }]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingIntervals {
    pub matches: Vec<Interval>,
    pub insertions: Vec<AnchoredSpan>,
    pub deletions: Vec<Interval>,
    pub skipped: Vec<Interval>,
    pub unaligned: Vec<AnchoredSpan>,

    /// Operations that were not placed in any list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsupported: Vec<Operation>,
}

impl MappingIntervals {
    /// Tokenize `cigar` and lay it out from `start`.
    ///
    /// # Errors
    ///
    /// Returns `CigarError` if the operation string is malformed or the
    /// alignment extends past `u64::MAX`.
    pub fn parse(cigar: &str, start: u64) -> Result<Self, CigarError> {
        let ops = parse_operations(cigar)?;
        Self::from_operations(&ops, start)
    }

    /// Lay out already tokenized operations from `start`.
    ///
    /// # Errors
    ///
    /// Returns `CigarError::CoordinateOverflow` if a reference-consuming
    /// operation would move the cursor past `u64::MAX`.
    pub fn from_operations(ops: &[Operation], start: u64) -> Result<Self, CigarError> {
        let mut mi = Self::default();
        let mut cursor = start;
        let advance = |cursor: u64, len: u64| {
            cursor
                .checked_add(len)
                .ok_or(CigarError::CoordinateOverflow { start })
        };

        for op in ops {
            match op.kind {
                OpKind::Match => {
                    let end = advance(cursor, op.len)?;
                    mi.matches.push(Interval::new(cursor, end));
                    cursor = end;
                }
                OpKind::Deletion => {
                    let end = advance(cursor, op.len)?;
                    mi.deletions.push(Interval::new(cursor, end));
                    cursor = end;
                }
                OpKind::Skip => {
                    let end = advance(cursor, op.len)?;
                    mi.skipped.push(Interval::new(cursor, end));
                    cursor = end;
                }
                OpKind::Insertion => mi.insertions.push(AnchoredSpan {
                    position: cursor,
                    length: op.len,
                }),
                OpKind::Clip => mi.unaligned.push(AnchoredSpan {
                    position: cursor,
                    length: op.len,
                }),
                OpKind::Unsupported(_) => mi.unsupported.push(*op),
            }
        }

        Ok(mi)
    }

    /// Total bases in insertion operations
    #[must_use]
    pub fn inserted_bases(&self) -> u64 {
        self.insertions
            .iter()
            .fold(0, |acc, s| acc.saturating_add(s.length))
    }

    /// Total bases in deletion operations
    #[must_use]
    pub fn deleted_bases(&self) -> u64 {
        self.deletions.iter().map(Interval::len).sum()
    }
}

impl std::fmt::Display for MappingIntervals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn ranges(v: &[Interval]) -> String {
            v.iter()
                .map(|i| format!("{}-{}", i.start, i.end))
                .collect::<Vec<_>>()
                .join(",")
        }
        fn spans(v: &[AnchoredSpan]) -> String {
            v.iter()
                .map(|s| format!("{}+{}", s.position, s.length))
                .collect::<Vec<_>>()
                .join(",")
        }

        write!(
            f,
            "matches=[{}] insertions=[{}] deletions=[{}] skipped=[{}] unaligned=[{}]",
            ranges(&self.matches),
            spans(&self.insertions),
            ranges(&self.deletions),
            ranges(&self.skipped),
            spans(&self.unaligned),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_match() {
        let mi = MappingIntervals::parse("100M", 100).unwrap();
        assert_eq!(mi.matches, vec![Interval::new(100, 200)]);
        assert!(mi.insertions.is_empty());
        assert!(mi.deletions.is_empty());
        assert!(mi.skipped.is_empty());
        assert!(mi.unaligned.is_empty());
        assert!(mi.unsupported.is_empty());
    }

    #[test]
    fn test_parse_mixed() {
        let mi = MappingIntervals::parse("95M3I4D123N30S", 100).unwrap();
        assert_eq!(mi.matches, vec![Interval::new(100, 195)]);
        assert_eq!(
            mi.insertions,
            vec![AnchoredSpan {
                position: 195,
                length: 3
            }]
        );
        assert_eq!(mi.deletions, vec![Interval::new(195, 199)]);
        assert_eq!(mi.skipped, vec![Interval::new(199, 322)]);
        assert_eq!(
            mi.unaligned,
            vec![AnchoredSpan {
                position: 322,
                length: 30
            }]
        );
    }

    #[test]
    fn test_spliced_read() {
        let mi = MappingIntervals::parse("10S40M500N50M", 1000).unwrap();
        assert_eq!(
            mi.matches,
            vec![Interval::new(1000, 1040), Interval::new(1540, 1590)]
        );
        assert_eq!(mi.unaligned[0].position, 1000);
        assert_eq!(mi.skipped, vec![Interval::new(1040, 1540)]);
    }

    #[test]
    fn test_unsupported_does_not_move_cursor() {
        let mi = MappingIntervals::parse("10M5X10M", 0).unwrap();
        assert_eq!(
            mi.matches,
            vec![Interval::new(0, 10), Interval::new(10, 20)]
        );
        assert_eq!(
            mi.unsupported,
            vec![Operation::new(OpKind::Unsupported('X'), 5)]
        );
    }

    #[test]
    fn test_indel_totals() {
        let mi = MappingIntervals::parse("10M2I10M3D5M1I", 0).unwrap();
        assert_eq!(mi.inserted_bases(), 3);
        assert_eq!(mi.deleted_bases(), 3);
    }

    #[test]
    fn test_layout_past_coordinate_space_fails() {
        assert_eq!(
            MappingIntervals::parse("18446744073709551615M", 100),
            Err(CigarError::CoordinateOverflow { start: 100 })
        );
        assert!(matches!(
            MappingIntervals::parse("10M18446744073709551610D", 0),
            Err(CigarError::CoordinateOverflow { start: 0 })
        ));
        // Insertions and clips do not move the cursor
        let mi = MappingIntervals::parse("18446744073709551615I", 100).unwrap();
        assert_eq!(mi.inserted_bases(), u64::MAX);
    }

    #[test]
    fn test_overlap() {
        let a = Interval::new(100, 200);
        assert_eq!(a.overlap(&Interval::new(150, 250)), 50);
        assert_eq!(a.overlap(&Interval::new(200, 300)), 0);
        assert_eq!(a.overlap(&Interval::new(0, 50)), 0);
        assert_eq!(a.overlap(&Interval::new(120, 130)), 10);
    }

    #[test]
    fn test_display() {
        let mi = MappingIntervals::parse("5M2I5M", 10).unwrap();
        assert_eq!(
            mi.to_string(),
            "matches=[10-15,15-20] insertions=[15+2] deletions=[] skipped=[] unaligned=[]"
        );
    }
}
