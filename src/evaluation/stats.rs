use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Safely convert a base count to f64 for rate calculations
#[inline]
fn count_to_f64(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        count_to_f64(numerator) / count_to_f64(denominator)
    }
}

/// Base-level accuracy counters for one evaluation run.
///
/// All values are in bases. Field names double as the report keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_number_of_bases_of_reads: u64,
    pub total_number_of_bases_aligned_correctly: u64,
    pub total_number_of_bases_aligned_incorrectly: u64,
    pub total_number_of_bases_aligned_ambiguously: u64,
    pub total_number_of_bases_unaligned: u64,
    pub total_number_of_bases_in_true_insertions: u64,
    pub total_number_of_bases_in_true_deletions: u64,
    pub total_number_of_bases_called_insertions: u64,
    pub total_number_of_bases_called_deletions: u64,
    pub insertions_called_correctly: u64,
    pub deletions_called_correctly: u64,
}

impl Statistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters as `(name, value)` pairs in report order
    #[must_use]
    pub fn fields(&self) -> [(&'static str, u64); 11] {
        [
            (
                "total_number_of_bases_of_reads",
                self.total_number_of_bases_of_reads,
            ),
            (
                "total_number_of_bases_aligned_correctly",
                self.total_number_of_bases_aligned_correctly,
            ),
            (
                "total_number_of_bases_aligned_incorrectly",
                self.total_number_of_bases_aligned_incorrectly,
            ),
            (
                "total_number_of_bases_aligned_ambiguously",
                self.total_number_of_bases_aligned_ambiguously,
            ),
            (
                "total_number_of_bases_unaligned",
                self.total_number_of_bases_unaligned,
            ),
            (
                "total_number_of_bases_in_true_insertions",
                self.total_number_of_bases_in_true_insertions,
            ),
            (
                "total_number_of_bases_in_true_deletions",
                self.total_number_of_bases_in_true_deletions,
            ),
            (
                "total_number_of_bases_called_insertions",
                self.total_number_of_bases_called_insertions,
            ),
            (
                "total_number_of_bases_called_deletions",
                self.total_number_of_bases_called_deletions,
            ),
            (
                "insertions_called_correctly",
                self.insertions_called_correctly,
            ),
            ("deletions_called_correctly", self.deletions_called_correctly),
        ]
    }

    /// Field-wise sum, for combining partial results
    pub fn merge(&mut self, other: &Statistics) {
        self.total_number_of_bases_of_reads += other.total_number_of_bases_of_reads;
        self.total_number_of_bases_aligned_correctly +=
            other.total_number_of_bases_aligned_correctly;
        self.total_number_of_bases_aligned_incorrectly +=
            other.total_number_of_bases_aligned_incorrectly;
        self.total_number_of_bases_aligned_ambiguously +=
            other.total_number_of_bases_aligned_ambiguously;
        self.total_number_of_bases_unaligned += other.total_number_of_bases_unaligned;
        self.total_number_of_bases_in_true_insertions +=
            other.total_number_of_bases_in_true_insertions;
        self.total_number_of_bases_in_true_deletions +=
            other.total_number_of_bases_in_true_deletions;
        self.total_number_of_bases_called_insertions +=
            other.total_number_of_bases_called_insertions;
        self.total_number_of_bases_called_deletions +=
            other.total_number_of_bases_called_deletions;
        self.insertions_called_correctly += other.insertions_called_correctly;
        self.deletions_called_correctly += other.deletions_called_correctly;
    }

    #[must_use]
    pub fn rates(&self) -> Rates {
        let total = self.total_number_of_bases_of_reads;
        Rates {
            fraction_aligned_correctly: ratio(self.total_number_of_bases_aligned_correctly, total),
            fraction_aligned_incorrectly: ratio(
                self.total_number_of_bases_aligned_incorrectly,
                total,
            ),
            fraction_aligned_ambiguously: ratio(
                self.total_number_of_bases_aligned_ambiguously,
                total,
            ),
            fraction_unaligned: ratio(self.total_number_of_bases_unaligned, total),
            insertion_precision: ratio(
                self.insertions_called_correctly,
                self.total_number_of_bases_called_insertions,
            ),
            insertion_recall: ratio(
                self.insertions_called_correctly,
                self.total_number_of_bases_in_true_insertions,
            ),
            deletion_precision: ratio(
                self.deletions_called_correctly,
                self.total_number_of_bases_called_deletions,
            ),
            deletion_recall: ratio(
                self.deletions_called_correctly,
                self.total_number_of_bases_in_true_deletions,
            ),
        }
    }
}

impl AddAssign<&Statistics> for Statistics {
    fn add_assign(&mut self, other: &Statistics) {
        self.merge(other);
    }
}

impl AddAssign for Statistics {
    fn add_assign(&mut self, other: Statistics) {
        self.merge(&other);
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in self.fields() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// Fractions derived from [`Statistics`]; 0.0 when the denominator is zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rates {
    pub fraction_aligned_correctly: f64,
    pub fraction_aligned_incorrectly: f64,
    pub fraction_aligned_ambiguously: f64,
    pub fraction_unaligned: f64,
    pub insertion_precision: f64,
    pub insertion_recall: f64,
    pub deletion_precision: f64,
    pub deletion_recall: f64,
}
