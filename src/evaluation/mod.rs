//! Aligner accuracy evaluation.
//!
//! - [`reconcile`]: Base-level comparison of truth and called match intervals
//! - [`classify`]: Per-read outcome decision and statistics update
//! - [`stats`]: The [`Statistics`] accumulator and its report
//! - [`driver`]: Lock-step streaming of truth and called files
//!
//! ## Outcomes
//!
//! Each read contributes its read length to the total. Then, per read group:
//!
//! | Condition | Bucket |
//! |-----------|--------|
//! | more than two called records | ambiguous |
//! | chromosome is `*` | unaligned |
//! | different chromosome | incorrect |
//! | same start and operation string | correct (indels credited) |
//! | anything else | split by [`reconcile::reconcile`] |
//!
//! ## Example
//!
//! ```rust
//! use align_eval::evaluation::{driver::evaluate, EvaluationConfig};
//!
//! let truth = "seq.1a\tchr1\t100\t199\t100M\nseq.1b\tchr1\t400\t499\t100M\n";
//! let called = "seq.1a\t0\tchr1\t100\t60\t100M\n";
//!
//! let result = evaluate(truth.as_bytes(), called.as_bytes(), &EvaluationConfig::new(100)).unwrap();
//! assert_eq!(result.stats.total_number_of_bases_aligned_correctly, 100);
//! ```

pub mod classify;
pub mod driver;
pub mod reconcile;
pub mod stats;

pub use stats::Statistics;

/// Groups with more called records than this are ambiguous
pub const DEFAULT_MAX_UNAMBIGUOUS_ALIGNMENTS: usize = 2;

/// Run-wide evaluation settings
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Bases credited to a bucket per read
    pub read_length: u64,
    /// Largest called-record group that is still evaluated record by record
    pub max_unambiguous_alignments: usize,
    /// Stop the run at the first read that needs base-level reconciliation
    pub stop_at_first_reconcile: bool,
}

impl EvaluationConfig {
    #[must_use]
    pub fn new(read_length: u64) -> Self {
        Self {
            read_length,
            max_unambiguous_alignments: DEFAULT_MAX_UNAMBIGUOUS_ALIGNMENTS,
            stop_at_first_reconcile: false,
        }
    }

    #[must_use]
    pub fn with_stop_at_first_reconcile(mut self, stop: bool) -> Self {
        self.stop_at_first_reconcile = stop;
        self
    }
}
