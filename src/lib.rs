//! # align-eval
//!
//! A library for measuring how accurately a read aligner placed simulated reads.
//!
//! Read simulators know exactly where each read came from and which edits it
//! carries. Given that truth and the aligner's SAM output, `align-eval`
//! reconciles the two read by read and reports, in bases:
//!
//! - **Correct / incorrect placement**: exact matches, wrong chromosomes, and a
//!   base-level split for everything in between
//! - **Ambiguity**: reads the aligner reported in more than two places
//! - **Unaligned bases**: reads reported as unmapped, and clipped bases
//! - **Indel calling**: true vs called insertion and deletion bases
//!
//! ## Example
//!
//! ```rust
//! use align_eval::{evaluate, EvaluationConfig};
//!
//! let truth = "seq.1a\tchr1\t100\t199\t100M\nseq.1b\tchr1\t400\t499\t100M\n";
//! let called = "seq.1a\t0\tchr1\t150\t60\t100M\n";
//!
//! let result = evaluate(truth.as_bytes(), called.as_bytes(), &EvaluationConfig::new(100)).unwrap();
//! assert_eq!(result.stats.total_number_of_bases_aligned_correctly, 50);
//! assert_eq!(result.stats.total_number_of_bases_aligned_incorrectly, 50);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Operation strings, reference intervals and records
//! - [`evaluation`]: Reconciliation, classification, statistics and the streaming driver
//! - [`parsing`]: Readers for truth and called files
//! - [`utils`]: Input pre-validation
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod evaluation;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::intervals::{Interval, MappingIntervals};
pub use core::record::{CalledRecord, TruthRecord};
pub use evaluation::driver::{evaluate, evaluate_files, Evaluation};
pub use evaluation::reconcile::{reconcile, Reconciliation};
pub use evaluation::{EvaluationConfig, Statistics};
