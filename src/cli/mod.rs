//! Command-line interface for align-eval.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **compare**: Evaluate an aligner's output against the simulation truth
//! - **validate**: Only check that both files cover the same reads
//!
//! ## Usage
//!
//! ```text
//! # Base-level accuracy report
//! align-eval compare truth.cig sorted.sam
//!
//! # Explicit read length, JSON output for scripting
//! align-eval compare truth.cig sorted.sam --read-length 100 --format json
//!
//! # Check inputs without evaluating
//! align-eval validate truth.cig.gz sorted.sam.gz
//! ```
//!
//! ## Input layout
//!
//! ```text
//! truth.cig (two lines per read):
//! seq.1a  chr10  123502684  123502783  100M  123502684-123502783  -  CTTAAGTATG...
//! seq.1b  chr10  123502530  123502629  100M  123502530-123502629  +  AGGGAGTACT...
//!
//! sorted.sam (sorted by read name):
//! seq.1a  83   chr10  123502684  255  100M  =  123502530  -254  ATTTCACATT...
//! seq.1b  163  chr10  123502530  255  100M  =  123502684   254  AGGGAGTACT...
//! ```

use clap::{Parser, Subcommand};

pub mod compare;
pub mod validate;

#[derive(Parser)]
#[command(name = "align-eval")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Measure aligner accuracy against simulated truth alignments")]
#[command(
    long_about = "align-eval compares the alignments an aligner reported for simulated reads against the reads' true placement.\n\nEach read's bases are counted as aligned correctly, incorrectly, ambiguously, or not at all, and indel calls are scored against the true insertions and deletions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate aligner output against the truth file
    Compare(compare::CompareArgs),

    /// Check that the truth and called files cover the same reads
    Validate(validate::ValidateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
