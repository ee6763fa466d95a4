use std::io::BufRead;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::core::record::CalledRecord;
use crate::evaluation::classify::Classifier;
use crate::evaluation::reconcile::Reconciliation;
use crate::evaluation::stats::Statistics;
use crate::evaluation::EvaluationConfig;
use crate::parsing::called::CalledReader;
use crate::parsing::truth::TruthReader;
use crate::parsing::{open_input, ParseError};

/// Where a run stopped early in stop-at-first-reconcile mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Halt {
    pub read_id: u64,
    pub reconciliation: Reconciliation,
}

/// Outcome of a full evaluation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub stats: Statistics,

    /// Number of truth records classified
    pub reads: u64,

    /// Set when the run stopped at the first reconciled read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted: Option<Halt>,
}

/// Called line that opened the current read group
struct GroupStart {
    line_number: usize,
    line: String,
}

struct GroupingDriver<'a, T> {
    truth: TruthReader<T>,
    classifier: Classifier<'a>,
    config: &'a EvaluationConfig,
    stats: Statistics,
    reads: u64,
}

impl<T: BufRead> GroupingDriver<'_, T> {
    /// Pull the truth record for `read_id` and classify `group` against it.
    /// Returns the reconciliation result when the run should stop here.
    fn flush(
        &mut self,
        read_id: u64,
        group: &[CalledRecord],
        start: &GroupStart,
    ) -> Result<Option<Halt>, ParseError> {
        let Some(truth) = self.truth.next_record()? else {
            return Err(ParseError::TruncatedInput {
                read_id,
                line_number: start.line_number,
                line: start.line.clone(),
            });
        };
        if truth.read_id != read_id {
            return Err(ParseError::ReadIdMismatch {
                expected: read_id,
                found: truth.name,
                line_number: start.line_number,
                line: start.line.clone(),
            });
        }

        let outcome = self.classifier.classify(&truth, group, &mut self.stats)?;
        self.reads += 1;

        if self.config.stop_at_first_reconcile {
            if let Some(reconciliation) = outcome.first_reconciled() {
                return Ok(Some(Halt {
                    read_id,
                    reconciliation,
                }));
            }
        }
        Ok(None)
    }

    fn finish(self, halted: Option<Halt>) -> Evaluation {
        info!(
            reads = self.reads,
            bases = self.stats.total_number_of_bases_of_reads,
            halted = halted.is_some(),
            "Evaluation finished"
        );
        Evaluation {
            stats: self.stats,
            reads: self.reads,
            halted,
        }
    }
}

/// Stream `called` in read-id groups, pairing each group with the next
/// truth record.
///
/// Both inputs must list the same read ids in the same order. Called records
/// of one read must be adjacent.
///
/// # Errors
///
/// Returns `ParseError::TruncatedInput` if the truth file runs out before the
/// called file, `ParseError::ReadIdMismatch` if the two files disagree on the
/// next read, or any parse or IO error from either input.
pub fn evaluate<T: BufRead, C: BufRead>(
    truth: T,
    called: C,
    config: &EvaluationConfig,
) -> Result<Evaluation, ParseError> {
    let span = info_span!("evaluate", read_length = config.read_length);
    let _enter = span.enter();

    let mut driver = GroupingDriver {
        truth: TruthReader::new(truth),
        classifier: Classifier::new(config),
        config,
        stats: Statistics::new(),
        reads: 0,
    };

    let mut group: Vec<CalledRecord> = Vec::new();
    let mut current: Option<(u64, GroupStart)> = None;
    let mut reader = CalledReader::new(called);

    while let Some(record) = reader.next() {
        let record = record?;
        if let Some((id, start)) = &current {
            if *id == record.read_id {
                group.push(record);
                continue;
            }
            if let Some(halt) = driver.flush(*id, &group, start)? {
                return Ok(driver.finish(Some(halt)));
            }
            group.clear();
        }
        current = Some((
            record.read_id,
            GroupStart {
                line_number: reader.line_number(),
                line: reader.last_line().to_string(),
            },
        ));
        group.push(record);
    }

    if let Some((id, start)) = &current {
        if let Some(halt) = driver.flush(*id, &group, start)? {
            return Ok(driver.finish(Some(halt)));
        }
    } else {
        debug!("Called file has no alignment records");
    }

    match driver.truth.next_record() {
        Ok(Some(extra)) => warn!(
            read = %extra.name,
            "Truth file has records beyond the last called read; they were not evaluated"
        ),
        Ok(None) => {}
        Err(e) => warn!(
            error = %e,
            "Could not read the truth file past the last called read"
        ),
    }

    Ok(driver.finish(None))
}

/// Open both files (gzip-aware) and run [`evaluate`]
///
/// # Errors
///
/// Returns `ParseError::Io` if either file cannot be opened, or any error
/// from [`evaluate`].
pub fn evaluate_files(
    truth: &Path,
    called: &Path,
    config: &EvaluationConfig,
) -> Result<Evaluation, ParseError> {
    info!(truth = %truth.display(), called = %called.display(), "Evaluating");
    evaluate(open_input(truth)?, open_input(called)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUTH: &str = "\
seq.1a\tchr1\t100\t199\t100M\t100-199\t+\tACGT
seq.1b\tchr1\t400\t499\t100M\t400-499\t-\tACGT
seq.2a\tchr2\t1000\t1099\t100M\t1000-1099\t+\tACGT
seq.2b\tchr2\t1300\t1399\t100M\t1300-1399\t-\tACGT
seq.3a\tchr3\t5000\t5099\t100M\t5000-5099\t+\tACGT
seq.3b\tchr3\t5300\t5399\t100M\t5300-5399\t-\tACGT
seq.4a\tchr4\t200\t299\t100M\t200-299\t+\tACGT
seq.4b\tchr4\t600\t699\t100M\t600-699\t-\tACGT
";

    const CALLED: &str = "\
@HD\tVN:1.4\tSO:queryname
seq.1a\t99\tchr1\t100\t255\t100M\t=\t400\t399\tACGT\t*
seq.1b\t147\tchr1\t400\t255\t100M\t=\t100\t-399\tACGT\t*
seq.2a\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\t*
seq.3a\t0\tchr3\t5000\t255\t100M\t*\t0\t0\tACGT\t*
seq.3a\t256\tchr9\t7000\t255\t100M\t*\t0\t0\tACGT\t*
seq.3b\t0\tchr3\t5300\t255\t100M\t*\t0\t0\tACGT\t*
seq.4a\t0\tchr4\t250\t255\t100M\t*\t0\t0\tACGT\t*
";

    fn config() -> EvaluationConfig {
        EvaluationConfig::new(100)
    }

    #[test]
    fn test_evaluate_mixed_outcomes() {
        let result = evaluate(TRUTH.as_bytes(), CALLED.as_bytes(), &config()).unwrap();
        assert_eq!(result.reads, 4);
        assert!(result.halted.is_none());

        let stats = result.stats;
        assert_eq!(stats.total_number_of_bases_of_reads, 400);
        // read 1 exact, read 4 half overlapping
        assert_eq!(stats.total_number_of_bases_aligned_correctly, 100 + 50);
        assert_eq!(stats.total_number_of_bases_aligned_incorrectly, 50);
        assert_eq!(stats.total_number_of_bases_unaligned, 100);
        assert_eq!(stats.total_number_of_bases_aligned_ambiguously, 100);
    }

    #[test]
    fn test_total_is_read_length_times_reads() {
        let result = evaluate(TRUTH.as_bytes(), CALLED.as_bytes(), &config()).unwrap();
        assert_eq!(
            result.stats.total_number_of_bases_of_reads,
            100 * result.reads
        );
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let first = evaluate(TRUTH.as_bytes(), CALLED.as_bytes(), &config()).unwrap();
        let second = evaluate(TRUTH.as_bytes(), CALLED.as_bytes(), &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stop_at_first_reconcile() {
        let config = config().with_stop_at_first_reconcile(true);
        let result = evaluate(TRUTH.as_bytes(), CALLED.as_bytes(), &config).unwrap();
        let halt = result.halted.unwrap();
        assert_eq!(halt.read_id, 4);
        assert_eq!(halt.reconciliation.to_string(), "50:50");
        assert_eq!(result.reads, 4);
    }

    #[test]
    fn test_truncated_truth() {
        let truth: String = TRUTH.lines().take(4).map(|l| format!("{l}\n")).collect();
        let err = evaluate(truth.as_bytes(), CALLED.as_bytes(), &config()).unwrap_err();
        match err {
            ParseError::TruncatedInput {
                read_id,
                line_number,
                line,
            } => {
                assert_eq!(read_id, 3);
                assert_eq!(line_number, 5);
                assert!(line.starts_with("seq.3a\t0\tchr3\t5000"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_sync_files() {
        let called = "@HD\tVN:1.4\nseq.2a\t0\tchr2\t1000\t255\t100M\n";
        let err = evaluate(TRUTH.as_bytes(), called.as_bytes(), &config()).unwrap_err();
        assert!(err.to_string().contains("seq.2a\t0\tchr2\t1000"));
        match err {
            ParseError::ReadIdMismatch {
                expected,
                found,
                line_number,
                line,
            } => {
                assert_eq!(expected, 2);
                assert_eq!(found, "seq.1a");
                assert_eq!(line_number, 2);
                assert_eq!(line, "seq.2a\t0\tchr2\t1000\t255\t100M");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_trailing_truth_does_not_fail_run() {
        let mut truth: String = TRUTH.lines().take(2).map(|l| format!("{l}\n")).collect();
        truth.push_str("seq.2a\tchr2\tNaN\n");
        let called = "seq.1a\t99\tchr1\t100\t255\t100M\n";
        let result = evaluate(truth.as_bytes(), called.as_bytes(), &config()).unwrap();
        assert_eq!(result.reads, 1);
        assert_eq!(result.stats.total_number_of_bases_aligned_correctly, 100);
    }

    #[test]
    fn test_empty_called_file() {
        let result = evaluate(TRUTH.as_bytes(), "@HD\tVN:1.4\n".as_bytes(), &config()).unwrap();
        assert_eq!(result.reads, 0);
        assert_eq!(result.stats, Statistics::default());
    }

    #[test]
    fn test_malformed_called_line_aborts() {
        let called = "seq.1a\t0\tchr1\n";
        let err = evaluate(TRUTH.as_bytes(), called.as_bytes(), &config()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord { line_number: 1, .. }));
    }
}
