use serde::Serialize;
use tracing::{debug, warn};

use crate::core::cigar::{parse_operations, total_len, OpKind, Operation};
use crate::core::intervals::MappingIntervals;
use crate::core::record::{CalledRecord, TruthRecord};
use crate::evaluation::reconcile::{reconcile, Reconciliation};
use crate::evaluation::stats::Statistics;
use crate::evaluation::EvaluationConfig;
use crate::parsing::ParseError;

/// What happened to one called record compared against its truth record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Outcome {
    /// The aligner reported the read as unmapped
    Unaligned,
    /// Placed on a different chromosome than the truth
    WrongChromosome,
    /// Same start and same operation string as the truth
    Exact,
    /// Same chromosome but a different placement or structure
    Reconciled(Reconciliation),
    /// The called operation string could not be parsed
    InvalidCigar,
}

/// Classification of one read group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOutcome {
    /// Too many alignments reported for the read
    Ambiguous,
    /// Outcome of each called record whose name matched the truth record
    Records(Vec<Outcome>),
}

impl GroupOutcome {
    /// First record that needed base-level reconciliation, if any
    #[must_use]
    pub fn first_reconciled(&self) -> Option<Reconciliation> {
        match self {
            Self::Ambiguous => None,
            Self::Records(outcomes) => outcomes.iter().find_map(|o| match o {
                Outcome::Reconciled(r) => Some(*r),
                _ => None,
            }),
        }
    }
}

fn warn_unsupported(name: &str, cigar: &str, ops: &[Operation]) {
    for op in ops {
        if let OpKind::Unsupported(c) = op.kind {
            warn!(
                read = %name,
                cigar = %cigar,
                op = %c,
                len = op.len,
                "Unsupported operation ignored"
            );
        }
    }
}

/// Insertion bases the call placed at the same anchor as a true insertion.
///
/// Each true insertion is credited at most its own length, however many
/// called insertions share its anchor.
fn insertions_in_common(truth: &MappingIntervals, called: &MappingIntervals) -> u64 {
    let mut remaining: Vec<u64> = truth.insertions.iter().map(|t| t.length).collect();
    let mut credited = 0;

    for c in &called.insertions {
        let Some(idx) = truth
            .insertions
            .iter()
            .zip(&remaining)
            .position(|(t, left)| t.position == c.position && *left > 0)
        else {
            continue;
        };
        let credit = remaining[idx].min(c.length);
        remaining[idx] -= credit;
        credited += credit;
    }

    credited
}

/// Deleted reference bases shared by true and called deletions
fn deletions_in_common(truth: &MappingIntervals, called: &MappingIntervals) -> u64 {
    called
        .deletions
        .iter()
        .map(|c| truth.deletions.iter().map(|t| t.overlap(c)).sum::<u64>())
        .sum()
}

/// Decides the outcome of each read group and folds it into [`Statistics`]
pub struct Classifier<'a> {
    config: &'a EvaluationConfig,
}

impl<'a> Classifier<'a> {
    #[must_use]
    pub fn new(config: &'a EvaluationConfig) -> Self {
        Self { config }
    }

    /// Classify the called records of one read against its truth record.
    ///
    /// Every truth record adds the read length to the total, whatever the
    /// group holds. Malformed or unsupported operations in the called records
    /// are logged and do not abort the run.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Cigar` if the truth record's operation string is
    /// malformed or cannot be laid out from its start.
    pub fn classify(
        &self,
        truth: &TruthRecord,
        group: &[CalledRecord],
        stats: &mut Statistics,
    ) -> Result<GroupOutcome, ParseError> {
        let read_length = self.config.read_length;

        let truth_ops = parse_operations(&truth.cigar).map_err(|source| ParseError::Cigar {
            name: truth.name.clone(),
            source,
        })?;
        warn_unsupported(&truth.name, &truth.cigar, &truth_ops);

        let true_insertions = total_len(&truth_ops, OpKind::Insertion);
        let true_deletions = total_len(&truth_ops, OpKind::Deletion);

        stats.total_number_of_bases_of_reads += read_length;
        stats.total_number_of_bases_in_true_insertions += true_insertions;
        stats.total_number_of_bases_in_true_deletions += true_deletions;

        if group.len() > self.config.max_unambiguous_alignments {
            debug!(
                read = %truth.name,
                alignments = group.len(),
                "Ambiguously aligned"
            );
            stats.total_number_of_bases_aligned_ambiguously += read_length;
            return Ok(GroupOutcome::Ambiguous);
        }

        let mut outcomes = Vec::new();
        for called in group.iter().filter(|c| c.name == truth.name) {
            let outcome = if called.is_unmapped() {
                stats.total_number_of_bases_unaligned += read_length;
                Outcome::Unaligned
            } else if called.chromosome != truth.chromosome {
                stats.total_number_of_bases_aligned_incorrectly += read_length;
                Outcome::WrongChromosome
            } else if called.start == truth.start && called.cigar == truth.cigar {
                stats.total_number_of_bases_aligned_correctly += read_length;
                stats.insertions_called_correctly += true_insertions;
                stats.total_number_of_bases_called_insertions += true_insertions;
                stats.deletions_called_correctly += true_deletions;
                stats.total_number_of_bases_called_deletions += true_deletions;
                Outcome::Exact
            } else {
                self.reconcile_record(truth, &truth_ops, called, stats)?
            };

            debug!(read = %called.name, ?outcome, "Classified");
            outcomes.push(outcome);
        }

        if outcomes.is_empty() {
            debug!(read = %truth.name, "No called record shares the truth read name");
        }

        Ok(GroupOutcome::Records(outcomes))
    }

    fn reconcile_record(
        &self,
        truth: &TruthRecord,
        truth_ops: &[Operation],
        called: &CalledRecord,
        stats: &mut Statistics,
    ) -> Result<Outcome, ParseError> {
        let read_length = self.config.read_length;

        let truth_mi = MappingIntervals::from_operations(truth_ops, truth.start).map_err(
            |source| ParseError::Cigar {
                name: truth.name.clone(),
                source,
            },
        )?;

        let called_mi = match parse_operations(&called.cigar).and_then(|ops| {
            warn_unsupported(&called.name, &called.cigar, &ops);
            MappingIntervals::from_operations(&ops, called.start)
        }) {
            Ok(mi) => mi,
            Err(e) => {
                warn!(
                    read = %called.name,
                    cigar = %called.cigar,
                    error = %e,
                    "Unusable called operation string, counting read as incorrectly aligned"
                );
                stats.total_number_of_bases_aligned_incorrectly += read_length;
                return Ok(Outcome::InvalidCigar);
            }
        };
        debug!(read = %truth.name, truth = %truth_mi, called = %called_mi, "Reconciling");

        let result = reconcile(&truth_mi.matches, &called_mi.matches);

        stats.total_number_of_bases_aligned_correctly += result.matched;
        stats.total_number_of_bases_aligned_incorrectly += result.misaligned;
        stats.total_number_of_bases_unaligned +=
            read_length.saturating_sub(result.matched + result.misaligned);

        stats.total_number_of_bases_called_insertions += called_mi.inserted_bases();
        stats.total_number_of_bases_called_deletions += called_mi.deleted_bases();
        stats.insertions_called_correctly += insertions_in_common(&truth_mi, &called_mi);
        stats.deletions_called_correctly += deletions_in_common(&truth_mi, &called_mi);

        Ok(Outcome::Reconciled(result))
    }
}
