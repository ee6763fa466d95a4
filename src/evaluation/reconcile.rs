//! Base-level reconciliation of truth and called match intervals.
//!
//! Every truth interval is visited in order and claims each still-unclaimed
//! called interval that overlaps it. A claimed called interval contributes its
//! overlapping bases to `matched` and the rest of its length to `misaligned`,
//! and is never considered again, even if it also overlaps a later truth
//! interval. Called intervals that no truth interval claims are misaligned in
//! full.

use serde::Serialize;

use crate::core::intervals::Interval;

/// How a called interval lies relative to a truth interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// No shared reference position
    Disjoint,
    /// `truth.start <= called.start` and `called.end <= truth.end`
    CalledWithinTruth,
    /// Starts inside truth and runs past its end
    CalledPastTruthEnd,
    /// Starts at or before truth and ends at or after it
    CalledSpansTruth,
    /// Starts before truth and ends inside it
    CalledBeforeTruthStart,
}

impl Overlap {
    #[must_use]
    pub fn classify(truth: &Interval, called: &Interval) -> Self {
        let (t1, t2) = (truth.start, truth.end);
        let (i1, i2) = (called.start, called.end);

        if i2 <= t1 || i1 >= t2 {
            Self::Disjoint
        } else if t1 <= i1 && t2 >= i2 {
            Self::CalledWithinTruth
        } else if t1 <= i1 {
            Self::CalledPastTruthEnd
        } else if t2 <= i2 {
            Self::CalledSpansTruth
        } else {
            Self::CalledBeforeTruthStart
        }
    }

    /// `(matched, misaligned)` bases contributed by `called` against `truth`
    #[must_use]
    pub fn counts(self, truth: &Interval, called: &Interval) -> (u64, u64) {
        let (t1, t2) = (truth.start, truth.end);
        let (i1, i2) = (called.start, called.end);

        match self {
            Self::Disjoint => (0, 0),
            Self::CalledWithinTruth => (i2 - i1, 0),
            Self::CalledPastTruthEnd => (t2 - i1, i2 - t2),
            Self::CalledSpansTruth => (t2 - t1, (i2 - t2) + (t1 - i1)),
            Self::CalledBeforeTruthStart => (i2 - t1, t1 - i1),
        }
    }
}

/// Result of reconciling one truth/called interval pair of lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub matched: u64,
    pub misaligned: u64,
}

impl std::fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.matched, self.misaligned)
    }
}

/// Count matched and misaligned bases of `called` against `truth`.
///
/// ```
/// use align_eval::core::intervals::Interval;
/// use align_eval::evaluation::reconcile::reconcile;
///
/// let r = reconcile(&[Interval::new(100, 200)], &[Interval::new(150, 250)]);
/// assert_eq!((r.matched, r.misaligned), (50, 50));
/// ```
#[must_use]
pub fn reconcile(truth: &[Interval], called: &[Interval]) -> Reconciliation {
    let mut result = Reconciliation::default();
    let mut consumed = vec![false; called.len()];

    for t in truth {
        for (i, c) in called.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            let overlap = Overlap::classify(t, c);
            if overlap == Overlap::Disjoint {
                continue;
            }
            let (matched, misaligned) = overlap.counts(t, c);
            result.matched += matched;
            result.misaligned += misaligned;
            consumed[i] = true;
        }
    }

    for (c, done) in called.iter().zip(consumed) {
        if !done {
            result.misaligned += c.len();
        }
    }

    result
}
