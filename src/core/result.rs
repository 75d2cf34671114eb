//! # The final outcome of a suite run.
//!
//! A run always resolves to a [`SuiteResult`]: either aggregate counters
//! over every observation recorded, or `Error` after the (single) fatal
//! error was surfaced through the reporter. The result deliberately carries
//! no per-observation detail — reporters receive those incrementally.

use crate::messages::Summary;

/// Aggregate outcome of one suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteResult {
    /// Every program ran to completion; counters over all observations.
    Ok {
        accepted: usize,
        rejected: usize,
        skipped: usize,
    },
    /// A fatal error stopped the run; the reporter has already received it.
    Error,
}

impl SuiteResult {
    /// Returns `true` when the run completed and nothing was rejected.
    ///
    /// This is the pass/fail signal for process exit codes: skipped
    /// observations do not fail a run.
    pub fn is_passing(&self) -> bool {
        matches!(self, SuiteResult::Ok { rejected: 0, .. })
    }

    /// Total number of observations recorded, or `None` after an error.
    pub fn total(&self) -> Option<usize> {
        match self {
            SuiteResult::Ok {
                accepted,
                rejected,
                skipped,
            } => Some(accepted + rejected + skipped),
            SuiteResult::Error => None,
        }
    }
}

/// Running counters while a suite is in flight.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counters {
    accepted: usize,
    rejected: usize,
    skipped: usize,
}

impl Counters {
    pub(crate) fn count(&mut self, summary: Summary) {
        match summary {
            Summary::Accepted => self.accepted += 1,
            Summary::Rejected => self.rejected += 1,
            Summary::Skipped => self.skipped += 1,
        }
    }

    pub(crate) fn into_result(self) -> SuiteResult {
        SuiteResult::Ok {
            accepted: self.accepted,
            rejected: self.rejected,
            skipped: self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_requires_completion_and_zero_rejections() {
        let mut counters = Counters::default();
        counters.count(Summary::Accepted);
        counters.count(Summary::Skipped);
        assert!(counters.into_result().is_passing());

        counters.count(Summary::Rejected);
        assert!(!counters.into_result().is_passing());

        assert!(!SuiteResult::Error.is_passing());
    }

    #[test]
    fn test_total_sums_every_summary() {
        let mut counters = Counters::default();
        counters.count(Summary::Accepted);
        counters.count(Summary::Rejected);
        counters.count(Summary::Skipped);
        assert_eq!(counters.into_result().total(), Some(3));
        assert_eq!(SuiteResult::Error.total(), None);
    }
}
