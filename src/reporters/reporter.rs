//! # The reporter sink trait.
//!
//! Provides [`Reporter`] — the extension point through which a suite run
//! surfaces its incremental results: observations as they are recorded, log
//! reports, and at most one fatal error.
//!
//! ## Call order
//! Per suite run, always in this relative order:
//! ```text
//! start_suite → record* / log* → error? → finish
//! ```
//! `record` may be called many times between `start_suite` and `finish`;
//! `error` is called at most once.

use async_trait::async_trait;

use crate::messages::{Observation, Report};

/// Receives the incremental results of a suite run.
///
/// Implementations should use async I/O and handle their own errors; the
/// sequencer awaits each call inline, so a slow reporter slows the suite.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Called once before any program runs.
    async fn start_suite(&self) {}

    /// Called for every recorded observation, in the order produced.
    async fn record(&self, observation: &Observation);

    /// Called for tolerated anomalies (e.g. unrecognized messages).
    async fn log(&self, _report: &Report) {}

    /// Called at most once per run, with the fatal error's report.
    async fn error(&self, report: &Report);

    /// Called once after the run resolves, error or not.
    async fn finish(&self) {}
}
