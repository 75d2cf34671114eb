//! # Simple stdout reporter for debugging and demos.
//!
//! [`LogReporter`] prints suite progress in a human-readable format.
//!
//! ## Output format
//! ```text
//! [suite-started]
//! [observation] program=ClientSpec summary=ACCEPTED description="shows the banner"
//! [log] Unrecognized message received http-stub/flush
//! [error] No subject programs were found! all subject programs
//! [suite-finished]
//! ```

use async_trait::async_trait;

use crate::messages::{Observation, Report, Summary};
use crate::reporters::reporter::Reporter;

/// Stdout reporter, enabled via the `logging` feature.
///
/// Intended for development and demos — implement a custom [`Reporter`] for
/// structured output.
pub struct LogReporter;

#[async_trait]
impl Reporter for LogReporter {
    async fn start_suite(&self) {
        println!("[suite-started]");
    }

    async fn record(&self, observation: &Observation) {
        let summary = match observation.summary {
            Summary::Accepted => "ACCEPTED",
            Summary::Rejected => "REJECTED",
            Summary::Skipped => "SKIPPED",
        };
        println!(
            "[observation] program={} summary={summary} description={:?}",
            observation.program.as_deref().unwrap_or("?"),
            observation.description
        );
        if let Some(report) = &observation.report {
            for line in report.lines() {
                println!("    {} {}", line.statement, line.detail.as_deref().unwrap_or(""));
            }
        }
    }

    async fn log(&self, report: &Report) {
        println!("[log] {report}");
    }

    async fn error(&self, report: &Report) {
        println!("[error] {report}");
    }

    async fn finish(&self) {
        println!("[suite-finished]");
    }
}
