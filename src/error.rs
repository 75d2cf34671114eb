//! Error types used by the suite sequencer and scenario engine.
//!
//! [`SuiteError`] covers the *fatal* error kinds: each one short-circuits
//! the suite sequencer, surfaces exactly one report through
//! [`Reporter::error`](crate::Reporter::error), and resolves the run to
//! `SuiteResult::Error`. Non-fatal conditions never appear here — an
//! unrecognized message becomes a logged report line, and a plugin abort
//! becomes a `scenario-control`/`abort` message back to the subject.

use thiserror::Error;

use crate::messages::Report;
use crate::subject::ChannelDirection;

/// # Fatal errors that stop a suite run.
///
/// Every variant carries enough context to produce the single user-facing
/// [`Report`] via [`SuiteError::to_report`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SuiteError {
    /// The program list was empty.
    #[error("no subject programs found (searched: {criteria})")]
    NoPrograms {
        /// Description of the search criteria that produced nothing.
        criteria: String,
    },

    /// The subject speaks a different protocol version than the runner.
    #[error("protocol version mismatch: runner requires {required}, subject speaks {actual}")]
    VersionMismatch {
        /// Version the runner requires.
        required: u32,
        /// Version the subject reported.
        actual: u32,
    },

    /// The subject does not expose a required message channel.
    #[error("subject is missing its {direction} message channel")]
    MissingChannel {
        /// Which side of the duplex contract is absent.
        direction: ChannelDirection,
    },

    /// The subject reported a fatal scenario error (or failed to initialize).
    #[error("scenario failed: {report}")]
    Scenario {
        /// The subject's own explanation.
        report: Report,
    },

    /// A native or plugin handler failed unexpectedly.
    #[error("handler failure: {detail}")]
    Handler {
        /// The underlying failure message.
        detail: String,
    },

    /// The subject closed its outbound channel before finishing.
    #[error("subject closed its outbound channel mid-scenario")]
    ChannelClosed,

    /// A protocol message carried a body the runner could not decode.
    #[error("malformed {context} message: {detail}")]
    Malformed {
        /// Which message kind was malformed.
        context: &'static str,
        /// The decode failure.
        detail: String,
    },
}

impl SuiteError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SuiteError::NoPrograms { .. } => "no_programs",
            SuiteError::VersionMismatch { .. } => "version_mismatch",
            SuiteError::MissingChannel { .. } => "missing_channel",
            SuiteError::Scenario { .. } => "scenario_failed",
            SuiteError::Handler { .. } => "handler_failure",
            SuiteError::ChannelClosed => "channel_closed",
            SuiteError::Malformed { .. } => "malformed_message",
        }
    }

    /// Builds the user-facing report for this error.
    ///
    /// The version-mismatch text is part of the external contract and must
    /// not change: three lines stating the required version, the actual
    /// version, and the upgrade instruction.
    pub fn to_report(&self) -> Report {
        match self {
            SuiteError::NoPrograms { criteria } => Report::new()
                .with_note("No subject programs were found!", criteria.clone())
                .with_line("Check that your suite points at programs the runner can load."),
            SuiteError::VersionMismatch { required, actual } => Report::new()
                .with_note(
                    "This suite runner requires subjects that speak protocol version:",
                    required.to_string(),
                )
                .with_note(
                    "but your subject program speaks protocol version:",
                    actual.to_string(),
                )
                .with_line("Upgrade your subject program so the versions match."),
            SuiteError::MissingChannel { direction } => Report::new()
                .with_note(
                    "The subject program does not expose a required message channel:",
                    direction.to_string(),
                )
                .with_line("Both an inbound sink and an outbound stream are part of the contract."),
            SuiteError::Scenario { report } => report.clone(),
            SuiteError::Handler { detail } => Report::new().with_note(
                "An unexpected failure occurred while handling a message:",
                detail.clone(),
            ),
            SuiteError::ChannelClosed => {
                Report::line("The subject program closed its outbound channel before finishing.")
            }
            SuiteError::Malformed { context, detail } => Report::new()
                .with_note(format!("Received a malformed {context} message:"), detail.clone()),
        }
    }
}
