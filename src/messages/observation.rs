//! # Observations produced by the subject during the observer phase.
//!
//! An [`Observation`] is the subject's verdict on one expectation: a
//! description, the ordered list of conditions that led to it, a
//! [`Summary`] verdict, and (for rejections) a [`Report`] explaining why.
//!
//! The engine passes observations through unmodified, except that it tags
//! each one with the identifier of the program that produced it.

use serde::{Deserialize, Serialize};

use crate::messages::report::Report;

/// Verdict of a single observation.
///
/// Wire names are the screaming-case tokens the subject emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Summary {
    #[serde(rename = "ACCEPTED")]
    Accepted,
    #[serde(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "SKIPPED")]
    Skipped,
}

/// One recorded expectation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// The verdict.
    pub summary: Summary,
    /// What was being observed.
    pub description: String,
    /// Ordered list of conditions (scenario description, steps) leading here.
    #[serde(default)]
    pub conditions: Vec<String>,
    /// Explanation for a rejection; never empty when present on `Rejected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    /// Identifier of the program that produced this observation.
    ///
    /// Absent on the wire; the engine fills it in before recording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl Observation {
    /// Creates an accepted observation (test/demo convenience).
    pub fn accepted(description: impl Into<String>) -> Self {
        Self {
            summary: Summary::Accepted,
            description: description.into(),
            conditions: Vec::new(),
            report: None,
            program: None,
        }
    }

    /// Creates a rejected observation carrying `report`.
    pub fn rejected(description: impl Into<String>, report: Report) -> Self {
        Self {
            summary: Summary::Rejected,
            description: description.into(),
            conditions: Vec::new(),
            report: Some(report),
            program: None,
        }
    }

    /// Creates a skipped observation.
    pub fn skipped(description: impl Into<String>) -> Self {
        Self {
            summary: Summary::Skipped,
            description: description.into(),
            conditions: Vec::new(),
            report: None,
            program: None,
        }
    }

    /// Returns the observation tagged with the producing program's identifier.
    pub fn tagged(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }
}
