//! # Human-readable reports for rejections and fatal errors.
//!
//! A [`Report`] is an ordered sequence of [`ReportLine`]s, each a statement
//! with an optional detail. Reports travel in two directions:
//! - attached to a `Rejected` observation produced by the subject;
//! - surfaced through [`Reporter::error`](crate::Reporter::error) when a
//!   suite run fails fatally.
//!
//! A report attached to a rejection or an error is never empty.
//!
//! ## Example
//! ```rust
//! use specvisor::Report;
//!
//! let report = Report::new()
//!     .with_note("Expected the banner to read:", "hello")
//!     .with_line("but the banner was never rendered.");
//!
//! assert_eq!(report.len(), 2);
//! assert!(report.contains("banner"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// One statement of a report, with an optional detail value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// The statement itself, e.g. `"Expected the list to contain:"`.
    pub statement: String,
    /// Optional detail attached to the statement, e.g. the offending value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ReportLine {
    /// Creates a line with no detail.
    pub fn statement(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            detail: None,
        }
    }

    /// Creates a line with a detail value.
    pub fn note(statement: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Ordered, human-readable explanation of a rejection or fatal error.
///
/// Serializes transparently as a JSON array of lines, which is the wire shape
/// used by `scenario-control` error/abort bodies and rejected observations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    lines: Vec<ReportLine>,
}

impl Report {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a one-line report with no detail.
    pub fn line(statement: impl Into<String>) -> Self {
        Self::new().with_line(statement)
    }

    /// Appends a statement-only line (builder form).
    pub fn with_line(mut self, statement: impl Into<String>) -> Self {
        self.lines.push(ReportLine::statement(statement));
        self
    }

    /// Appends a statement with a detail value (builder form).
    pub fn with_note(mut self, statement: impl Into<String>, detail: impl Into<String>) -> Self {
        self.lines.push(ReportLine::note(statement, detail));
        self
    }

    /// Appends a line in place.
    pub fn push(&mut self, line: ReportLine) {
        self.lines.push(line);
    }

    /// Returns the lines in order.
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns `true` if any statement or detail contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| {
            line.statement.contains(needle)
                || line.detail.as_deref().is_some_and(|d| d.contains(needle))
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line.statement)?;
            if let Some(detail) = &line.detail {
                write!(f, " {detail}")?;
            }
        }
        Ok(())
    }
}
