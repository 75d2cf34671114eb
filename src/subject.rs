//! # The subject program abstraction.
//!
//! A subject is the opaque unit under test: it runs inside its own runtime
//! and communicates solely through an asynchronous duplex message channel.
//! The runner never looks inside it — it only initializes it with
//! [`InitFlags`], connects its [`SubjectChannels`], and exchanges
//! [`Message`]s.
//!
//! A subject and its scenario engine are created together, live for exactly
//! one scenario, and are discarded afterwards; [`SubjectProgram::connect`]
//! therefore hands out a fresh channel pair per scenario.
//!
//! ## Example
//! ```rust,no_run
//! use specvisor::{
//!     ChannelDirection, InitFlags, Message, Report, SubjectChannels, SubjectProgram,
//!     PROTOCOL_VERSION,
//! };
//! use tokio::sync::mpsc;
//!
//! struct Scripted;
//!
//! impl SubjectProgram for Scripted {
//!     fn name(&self) -> &str { "ScriptedSpec" }
//!
//!     fn version(&self) -> u32 { PROTOCOL_VERSION }
//!
//!     fn init(&mut self, _flags: &InitFlags) -> Result<(), Report> { Ok(()) }
//!
//!     fn connect(&mut self) -> Result<SubjectChannels, ChannelDirection> {
//!         let (to_subject, mut from_runner) = mpsc::unbounded_channel::<Message>();
//!         let (to_runner, from_subject) = mpsc::unbounded_channel::<Message>();
//!         tokio::spawn(async move {
//!             while let Some(_msg) = from_runner.recv().await {
//!                 // drive the scripted dialogue...
//!                 let _ = &to_runner;
//!             }
//!         });
//!         Ok(SubjectChannels { outbound: from_subject, inbound: to_subject })
//!     }
//! }
//! ```

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::messages::{Message, Report};

/// Protocol version this runner speaks.
///
/// Subjects must report the same version during the handshake; see
/// [`SuiteError::VersionMismatch`](crate::SuiteError::VersionMismatch).
pub const PROTOCOL_VERSION: u32 = 10;

/// Opaque partition hint for distributing scenarios across independent runs.
///
/// The runner never interprets it, only transports it to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Which partition this run covers (0-based).
    pub id: u32,
    /// Total number of partitions.
    pub count: u32,
}

impl Default for Segment {
    /// A single, whole partition.
    fn default() -> Self {
        Self { id: 0, count: 1 }
    }
}

/// Initialization flags passed into each subject before any scenario runs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitFlags {
    /// Protocol version the runner speaks.
    pub version: u32,
    /// Partition id this run covers.
    pub segment: u32,
    /// Total number of partitions.
    pub segment_count: u32,
    /// Free-form tags selecting which scenarios to run.
    pub tags: Vec<String>,
}

/// Direction of a subject channel, named from the runner's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDirection {
    /// Runner → subject (the subject's message sink).
    Inbound,
    /// Subject → runner (the subject's message stream).
    Outbound,
}

impl fmt::Display for ChannelDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelDirection::Inbound => f.write_str("inbound"),
            ChannelDirection::Outbound => f.write_str("outbound"),
        }
    }
}

/// The duplex channel pair a subject exposes for one scenario.
pub struct SubjectChannels {
    /// Messages produced by the subject.
    pub outbound: UnboundedReceiver<Message>,
    /// Sink for messages sent to the subject.
    pub inbound: UnboundedSender<Message>,
}

/// An opaque subject program, driven entirely through message passing.
pub trait SubjectProgram: Send {
    /// Stable identifier used to tag observations produced by this program.
    fn name(&self) -> &str;

    /// Protocol version the subject speaks; checked against
    /// [`PROTOCOL_VERSION`] before initialization.
    fn version(&self) -> u32;

    /// Initializes the subject with the suite's flags.
    ///
    /// An `Err` report is fatal for the whole suite run.
    fn init(&mut self, flags: &InitFlags) -> Result<(), Report>;

    /// Hands out a fresh duplex channel pair for one scenario.
    ///
    /// Returns the direction of the missing channel if the subject does not
    /// satisfy the channel contract — fatal for the whole suite run.
    fn connect(&mut self) -> Result<SubjectChannels, ChannelDirection>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_flags_use_camel_case_wire_names() {
        let flags = InitFlags {
            version: PROTOCOL_VERSION,
            segment: 1,
            segment_count: 4,
            tags: vec!["fast".to_string()],
        };
        let value = serde_json::to_value(&flags).expect("flags serialize");
        assert_eq!(value["segmentCount"], serde_json::json!(4));
        assert_eq!(value["tags"], serde_json::json!(["fast"]));
    }

    #[test]
    fn test_default_segment_is_the_whole_run() {
        let segment = Segment::default();
        assert_eq!(segment.id, 0);
        assert_eq!(segment.count, 1);
    }
}
