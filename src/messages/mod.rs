//! Wire data model: messages, namespaces, observations, reports.
//!
//! This module groups everything that crosses (or describes what crossed)
//! the duplex subject channel:
//! - [`Message`] and the [`Namespace`] routing classification, with the
//!   well-known [`homes`] and [`lifecycle`] name constants;
//! - [`Observation`] and its [`Summary`] verdict;
//! - [`Report`] / [`ReportLine`], the explanation attached to rejections
//!   and fatal errors.
//!
//! Everything here is plain structured data (serde-serializable, no live
//! references) — the only contract the runner and a subject must agree on.

mod message;
mod observation;
mod report;

pub use message::{homes, lifecycle, Message, Namespace};
pub use observation::{Observation, Summary};
pub use report::{Report, ReportLine};
