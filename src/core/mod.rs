//! # Core runtime: the scenario engine and the suite sequencer.
//!
//! [`engine`] holds the per-scenario protocol state machine; [`sequencer`]
//! orchestrates whole runs across programs and scenarios; [`result`] is the
//! aggregate outcome type. Everything here is driven purely by messages and
//! the virtual clock — no wall-clock time, no I/O.

pub(crate) mod engine;
pub(crate) mod result;
pub(crate) mod sequencer;

pub use engine::ChannelBridge;
pub use result::SuiteResult;
pub use sequencer::SuiteSequencer;
