//! # Reporter sinks for suite results.
//!
//! This module provides the [`Reporter`] trait — the sink through which a
//! suite run surfaces observations, log reports and the final error, in a
//! fixed relative order — and a simple built-in stdout implementation
//! behind the `logging` feature.

#[cfg(feature = "logging")]
mod log;
mod reporter;

#[cfg(feature = "logging")]
pub use log::LogReporter;
pub use reporter::Reporter;
