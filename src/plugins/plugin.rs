//! # The plugin contract.
//!
//! Plugins are the pluggable side-effect handlers of the runner: document
//! manipulation, simulated network responses, contract validation — anything
//! reached through a message home the engine does not handle natively. The
//! engine only ever calls through this contract.
//!
//! A plugin receives each message addressed to its home together with a
//! [`PluginContext`]: `emit` queues replies back to the subject (captured
//! instead when the message arrived embedded in an inquiry), and
//! `emit_after` defers a reply on the virtual clock. Aborting a scenario is
//! expressed as returning [`PluginError::Abort`] — the engine converts it
//! into a `scenario-control`/`abort` message for the subject and the suite
//! keeps running. [`PluginError::Fatal`] stops the whole suite.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use specvisor::{Message, Plugin, PluginContext, PluginError};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Plugin for Echo {
//!     fn home(&self) -> &str { "echo" }
//!
//!     async fn handle(
//!         &self,
//!         message: &Message,
//!         ctx: &mut PluginContext<'_>,
//!     ) -> Result<(), PluginError> {
//!         ctx.emit(message.clone());
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::clock::{TimerHandle, VirtualClock};
use crate::messages::{Message, Report};

/// # Failures a plugin can raise while handling a message.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PluginError {
    /// Abort the current scenario with an explanation.
    ///
    /// Scenario-local: the subject converts it into a rejected observation;
    /// the suite keeps running.
    #[error("scenario aborted by plugin")]
    Abort(Report),

    /// Unexpected failure; fatal for the whole suite.
    #[error("plugin failure: {0}")]
    Fatal(String),
}

impl PluginError {
    /// Returns `true` when the error only terminates the current scenario's
    /// step, not the suite.
    pub fn is_scenario_local(&self) -> bool {
        matches!(self, PluginError::Abort(_))
    }
}

/// Capabilities handed to a plugin for one `handle` call.
pub struct PluginContext<'a> {
    clock: &'a VirtualClock,
    subject: &'a UnboundedSender<Message>,
    emitted: &'a mut Vec<Message>,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(
        clock: &'a VirtualClock,
        subject: &'a UnboundedSender<Message>,
        emitted: &'a mut Vec<Message>,
    ) -> Self {
        Self {
            clock,
            subject,
            emitted,
        }
    }

    /// Queues a message back to the subject.
    ///
    /// On the top-level dispatch path the message is sent as soon as the
    /// plugin returns; on the inquiry path it becomes the inquiry's reply.
    pub fn emit(&mut self, message: Message) {
        self.emitted.push(message);
    }

    /// Schedules `message` to be sent to the subject once the virtual clock
    /// has advanced by `delay_ms` (e.g. a stubbed response with latency).
    pub fn emit_after(&mut self, delay_ms: u64, message: Message) -> TimerHandle {
        let subject = self.subject.clone();
        self.clock.after(
            delay_ms,
            Box::new(move || {
                let _ = subject.send(message);
            }),
        )
    }

    /// Current simulated time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Cancels a deferred emission scheduled with [`emit_after`](Self::emit_after).
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        self.clock.cancel(handle)
    }
}

/// A side-effect handler for one message home.
#[async_trait]
pub trait Plugin: Send + Sync + 'static {
    /// The message home this plugin serves; registry key.
    fn home(&self) -> &str;

    /// Handles one message addressed to this plugin's home.
    async fn handle(
        &self,
        message: &Message,
        ctx: &mut PluginContext<'_>,
    ) -> Result<(), PluginError>;

    /// Clears per-scenario state; invoked between scenarios.
    fn reset(&self) {}

    /// One-time hook invoked before the first program of a suite run.
    fn prepare_for_run(&self) {}
}
