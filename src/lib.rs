//! # specvisor
//!
//! **Specvisor** is a message-driven behavioral test runner for Rust.
//!
//! It drives opaque *subject programs* — units under test that communicate
//! solely through an asynchronous duplex message channel — through
//! configure/step/observe scenarios, collects their observations, and
//! aggregates a whole suite into a single result. The crate is designed as
//! a building block for higher-level test harnesses and CLIs.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │SubjectProgram│   │SubjectProgram│   │SubjectProgram│
//!     │ (subject #1) │   │ (subject #2) │   │ (subject #3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  SuiteSequencer (run orchestrator)                                │
//! │  - SuiteConfig (version gate, segment, tags)                      │
//! │  - PluginRegistry (side-effect handlers keyed by message home)    │
//! │  - Reporter (incremental result sink)                             │
//! │  - Counters (accepted / rejected / skipped)                       │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼  one per scenario
//!                     ┌────────────────────────┐
//!                     │     ScenarioEngine     │
//!                     │  - protocol phases     │
//!                     │  - settle detector     │
//!                     │  - VirtualClock        │
//!                     └───┬────────────────┬───┘
//!                         ▼                ▼
//!                   subject channel   PluginRegistry
//!                   (Message duplex)  (by message home)
//! ```
//!
//! ### Scenario lifecycle
//! ```text
//! SubjectProgram ──► version gate ──► init(flags) ──► connect()
//!
//! loop {
//!   ├─► engine sends START
//!   ├─► subject: CONFIGURE_COMPLETE        ─► engine replies CONTINUE
//!   ├─► subject: STEP_COMPLETE (burst ok)  ─► settle detector ─► CONTINUE
//!   ├─► subject: time/tick { ms }          ─► clock fires timers ─► CONTINUE
//!   ├─► subject: OBSERVATIONS_COMPLETE     ─► timers cleared ─► CONTINUE
//!   ├─► subject: observer/observation*     ─► tagged, reported, counted
//!   │
//!   └─ exit conditions:
//!        - SPEC_COMPLETE ─► fresh engine, plugins reset, same program
//!        - FINISHED      ─► next program
//!        - scenario-control/error ─► fatal, reported once, run resolves Error
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits                   |
//! |-------------------|----------------------------------------------------------------------|--------------------------------------|
//! | **Sequencing**    | Run suites of subject programs strictly in order.                    | [`SuiteSequencer`], [`SuiteResult`]  |
//! | **Scenarios**     | Per-scenario protocol state machine with settle detection.           | [`Message`], [`Namespace`]           |
//! | **Virtual time**  | Deterministic timers advanced only by explicit ticks.                | [`VirtualClock`], [`TimerHandle`]    |
//! | **Plugins**       | Side-effect handlers dispatched by message home.                     | [`Plugin`], [`PluginRegistry`]       |
//! | **Reporting**     | Incremental observation/log/error sink.                              | [`Reporter`], [`Observation`]        |
//! | **Subjects**      | The opaque unit-under-test contract.                                 | [`SubjectProgram`], [`SubjectChannels`] |
//! | **Errors**        | Typed fatal errors with user-facing reports.                         | [`SuiteError`], [`Report`]           |
//! | **Configuration** | Centralize run settings.                                             | [`SuiteConfig`], [`Segment`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogReporter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use specvisor::{
//!     ChannelDirection, InitFlags, Message, Observation, PluginRegistry, Report,
//!     SubjectChannels, SubjectProgram, SuiteConfig, SuiteSequencer, PROTOCOL_VERSION,
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
//!         let (to_runner, from_subject) = mpsc::unbounded_channel();
//!         tokio::spawn(async move {
//!             // reply to START with one observation, then finish
//!             while let Some(msg) = from_runner.recv().await {
//!                 if msg.is("lifecycle", "START") {
//!                     let obs = Observation::accepted("it answers");
//!                     let _ = to_runner.send(Message::observation(&obs));
//!                     let _ = to_runner.send(Message::lifecycle("FINISHED"));
//!                 }
//!             }
//!         });
//!         Ok(SubjectChannels { outbound: from_subject, inbound: to_subject })
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     #[cfg(feature = "logging")]
//!     let reporter: Arc<dyn specvisor::Reporter> = Arc::new(specvisor::LogReporter);
//!     #[cfg(not(feature = "logging"))]
//!     let reporter: Arc<dyn specvisor::Reporter> = unimplemented!("bring your own reporter");
//!
//!     let sequencer = SuiteSequencer::new(
//!         SuiteConfig::default(),
//!         PluginRegistry::new(),
//!         reporter,
//!     );
//!     let result = sequencer.run(vec![Box::new(Scripted)]).await;
//!     assert!(result.is_passing());
//! }
//! ```
mod clock;
mod config;
mod core;
mod error;
mod messages;
mod plugins;
mod reporters;
mod subject;

// ---- Public re-exports ----

pub use clock::{TimerCallback, TimerHandle, VirtualClock};
pub use config::SuiteConfig;
pub use core::{ChannelBridge, SuiteResult, SuiteSequencer};
pub use error::SuiteError;
pub use messages::{homes, lifecycle, Message, Namespace, Observation, Report, ReportLine, Summary};
pub use plugins::{Plugin, PluginContext, PluginError, PluginRegistry};
pub use reporters::Reporter;
pub use subject::{
    ChannelDirection, InitFlags, Segment, SubjectChannels, SubjectProgram, PROTOCOL_VERSION,
};

// Optional: expose a simple built-in stdout reporter (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use reporters::LogReporter;
