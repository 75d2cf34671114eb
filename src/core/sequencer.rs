//! # SuiteSequencer: the run orchestrator.
//!
//! Owns one suite run end to end: validates the program list, runs every
//! subject program strictly in order, creates a fresh [`ScenarioEngine`] per
//! scenario, aggregates observation counters, and surfaces incremental
//! results through the [`Reporter`].
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!                 │              SuiteSequencer              │
//!                 │                                          │
//!  programs ────► │  version gate → init → connect ──┐       │
//!                 │        ▲                         ▼       │
//!                 │        │ next program    ScenarioEngine  │
//!                 │        │                         │       │
//!                 │        └── FINISHED   SPEC_COMPLETE──┐   │
//!                 │                          reset, loop ┘   │
//!                 └───────────────┬──────────────────────────┘
//!                                 ▼
//!                          Reporter / SuiteResult
//! ```
//!
//! ## Rules
//! - Programs run one at a time, in list order; scenarios within a program
//!   run one at a time. Nothing overlaps.
//! - The version gate runs **before** initialization, so a stale subject is
//!   rejected without executing any of its code.
//! - Each scenario gets a fresh engine and a fresh channel pair; plugins are
//!   reset between scenarios of the same program.
//! - The first fatal error stops everything: remaining scenarios and
//!   programs do not run, the reporter receives exactly one error report,
//!   and the run resolves to [`SuiteResult::Error`].

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::config::SuiteConfig;
use crate::core::engine::{ChannelBridge, EngineEvent, ScenarioEngine, ScenarioOutcome};
use crate::core::result::{Counters, SuiteResult};
use crate::error::SuiteError;
use crate::plugins::PluginRegistry;
use crate::reporters::Reporter;
use crate::subject::{InitFlags, SubjectProgram};

/// Runs a whole suite of subject programs; see the module docs.
pub struct SuiteSequencer {
    config: SuiteConfig,
    plugins: Arc<PluginRegistry>,
    reporter: Arc<dyn Reporter>,
    bridge: Option<Arc<dyn ChannelBridge>>,
}

impl SuiteSequencer {
    pub fn new(config: SuiteConfig, plugins: PluginRegistry, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            config,
            plugins: Arc::new(plugins),
            reporter,
            bridge: None,
        }
    }

    /// Installs the named-channel bridge collaborator.
    ///
    /// Without one, `channel` traffic is a logged protocol error.
    pub fn with_bridge(mut self, bridge: Arc<dyn ChannelBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Runs every program to completion, or up to the first fatal error.
    ///
    /// Always resolves; a fatal error is reported through the [`Reporter`]
    /// and folded into [`SuiteResult::Error`].
    pub async fn run(&self, programs: Vec<Box<dyn SubjectProgram>>) -> SuiteResult {
        self.reporter.start_suite().await;
        let result = match self.run_inner(programs).await {
            Ok(counters) => counters.into_result(),
            Err(err) => {
                tracing::error!(error = %err, label = err.as_label(), "suite run failed");
                self.reporter.error(&err.to_report()).await;
                SuiteResult::Error
            }
        };
        self.reporter.finish().await;
        result
    }

    async fn run_inner(
        &self,
        programs: Vec<Box<dyn SubjectProgram>>,
    ) -> Result<Counters, SuiteError> {
        if programs.is_empty() {
            return Err(SuiteError::NoPrograms {
                criteria: self.config.criteria.clone(),
            });
        }
        self.plugins.prepare_all();
        let flags = self.config.init_flags();
        let mut counters = Counters::default();
        for mut program in programs {
            self.run_program(program.as_mut(), &flags, &mut counters)
                .await?;
        }
        Ok(counters)
    }

    async fn run_program(
        &self,
        program: &mut dyn SubjectProgram,
        flags: &InitFlags,
        counters: &mut Counters,
    ) -> Result<(), SuiteError> {
        let name = program.name().to_string();
        tracing::info!(program = %name, "running subject program");

        let actual = program.version();
        if actual != self.config.require_version {
            return Err(SuiteError::VersionMismatch {
                required: self.config.require_version,
                actual,
            });
        }
        program
            .init(flags)
            .map_err(|report| SuiteError::Scenario { report })?;

        loop {
            let channels = program
                .connect()
                .map_err(|direction| SuiteError::MissingChannel { direction })?;
            let (events_tx, events_rx) = mpsc::unbounded_channel();
            let engine = ScenarioEngine::new(
                &name,
                channels,
                Arc::clone(&self.plugins),
                self.bridge.clone(),
                events_tx,
            );
            let outcome = self.drive(engine.run(), events_rx, counters).await?;
            if !outcome.more_scenarios {
                tracing::debug!(program = %name, "subject program exhausted");
                return Ok(());
            }
            self.plugins.reset_all();
        }
    }

    /// Polls one scenario to completion while draining its event stream, so
    /// observations reach the reporter in the order they were produced.
    async fn drive(
        &self,
        run: impl Future<Output = Result<ScenarioOutcome, SuiteError>>,
        mut events: UnboundedReceiver<EngineEvent>,
        counters: &mut Counters,
    ) -> Result<ScenarioOutcome, SuiteError> {
        let mut run = pin!(run);
        let outcome = loop {
            tokio::select! {
                biased;
                Some(event) = events.recv() => self.consume(event, counters).await,
                outcome = &mut run => break outcome,
            }
        }?;
        // events queued during the engine's final turn
        while let Ok(event) = events.try_recv() {
            self.consume(event, counters).await;
        }
        Ok(outcome)
    }

    async fn consume(&self, event: EngineEvent, counters: &mut Counters) {
        match event {
            EngineEvent::Observed(observation) => {
                counters.count(observation.summary);
                self.reporter.record(&observation).await;
            }
            EngineEvent::Logged(report) => self.reporter.log(&report).await,
        }
    }
}
