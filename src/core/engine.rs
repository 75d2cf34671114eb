//! # ScenarioEngine: the per-subject protocol state machine.
//!
//! Owns one subject's duplex channel for the lifetime of one scenario,
//! classifies every inbound message by namespace, and either handles it
//! natively or forwards it through the plugin registry. Emits zero or more
//! observation events, then exactly one of: normal completion with a
//! continue flag, or a fatal error.
//!
//! ## State machine
//! ```text
//! Idle ── CONFIGURE_COMPLETE ──► Configuring          reply CONTINUE
//! Configuring/Stepping ── STEP_COMPLETE ──► Stepping  arm settle detector
//!                                                      └─ detector fires → reply CONTINUE
//! Stepping ── OBSERVATIONS_COMPLETE ──► Observing     clear clock, reply CONTINUE
//! any ── SPEC_COMPLETE ──► Finished                   outcome: more scenarios
//! any ── FINISHED ──► Finished                        outcome: subject exhausted
//! any ── scenario-control error ──► Finished          fatal error
//! ```
//!
//! ## Routing table (by home)
//! ```text
//! lifecycle        → state machine above
//! scenario-control → error (fatal) / abort (forwarded to subject)
//! observer         → observation recording / inquiry protocol
//! time             → virtual clock tick, then synthesized step completion
//! channel          → named-channel bridge collaborator
//! witness          → echoed back unchanged
//! inquiry-result   → runner → subject only; inbound is a protocol error
//! anything else    → plugin registry lookup by home
//! ```
//!
//! ## Rules
//! - An unmatched home or name is a **logged** protocol error, never fatal
//!   (forward-compatible messages are tolerated).
//! - A burst of `STEP_COMPLETE` signals within one settle window produces
//!   exactly one `CONTINUE`: each signal replaces the pending detector, and
//!   the run loop polls the subject's channel with priority, so the
//!   detector only wins once the subject has gone quiet.
//! - At most one settle detector is pending per engine (`Option<Settle>`,
//!   replaced atomically).
//! - Once finished, no further inbound messages are processed.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::clock::{Settle, VirtualClock};
use crate::error::SuiteError;
use crate::messages::{lifecycle, Message, Namespace, Observation, Report};
use crate::plugins::{PluginContext, PluginError, PluginRegistry};
use crate::subject::SubjectChannels;

/// Scenario phase; exactly one engine occupies this state at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Configuring,
    Stepping,
    Observing,
    Finished,
}

/// Normal completion of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScenarioOutcome {
    /// `true`: more scenarios remain in this subject; `false`: exhausted.
    pub more_scenarios: bool,
}

/// Events the engine emits while running, consumed by the sequencer.
#[derive(Debug)]
pub(crate) enum EngineEvent {
    /// An observation was recorded (already tagged with the program name).
    Observed(Observation),
    /// A tolerated anomaly worth a log line (e.g. unrecognized message).
    Logged(Report),
}

/// External collaborator bridging named pub/sub channels.
///
/// The `channel` home is routed here; the bridge itself (its channel table,
/// its delivery semantics) lives outside the engine.
pub trait ChannelBridge: Send + Sync {
    /// Forwards one named-channel message; `emit` queues replies for the
    /// subject.
    fn forward(&self, message: &Message, emit: &mut dyn FnMut(Message));
}

enum Wake {
    Inbound(Message),
    Settled,
    Closed,
}

#[derive(Deserialize)]
struct TickBody {
    ms: u64,
}

#[derive(Deserialize)]
struct InquiryBody {
    message: Message,
}

/// The per-subject protocol state machine; see the module docs.
pub(crate) struct ScenarioEngine {
    program: Arc<str>,
    phase: Phase,
    clock: VirtualClock,
    plugins: Arc<PluginRegistry>,
    bridge: Option<Arc<dyn ChannelBridge>>,
    subject_tx: UnboundedSender<Message>,
    subject_rx: UnboundedReceiver<Message>,
    events: UnboundedSender<EngineEvent>,
    /// Pending settle detector; at most one, replaced atomically on re-arm.
    settle: Option<Settle>,
}

impl ScenarioEngine {
    pub(crate) fn new(
        program: &str,
        channels: SubjectChannels,
        plugins: Arc<PluginRegistry>,
        bridge: Option<Arc<dyn ChannelBridge>>,
        events: UnboundedSender<EngineEvent>,
    ) -> Self {
        Self {
            program: Arc::from(program),
            phase: Phase::Idle,
            clock: VirtualClock::new(),
            plugins,
            bridge,
            subject_tx: channels.inbound,
            subject_rx: channels.outbound,
            events,
            settle: None,
        }
    }

    /// Drives one scenario to completion.
    ///
    /// Sends `START` after the current scheduler turn, then loops on the
    /// subject's outbound channel until the scenario finishes or fails.
    pub(crate) async fn run(mut self) -> Result<ScenarioOutcome, SuiteError> {
        tokio::task::yield_now().await;
        self.send(Message::lifecycle(lifecycle::START))?;

        loop {
            match self.next_wake().await {
                Wake::Inbound(message) => {
                    if let Some(outcome) = self.handle(message).await? {
                        self.phase = Phase::Finished;
                        return Ok(outcome);
                    }
                }
                Wake::Settled => {
                    self.settle = None;
                    self.send(Message::lifecycle(lifecycle::CONTINUE))?;
                }
                Wake::Closed => return Err(SuiteError::ChannelClosed),
            }
        }
    }

    /// Waits for the next inbound message, or — only once the channel has
    /// nothing queued — for the pending settle detector.
    async fn next_wake(&mut self) -> Wake {
        match self.settle.as_mut() {
            Some(settle) => tokio::select! {
                biased;
                maybe = self.subject_rx.recv() => match maybe {
                    Some(message) => Wake::Inbound(message),
                    None => Wake::Closed,
                },
                _ = settle => Wake::Settled,
            },
            None => match self.subject_rx.recv().await {
                Some(message) => Wake::Inbound(message),
                None => Wake::Closed,
            },
        }
    }

    /// Classifies and routes one inbound message.
    async fn handle(&mut self, message: Message) -> Result<Option<ScenarioOutcome>, SuiteError> {
        tracing::debug!(
            phase = ?self.phase,
            home = %message.home,
            name = %message.name,
            "inbound message"
        );
        match message.namespace() {
            Namespace::Lifecycle => self.on_lifecycle(&message),
            Namespace::ScenarioControl => self.on_scenario_control(&message).map(|()| None),
            Namespace::Observer => {
                self.on_observer(message).await?;
                Ok(None)
            }
            Namespace::Time => {
                self.on_time(&message)?;
                Ok(None)
            }
            Namespace::Channel => {
                self.on_channel(&message)?;
                Ok(None)
            }
            Namespace::Witness | Namespace::External(_) => {
                let replies = self.route_nested(message).await?;
                for reply in replies {
                    self.send(reply)?;
                }
                Ok(None)
            }
            Namespace::InquiryResult => {
                self.protocol_error(
                    &message.home,
                    &message.name,
                    "inquiry-result flows runner to subject only",
                );
                Ok(None)
            }
        }
    }

    fn on_lifecycle(&mut self, message: &Message) -> Result<Option<ScenarioOutcome>, SuiteError> {
        match message.name.as_str() {
            lifecycle::CONFIGURE_COMPLETE => {
                self.phase = Phase::Configuring;
                self.send(Message::lifecycle(lifecycle::CONTINUE))?;
                Ok(None)
            }
            lifecycle::STEP_COMPLETE => {
                self.on_step_complete();
                Ok(None)
            }
            lifecycle::OBSERVATIONS_COMPLETE => {
                self.phase = Phase::Observing;
                // a detector pending past the stepping phase is stale
                self.settle = None;
                let cleared = self.clock.clear();
                if cleared > 0 {
                    tracing::debug!(cleared, "dropped pending timers before observations");
                }
                self.send(Message::lifecycle(lifecycle::CONTINUE))?;
                Ok(None)
            }
            lifecycle::SPEC_COMPLETE => Ok(Some(ScenarioOutcome {
                more_scenarios: true,
            })),
            lifecycle::FINISHED => Ok(Some(ScenarioOutcome {
                more_scenarios: false,
            })),
            _ => {
                self.protocol_error(&message.home, &message.name, "unrecognized lifecycle message");
                Ok(None)
            }
        }
    }

    /// Arms (or re-arms) the settle detector for an asynchronous step.
    ///
    /// Replacing the `Option` is the debounce: a fresh detector cancels the
    /// pending one, so a burst of step completions yields one `CONTINUE`.
    fn on_step_complete(&mut self) {
        self.phase = Phase::Stepping;
        self.settle = Some(self.clock.debounce());
    }

    fn on_scenario_control(&self, message: &Message) -> Result<(), SuiteError> {
        match message.name.as_str() {
            "error" => {
                let report: Report = serde_json::from_value(message.body.clone()).map_err(|e| {
                    SuiteError::Malformed {
                        context: "scenario-control error",
                        detail: e.to_string(),
                    }
                })?;
                Err(SuiteError::Scenario { report })
            }
            "abort" => self.send(message.clone()),
            _ => {
                self.protocol_error(
                    &message.home,
                    &message.name,
                    "unrecognized scenario-control message",
                );
                Ok(())
            }
        }
    }

    async fn on_observer(&mut self, message: Message) -> Result<(), SuiteError> {
        match message.name.as_str() {
            "observation" => {
                let observation: Observation =
                    serde_json::from_value(message.body).map_err(|e| SuiteError::Malformed {
                        context: "observation",
                        detail: e.to_string(),
                    })?;
                let program: &str = self.program.as_ref();
                self.observe(observation.tagged(program));
                Ok(())
            }
            "inquiry" => {
                let body: InquiryBody =
                    serde_json::from_value(message.body).map_err(|e| SuiteError::Malformed {
                        context: "inquiry",
                        detail: e.to_string(),
                    })?;
                let embedded = body.message;
                if embedded.namespace() == Namespace::Observer {
                    // inquiries are not pipelined; one outstanding at a time
                    self.protocol_error(
                        &embedded.home,
                        &embedded.name,
                        "inquiries cannot embed observer messages",
                    );
                    return self.send(Message::inquiry_result(Value::Null));
                }
                let mut replies = self.route_nested(embedded).await?;
                let reply = match replies.len() {
                    0 => {
                        self.protocol_error(&message.home, &message.name, "inquiry produced no reply");
                        Value::Null
                    }
                    1 => message_body(replies.swap_remove(0)),
                    _ => {
                        self.protocol_error(
                            &message.home,
                            &message.name,
                            "inquiry produced multiple replies; extras dropped",
                        );
                        message_body(replies.swap_remove(0))
                    }
                };
                self.send(Message::inquiry_result(reply))
            }
            _ => {
                self.protocol_error(&message.home, &message.name, "unrecognized observer message");
                Ok(())
            }
        }
    }

    /// Shared dispatch path for plugin-bound messages.
    ///
    /// Used by both the top-level handler (replies are then sent to the
    /// subject) and the inquiry protocol (replies are captured and wrapped),
    /// so routing semantics have one source of truth.
    async fn route_nested(&mut self, message: Message) -> Result<Vec<Message>, SuiteError> {
        match message.namespace() {
            // witness traffic is echoed back unchanged
            Namespace::Witness => Ok(vec![message]),
            Namespace::External(home) => {
                let mut captured = Vec::new();
                self.dispatch_plugin(&home, &message, &mut captured).await?;
                Ok(captured)
            }
            _ => {
                self.protocol_error(
                    &message.home,
                    &message.name,
                    "message cannot be routed on this path",
                );
                Ok(Vec::new())
            }
        }
    }

    async fn dispatch_plugin(
        &mut self,
        home: &str,
        message: &Message,
        captured: &mut Vec<Message>,
    ) -> Result<(), SuiteError> {
        let Some(plugin) = self.plugins.lookup(home).cloned() else {
            self.protocol_error(&message.home, &message.name, "no plugin registered for this home");
            return Ok(());
        };
        let mut ctx = PluginContext::new(&self.clock, &self.subject_tx, captured);
        match plugin.handle(message, &mut ctx).await {
            Ok(()) => Ok(()),
            Err(PluginError::Abort(report)) => {
                tracing::debug!(home, "plugin aborted the scenario step");
                // routed through our own dispatch; the subject converts it
                // into a rejected observation
                self.on_scenario_control(&Message::scenario_abort(&report))
            }
            Err(PluginError::Fatal(detail)) => Err(SuiteError::Handler { detail }),
        }
    }

    fn on_time(&mut self, message: &Message) -> Result<(), SuiteError> {
        match message.name.as_str() {
            "tick" => {
                let body: TickBody = serde_json::from_value(message.body.clone()).map_err(|e| {
                    SuiteError::Malformed {
                        context: "time tick",
                        detail: e.to_string(),
                    }
                })?;
                let fired = self.clock.tick(body.ms);
                tracing::debug!(ms = body.ms, fired, now_ms = self.clock.now_ms(), "advanced virtual clock");
                // a time jump completes a step: protocol advancement stays
                // interleaved with simulated time advancement
                self.on_step_complete();
                Ok(())
            }
            _ => {
                self.protocol_error(&message.home, &message.name, "unrecognized time message");
                Ok(())
            }
        }
    }

    fn on_channel(&self, message: &Message) -> Result<(), SuiteError> {
        let Some(bridge) = &self.bridge else {
            self.protocol_error(&message.home, &message.name, "no channel bridge installed");
            return Ok(());
        };
        let mut replies = Vec::new();
        bridge.forward(message, &mut |m| replies.push(m));
        for reply in replies {
            self.send(reply)?;
        }
        Ok(())
    }

    fn observe(&self, observation: Observation) {
        let _ = self.events.send(EngineEvent::Observed(observation));
    }

    /// Logs a tolerated protocol anomaly; the scenario continues.
    fn protocol_error(&self, home: &str, name: &str, detail: &str) {
        tracing::warn!(home, name, detail, "protocol error");
        let report = Report::new()
            .with_note("Unrecognized message received:", format!("{home}/{name}"))
            .with_line(detail);
        let _ = self.events.send(EngineEvent::Logged(report));
    }

    fn send(&self, message: Message) -> Result<(), SuiteError> {
        self.subject_tx
            .send(message)
            .map_err(|_| SuiteError::ChannelClosed)
    }
}

fn message_body(message: Message) -> Value {
    // messages are plain data; serialization cannot fail
    serde_json::to_value(message).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::homes;
    use crate::plugins::Plugin;
    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    struct Harness {
        engine: ScenarioEngine,
        /// Subject side: sends messages to the engine.
        to_engine: UnboundedSender<Message>,
        /// Subject side: receives what the engine sends the subject.
        from_engine: UnboundedReceiver<Message>,
        events: UnboundedReceiver<EngineEvent>,
    }

    fn harness(plugins: PluginRegistry) -> Harness {
        let (to_engine, outbound) = mpsc::unbounded_channel();
        let (inbound, from_engine) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();
        let engine = ScenarioEngine::new(
            "TestProgram",
            SubjectChannels { outbound, inbound },
            Arc::new(plugins),
            None,
            events_tx,
        );
        Harness {
            engine,
            to_engine,
            from_engine,
            events,
        }
    }

    fn send(tx: &UnboundedSender<Message>, message: Message) {
        tx.send(message).expect("engine channel open");
    }

    struct Echo;

    #[async_trait]
    impl Plugin for Echo {
        fn home(&self) -> &str {
            "echo"
        }

        async fn handle(
            &self,
            message: &Message,
            ctx: &mut PluginContext<'_>,
        ) -> Result<(), PluginError> {
            ctx.emit(message.clone());
            Ok(())
        }
    }

    struct Aborting;

    #[async_trait]
    impl Plugin for Aborting {
        fn home(&self) -> &str {
            "aborting"
        }

        async fn handle(
            &self,
            _message: &Message,
            _ctx: &mut PluginContext<'_>,
        ) -> Result<(), PluginError> {
            Err(PluginError::Abort(Report::line("step went wrong")))
        }
    }

    struct Failing;

    #[async_trait]
    impl Plugin for Failing {
        fn home(&self) -> &str {
            "failing"
        }

        async fn handle(
            &self,
            _message: &Message,
            _ctx: &mut PluginContext<'_>,
        ) -> Result<(), PluginError> {
            Err(PluginError::Fatal("stub exploded".to_string()))
        }
    }

    /// Stubs a response with simulated latency.
    struct Latency;

    #[async_trait]
    impl Plugin for Latency {
        fn home(&self) -> &str {
            "latency"
        }

        async fn handle(
            &self,
            _message: &Message,
            ctx: &mut PluginContext<'_>,
        ) -> Result<(), PluginError> {
            ctx.emit_after(
                100,
                Message::new("latency", "response", serde_json::json!({ "ok": true })),
            );
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_burst_of_step_completes_yields_exactly_one_continue() {
        let h = harness(PluginRegistry::new());
        let to_engine = h.to_engine;
        let mut from_engine = h.from_engine;

        let subject = tokio::spawn(async move {
            let mut continues = 0;
            while let Some(message) = from_engine.recv().await {
                if message.is(homes::LIFECYCLE, lifecycle::START) {
                    send(&to_engine, Message::lifecycle(lifecycle::CONFIGURE_COMPLETE));
                } else if message.is(homes::LIFECYCLE, lifecycle::CONTINUE) {
                    continues += 1;
                    match continues {
                        1 => {
                            // burst: all queued before the engine drains them
                            for _ in 0..7 {
                                send(&to_engine, Message::lifecycle(lifecycle::STEP_COMPLETE));
                            }
                        }
                        2 => send(&to_engine, Message::lifecycle(lifecycle::FINISHED)),
                        _ => {}
                    }
                }
            }
            continues
        });

        let outcome = h.engine.run().await.expect("scenario completes");
        assert!(!outcome.more_scenarios);
        // one CONTINUE for configure, exactly one for the whole burst
        assert_eq!(subject.await.expect("subject task"), 2);
    }

    #[tokio::test]
    async fn test_observation_is_tagged_and_passed_through() {
        let mut h = harness(PluginRegistry::new());
        send(&h.to_engine, Message::observation(&Observation::accepted("it renders")));
        send(&h.to_engine, Message::lifecycle(lifecycle::FINISHED));

        h.engine.run().await.expect("scenario completes");

        match h.events.try_recv().expect("one event") {
            EngineEvent::Observed(obs) => {
                assert_eq!(obs.program.as_deref(), Some("TestProgram"));
                assert_eq!(obs.description, "it renders");
                assert_eq!(obs.summary, crate::messages::Summary::Accepted);
            }
            other => panic!("expected an observation event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spec_complete_reports_more_scenarios() {
        let h = harness(PluginRegistry::new());
        send(&h.to_engine, Message::lifecycle(lifecycle::SPEC_COMPLETE));
        let outcome = h.engine.run().await.expect("scenario completes");
        assert!(outcome.more_scenarios);
    }

    #[tokio::test]
    async fn test_inquiry_round_trips_an_echoed_message() {
        let mut plugins = PluginRegistry::new();
        plugins.register(Arc::new(Echo));
        let h = harness(plugins);
        let to_engine = h.to_engine;
        let mut from_engine = h.from_engine;

        let inner = Message::new("echo", "ping", serde_json::json!({ "n": 1 }));
        let expected = inner.clone();

        let subject = tokio::spawn(async move {
            let mut result_body = None;
            while let Some(message) = from_engine.recv().await {
                if message.is(homes::LIFECYCLE, lifecycle::START) {
                    send(&to_engine, Message::inquiry(&inner));
                } else if message.home == homes::INQUIRY_RESULT {
                    result_body = Some(message.body);
                    send(&to_engine, Message::lifecycle(lifecycle::FINISHED));
                }
            }
            result_body
        });

        h.engine.run().await.expect("scenario completes");

        let body = subject.await.expect("subject task").expect("inquiry answered");
        let echoed: Message = serde_json::from_value(body).expect("body is a message");
        assert_eq!(echoed, expected);
    }

    #[tokio::test]
    async fn test_witness_messages_are_echoed_unchanged() {
        let mut h = harness(PluginRegistry::new());
        let witness = Message::new(homes::WITNESS, "logged", serde_json::json!({ "n": 3 }));
        send(&h.to_engine, witness.clone());
        send(&h.to_engine, Message::lifecycle(lifecycle::FINISHED));

        h.engine.run().await.expect("scenario completes");

        let mut echoed = Vec::new();
        while let Ok(message) = h.from_engine.try_recv() {
            if message.home == homes::WITNESS {
                echoed.push(message);
            }
        }
        assert_eq!(echoed, vec![witness]);
    }

    #[tokio::test]
    async fn test_scenario_control_error_is_fatal_with_the_subjects_report() {
        let h = harness(PluginRegistry::new());
        let report = Report::new().with_note("Expected:", "42");
        send(&h.to_engine, Message::scenario_error(&report));

        let err = h.engine.run().await.expect_err("scenario fails");
        match err {
            SuiteError::Scenario { report: r } => assert_eq!(r, report),
            other => panic!("expected a scenario error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_plugin_abort_is_forwarded_not_fatal() {
        let mut plugins = PluginRegistry::new();
        plugins.register(Arc::new(Aborting));
        let mut h = harness(plugins);
        send(&h.to_engine, Message::new("aborting", "step", Value::Null));
        send(&h.to_engine, Message::lifecycle(lifecycle::FINISHED));

        let outcome = h.engine.run().await.expect("suite-level run survives");
        assert!(!outcome.more_scenarios);

        let mut saw_abort = false;
        while let Ok(message) = h.from_engine.try_recv() {
            if message.is(homes::SCENARIO_CONTROL, "abort") {
                let report: Report =
                    serde_json::from_value(message.body).expect("abort carries a report");
                assert!(report.contains("step went wrong"));
                saw_abort = true;
            }
        }
        assert!(saw_abort, "abort message was forwarded to the subject");
    }

    #[tokio::test]
    async fn test_plugin_fatal_failure_stops_the_scenario() {
        let mut plugins = PluginRegistry::new();
        plugins.register(Arc::new(Failing));
        let h = harness(plugins);
        send(&h.to_engine, Message::new("failing", "step", Value::Null));

        let err = h.engine.run().await.expect_err("scenario fails");
        assert_eq!(err.as_label(), "handler_failure");
    }

    #[tokio::test]
    async fn test_unknown_home_is_logged_and_tolerated() {
        let mut h = harness(PluginRegistry::new());
        send(&h.to_engine, Message::new("future-protocol", "hello", Value::Null));
        send(&h.to_engine, Message::lifecycle(lifecycle::FINISHED));

        h.engine.run().await.expect("scenario completes");

        match h.events.try_recv().expect("one event") {
            EngineEvent::Logged(report) => assert!(report.contains("future-protocol/hello")),
            other => panic!("expected a logged report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_time_tick_fires_deferred_emissions_then_continues() {
        let mut plugins = PluginRegistry::new();
        plugins.register(Arc::new(Latency));
        let h = harness(plugins);
        let to_engine = h.to_engine;
        let mut from_engine = h.from_engine;

        let subject = tokio::spawn(async move {
            let mut saw_response = false;
            while let Some(message) = from_engine.recv().await {
                if message.is(homes::LIFECYCLE, lifecycle::START) {
                    send(&to_engine, Message::new("latency", "request", Value::Null));
                    send(&to_engine, Message::time_tick(150));
                } else if message.is("latency", "response") {
                    saw_response = true;
                } else if message.is(homes::LIFECYCLE, lifecycle::CONTINUE) {
                    send(&to_engine, Message::lifecycle(lifecycle::FINISHED));
                }
            }
            saw_response
        });

        h.engine.run().await.expect("scenario completes");
        assert!(subject.await.expect("subject task"), "deferred response was delivered");
    }

    #[tokio::test]
    async fn test_observations_complete_clears_pending_timers() {
        let mut plugins = PluginRegistry::new();
        plugins.register(Arc::new(Latency));
        let mut h = harness(plugins);
        send(&h.to_engine, Message::new("latency", "request", Value::Null));
        send(&h.to_engine, Message::lifecycle(lifecycle::OBSERVATIONS_COMPLETE));
        send(&h.to_engine, Message::time_tick(500));
        send(&h.to_engine, Message::lifecycle(lifecycle::FINISHED));

        h.engine.run().await.expect("scenario completes");

        while let Ok(message) = h.from_engine.try_recv() {
            assert!(
                !message.is("latency", "response"),
                "cleared timer must not fire"
            );
        }
    }

    #[tokio::test]
    async fn test_closed_outbound_channel_is_fatal() {
        let h = harness(PluginRegistry::new());
        drop(h.to_engine);
        let err = h.engine.run().await.expect_err("scenario fails");
        assert_eq!(err.as_label(), "channel_closed");
    }

    #[tokio::test]
    async fn test_malformed_observation_body_is_fatal() {
        let h = harness(PluginRegistry::new());
        send(
            &h.to_engine,
            Message::new(homes::OBSERVER, "observation", serde_json::json!({ "summary": 3 })),
        );
        let err = h.engine.run().await.expect_err("scenario fails");
        assert_eq!(err.as_label(), "malformed_message");
    }
}
