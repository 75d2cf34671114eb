//! End-to-end demo: a scripted subject, an echo plugin, and the stdout
//! reporter.
//!
//! Run with:
//! ```bash
//! cargo run --example basic_suite --features logging
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use specvisor::{
    homes, lifecycle, ChannelDirection, InitFlags, LogReporter, Message, Observation, Plugin,
    PluginContext, PluginError, PluginRegistry, Report, SubjectChannels, SubjectProgram,
    SuiteConfig, SuiteSequencer, PROTOCOL_VERSION,
};

/// Answers `greeter/hello` with `greeter/greeting` after 50 simulated ms.
struct Greeter;

#[async_trait]
impl Plugin for Greeter {
    fn home(&self) -> &str {
        "greeter"
    }

    async fn handle(
        &self,
        message: &Message,
        ctx: &mut PluginContext<'_>,
    ) -> Result<(), PluginError> {
        if message.name == "hello" {
            ctx.emit_after(
                50,
                Message::new("greeter", "greeting", serde_json::json!({ "text": "hi!" })),
            );
        }
        Ok(())
    }
}

/// A scripted subject: configures, asks the greeter plugin for a greeting
/// through a simulated-time step, observes, and finishes.
struct GreetingSpec;

impl SubjectProgram for GreetingSpec {
    fn name(&self) -> &str {
        "GreetingSpec"
    }

    fn version(&self) -> u32 {
        PROTOCOL_VERSION
    }

    fn init(&mut self, flags: &InitFlags) -> Result<(), Report> {
        tracing::info!(version = flags.version, tags = ?flags.tags, "subject initialized");
        Ok(())
    }

    fn connect(&mut self) -> Result<SubjectChannels, ChannelDirection> {
        let (to_subject, mut from_runner) = mpsc::unbounded_channel::<Message>();
        let (to_runner, from_subject) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            let mut continues = 0;
            let mut greeted = false;
            while let Some(message) = from_runner.recv().await {
                if message.is(homes::LIFECYCLE, lifecycle::START) {
                    let _ = to_runner.send(Message::lifecycle(lifecycle::CONFIGURE_COMPLETE));
                } else if message.is("greeter", "greeting") {
                    greeted = true;
                } else if message.is(homes::LIFECYCLE, lifecycle::CONTINUE) {
                    continues += 1;
                    match continues {
                        // configured: ask the plugin, then let simulated time pass
                        1 => {
                            let _ = to_runner.send(Message::new(
                                "greeter",
                                "hello",
                                serde_json::Value::Null,
                            ));
                            let _ = to_runner.send(Message::time_tick(100));
                        }
                        // stepped: observe and wrap up
                        2 => {
                            let observation = if greeted {
                                Observation::accepted("the greeter answers within 100ms")
                            } else {
                                Observation::rejected(
                                    "the greeter answers within 100ms",
                                    Report::line("no greeting arrived"),
                                )
                            };
                            let _ = to_runner
                                .send(Message::lifecycle(lifecycle::OBSERVATIONS_COMPLETE));
                            let _ = to_runner.send(Message::observation(&observation));
                            let _ = to_runner.send(Message::lifecycle(lifecycle::FINISHED));
                        }
                        _ => {}
                    }
                }
            }
        });

        Ok(SubjectChannels {
            outbound: from_subject,
            inbound: to_subject,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut plugins = PluginRegistry::new();
    plugins.register(Arc::new(Greeter));

    let sequencer = SuiteSequencer::new(SuiteConfig::default(), plugins, Arc::new(LogReporter));
    let result = sequencer.run(vec![Box::new(GreetingSpec)]).await;

    println!("suite result: {result:?}");
    std::process::exit(if result.is_passing() { 0 } else { 1 });
}
