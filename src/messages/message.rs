//! # The wire message and namespace routing model.
//!
//! Every exchange with a subject program uses one shape, symmetric in both
//! directions: `{ home, name, body }`. The `home` selects routing, the
//! `name` selects an operation within it, and the `body` is an opaque
//! JSON-serializable payload — plain structured data only, since it crosses
//! the channel boundary.
//!
//! Routing is modeled as the closed [`Namespace`] enum plus one open
//! [`Namespace::External`] variant for plugin homes, so the dispatch table
//! is exhaustiveness-checked instead of stringly matched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messages::observation::Observation;
use crate::messages::report::Report;

/// Well-known `home` values.
pub mod homes {
    pub const LIFECYCLE: &str = "lifecycle";
    pub const SCENARIO_CONTROL: &str = "scenario-control";
    pub const OBSERVER: &str = "observer";
    pub const INQUIRY_RESULT: &str = "inquiry-result";
    pub const TIME: &str = "time";
    pub const CHANNEL: &str = "channel";
    pub const WITNESS: &str = "witness";
}

/// Lifecycle message names exchanged with the subject.
///
/// `START` and `CONTINUE` flow runner → subject; the rest flow subject →
/// runner and drive the scenario state machine.
pub mod lifecycle {
    pub const START: &str = "START";
    pub const CONTINUE: &str = "CONTINUE";
    pub const CONFIGURE_COMPLETE: &str = "CONFIGURE_COMPLETE";
    pub const STEP_COMPLETE: &str = "STEP_COMPLETE";
    pub const OBSERVATIONS_COMPLETE: &str = "OBSERVATIONS_COMPLETE";
    pub const SPEC_COMPLETE: &str = "SPEC_COMPLETE";
    pub const FINISHED: &str = "FINISHED";
}

/// Routing classification of a message's `home`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    /// Scenario state machine traffic (`lifecycle`).
    Lifecycle,
    /// Error/abort control traffic (`scenario-control`).
    ScenarioControl,
    /// Observations and inquiries (`observer`).
    Observer,
    /// Reply wrapper for inquiries (`inquiry-result`), runner → subject only.
    InquiryResult,
    /// Virtual clock control (`time`).
    Time,
    /// Named pub/sub channel bridging (`channel`).
    Channel,
    /// Diagnostic witness traffic (`witness`), echoed back unchanged.
    Witness,
    /// Anything else: resolved through the plugin registry by home.
    External(String),
}

impl Namespace {
    /// Classifies a `home` string.
    pub fn of(home: &str) -> Self {
        match home {
            homes::LIFECYCLE => Namespace::Lifecycle,
            homes::SCENARIO_CONTROL => Namespace::ScenarioControl,
            homes::OBSERVER => Namespace::Observer,
            homes::INQUIRY_RESULT => Namespace::InquiryResult,
            homes::TIME => Namespace::Time,
            homes::CHANNEL => Namespace::Channel,
            homes::WITNESS => Namespace::Witness,
            other => Namespace::External(other.to_string()),
        }
    }
}

/// One message on the duplex subject channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Routing namespace tag.
    pub home: String,
    /// Operation name within the home.
    pub name: String,
    /// Opaque payload; `null` when the operation carries no data.
    #[serde(default)]
    pub body: Value,
}

impl Message {
    /// Creates a message with an arbitrary body.
    pub fn new(home: impl Into<String>, name: impl Into<String>, body: Value) -> Self {
        Self {
            home: home.into(),
            name: name.into(),
            body,
        }
    }

    /// Classifies this message's home.
    pub fn namespace(&self) -> Namespace {
        Namespace::of(&self.home)
    }

    /// Returns `true` if home and name both match.
    pub fn is(&self, home: &str, name: &str) -> bool {
        self.home == home && self.name == name
    }

    /// Creates a bodiless lifecycle message with the given name.
    pub fn lifecycle(name: &str) -> Self {
        Self::new(homes::LIFECYCLE, name, Value::Null)
    }

    /// Creates the `scenario-control`/`abort` message carrying `report`.
    pub fn scenario_abort(report: &Report) -> Self {
        Self::new(homes::SCENARIO_CONTROL, "abort", to_body(report))
    }

    /// Creates the `scenario-control`/`error` message carrying `report`.
    pub fn scenario_error(report: &Report) -> Self {
        Self::new(homes::SCENARIO_CONTROL, "error", to_body(report))
    }

    /// Creates an `observer`/`inquiry` message embedding `message`.
    pub fn inquiry(message: &Message) -> Self {
        Self::new(
            homes::OBSERVER,
            "inquiry",
            serde_json::json!({ "message": to_body(message) }),
        )
    }

    /// Creates the `inquiry-result` reply wrapping a captured body.
    pub fn inquiry_result(body: Value) -> Self {
        Self::new(homes::INQUIRY_RESULT, "result", body)
    }

    /// Creates an `observer`/`observation` message (test/demo convenience).
    pub fn observation(observation: &Observation) -> Self {
        Self::new(homes::OBSERVER, "observation", to_body(observation))
    }

    /// Creates the `time`/`tick` message asking the runner to advance the
    /// virtual clock by `ms` milliseconds.
    pub fn time_tick(ms: u64) -> Self {
        Self::new(homes::TIME, "tick", serde_json::json!({ "ms": ms }))
    }
}

/// Serializes plain structured data into a message body.
fn to_body<T: Serialize>(value: &T) -> Value {
    // All body types are derived plain data; serialization cannot fail.
    serde_json::to_value(value).unwrap_or(Value::Null)
}
