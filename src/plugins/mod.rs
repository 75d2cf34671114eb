//! # Plugin dispatch: the contract and the home-keyed registry.
//!
//! The engine handles lifecycle, observer, time, channel and witness traffic
//! natively; every other message home is resolved through a
//! [`PluginRegistry`] and dispatched via the [`Plugin`] contract. Plugins
//! are where all concrete side effects live — the engine itself stays a pure
//! protocol state machine.

mod plugin;
mod registry;

pub use plugin::{Plugin, PluginContext, PluginError};
pub use registry::PluginRegistry;
