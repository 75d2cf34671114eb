//! # Registry mapping message homes to plugins.
//!
//! Supplied externally and shared read-only by every scenario engine in a
//! suite run. The engine resolves any [`Namespace::External`] home through
//! this table; an unmatched home is a logged protocol error, not a fatal
//! one, so forward-compatible messages are tolerated.
//!
//! [`Namespace::External`]: crate::Namespace::External

use std::collections::HashMap;
use std::sync::Arc;

use crate::plugins::plugin::Plugin;

/// Mapping from message home to the plugin that serves it.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin under its [`home`](Plugin::home).
    ///
    /// Returns the previously registered plugin for that home, if any.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Option<Arc<dyn Plugin>> {
        self.plugins.insert(plugin.home().to_string(), plugin)
    }

    /// Looks up the plugin serving `home`.
    pub fn lookup(&self, home: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(home)
    }

    /// Invokes [`Plugin::reset`] on every registered plugin (between
    /// scenarios).
    pub fn reset_all(&self) {
        for plugin in self.plugins.values() {
            plugin.reset();
        }
    }

    /// Invokes [`Plugin::prepare_for_run`] on every registered plugin (once
    /// per suite, before the first program).
    pub fn prepare_all(&self) {
        for plugin in self.plugins.values() {
            plugin.prepare_for_run();
        }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Message;
    use crate::plugins::plugin::{PluginContext, PluginError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        resets: AtomicUsize,
    }

    #[async_trait]
    impl Plugin for Counting {
        fn home(&self) -> &str {
            "counting"
        }

        async fn handle(
            &self,
            _message: &Message,
            _ctx: &mut PluginContext<'_>,
        ) -> Result<(), PluginError> {
            Ok(())
        }

        fn reset(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_register_keys_by_home_and_replaces() {
        let mut registry = PluginRegistry::new();
        let first = Arc::new(Counting {
            resets: AtomicUsize::new(0),
        });
        assert!(registry.register(first.clone()).is_none());
        assert!(registry.register(first).is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("counting").is_some());
        assert!(registry.lookup("unknown").is_none());
    }

    #[test]
    fn test_reset_all_reaches_every_plugin() {
        let mut registry = PluginRegistry::new();
        let plugin = Arc::new(Counting {
            resets: AtomicUsize::new(0),
        });
        registry.register(plugin.clone());
        registry.reset_all();
        registry.reset_all();
        assert_eq!(plugin.resets.load(Ordering::SeqCst), 2);
    }
}
