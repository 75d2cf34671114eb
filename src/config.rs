//! # Suite configuration.
//!
//! [`SuiteConfig`] centralizes what the sequencer passes into each subject's
//! initialization (protocol version, segment, tags) and the description of
//! how programs were discovered, which is echoed back in the
//! "no programs found" report.
//!
//! # Example
//! ```
//! use specvisor::{Segment, SuiteConfig, PROTOCOL_VERSION};
//!
//! let mut cfg = SuiteConfig::default();
//! cfg.tags = vec!["fast".to_string()];
//! cfg.segment = Segment { id: 1, count: 4 };
//!
//! assert_eq!(cfg.require_version, PROTOCOL_VERSION);
//! ```

use crate::subject::{InitFlags, Segment, PROTOCOL_VERSION};

/// Configuration for one suite run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Protocol version every subject must speak.
    pub require_version: u32,
    /// Partition hint forwarded to each subject at startup; never interpreted.
    pub segment: Segment,
    /// Free-form tags forwarded to each subject at startup.
    pub tags: Vec<String>,
    /// Human-readable description of how subject programs were discovered;
    /// quoted in the fatal report when the program list is empty.
    pub criteria: String,
}

impl Default for SuiteConfig {
    /// Provides a default configuration:
    /// - `require_version = PROTOCOL_VERSION`
    /// - `segment = Segment { id: 0, count: 1 }` (the whole run)
    /// - `tags = []`
    /// - `criteria = "all subject programs"`
    fn default() -> Self {
        Self {
            require_version: PROTOCOL_VERSION,
            segment: Segment::default(),
            tags: Vec::new(),
            criteria: "all subject programs".to_string(),
        }
    }
}

impl SuiteConfig {
    /// Builds the initialization flags passed into each subject.
    pub(crate) fn init_flags(&self) -> InitFlags {
        InitFlags {
            version: self.require_version,
            segment: self.segment.id,
            segment_count: self.segment.count,
            tags: self.tags.clone(),
        }
    }
}
