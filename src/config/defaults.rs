//! Built-in defaults (layer 1)

use optbundle_core::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Collapse repeated option kinds when flattening (default: true)
    pub dedup: bool,

    /// Maximum bundle nesting depth (default: 64)
    pub max_depth: usize,

    /// Report format (default: "json")
    pub output_format: String,

    /// Log filter used when RUST_LOG is unset (default: "warn")
    pub log_filter: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            dedup: true,
            max_depth: DEFAULT_MAX_DEPTH,
            output_format: "json".to_string(),
            log_filter: "warn".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "resolve": {
                "dedup": self.dedup,
                "max_depth": self.max_depth
            },
            "output": {
                "format": self.output_format
            },
            "log": {
                "filter": self.log_filter
            }
        })
    }
}
