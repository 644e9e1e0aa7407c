//! Configuration merge system
//!
//! Implements the 4-layer configuration merge:
//! 1. Built-in defaults
//! 2. Host/user config (~/.config/optbundle/config.toml)
//! 3. Project config (.optbundle/config.toml)
//! 4. CLI flags

mod defaults;
mod effective;
mod merge;
mod settings;

pub use defaults::BuiltinDefaults;
pub use effective::{
    default_host_config_path, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig,
    DEFAULT_PROJECT_CONFIG, MAX_DEPTH_LIMIT,
};
pub use merge::{deep_merge, merge_layers};
pub use settings::{LogSettings, OutputFormat, OutputSettings, ResolveSettings, Settings};
