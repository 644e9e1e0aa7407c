//! Effective configuration with full provenance
//!
//! The effective config captures the merged configuration plus
//! information about where each value came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;
use super::settings::Settings;

/// Schema version for effective config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "optbundle/effective_config@1";

/// Project config location, relative to the working directory
pub const DEFAULT_PROJECT_CONFIG: &str = ".optbundle/config.toml";

/// Upper bound accepted for `resolve.max_depth`
pub const MAX_DEPTH_LIMIT: u64 = 1024;

const OUTPUT_FORMATS: &[&str] = &["json", "text"];

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Project,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub schema_version: u32,

    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration object
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

/// Host config location: `$HOME/.config/optbundle/config.toml`
pub fn default_host_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("optbundle")
            .join("config.toml")
    })
}

impl EffectiveConfig {
    /// Build effective config from layers. Missing files are skipped.
    pub fn build(
        host_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layers 2 and 3: host and project files
        for (origin, path) in [
            (ConfigOrigin::Host, host_config_path),
            (ConfigOrigin::Project, project_config_path),
        ] {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            let (value, digest) = Self::load_toml_file(path)?;
            debug!(path = %path.display(), ?origin, "loaded config layer");
            layers.push(value);
            sources.push(ConfigSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 4: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        Self::validate_config(&merged)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            sources,
        })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let value: Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((value, digest))
    }

    /// Validate configuration values
    fn validate_config(config: &Value) -> Result<(), ConfigError> {
        // resolve.max_depth must be in [1, MAX_DEPTH_LIMIT]
        match config.pointer("/resolve/max_depth").map(Value::as_u64) {
            Some(Some(depth)) if (1..=MAX_DEPTH_LIMIT).contains(&depth) => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "resolve.max_depth must be an integer in [1, {}]",
                    MAX_DEPTH_LIMIT
                )));
            }
        }

        if !config
            .pointer("/resolve/dedup")
            .is_some_and(Value::is_boolean)
        {
            return Err(ConfigError::ValidationError(
                "resolve.dedup must be a boolean".to_string(),
            ));
        }

        let format = config.pointer("/output/format").and_then(Value::as_str);
        if !format.is_some_and(|f| OUTPUT_FORMATS.contains(&f)) {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be one of: {}",
                OUTPUT_FORMATS.join(", ")
            )));
        }

        Ok(())
    }

    /// Typed settings from the merged config
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        serde_json::from_value(self.config.clone())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_defaults_only() {
        let config = EffectiveConfig::build(None, None, None).unwrap();

        assert_eq!(config.schema_version, SCHEMA_VERSION);
        let settings = config.settings().unwrap();
        assert_eq!(settings.resolve.max_depth, 64);
        assert!(settings.resolve.dedup);
        assert_eq!(config.get_str("output.format"), Some("json"));
    }

    #[test]
    fn test_build_with_cli_override() {
        let cli = serde_json::json!({"resolve": {"dedup": false}});
        let config = EffectiveConfig::build(None, None, Some(cli)).unwrap();

        assert_eq!(config.get("resolve.dedup"), Some(&Value::Bool(false)));
        assert_eq!(config.settings().unwrap().resolve.max_depth, 64);
    }

    #[test]
    fn test_validation_max_depth() {
        for depth in [0, 5000] {
            let cli = serde_json::json!({"resolve": {"max_depth": depth}});
            let result = EffectiveConfig::build(None, None, Some(cli));
            assert!(result.unwrap_err().to_string().contains("max_depth"));
        }
    }

    #[test]
    fn test_validation_output_format() {
        let cli = serde_json::json!({"output": {"format": "yaml"}});
        let result = EffectiveConfig::build(None, None, Some(cli));
        assert!(result.unwrap_err().to_string().contains("output.format"));
    }

    #[test]
    fn test_validation_dedup_type() {
        let cli = serde_json::json!({"resolve": {"dedup": "yes"}});
        let result = EffectiveConfig::build(None, None, Some(cli));
        assert!(result.unwrap_err().to_string().contains("resolve.dedup"));
    }

    #[test]
    fn test_load_toml_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[resolve]").unwrap();
        writeln!(temp, "max_depth = 8").unwrap();
        writeln!(temp, "[output]").unwrap();
        writeln!(temp, "format = \"text\"").unwrap();

        let config = EffectiveConfig::build(Some(temp.path()), None, None).unwrap();

        assert_eq!(config.get("resolve.max_depth").and_then(Value::as_u64), Some(8));
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[1].origin, ConfigOrigin::Host);
        assert_eq!(config.sources[1].digest.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn test_project_overrides_host() {
        let mut host = NamedTempFile::new().unwrap();
        writeln!(host, "[resolve]\nmax_depth = 8\ndedup = false").unwrap();
        let mut project = NamedTempFile::new().unwrap();
        writeln!(project, "[resolve]\nmax_depth = 16").unwrap();

        let config =
            EffectiveConfig::build(Some(host.path()), Some(project.path()), None).unwrap();

        let settings = config.settings().unwrap();
        assert_eq!(settings.resolve.max_depth, 16);
        assert!(!settings.resolve.dedup);
    }

    #[test]
    fn test_toml_tables_load_as_json() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[log]\nfilter = \"optbundle=debug\"").unwrap();
        writeln!(temp, "[extra]\ntags = [\"a\", \"b\"]\nratio = 0.5").unwrap();

        let config = EffectiveConfig::build(None, Some(temp.path()), None).unwrap();

        assert_eq!(config.get_str("log.filter"), Some("optbundle=debug"));
        assert_eq!(
            config.get("extra"),
            Some(&serde_json::json!({"tags": ["a", "b"], "ratio": 0.5}))
        );
        assert_eq!(config.get_str("output.format"), Some("json"));
    }

    #[test]
    fn test_missing_file_skipped() {
        let config =
            EffectiveConfig::build(Some(Path::new("/nonexistent/optbundle.toml")), None, None)
                .unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_invalid_toml() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[resolve").unwrap();
        let result = EffectiveConfig::build(None, Some(temp.path()), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_settings() {
        let cli = serde_json::json!({"output": {"format": "text"}, "resolve": {"max_depth": 3}});
        let settings = EffectiveConfig::build(None, None, Some(cli))
            .unwrap()
            .settings()
            .unwrap();

        assert_eq!(settings.output.format, OutputFormat::Text);
        assert_eq!(settings.resolve.max_depth, 3);
        assert!(settings.resolve.dedup);
        assert_eq!(settings.log.filter, "warn");
    }
}
