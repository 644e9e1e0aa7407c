//! Configuration layering tests driving the flatten pipeline.

use std::fs;

use optbundle::config::{ConfigOrigin, OutputFormat};
use optbundle::{flatten_bundle, BundleManifest, EffectiveConfig};
use serde_json::json;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[bundles.query]
items = [{ batch_size = 1 }, { comment = "a" }, { batch_size = 2 }]
"#;

#[test]
fn test_project_config_disables_dedup() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("config.toml");
    fs::write(&project, "[resolve]\ndedup = false\n").unwrap();
    let manifest_path = dir.path().join("bundles.toml");
    fs::write(&manifest_path, MANIFEST).unwrap();

    let config = EffectiveConfig::build(None, Some(&project), None).unwrap();
    let settings = config.settings().unwrap();
    let manifest = BundleManifest::from_file(&manifest_path).unwrap();
    let report = flatten_bundle(&manifest, "query", &settings.resolve).unwrap();

    assert!(!report.dedup);
    assert_eq!(report.options.len(), 3);
    assert_eq!(config.sources[1].origin, ConfigOrigin::Project);
}

#[test]
fn test_cli_overrides_project_config() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("config.toml");
    fs::write(&project, "[resolve]\ndedup = false\n[output]\nformat = \"text\"\n").unwrap();

    let cli = json!({"resolve": {"dedup": true}});
    let config = EffectiveConfig::build(None, Some(&project), Some(cli)).unwrap();
    let settings = config.settings().unwrap();

    assert!(settings.resolve.dedup);
    assert_eq!(settings.output.format, OutputFormat::Text);
    assert_eq!(config.sources.last().map(|s| &s.origin), Some(&ConfigOrigin::Cli));

    let manifest = BundleManifest::from_toml_str(MANIFEST).unwrap();
    let report = flatten_bundle(&manifest, "query", &settings.resolve).unwrap();
    assert_eq!(report.options.len(), 2);
}

#[test]
fn test_effective_config_json_has_provenance() {
    let config = EffectiveConfig::build(None, None, None).unwrap();
    let json = config.to_json().unwrap();
    assert!(json.contains("\"schema_id\": \"optbundle/effective_config@1\""));
    assert!(json.contains("\"origin\": \"builtin\""));
}
