//! optbundle CLI
//!
//! Entry point for the `optbundle` command-line tool.

use clap::{Parser, Subcommand};
use optbundle::config::{
    default_host_config_path, OutputFormat, Settings, DEFAULT_PROJECT_CONFIG,
};
use optbundle::{flatten_bundle, BundleManifest, EffectiveConfig};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "optbundle")]
#[command(about = "Flatten option bundles into command options", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a bundle from a manifest and print its flattened options
    Flatten {
        /// Path to the bundle manifest (TOML)
        manifest: PathBuf,

        /// Name of the bundle to flatten
        bundle: String,

        /// Keep only the last option of each kind
        #[arg(long, conflicts_with = "no_dedup")]
        dedup: bool,

        /// Keep every option, including repeated kinds
        #[arg(long)]
        no_dedup: bool,

        /// Maximum bundle nesting depth
        #[arg(long)]
        max_depth: Option<u64>,

        /// Output format (json or text)
        #[arg(long)]
        format: Option<String>,

        /// Path to project config file (default: .optbundle/config.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// List the bundles declared in a manifest
    List {
        /// Path to the bundle manifest (TOML)
        manifest: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration with provenance
    Config {
        /// Path to project config file (default: .optbundle/config.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flatten {
            manifest,
            bundle,
            dedup,
            no_dedup,
            max_depth,
            format,
            config,
        } => {
            let overrides = cli_overrides(dedup, no_dedup, max_depth, format);
            let effective = load_config(config, overrides);
            run_flatten(&effective, &manifest, &bundle);
        }
        Commands::List { manifest, json } => {
            let effective = load_config(None, None);
            init_logging(&effective);
            run_list(&manifest, json);
        }
        Commands::Config { config } => {
            let effective = load_config(config, None);
            init_logging(&effective);
            match effective.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing output: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

fn cli_overrides(
    dedup: bool,
    no_dedup: bool,
    max_depth: Option<u64>,
    format: Option<String>,
) -> Option<Value> {
    let mut resolve = Map::new();
    if dedup || no_dedup {
        resolve.insert("dedup".to_string(), json!(dedup));
    }
    if let Some(depth) = max_depth {
        resolve.insert("max_depth".to_string(), json!(depth));
    }

    let mut overrides = Map::new();
    if !resolve.is_empty() {
        overrides.insert("resolve".to_string(), Value::Object(resolve));
    }
    if let Some(format) = format {
        overrides.insert("output".to_string(), json!({ "format": format }));
    }

    (!overrides.is_empty()).then_some(Value::Object(overrides))
}

fn load_config(project_path: Option<PathBuf>, overrides: Option<Value>) -> EffectiveConfig {
    let host = default_host_config_path();
    let project = project_path.unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_CONFIG));

    match EffectiveConfig::build(host.as_deref(), Some(&project), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    }
}

fn settings_or_exit(effective: &EffectiveConfig) -> Settings {
    match effective.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr; RUST_LOG takes precedence over `log.filter`.
fn init_logging(effective: &EffectiveConfig) {
    let fallback = effective.get_str("log.filter").unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_manifest(path: &Path) -> BundleManifest {
    match BundleManifest::from_file(path) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Manifest error: {}", e);
            process::exit(1);
        }
    }
}

fn run_flatten(effective: &EffectiveConfig, manifest_path: &Path, bundle: &str) {
    init_logging(effective);
    let settings = settings_or_exit(effective);
    let manifest = load_manifest(manifest_path);

    let report = match flatten_bundle(&manifest, bundle, &settings.resolve) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match settings.output.format {
        OutputFormat::Text => println!("{}", report.to_human()),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        },
    }
}

fn run_list(manifest_path: &Path, json: bool) {
    let manifest = load_manifest(manifest_path);

    if json {
        let entries: Vec<Value> = manifest
            .bundles
            .iter()
            .map(|(name, def)| {
                json!({
                    "name": name,
                    "base": def.base,
                    "items": def.items.len(),
                })
            })
            .collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if manifest.bundles.is_empty() {
        println!("No bundles declared in {}", manifest_path.display());
        return;
    }
    for (name, def) in &manifest.bundles {
        match &def.base {
            Some(base) => println!("{} ({} items, extends {})", name, def.items.len(), base),
            None => println!("{} ({} items)", name, def.items.len()),
        }
    }
}
