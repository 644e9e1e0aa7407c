//! Flatten pipeline
//!
//! manifest -> bundle -> flattened options -> aggregate command

use optbundle_aggregate::{AggregateCommand, AggregateOption};
use optbundle_core::Resolver;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::ResolveSettings;
use crate::error::Result;
use crate::manifest::BundleManifest;

/// Outcome of flattening one manifest bundle.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenReport {
    /// Bundle name
    pub bundle: String,

    /// Whether repeated kinds were collapsed
    pub dedup: bool,

    /// Options in the order handed to the command builder
    pub options: Vec<AggregateOption>,

    /// Command body built from the options
    pub command: Value,
}

impl FlattenReport {
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// One option per line, then the command body.
    pub fn to_human(&self) -> String {
        let mut out = format!(
            "bundle: {} ({} option{}, dedup {})\n",
            self.bundle,
            self.options.len(),
            if self.options.len() == 1 { "" } else { "s" },
            if self.dedup { "on" } else { "off" },
        );
        for (i, opt) in self.options.iter().enumerate() {
            out.push_str(&format!("  {:>2}. {}\n", i + 1, opt));
        }
        out.push_str(&format!("command: {}", self.command));
        out
    }
}

/// Resolve `name` from the manifest, flatten it and build the command.
pub fn flatten_bundle(
    manifest: &BundleManifest,
    name: &str,
    settings: &ResolveSettings,
) -> Result<FlattenReport> {
    let bundle = manifest.resolve_with_depth(name, settings.max_depth)?;
    let options = Resolver::new(settings.max_depth).flatten(&bundle, settings.dedup)?;
    let command = AggregateCommand::from_options(&options)?;

    info!(
        bundle = name,
        options = options.len(),
        dedup = settings.dedup,
        "flattened manifest bundle"
    );

    Ok(FlattenReport {
        bundle: name.to_string(),
        dedup: settings.dedup,
        options,
        command: command.to_document(),
    })
}
