//! Bundle manifests
//!
//! A manifest is a TOML file declaring named aggregate bundles:
//!
//! ```toml
//! [bundles.defaults]
//! items = [{ allow_disk_use = false }, { batch_size = 100 }]
//!
//! [bundles.report]
//! base = "defaults"
//! items = [{ max_time_ms = 500 }, { bundle = "tagged" }]
//!
//! [bundles.tagged]
//! items = [{ comment = "nightly report" }]
//! ```
//!
//! `base` extends the named bundle's chain; a `bundle` item nests the named
//! bundle at that position. Every named bundle is built once per
//! resolution, so a bundle referenced from several places is shared.

mod item;

pub use item::ItemDef;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use optbundle_aggregate::AggregateBundle;
use optbundle_core::DEFAULT_MAX_DEPTH;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// One named bundle definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleDef {
    /// Bundle whose chain this one extends.
    #[serde(default)]
    pub base: Option<String>,

    #[serde(default)]
    pub items: Vec<ItemDef>,
}

/// Parsed manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleManifest {
    #[serde(default)]
    pub bundles: BTreeMap<String, BundleDef>,
}

/// Manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("unknown bundle '{name}'")]
    UnknownBundle { name: String },

    #[error("bundle reference cycle: {}", .chain.join(" -> "))]
    ReferenceCycle { chain: Vec<String> },

    #[error("bundle references nest deeper than {limit} at '{name}'")]
    ReferenceTooDeep { name: String, limit: usize },
}

impl BundleManifest {
    /// Load a manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ManifestError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Parse a manifest from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ManifestError> {
        toml::from_str(contents).map_err(|e| ManifestError::ParseError(e.to_string()))
    }

    /// Bundle names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    /// Build the named bundle and everything it references.
    pub fn resolve(&self, name: &str) -> Result<AggregateBundle, ManifestError> {
        self.resolve_with_depth(name, DEFAULT_MAX_DEPTH)
    }

    /// Like [`resolve`](Self::resolve), rejecting `base`/`bundle` reference
    /// chains longer than `max_depth`.
    pub fn resolve_with_depth(
        &self,
        name: &str,
        max_depth: usize,
    ) -> Result<AggregateBundle, ManifestError> {
        ManifestResolver::new(self, max_depth).resolve(name)
    }

    /// Build every bundle in the manifest, sharing common sub-bundles.
    pub fn resolve_all(&self) -> Result<BTreeMap<String, AggregateBundle>, ManifestError> {
        let mut resolver = ManifestResolver::new(self, DEFAULT_MAX_DEPTH);
        self.names()
            .map(|name| Ok((name.to_string(), resolver.resolve(name)?)))
            .collect()
    }
}

struct ManifestResolver<'a> {
    manifest: &'a BundleManifest,
    max_depth: usize,
    built: HashMap<String, AggregateBundle>,
    // Names currently being built, outermost first
    visiting: Vec<String>,
}

impl<'a> ManifestResolver<'a> {
    fn new(manifest: &'a BundleManifest, max_depth: usize) -> Self {
        Self {
            manifest,
            max_depth,
            built: HashMap::new(),
            visiting: Vec::new(),
        }
    }

    fn resolve(&mut self, name: &str) -> Result<AggregateBundle, ManifestError> {
        if let Some(bundle) = self.built.get(name) {
            return Ok(bundle.clone());
        }
        if let Some(pos) = self.visiting.iter().position(|n| n == name) {
            let mut chain = self.visiting[pos..].to_vec();
            chain.push(name.to_string());
            return Err(ManifestError::ReferenceCycle { chain });
        }
        // Bounds the recursion below before it can exhaust the stack
        if self.visiting.len() > self.max_depth {
            return Err(ManifestError::ReferenceTooDeep {
                name: name.to_string(),
                limit: self.max_depth,
            });
        }
        let manifest = self.manifest;
        let def = manifest
            .bundles
            .get(name)
            .ok_or_else(|| ManifestError::UnknownBundle {
                name: name.to_string(),
            })?;

        self.visiting.push(name.to_string());
        let mut bundle = match &def.base {
            Some(base) => self.resolve(base)?,
            None => AggregateBundle::new(),
        };
        for item in &def.items {
            bundle = match item {
                ItemDef::Bundle(nested) => bundle.extend(self.resolve(nested)?),
                other => match other.to_option() {
                    Some(opt) => bundle.extend(opt),
                    None => bundle,
                },
            };
        }
        self.visiting.pop();

        debug!(bundle = name, items = bundle.len(), "built manifest bundle");
        self.built.insert(name.to_string(), bundle.clone());
        Ok(bundle)
    }
}
