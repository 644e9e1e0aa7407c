//! optbundle - option bundling for command builders
//!
//! Named bundles of aggregate options are read from TOML manifests,
//! flattened into the order a command builder consumes them, and
//! optionally collapsed to the last value per option kind.

pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;

pub use config::{EffectiveConfig, Settings};
pub use error::{Error, Result};
pub use manifest::{BundleManifest, ManifestError};
pub use pipeline::{flatten_bundle, FlattenReport};

pub use optbundle_aggregate::{AggregateBundle, AggregateBundleExt, AggregateCommand, AggregateOption};
pub use optbundle_core::{Bundle, BundleOption, Item, Resolver, StructuralError};
