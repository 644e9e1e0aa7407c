//! Option bundling and flattening.
//!
//! Options are small, immutable, kind-tagged settings. A [`Bundle`] collects
//! options (and other bundles) into a persistent chain that is extended
//! without mutation, and the [`Resolver`] turns a bundle back into an
//! ordered list of options, optionally keeping only the last value per kind.

mod bundle;
mod dedup;
mod error;
mod resolver;

pub use bundle::{Bundle, Item, Items};
pub use dedup::dedup_last_wins;
pub use error::StructuralError;
pub use resolver::{Resolver, DEFAULT_MAX_DEPTH};

use std::fmt;
use std::hash::Hash;

/// A kind-tagged configuration value that can be placed in a [`Bundle`].
///
/// Two options are the same kind iff their kinds compare equal; the value
/// plays no part in that comparison.
pub trait BundleOption: Clone {
    /// Discriminator identifying which setting the option configures.
    type Kind: Eq + Hash + Clone + fmt::Debug;

    /// The kind of this option.
    fn kind(&self) -> Self::Kind;
}
