//! Top-level error type.

use optbundle_aggregate::ValidationError;
use optbundle_core::StructuralError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::manifest::ManifestError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("malformed bundle: {0}")]
    Structural(#[from] StructuralError),

    #[error("invalid options: {0}")]
    Validation(#[from] ValidationError),
}
