//! Structural errors raised while flattening a bundle.

use thiserror::Error;

/// The bundle graph cannot be flattened.
///
/// Fatal for the flatten call that raised it; no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// A bundle contains itself, directly or through nested bundles.
    #[error("bundle contains itself at nesting depth {depth}")]
    Cycle { depth: usize },

    /// Nested bundles go deeper than the resolver allows.
    #[error("bundle nesting exceeds the limit of {limit}")]
    TooDeep { limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_cycle() {
        let err = StructuralError::Cycle { depth: 3 };
        assert_eq!(err.to_string(), "bundle contains itself at nesting depth 3");
    }

    #[test]
    fn test_error_display_too_deep() {
        let err = StructuralError::TooDeep { limit: 8 };
        assert!(err.to_string().contains("limit of 8"));
    }
}
