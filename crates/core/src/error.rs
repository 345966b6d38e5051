//! Error types for field configuration.
//!
//! Runtime sampling never fails with an error: misconfigured sources degrade
//! to "no contribution" (see the registry docs). The only fallible path is
//! validating an authored falloff curve.

use thiserror::Error;

/// Errors raised while validating field configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A keyed falloff curve was constructed without any keys.
    #[error("falloff curve requires at least one key")]
    EmptyFalloff,
    /// Keyed falloff times must be finite, within [0, 1], and non-decreasing.
    #[error("falloff key times must be finite and non-decreasing within [0, 1]")]
    UnorderedFalloffKeys,
    /// Keyed falloff values must be finite, within [0, 1], and non-increasing.
    #[error("falloff key values must be finite and non-increasing within [0, 1]")]
    NonMonotonicFalloff,
}
