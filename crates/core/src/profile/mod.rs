//! Field profiles: pluggable per-source sampling behaviors.
//!
//! A [`FieldProfile`] defines *how* one source computes its local
//! contribution at a point; a source binds a profile to a world placement.
//! Profiles are immutable configuration and may be shared across many
//! sources behind an `Arc`. New field shapes are added as new
//! implementations of the trait; the registry never needs to change.

mod radial;

pub use radial::{FieldMode, RadialProfile};

use crate::core_types::Vec3;
use crate::sample::{FieldSample, SourcePlacement};

/// Sampling behavior of a field source.
///
/// Implementations must be pure: the result depends only on the inputs and
/// the profile's own configuration. `Send + Sync` so profiles can be shared
/// across sources and sampled from parallel batch queries.
pub trait FieldProfile: Send + Sync {
    /// Weight applied when this profile's up contribution is blended with
    /// other sources. Must be non-negative.
    fn weight(&self) -> f32 {
        1.0
    }

    /// Samples the field at a world position for a source at `placement`.
    ///
    /// Returns `None` when the point is out of the profile's range or the
    /// resulting magnitude is numerically zero.
    fn sample(&self, world_position: Vec3, placement: &SourcePlacement) -> Option<FieldSample>;
}
