//! The sampled contribution of one source at one query point.

use crate::core_types::math::{normalize_or, world_up};
use crate::core_types::Vec3;

/// A single source's contribution to the combined field at a query point.
///
/// `force` adds into the combined force vector; `up` is an orientation hint
/// blended by `weight` (a zero-length `up` means "no opinion").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    /// Contribution to the combined force.
    pub force: Vec3,
    /// Contribution to the combined orientation axis. Zero = no opinion.
    pub up: Vec3,
    /// Blending weight for the `up` contribution.
    pub weight: f32,
}

impl FieldSample {
    /// Creates a sample; negative weights are clamped to zero.
    pub fn new(force: Vec3, up: Vec3, weight: f32) -> Self {
        Self {
            force,
            up,
            weight: weight.max(0.0),
        }
    }

    /// Whether this sample carries anything worth aggregating.
    ///
    /// A sample is valid only with a positive weight and at least one
    /// non-zero component. Invalid samples are discarded before combining.
    pub fn is_valid(&self) -> bool {
        self.weight > 0.0 && (self.force.norm_squared() > 0.0 || self.up.norm_squared() > 0.0)
    }
}

/// World placement of a field source: position plus local up axis.
///
/// The up axis is kept unit length; a degenerate axis falls back to world up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourcePlacement {
    position: Vec3,
    up_axis: Vec3,
}

impl SourcePlacement {
    /// Creates a placement with an explicit up axis (normalized on entry).
    pub fn new(position: Vec3, up_axis: Vec3) -> Self {
        Self {
            position,
            up_axis: normalize_or(up_axis, world_up()),
        }
    }

    /// Creates a placement at `position` with the world up axis.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, world_up())
    }

    /// World position of the source.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit-length local up axis of the source.
    pub fn up_axis(&self) -> Vec3 {
        self.up_axis
    }
}

impl Default for SourcePlacement {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sample_validity() {
        let force = Vec3::new(0.0, -9.81, 0.0);
        assert!(FieldSample::new(force, Vec3::y(), 1.0).is_valid());
        assert!(FieldSample::new(force, Vec3::zeros(), 1.0).is_valid());
        assert!(FieldSample::new(Vec3::zeros(), Vec3::y(), 1.0).is_valid());
        // Zero weight or all-zero vectors disqualify the sample.
        assert!(!FieldSample::new(force, Vec3::y(), 0.0).is_valid());
        assert!(!FieldSample::new(Vec3::zeros(), Vec3::zeros(), 1.0).is_valid());
    }

    #[test]
    fn negative_weight_clamps_to_zero() {
        let sample = FieldSample::new(Vec3::x(), Vec3::y(), -2.0);
        assert_eq!(sample.weight, 0.0);
        assert!(!sample.is_valid());
    }

    #[test]
    fn placement_normalizes_up_axis() {
        let placement = SourcePlacement::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(placement.up_axis(), Vec3::z());

        let degenerate = SourcePlacement::new(Vec3::zeros(), Vec3::zeros());
        assert_relative_eq!(degenerate.up_axis(), Vec3::y());
    }
}
