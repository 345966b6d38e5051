//! Radial field profile: attraction or repulsion toward a point.

use serde::{Deserialize, Serialize};

use crate::core_types::math::{normalize_or, NORM_EPSILON};
use crate::core_types::Vec3;
use crate::falloff::FalloffCurve;
use crate::profile::FieldProfile;
use crate::sample::{FieldSample, SourcePlacement};

/// Magnitudes below this are treated as zero and produce no sample.
const MAGNITUDE_EPSILON: f32 = 1.0e-6;

/// Guard against division blow-up for near-coincident query points.
const MIN_DIRECTION_DISTANCE: f32 = 1.0e-3;

/// Whether a radial profile pulls toward or pushes away from its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldMode {
    /// Force points toward the source origin.
    #[default]
    Attraction,
    /// Force points away from the source origin.
    Repulsion,
}

/// A radial field profile with distance falloff.
///
/// Samples attract toward (or repel from) the source origin with a strength
/// shaped by a [`FalloffCurve`] over normalized distance. With
/// `use_surface_normal_as_up` the reported up axis is the radial direction
/// (the "surface normal" of a spherical body); otherwise it opposes the
/// force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialProfile {
    mode: FieldMode,
    radius: f32,
    strength: f32,
    falloff: FalloffCurve,
    use_surface_normal_as_up: bool,
    weight: f32,
}

impl Default for RadialProfile {
    fn default() -> Self {
        Self {
            mode: FieldMode::Attraction,
            radius: 25.0,
            strength: 9.81,
            falloff: FalloffCurve::default(),
            use_surface_normal_as_up: true,
            weight: 1.0,
        }
    }
}

impl RadialProfile {
    /// Creates a profile with the given mode, range, and base magnitude.
    ///
    /// A radius of 0 means unbounded range. Negative radii are clamped to
    /// zero; `strength` is signed, so a negative strength inverts the mode.
    pub fn new(mode: FieldMode, radius: f32, strength: f32) -> Self {
        Self {
            mode,
            radius: radius.max(0.0),
            strength,
            ..Self::default()
        }
    }

    /// Replaces the distance falloff curve.
    pub fn with_falloff(mut self, falloff: FalloffCurve) -> Self {
        self.falloff = falloff;
        self
    }

    /// Sets the up-blending weight; negative weights are clamped to zero.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    /// Chooses between radial-direction up and force-opposing up.
    pub fn with_surface_normal_up(mut self, enabled: bool) -> Self {
        self.use_surface_normal_as_up = enabled;
        self
    }

    /// Range limit in world units (0 = unbounded).
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Signed base magnitude.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Attraction or repulsion.
    pub fn mode(&self) -> FieldMode {
        self.mode
    }
}

impl FieldProfile for RadialProfile {
    fn weight(&self) -> f32 {
        self.weight
    }

    fn sample(&self, world_position: Vec3, placement: &SourcePlacement) -> Option<FieldSample> {
        let offset = world_position - placement.position();
        let distance = offset.norm();

        if self.radius > 0.0 && distance > self.radius {
            return None;
        }

        // Degenerate fallback: a query at the origin has no radial
        // direction, so the source's own up axis stands in.
        let direction = if distance > NORM_EPSILON {
            offset / distance.max(MIN_DIRECTION_DISTANCE)
        } else {
            placement.up_axis()
        };

        let normalized_distance = if self.radius > 0.0 {
            (distance / self.radius).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let magnitude = self.strength * self.falloff.evaluate(normalized_distance);
        if magnitude.abs() <= MAGNITUDE_EPSILON {
            return None;
        }

        let (force, up) = match self.mode {
            FieldMode::Attraction => {
                let force = -direction * magnitude;
                let up = if self.use_surface_normal_as_up {
                    direction
                } else {
                    normalize_or(-force, direction)
                };
                (force, up)
            }
            FieldMode::Repulsion => {
                let force = direction * magnitude;
                let up = if self.use_surface_normal_as_up {
                    -direction
                } else {
                    normalize_or(-force, -direction)
                };
                (force, up)
            }
        };

        Some(FieldSample::new(force, up, self.weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_attraction_at_half_radius() {
        // radius 10, strength 9.81, linear falloff, query 5 units out:
        // normalized distance 0.5 -> magnitude 4.905 pulling back along -x.
        let profile = RadialProfile::new(FieldMode::Attraction, 10.0, 9.81)
            .with_falloff(FalloffCurve::Linear);
        let placement = SourcePlacement::at(Vec3::zeros());
        let sample = profile
            .sample(Vec3::new(5.0, 0.0, 0.0), &placement)
            .expect("inside range");
        assert_relative_eq!(sample.force, Vec3::new(-4.905, 0.0, 0.0), epsilon = 1.0e-4);
        assert_relative_eq!(sample.up, Vec3::x(), epsilon = 1.0e-5);
        assert_eq!(sample.weight, 1.0);
    }

    #[test]
    fn out_of_range_returns_none() {
        let profile = RadialProfile::new(FieldMode::Attraction, 10.0, 9.81);
        let placement = SourcePlacement::at(Vec3::zeros());
        assert!(profile.sample(Vec3::new(10.1, 0.0, 0.0), &placement).is_none());
        // Exactly on the boundary still contributes (falloff decides the magnitude).
        let on_edge = RadialProfile::new(FieldMode::Attraction, 10.0, 9.81)
            .with_falloff(FalloffCurve::Constant)
            .sample(Vec3::new(10.0, 0.0, 0.0), &placement);
        assert!(on_edge.is_some());
    }

    #[test]
    fn zero_radius_is_unbounded() {
        let profile = RadialProfile::new(FieldMode::Attraction, 0.0, 9.81)
            .with_falloff(FalloffCurve::Linear);
        let placement = SourcePlacement::at(Vec3::zeros());
        let sample = profile
            .sample(Vec3::new(5000.0, 0.0, 0.0), &placement)
            .expect("unbounded profile samples everywhere");
        // Normalized distance pins to 0, so full strength applies.
        assert_relative_eq!(sample.force.norm(), 9.81, epsilon = 1.0e-4);
    }

    #[test]
    fn query_at_origin_uses_source_up_axis() {
        let profile = RadialProfile::new(FieldMode::Attraction, 10.0, 9.81)
            .with_falloff(FalloffCurve::Constant);
        let placement = SourcePlacement::new(Vec3::zeros(), Vec3::z());
        let sample = profile.sample(Vec3::zeros(), &placement).expect("at origin");
        assert_relative_eq!(sample.force, -Vec3::z() * 9.81, epsilon = 1.0e-5);
        assert_relative_eq!(sample.up, Vec3::z(), epsilon = 1.0e-5);
    }

    #[test]
    fn repulsion_pushes_away_with_outward_facing_up() {
        let profile = RadialProfile::new(FieldMode::Repulsion, 10.0, 4.0)
            .with_falloff(FalloffCurve::Constant);
        let placement = SourcePlacement::at(Vec3::zeros());
        let sample = profile
            .sample(Vec3::new(2.0, 0.0, 0.0), &placement)
            .expect("inside range");
        assert_relative_eq!(sample.force, Vec3::new(4.0, 0.0, 0.0), epsilon = 1.0e-5);
        // Surface-normal up of a repulsor faces back toward it.
        assert_relative_eq!(sample.up, -Vec3::x(), epsilon = 1.0e-5);
    }

    #[test]
    fn force_opposing_up_when_surface_normal_disabled() {
        let attraction = RadialProfile::new(FieldMode::Attraction, 10.0, 9.81)
            .with_falloff(FalloffCurve::Constant)
            .with_surface_normal_up(false);
        let placement = SourcePlacement::at(Vec3::zeros());
        let sample = attraction
            .sample(Vec3::new(3.0, 0.0, 0.0), &placement)
            .expect("inside range");
        // Force pulls toward -x, so up opposes it along +x.
        assert_relative_eq!(sample.up, Vec3::x(), epsilon = 1.0e-5);

        let repulsion = RadialProfile::new(FieldMode::Repulsion, 10.0, 4.0)
            .with_falloff(FalloffCurve::Constant)
            .with_surface_normal_up(false);
        let sample = repulsion
            .sample(Vec3::new(3.0, 0.0, 0.0), &placement)
            .expect("inside range");
        assert_relative_eq!(sample.up, -Vec3::x(), epsilon = 1.0e-5);
    }

    #[test]
    fn zero_magnitude_produces_no_sample() {
        let dead = RadialProfile::new(FieldMode::Attraction, 10.0, 0.0);
        let placement = SourcePlacement::at(Vec3::zeros());
        assert!(dead.sample(Vec3::new(1.0, 0.0, 0.0), &placement).is_none());

        // Linear falloff evaluates to zero exactly at the range limit.
        let edge = RadialProfile::new(FieldMode::Attraction, 10.0, 9.81)
            .with_falloff(FalloffCurve::Linear);
        assert!(edge.sample(Vec3::new(10.0, 0.0, 0.0), &placement).is_none());
    }

    #[test]
    fn negative_strength_inverts_attraction() {
        let profile = RadialProfile::new(FieldMode::Attraction, 10.0, -9.81)
            .with_falloff(FalloffCurve::Constant);
        let placement = SourcePlacement::at(Vec3::zeros());
        let sample = profile
            .sample(Vec3::new(5.0, 0.0, 0.0), &placement)
            .expect("inside range");
        assert!(sample.force.x > 0.0, "negative strength should push outward");
    }
}
