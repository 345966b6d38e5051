//! Field sources: a profile bound to a world placement.

use std::fmt;
use std::sync::Arc;

use crate::core_types::math::is_near_zero;
use crate::core_types::Vec3;
use crate::profile::FieldProfile;
use crate::sample::{FieldSample, SourcePlacement};

/// Registry-scoped identifier of an attached source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub(crate) u64);

/// One contributor to the combined field.
///
/// A source binds a shared [`FieldProfile`] to a placement supplied by its
/// host object. A source without a profile is legal and silently contributes
/// nothing; the registry skips it rather than treating it as an error.
#[derive(Clone)]
pub struct FieldSource {
    placement: SourcePlacement,
    profile: Option<Arc<dyn FieldProfile>>,
}

impl FieldSource {
    /// Creates a source using `profile`, placed at the world origin.
    pub fn new(profile: Arc<dyn FieldProfile>) -> Self {
        Self {
            placement: SourcePlacement::default(),
            profile: Some(profile),
        }
    }

    /// Creates a source with no profile assigned yet.
    pub fn unconfigured() -> Self {
        Self {
            placement: SourcePlacement::default(),
            profile: None,
        }
    }

    /// Moves the source to `placement`.
    pub fn with_placement(mut self, placement: SourcePlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Current world placement.
    pub fn placement(&self) -> &SourcePlacement {
        &self.placement
    }

    /// Updates the world placement.
    pub fn set_placement(&mut self, placement: SourcePlacement) {
        self.placement = placement;
    }

    /// The assigned profile, if any.
    pub fn profile(&self) -> Option<&Arc<dyn FieldProfile>> {
        self.profile.as_ref()
    }

    /// Assigns or clears the profile.
    pub fn set_profile(&mut self, profile: Option<Arc<dyn FieldProfile>>) {
        self.profile = profile;
    }

    /// Samples this source's contribution at a world position.
    ///
    /// Returns `None` when no profile is assigned or the profile declines
    /// the point (out of range, zero magnitude).
    pub fn try_sample(&self, world_position: Vec3) -> Option<FieldSample> {
        let profile = self.profile.as_ref()?;
        profile.sample(world_position, &self.placement)
    }

    /// The up axis this source alone would suggest at a world position.
    ///
    /// Falls back from the sampled up, to the direction opposing the sampled
    /// force, to the source's own up axis.
    pub fn expected_up(&self, world_position: Vec3) -> Vec3 {
        if let Some(sample) = self.try_sample(world_position) {
            if !is_near_zero(sample.up) {
                return sample.up.normalize();
            }
            if !is_near_zero(sample.force) {
                return -sample.force.normalize();
            }
        }
        self.placement.up_axis()
    }
}

impl fmt::Debug for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSource")
            .field("placement", &self.placement)
            .field("has_profile", &self.profile.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FieldMode, RadialProfile};
    use approx::assert_relative_eq;

    #[test]
    fn source_without_profile_contributes_nothing() {
        let source = FieldSource::unconfigured();
        assert!(source.try_sample(Vec3::new(1.0, 2.0, 3.0)).is_none());
        // Expected up falls through to the placement axis.
        assert_relative_eq!(source.expected_up(Vec3::zeros()), Vec3::y());
    }

    #[test]
    fn source_samples_through_its_placement() {
        let profile = Arc::new(RadialProfile::new(FieldMode::Attraction, 10.0, 9.81));
        let source = FieldSource::new(profile)
            .with_placement(SourcePlacement::at(Vec3::new(100.0, 0.0, 0.0)));
        assert!(source.try_sample(Vec3::new(95.0, 0.0, 0.0)).is_some());
        assert!(source.try_sample(Vec3::zeros()).is_none());
    }

    #[test]
    fn expected_up_points_along_surface_normal() {
        let profile = Arc::new(RadialProfile::new(FieldMode::Attraction, 10.0, 9.81));
        let source = FieldSource::new(profile);
        let up = source.expected_up(Vec3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(up, Vec3::y(), epsilon = 1.0e-5);
    }
}
