//! Field receivers: per-tick sampling with temporal smoothing.

use crate::core_types::math::{lerp_vec3, slerp_unit};
use crate::core_types::Vec3;
use crate::registry::{FieldRegistry, ReceiverId};

/// A query-side entity that samples the combined field and smooths it.
///
/// A receiver registers with its registry on [`attach`](Self::attach) and
/// detaches on drop. Each tick the host calls
/// [`sample_once`](Self::sample_once); consumers (vehicle controllers,
/// cameras) then read [`last_force`](Self::last_force),
/// [`last_up`](Self::last_up), and [`has_field`](Self::has_field).
///
/// Smoothing uses factor `clamp(delta_time * smoothing_rate, 0, 1)`: force
/// interpolates linearly, the up axis spherically (it is an orientation
/// axis, not a magnitude). A rate of 0 snaps on success and freezes on
/// failure. When the field disappears the state decays toward zero force
/// and the registry's default up axis rather than resetting, so consumers
/// see the field fade out instead of snapping.
pub struct FieldReceiver {
    registry: FieldRegistry,
    id: ReceiverId,
    position: Vec3,
    smoothing_rate: f32,
    last_force: Vec3,
    last_up: Vec3,
    has_field: bool,
}

impl FieldReceiver {
    /// Attaches a receiver at the world origin.
    ///
    /// Takes an immediate snapshot of the field so the first consumer read
    /// sees real data instead of the neutral initial state.
    pub fn attach(registry: &FieldRegistry, smoothing_rate: f32) -> Self {
        Self::attach_at(registry, Vec3::zeros(), smoothing_rate)
    }

    /// Attaches a receiver at `position`.
    pub fn attach_at(registry: &FieldRegistry, position: Vec3, smoothing_rate: f32) -> Self {
        let id = registry.attach_receiver();
        let mut receiver = Self {
            registry: registry.clone(),
            id,
            position,
            smoothing_rate: smoothing_rate.max(0.0),
            last_force: Vec3::zeros(),
            last_up: registry.default_up(),
            has_field: false,
        };
        receiver.sample_immediate();
        receiver
    }

    /// Current query position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the receiver; takes effect on the next sample.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Smoothing rate in 1/seconds (0 = snap on success, freeze on failure).
    pub fn smoothing_rate(&self) -> f32 {
        self.smoothing_rate
    }

    /// Updates the smoothing rate; negative rates are clamped to zero.
    pub fn set_smoothing_rate(&mut self, rate: f32) {
        self.smoothing_rate = rate.max(0.0);
    }

    /// Smoothed net force from the last samples.
    pub fn last_force(&self) -> Vec3 {
        self.last_force
    }

    /// Smoothed expected up axis. Unit length.
    pub fn last_up(&self) -> Vec3 {
        self.last_up
    }

    /// Whether the last query found any field.
    pub fn has_field(&self) -> bool {
        self.has_field
    }

    /// Snaps the smoothing state to the current field, bypassing smoothing.
    ///
    /// On failure the state resets to zero force and the registry default
    /// up. Used at attach time; per-tick sampling should prefer
    /// [`sample_once`](Self::sample_once).
    pub fn sample_immediate(&mut self) {
        let query = self.registry.query(self.position);
        if query.success {
            self.last_force = query.force;
            self.last_up = query.up;
            self.has_field = true;
        } else {
            self.last_force = Vec3::zeros();
            self.last_up = self.registry.default_up();
            self.has_field = false;
        }
    }

    /// Samples the field once and folds it into the smoothed state.
    ///
    /// Returns `true` when the query succeeded. On failure the state decays
    /// toward zero force and the registry default up using the same clamped
    /// factor, preserving the unit length of the up axis throughout.
    pub fn sample_once(&mut self, delta_time: f32) -> bool {
        let query = self.registry.query(self.position);

        if !query.success {
            self.has_field = false;
            let decay = (delta_time * self.smoothing_rate).clamp(0.0, 1.0);
            self.last_force = lerp_vec3(self.last_force, Vec3::zeros(), decay);
            self.last_up = slerp_unit(self.last_up, self.registry.default_up(), decay);
            return false;
        }

        self.has_field = true;
        let factor = if self.smoothing_rate > 0.0 {
            (delta_time * self.smoothing_rate).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.last_force = lerp_vec3(self.last_force, query.force, factor);
        self.last_up = slerp_unit(self.last_up, query.up, factor);
        true
    }
}

impl Drop for FieldReceiver {
    fn drop(&mut self) {
        self.registry.detach_receiver(self.id);
    }
}
