//! Shared numeric helpers for field sampling and smoothing.
//!
//! Everything here is defensive about degenerate vectors: zero-length
//! directions fall back to an explicit axis instead of producing NaN, and
//! spherical interpolation handles antiparallel endpoints where no unique
//! great-circle arc exists.

use nalgebra::Unit;

use crate::core_types::vec3::Vec3;

/// Length below which a vector is treated as having no direction.
pub const NORM_EPSILON: f32 = 1.0e-6;

/// The world up axis, used as the final fallback orientation.
pub fn world_up() -> Vec3 {
    Vec3::y()
}

/// Whether a vector is too short to carry a meaningful direction.
pub fn is_near_zero(v: Vec3) -> bool {
    v.norm_squared() <= NORM_EPSILON * NORM_EPSILON
}

/// Normalizes `v`, or returns `fallback` when `v` is near zero.
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    if is_near_zero(v) {
        fallback
    } else {
        v.normalize()
    }
}

/// Linear interpolation between two vectors with `t` clamped to [0, 1].
pub fn lerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from.lerp(&to, t.clamp(0.0, 1.0))
}

/// Spherical interpolation between two orientation axes.
///
/// Both inputs are normalized before interpolating, so the result is always
/// unit length. When `from` is degenerate the (normalized) target is
/// returned; when `to` is degenerate the current axis is kept. Antiparallel
/// axes snap to whichever endpoint the clamped factor is closer to.
pub fn slerp_unit(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let Some(from_unit) = Unit::try_new(from, NORM_EPSILON) else {
        return normalize_or(to, world_up());
    };
    let Some(to_unit) = Unit::try_new(to, NORM_EPSILON) else {
        return from_unit.into_inner();
    };
    // Exact endpoints: factor 0 holds the current axis, a saturated factor
    // lands on the target without interpolation rounding.
    if t <= 0.0 {
        return from_unit.into_inner();
    }
    if t >= 1.0 {
        return to_unit.into_inner();
    }
    match from_unit.try_slerp(&to_unit, t, NORM_EPSILON) {
        Some(mid) => mid.into_inner(),
        None if t < 0.5 => from_unit.into_inner(),
        None => to_unit.into_inner(),
    }
}
