//! Distance falloff curves for radial field profiles.
//!
//! A falloff curve maps normalized distance (0 = at the source origin,
//! 1 = at the range limit) to a strength multiplier in [0, 1]. Curves are
//! required to be monotonic non-increasing so that field strength never
//! grows with distance. Built-in shapes cover the common cases; authored
//! curves use validated piecewise-linear keyframes.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// A single keyframe of an authored falloff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FalloffKey {
    /// Normalized distance in [0, 1].
    pub time: f32,
    /// Strength multiplier in [0, 1].
    pub value: f32,
}

impl FalloffKey {
    /// Creates a keyframe at `time` with `value`.
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// A validated piecewise-linear falloff curve.
///
/// Keys are guaranteed non-empty, with non-decreasing times and
/// non-increasing values, all within [0, 1]. Evaluation clamps to the first
/// and last key outside the keyed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FalloffKey>", into = "Vec<FalloffKey>")]
pub struct KeyedFalloff {
    keys: Vec<FalloffKey>,
}

impl KeyedFalloff {
    /// Validates and wraps a list of keyframes.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EmptyFalloff`] for an empty key list,
    /// [`FieldError::UnorderedFalloffKeys`] when times are not finite,
    /// out of [0, 1], or decreasing, and [`FieldError::NonMonotonicFalloff`]
    /// when values are not finite, out of [0, 1], or increasing.
    pub fn new(keys: Vec<FalloffKey>) -> Result<Self, FieldError> {
        if keys.is_empty() {
            return Err(FieldError::EmptyFalloff);
        }
        for pair in keys.windows(2) {
            if pair[1].time < pair[0].time {
                return Err(FieldError::UnorderedFalloffKeys);
            }
            if pair[1].value > pair[0].value {
                return Err(FieldError::NonMonotonicFalloff);
            }
        }
        for key in &keys {
            if !key.time.is_finite() || !(0.0..=1.0).contains(&key.time) {
                return Err(FieldError::UnorderedFalloffKeys);
            }
            if !key.value.is_finite() || !(0.0..=1.0).contains(&key.value) {
                return Err(FieldError::NonMonotonicFalloff);
            }
        }
        Ok(Self { keys })
    }

    /// The validated keyframes, in time order.
    pub fn keys(&self) -> &[FalloffKey] {
        &self.keys
    }

    fn evaluate(&self, t: f32) -> f32 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        if t <= first.time {
            return first.value;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.value;
                }
                let local = (t - a.time) / span;
                return a.value + (b.value - a.value) * local;
            }
        }
        self.keys.last().map_or(0.0, |key| key.value)
    }
}

impl TryFrom<Vec<FalloffKey>> for KeyedFalloff {
    type Error = FieldError;

    fn try_from(keys: Vec<FalloffKey>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<KeyedFalloff> for Vec<FalloffKey> {
    fn from(curve: KeyedFalloff) -> Self {
        curve.keys
    }
}

/// Monotonic non-increasing strength curve over normalized distance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum FalloffCurve {
    /// Full strength across the whole range.
    Constant,
    /// Linear fade, `1 - t`.
    Linear,
    /// Smooth ease-in-out fade from 1 at the origin to 0 at the range limit.
    #[default]
    SmoothStep,
    /// Authored piecewise-linear keyframes.
    Keyed(KeyedFalloff),
}

impl FalloffCurve {
    /// Evaluates the curve at normalized distance `t`.
    ///
    /// Input is clamped to [0, 1] and the result is clamped to [0, 1].
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let value = match self {
            Self::Constant => 1.0,
            Self::Linear => 1.0 - t,
            Self::SmoothStep => 1.0 - t * t * (3.0 - 2.0 * t),
            Self::Keyed(curve) => curve.evaluate(t),
        };
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_curves_hit_endpoints() {
        for curve in [
            FalloffCurve::Constant,
            FalloffCurve::Linear,
            FalloffCurve::SmoothStep,
        ] {
            assert_eq!(curve.evaluate(0.0), 1.0, "{curve:?} at origin");
        }
        assert_eq!(FalloffCurve::Linear.evaluate(1.0), 0.0);
        assert_eq!(FalloffCurve::SmoothStep.evaluate(1.0), 0.0);
        assert_eq!(FalloffCurve::Constant.evaluate(1.0), 1.0);
    }

    #[test]
    fn linear_is_half_at_midpoint() {
        assert_eq!(FalloffCurve::Linear.evaluate(0.5), 0.5);
    }

    #[test]
    fn smooth_step_is_monotonic() {
        let curve = FalloffCurve::SmoothStep;
        let mut previous = curve.evaluate(0.0);
        for step in 1..=20_i16 {
            let value = curve.evaluate(f32::from(step) / 20.0);
            assert!(
                value <= previous,
                "smooth step increased between steps: {previous} -> {value}"
            );
            previous = value;
        }
    }

    #[test]
    fn evaluate_clamps_input() {
        assert_eq!(FalloffCurve::Linear.evaluate(-3.0), 1.0);
        assert_eq!(FalloffCurve::Linear.evaluate(42.0), 0.0);
    }

    #[test]
    fn keyed_curve_interpolates_between_keys() {
        let curve = KeyedFalloff::new(vec![
            FalloffKey::new(0.0, 1.0),
            FalloffKey::new(0.5, 0.8),
            FalloffKey::new(1.0, 0.0),
        ])
        .unwrap();
        let curve = FalloffCurve::Keyed(curve);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert!((curve.evaluate(0.25) - 0.9).abs() < 1.0e-6);
        assert!((curve.evaluate(0.75) - 0.4).abs() < 1.0e-6);
        assert_eq!(curve.evaluate(1.0), 0.0);
    }

    #[test]
    fn keyed_curve_clamps_outside_key_range() {
        let curve =
            KeyedFalloff::new(vec![FalloffKey::new(0.2, 0.9), FalloffKey::new(0.8, 0.1)]).unwrap();
        let curve = FalloffCurve::Keyed(curve);
        assert_eq!(curve.evaluate(0.0), 0.9);
        assert_eq!(curve.evaluate(1.0), 0.1);
    }

    #[test]
    fn keyed_validation_rejects_bad_curves() {
        assert_eq!(KeyedFalloff::new(vec![]), Err(FieldError::EmptyFalloff));
        assert_eq!(
            KeyedFalloff::new(vec![FalloffKey::new(0.5, 1.0), FalloffKey::new(0.2, 0.5)]),
            Err(FieldError::UnorderedFalloffKeys)
        );
        assert_eq!(
            KeyedFalloff::new(vec![FalloffKey::new(0.0, 0.2), FalloffKey::new(1.0, 0.9)]),
            Err(FieldError::NonMonotonicFalloff)
        );
        assert_eq!(
            KeyedFalloff::new(vec![FalloffKey::new(-0.5, 1.0)]),
            Err(FieldError::UnorderedFalloffKeys)
        );
        assert_eq!(
            KeyedFalloff::new(vec![FalloffKey::new(0.0, 2.0)]),
            Err(FieldError::NonMonotonicFalloff)
        );
    }

    #[test]
    fn single_key_curve_is_flat() {
        let curve = KeyedFalloff::new(vec![FalloffKey::new(0.5, 0.75)]).unwrap();
        let curve = FalloffCurve::Keyed(curve);
        assert_eq!(curve.evaluate(0.0), 0.75);
        assert_eq!(curve.evaluate(0.5), 0.75);
        assert_eq!(curve.evaluate(1.0), 0.75);
    }
}
