//! Vector type alias for 3D positions and directions.

use nalgebra::Vector3;

/// 3D vector type for positions, forces, and orientation axes.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout
/// the field engine for world positions, force contributions, and up axes.
pub type Vec3 = Vector3<f32>;
