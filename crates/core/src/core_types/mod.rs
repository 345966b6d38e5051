//! Core types and numeric utilities.

pub mod math;
pub mod vec3;

pub use vec3::Vec3;
