//! Gravity Field Core Library
//!
//! A runtime multi-source directional-field engine for hover-vehicle games.
//! Any number of independently placed field sources, each carrying a
//! pluggable sampling profile, combine into a single force vector and a
//! single expected-up axis at an arbitrary query point. Receivers sample
//! that combined field once per tick and low-pass-filter the result, giving
//! vehicle, camera, and HUD code a stable frame of reference even as
//! sources come and go.
//!
//! ## Structure
//!
//! - [`FieldProfile`] / [`RadialProfile`]: how one source shapes its local
//!   contribution (attraction or repulsion with distance falloff).
//! - [`FieldSource`]: a profile bound to a world placement.
//! - [`FieldReceiver`]: per-tick sampling with temporal smoothing.
//! - [`FieldRegistry`]: holds the attached sources and receivers and folds
//!   N independent samples into one result.
//!
//! Registration is handle-based: attaching a source yields a
//! [`SourceHandle`] whose drop guarantees removal; receivers detach
//! themselves on drop. There is no global registry instance.

pub mod core_types;
pub mod error;
pub mod falloff;
pub mod profile;
pub mod receiver;
pub mod registry;
pub mod sample;
pub mod source;

pub use core_types::Vec3;
pub use error::FieldError;
pub use falloff::{FalloffCurve, FalloffKey, KeyedFalloff};
pub use profile::{FieldMode, FieldProfile, RadialProfile};
pub use receiver::FieldReceiver;
pub use registry::{FieldQuery, FieldRegistry, ReceiverId, SourceHandle};
pub use sample::{FieldSample, SourcePlacement};
pub use source::{FieldSource, SourceId};
