//! The field registry: combines all attached sources into one field.
//!
//! A [`FieldRegistry`] is an explicit, cheaply clonable handle to shared
//! registry state. There is no global instance: sources and receivers are
//! attached to a specific registry, and independent registries are fully
//! independent worlds. Attachment returns an RAII handle whose drop
//! guarantees removal, so sources cannot leak into a registry past their
//! host's lifetime.
//!
//! # Combination algorithm
//!
//! `query` folds every attached source's sample into one result:
//! - the combined force is the plain vector sum of valid sample forces
//!   (commutative, so iteration order never matters);
//! - the expected up is the weight-blended average of the normalized sample
//!   up axes, falling back to the direction opposing the net force, then to
//!   the registry's default up axis;
//! - the query succeeds only when the net force is non-zero. Exact
//!   cancellation between opposing sources therefore reports "no field
//!   here", and receivers decay gracefully instead of holding a phantom
//!   field.
//!
//! # Concurrency
//!
//! Shared state sits behind an `RwLock`: queries take read access and
//! attachment/detachment takes write access, so a query can never iterate a
//! mutating set. A generation counter records membership changes for
//! callers that want to detect them between ticks.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::core_types::math::{is_near_zero, normalize_or, world_up};
use crate::core_types::Vec3;
use crate::profile::FieldProfile;
use crate::sample::SourcePlacement;
use crate::source::{FieldSource, SourceId};

/// Registry-scoped identifier of an attached receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

/// The combined field at one query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldQuery {
    /// Net force: the vector sum of all valid source contributions.
    pub force: Vec3,
    /// Unit-length expected up axis.
    pub up: Vec3,
    /// `false` means "no field here" (including exact cancellation).
    pub success: bool,
}

struct RegistryInner {
    sources: FxHashMap<SourceId, FieldSource>,
    receivers: FxHashSet<ReceiverId>,
    next_source: u64,
    next_receiver: u64,
    default_up: Vec3,
    generation: u64,
}

impl RegistryInner {
    fn query(&self, point: Vec3) -> FieldQuery {
        let mut total_force = Vec3::zeros();
        let mut up_accumulator = Vec3::zeros();
        let mut up_weight = 0.0_f32;

        for source in self.sources.values() {
            let Some(sample) = source.try_sample(point) else {
                continue;
            };
            if !sample.is_valid() {
                continue;
            }

            total_force += sample.force;

            if sample.weight > 0.0 && !is_near_zero(sample.up) {
                up_accumulator += sample.up.normalize() * sample.weight;
                up_weight += sample.weight;
            }
        }

        let success = !is_near_zero(total_force);

        // Weighted blend first; opposed up opinions can cancel the
        // accumulator even with positive weight, in which case the force
        // direction (and finally the default axis) decides.
        let up = if up_weight > 0.0 && !is_near_zero(up_accumulator) {
            up_accumulator.normalize()
        } else if success {
            -total_force.normalize()
        } else {
            self.default_up
        };

        FieldQuery {
            force: total_force,
            up,
            success,
        }
    }
}

fn read_inner(lock: &RwLock<RegistryInner>) -> RwLockReadGuard<'_, RegistryInner> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_inner(lock: &RwLock<RegistryInner>) -> RwLockWriteGuard<'_, RegistryInner> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Shared coordinator for all active sources and receivers.
///
/// Clones share the same underlying registry. See the module docs for the
/// combination algorithm and locking model.
#[derive(Clone)]
pub struct FieldRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    /// Creates an empty registry with the world up axis as default.
    pub fn new() -> Self {
        Self::with_default_up(world_up())
    }

    /// Creates an empty registry with an explicit default up axis.
    ///
    /// The axis is normalized on entry; a degenerate axis falls back to
    /// world up.
    pub fn with_default_up(default_up: Vec3) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                sources: FxHashMap::default(),
                receivers: FxHashSet::default(),
                next_source: 0,
                next_receiver: 0,
                default_up: normalize_or(default_up, world_up()),
                generation: 0,
            })),
        }
    }

    /// Attaches a source and returns the handle controlling it.
    ///
    /// Dropping the handle (or calling [`SourceHandle::detach`]) removes the
    /// source. Each call attaches a distinct source, so double registration
    /// of one handle cannot be expressed.
    pub fn attach_source(&self, source: FieldSource) -> SourceHandle {
        let mut inner = write_inner(&self.inner);
        let id = SourceId(inner.next_source);
        inner.next_source += 1;
        inner.sources.insert(id, source);
        inner.generation += 1;
        debug!(id = id.0, total = inner.sources.len(), "field source attached");
        SourceHandle {
            registry: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Detaches a source by id. Detaching an unknown id is a no-op.
    pub fn detach_source(&self, id: SourceId) {
        detach_source_from(&self.inner, id);
    }

    /// Moves an attached source. Returns `false` for an unknown id.
    pub fn update_source_placement(&self, id: SourceId, placement: SourcePlacement) -> bool {
        let mut inner = write_inner(&self.inner);
        match inner.sources.get_mut(&id) {
            Some(source) => {
                source.set_placement(placement);
                true
            }
            None => false,
        }
    }

    /// Swaps an attached source's profile. Returns `false` for an unknown id.
    pub fn set_source_profile(&self, id: SourceId, profile: Option<Arc<dyn FieldProfile>>) -> bool {
        let mut inner = write_inner(&self.inner);
        match inner.sources.get_mut(&id) {
            Some(source) => {
                source.set_profile(profile);
                inner.generation += 1;
                true
            }
            None => false,
        }
    }

    pub(crate) fn attach_receiver(&self) -> ReceiverId {
        let mut inner = write_inner(&self.inner);
        let id = ReceiverId(inner.next_receiver);
        inner.next_receiver += 1;
        inner.receivers.insert(id);
        inner.generation += 1;
        debug!(id = id.0, total = inner.receivers.len(), "field receiver attached");
        id
    }

    pub(crate) fn detach_receiver(&self, id: ReceiverId) {
        let mut inner = write_inner(&self.inner);
        if inner.receivers.remove(&id) {
            inner.generation += 1;
            debug!(id = id.0, total = inner.receivers.len(), "field receiver detached");
        }
    }

    /// Samples the combined field at a world position.
    pub fn query(&self, point: Vec3) -> FieldQuery {
        read_inner(&self.inner).query(point)
    }

    /// Samples the combined field at many points over one consistent
    /// snapshot of the source set, in parallel.
    pub fn query_many(&self, points: &[Vec3]) -> Vec<FieldQuery> {
        let guard = read_inner(&self.inner);
        let inner: &RegistryInner = &guard;
        points.par_iter().map(|&point| inner.query(point)).collect()
    }

    /// The expected up axis at a world position.
    ///
    /// Convenience for consumers (camera, HUD) that do not run their own
    /// receiver; equal to `query(point).up` and never zero.
    pub fn expected_up(&self, point: Vec3) -> Vec3 {
        self.query(point).up
    }

    /// The fallback up axis reported where no source has an opinion.
    pub fn default_up(&self) -> Vec3 {
        read_inner(&self.inner).default_up
    }

    /// Replaces the fallback up axis (normalized on entry).
    pub fn set_default_up(&self, up: Vec3) {
        if is_near_zero(up) {
            warn!("ignoring degenerate default up axis");
            return;
        }
        write_inner(&self.inner).default_up = up.normalize();
    }

    /// Number of attached sources.
    pub fn source_count(&self) -> usize {
        read_inner(&self.inner).sources.len()
    }

    /// Number of attached receivers.
    pub fn receiver_count(&self) -> usize {
        read_inner(&self.inner).receivers.len()
    }

    /// Membership generation: bumps on every attach/detach/profile swap.
    pub fn generation(&self) -> u64 {
        read_inner(&self.inner).generation
    }
}

fn detach_source_from(lock: &RwLock<RegistryInner>, id: SourceId) {
    let mut inner = write_inner(lock);
    if inner.sources.remove(&id).is_some() {
        inner.generation += 1;
        debug!(id = id.0, total = inner.sources.len(), "field source detached");
    }
}

/// RAII handle to an attached source.
///
/// The handle is the host object's way to move its source and swap its
/// profile; dropping it detaches the source even on early-exit paths.
pub struct SourceHandle {
    registry: Weak<RwLock<RegistryInner>>,
    id: SourceId,
}

impl SourceHandle {
    /// The id of the attached source.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Moves the source. A no-op if the registry or source is gone.
    pub fn set_placement(&self, placement: SourcePlacement) {
        if let Some(lock) = self.registry.upgrade() {
            let mut inner = write_inner(&lock);
            if let Some(source) = inner.sources.get_mut(&self.id) {
                source.set_placement(placement);
            }
        }
    }

    /// Swaps the source's profile. A no-op if the registry or source is gone.
    pub fn set_profile(&self, profile: Option<Arc<dyn FieldProfile>>) {
        if let Some(lock) = self.registry.upgrade() {
            let mut inner = write_inner(&lock);
            if let Some(source) = inner.sources.get_mut(&self.id) {
                source.set_profile(profile);
                inner.generation += 1;
            }
        }
    }

    /// Detaches the source now instead of at drop time.
    pub fn detach(self) {
        // Drop does the work.
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        if let Some(lock) = self.registry.upgrade() {
            detach_source_from(&lock, self.id);
        }
    }
}
