//! Segment rings and the recycling step.
//!
//! A ring is a fixed set of anchors of one [`SegmentClass`], laid out at
//! `z = -i * spacing` when created. Every frame the whole ring moves toward
//! the camera by the frame's scroll distance; any anchor that passes
//! `z > spacing` is teleported to `min_z - spacing`, just behind the rearmost
//! anchor. The ring keeps covering the same depth window forever without ever
//! allocating or freeing anchors.
//!
//! The recycling step itself is [`advance_ring`], a pure function over a
//! slice of z values so it can be driven by any system and tested alone.

use bevy_ecs::prelude::*;
use log::info;
use smallvec::SmallVec;

use crate::components::segment::SegmentClass;

/// Z positions of a freshly created ring: `0, -spacing, -2*spacing, ...`.
pub fn ring_layout(count: usize, spacing: f32) -> impl Iterator<Item = f32> {
    (0..count).map(move |i| -(i as f32) * spacing)
}

/// Move every z by `movement`, then recycle anchors that passed `spacing`.
///
/// Returns the indices of recycled anchors in recycling order. The rearmost
/// z is updated after each teleport so several anchors recycled in one frame
/// stay `spacing` apart. Empty rings, non-positive spacing and non-finite
/// movement leave the slice untouched.
///
/// Whole ring periods (`spacing * len`) are dropped from `movement` first, so
/// every anchor is recycled at most once per call.
pub fn advance_ring(zs: &mut [f32], spacing: f32, movement: f32) -> SmallVec<[usize; 4]> {
    let mut recycled = SmallVec::new();
    if zs.is_empty() || spacing <= 0.0 || !movement.is_finite() {
        return recycled;
    }
    let period = spacing * zs.len() as f32;
    let movement = movement % period;
    for z in zs.iter_mut() {
        *z += movement;
    }
    let mut min_z = zs.iter().copied().fold(f32::INFINITY, f32::min);
    for _ in 0..zs.len() {
        let front = zs
            .iter()
            .enumerate()
            .filter(|(_, z)| **z > spacing)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        let Some(index) = front else {
            break;
        };
        zs[index] = min_z - spacing;
        min_z = zs[index];
        recycled.push(index);
    }
    recycled
}

/// One ring of anchors.
#[derive(Debug, Clone)]
pub struct SegmentRing {
    pub class: SegmentClass,
    pub spacing: f32,
    pub members: Vec<Entity>,
}

impl SegmentRing {
    pub fn new(class: SegmentClass, spacing: f32) -> Self {
        Self {
            class,
            spacing,
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Both rings plus the generator used to dress recycled building groups.
#[derive(Resource, Debug)]
pub struct SegmentRings {
    pub ground: SegmentRing,
    pub buildings: SegmentRing,
    /// Number of building models a group can be dressed with.
    pub building_models: usize,
    pub rng: fastrand::Rng,
}

impl SegmentRings {
    pub fn new(ground_spacing: f32, building_spacing: f32, building_models: usize) -> Self {
        Self {
            ground: SegmentRing::new(SegmentClass::Ground, ground_spacing),
            buildings: SegmentRing::new(SegmentClass::Buildings, building_spacing),
            building_models,
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn ring(&self, class: SegmentClass) -> &SegmentRing {
        match class {
            SegmentClass::Ground => &self.ground,
            SegmentClass::Buildings => &self.buildings,
        }
    }

    pub fn ring_mut(&mut self, class: SegmentClass) -> &mut SegmentRing {
        match class {
            SegmentClass::Ground => &mut self.ground,
            SegmentClass::Buildings => &mut self.buildings,
        }
    }

    /// Replace the members of a ring. Called once when its anchors are spawned.
    pub fn fill(&mut self, class: SegmentClass, members: Vec<Entity>) {
        let ring = self.ring_mut(class);
        info!(
            "{:?} ring: {} segments, spacing {}",
            class,
            members.len(),
            ring.spacing
        );
        ring.members = members;
    }

    pub fn clear(&mut self) {
        self.ground.members.clear();
        self.buildings.members.clear();
    }
}

impl Default for SegmentRings {
    fn default() -> Self {
        Self::new(160.0, 118.0, 4)
    }
}
