//! Segment anchor components.
//!
//! Ground tiles and building groups are spawned once at load time as anchor
//! entities carrying a [`Segment`] tag and a
//! [`WorldPosition`](crate::components::worldposition::WorldPosition). The
//! scroll system moves them and teleports them back to the far end of their
//! ring; see [`crate::resources::segmentrings`].

use bevy_ecs::prelude::Component;

/// Which ring a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentClass {
    Ground,
    Buildings,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub class: SegmentClass,
    /// Slot the anchor was created in. Never changes, even after recycling.
    pub index: usize,
}

/// Which building model dresses a building-group anchor.
///
/// Re-rolled every time the anchor is recycled so the repeating track does
/// not look periodic.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildingVariant {
    pub model: usize,
    /// Mirror the group across the road.
    pub mirrored: bool,
}

impl BuildingVariant {
    /// Pick a variant among `models` building models. `models == 0` yields model 0.
    pub fn roll(rng: &mut fastrand::Rng, models: usize) -> Self {
        Self {
            model: if models == 0 { 0 } else { rng.usize(..models) },
            mirrored: rng.bool(),
        }
    }
}
