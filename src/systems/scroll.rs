//! World scroll system.
//!
//! The runner never moves along z; the world moves past it instead. Each
//! frame [`scroll_system`] takes the scroll speed of the player's current
//! state, moves both segment rings by `speed * dt` and recycles anchors that
//! passed the camera (see [`crate::resources::segmentrings`]). The road
//! texture offset and the distance counter advance by the same amount.
use bevy_ecs::prelude::*;
use smallvec::SmallVec;

use crate::components::locomotion::PlayerRuntime;
use crate::components::segment::{BuildingVariant, Segment};
use crate::components::worldposition::WorldPosition;
use crate::resources::roadscroll::RoadScroll;
use crate::resources::runstats::RunStats;
use crate::resources::segmentrings::{SegmentRing, SegmentRings, advance_ring};
use crate::resources::worldtime::WorldTime;

type Anchors<'w, 's> =
    Query<'w, 's, (&'static mut WorldPosition, Option<&'static mut BuildingVariant>), With<Segment>>;

/// Scroll both rings by the player's current scroll speed.
///
/// Contract
/// - Reads [`WorldTime`] for the frame delta and [`PlayerRuntime`] for the speed.
/// - Does nothing while the speed is zero.
/// - Rewrites z of ring members, re-rolls [`BuildingVariant`] of recycled
///   building groups, advances [`RoadScroll`] and [`RunStats`].
pub fn scroll_system(
    players: Query<&PlayerRuntime>,
    mut anchors: Anchors,
    mut rings: ResMut<SegmentRings>,
    mut road: ResMut<RoadScroll>,
    mut stats: ResMut<RunStats>,
    time: Res<WorldTime>,
) {
    let speed = players.single().map(|p| p.scroll_speed()).unwrap_or(0.0);
    if speed == 0.0 {
        return;
    }
    let movement = speed * time.delta;
    if movement == 0.0 {
        return;
    }

    let rings = &mut *rings;
    let models = rings.building_models;
    let mut recycled = scroll_ring(&rings.ground, movement, &mut anchors, &mut rings.rng, models);
    recycled += scroll_ring(&rings.buildings, movement, &mut anchors, &mut rings.rng, models);

    road.advance(movement);
    stats.distance += movement;
    stats.recycled += recycled as u64;
}

/// Move one ring and return how many of its anchors were recycled.
fn scroll_ring(
    ring: &SegmentRing,
    movement: f32,
    anchors: &mut Anchors,
    rng: &mut fastrand::Rng,
    models: usize,
) -> usize {
    let mut members: SmallVec<[Entity; 8]> = SmallVec::new();
    let mut zs: SmallVec<[f32; 8]> = SmallVec::new();
    for entity in &ring.members {
        if let Ok((position, _)) = anchors.get(*entity) {
            members.push(*entity);
            zs.push(position.z);
        }
    }

    let recycled = advance_ring(&mut zs, ring.spacing, movement);

    for (entity, z) in members.iter().zip(zs.iter()) {
        if let Ok((mut position, _)) = anchors.get_mut(*entity) {
            position.z = *z;
        }
    }
    for index in &recycled {
        if let Ok((_, Some(mut variant))) = anchors.get_mut(members[*index]) {
            *variant = BuildingVariant::roll(rng, models);
        }
    }
    recycled.len()
}
