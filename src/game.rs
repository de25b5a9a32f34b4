//! Scene setup, frame schedule and teardown.
//!
//! [`setup`] inserts the runner's resources from a [`GameConfig`], spawns the
//! player and both segment rings. The character rig is not attached here:
//! the player carries a [`PendingCharacter`] and the first frame attaches it,
//! like an asynchronously loaded asset, and starts `Idle` right after.
//!
//! Per frame the host calls [`crate::systems::time::update_world_time`],
//! dispatches key edges, then runs [`frame_schedule`].

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::info;

use crate::components::lateral::LateralState;
use crate::components::locomotion::{PendingCharacter, PlayerRuntime};
use crate::components::segment::{BuildingVariant, Segment, SegmentClass};
use crate::components::worldposition::WorldPosition;
use crate::resources::animator::Animator;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::rangetable::AnimationRangeTable;
use crate::resources::roadscroll::RoadScroll;
use crate::resources::runstats::RunStats;
use crate::resources::segmentrings::{SegmentRings, ring_layout};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::advance_animations;
use crate::systems::lateral::lateral_system;
use crate::systems::locomotion::{
    animation_completed_observer, idle_latch_system, input_observer, load_pending_character,
};
use crate::systems::scroll::scroll_system;

/// Insert resources and spawn the player and segment rings.
///
/// Returns the player entity.
pub fn setup(world: &mut World, config: GameConfig) -> Entity {
    setup_with_rings(
        world,
        SegmentRings::new(
            config.ground_length,
            config.building_spacing(),
            config.building_variants,
        ),
        config,
    )
}

/// Like [`setup`] with a caller-provided ring set, e.g. a seeded one.
pub fn setup_with_rings(world: &mut World, mut rings: SegmentRings, config: GameConfig) -> Entity {
    if !world.contains_resource::<WorldTime>() {
        world.insert_resource(WorldTime::default());
    }
    world.insert_resource(InputState::default());
    world.insert_resource(AnimationRangeTable::new(config.base_scroll_speed));
    world.insert_resource(Animator::new(config.animation_fps));
    world.insert_resource(RoadScroll::new(config.ground_length));
    world.insert_resource(RunStats::default());

    let player = world
        .spawn((
            PlayerRuntime::new(),
            PendingCharacter {
                ranges: config.character_ranges.clone(),
            },
            LateralState::default(),
            WorldPosition::default(),
        ))
        .id();

    let ground: Vec<Entity> = ring_layout(config.ground_segments, rings.ground.spacing)
        .enumerate()
        .map(|(index, z)| {
            world
                .spawn((
                    Segment {
                        class: SegmentClass::Ground,
                        index,
                    },
                    WorldPosition::new(0.0, 0.0, z),
                ))
                .id()
        })
        .collect();
    rings.fill(SegmentClass::Ground, ground);

    let models = rings.building_models;
    let mut buildings = Vec::with_capacity(config.building_segments);
    for (index, z) in ring_layout(config.building_segments, rings.buildings.spacing).enumerate() {
        let variant = BuildingVariant::roll(&mut rings.rng, models);
        let entity = world
            .spawn((
                Segment {
                    class: SegmentClass::Buildings,
                    index,
                },
                WorldPosition::new(0.0, 0.0, z),
                variant,
            ))
            .id();
        buildings.push(entity);
    }
    rings.fill(SegmentClass::Buildings, buildings);

    world.insert_resource(rings);
    world.insert_resource(config);
    info!("Scene ready, player {:?}", player);
    player
}

/// Register the locomotion observers. Call once per world.
pub fn register_observers(world: &mut World) {
    world.spawn(Observer::new(input_observer));
    world.spawn(Observer::new(animation_completed_observer));
    // Ensure the observers exist before anything triggers events.
    world.flush();
}

/// Systems run once per frame, in order.
///
/// Lateral smoothing and scrolling read the same `WorldTime` delta. The idle
/// latch follows the character attach directly, so keys dispatched after
/// this frame always meet a latched runtime.
/// Completions reported by `advance_animations` are applied before
/// `scroll_system`, so a state change at the end of a range affects this
/// frame's scroll speed.
pub fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            lateral_system,
            load_pending_character,
            idle_latch_system,
            advance_animations,
            scroll_system,
        )
            .chain(),
    );
    schedule
}

/// Tear the scene down: stop the player's animation, detach its observers,
/// despawn the player and every segment anchor, and empty the rings.
pub fn teardown(world: &mut World) {
    let players: Vec<Entity> = world
        .query_filtered::<Entity, With<PlayerRuntime>>()
        .iter(world)
        .collect();
    if world.contains_resource::<Animator>() {
        world.resource_scope(|world, mut animator: Mut<Animator>| {
            let mut runtimes = world.query::<&mut PlayerRuntime>();
            for mut runtime in runtimes.iter_mut(world) {
                runtime.teardown(&mut *animator);
            }
        });
    }
    for player in players {
        world.despawn(player);
    }

    let anchors: Vec<Entity> = world
        .query_filtered::<Entity, With<Segment>>()
        .iter(world)
        .collect();
    let count = anchors.len();
    for anchor in anchors {
        world.despawn(anchor);
    }
    if let Some(mut rings) = world.get_resource_mut::<SegmentRings>() {
        rings.clear();
    }
    info!("Scene torn down, {} segments despawned", count);
}
