//! Placeholder 3D renderer.
//!
//! Draws the scene with Raylib primitives: one slab per ground tile with
//! lane dashes driven by [`RoadScroll`], box stacks per building group and a
//! box for the runner. Everything is read from the ECS world; nothing here
//! feeds back into the simulation.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::locomotion::PlayerRuntime;
use crate::components::segment::{BuildingVariant, Segment, SegmentClass};
use crate::components::worldposition::WorldPosition;
use crate::resources::gameconfig::GameConfig;
use crate::resources::roadscroll::RoadScroll;
use crate::resources::runstats::RunStats;

const ROAD_WIDTH: f32 = 10.0;
const DASH_PERIOD: f32 = 20.0;
const BUILDING_OFFSET: f32 = 12.0;
const BUILDING_PALETTE: [Color; 4] = [Color::BEIGE, Color::LIGHTGRAY, Color::BROWN, Color::GRAY];

/// Snapshot of one segment anchor taken before drawing starts.
struct AnchorView {
    class: SegmentClass,
    position: WorldPosition,
    variant: BuildingVariant,
}

pub fn render_frame(world: &mut World, rl: &mut RaylibHandle, thread: &RaylibThread) {
    let mut anchors_query =
        world.query::<(&Segment, &WorldPosition, Option<&BuildingVariant>)>();
    let anchors: Vec<AnchorView> = anchors_query
        .iter(world)
        .map(|(segment, position, variant)| AnchorView {
            class: segment.class,
            position: *position,
            variant: variant.copied().unwrap_or_default(),
        })
        .collect();
    let mut player_query = world.query::<(&PlayerRuntime, &WorldPosition)>();
    let player = player_query
        .iter(world)
        .next()
        .map(|(runtime, position)| (runtime.current(), *position));

    let road = world.get_resource::<RoadScroll>().copied().unwrap_or_default();
    let stats = world.get_resource::<RunStats>().copied().unwrap_or_default();
    let (ground_length, building_depth) = world
        .get_resource::<GameConfig>()
        .map(|c| (c.ground_length, c.building_depth))
        .unwrap_or((160.0, 120.0));

    let camera = Camera3D::perspective(
        Vector3::new(0.0, 7.0, 16.0),
        Vector3::new(0.0, 1.0, -30.0),
        Vector3::new(0.0, 1.0, 0.0),
        55.0,
    );

    let mut d = rl.begin_drawing(thread);
    d.clear_background(Color::SKYBLUE);
    {
        let mut d3 = d.begin_mode3D(camera);
        let dash_shift = (road.offset * road.repeat_length).rem_euclid(DASH_PERIOD);
        for anchor in &anchors {
            let p = anchor.position;
            match anchor.class {
                SegmentClass::Ground => {
                    let center = Vector3::new(0.0, -0.05, p.z - ground_length * 0.5);
                    d3.draw_cube(center, ROAD_WIDTH, 0.1, ground_length, Color::DARKGRAY);
                }
                SegmentClass::Buildings => {
                    let height = 8.0 + 6.0 * anchor.variant.model as f32;
                    let color = BUILDING_PALETTE[anchor.variant.model % BUILDING_PALETTE.len()];
                    let side = if anchor.variant.mirrored { -1.0 } else { 1.0 };
                    for x in [-BUILDING_OFFSET * side, BUILDING_OFFSET * side] {
                        let center = Vector3::new(x, height * 0.5, p.z - building_depth * 0.5);
                        d3.draw_cube(center, 6.0, height, building_depth * 0.8, color);
                    }
                }
            }
        }
        let dashes = (ground_length * 2.0 / DASH_PERIOD) as i32;
        for i in 0..dashes {
            let z = dash_shift - i as f32 * DASH_PERIOD;
            d3.draw_cube(Vector3::new(0.0, 0.01, z), 0.3, 0.02, DASH_PERIOD * 0.5, Color::WHITE);
        }
        if let Some((_, position)) = player {
            let center = Vector3::new(position.x, 1.0 + position.y, position.z);
            d3.draw_cube(center, 0.8, 2.0, 0.8, Color::ORANGE);
        }
    }

    let state = player
        .map(|(state, _)| state.range_name())
        .unwrap_or("-");
    d.draw_text(
        &format!("{}  distance {:.0}  recycled {}", state, stats.distance, stats.recycled),
        10,
        10,
        20,
        Color::BLACK,
    );
    d.draw_fps(10, 36);
}
