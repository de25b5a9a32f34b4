//! Config and character-range files on disk.

use std::fs;

use bevy_ecs::prelude::*;
use tempfile::tempdir;

use runway::components::lateral::LateralRelease;
use runway::components::locomotion::{PlayerRuntime, PlayerState};
use runway::game;
use runway::resources::animator::Animator;
use runway::resources::gameconfig::GameConfig;
use runway::resources::input::KeyCode;
use runway::resources::rangetable::AnimationRangeTable;
use runway::resources::skeleton::Skeleton;
use runway::resources::worldtime::WorldTime;
use runway::systems::input::dispatch_key;
use runway::systems::time::update_world_time;

const DT: f32 = 1.0 / 60.0;

fn started(config: GameConfig) -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    let player = game::setup(&mut world, config);
    game::register_observers(&mut world);
    let mut schedule = game::frame_schedule();
    for _ in 0..2 {
        update_world_time(&mut world, DT);
        schedule.run(&mut world);
    }
    (world, player)
}

#[test]
fn config_round_trips_through_ini_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.ini");

    let mut config = GameConfig::with_path(&path);
    config.base_scroll_speed = 75.0;
    config.release = LateralRelease::Hold;
    config.ground_segments = 8;
    config.blend = false;
    config.character_ranges = Some(dir.path().join("ranges.json"));
    config.save_to_file().unwrap();

    let mut loaded = GameConfig::with_path(&path);
    loaded.load_from_file().unwrap();
    assert_eq!(loaded.base_scroll_speed, 75.0);
    assert_eq!(loaded.release, LateralRelease::Hold);
    assert_eq!(loaded.ground_segments, 8);
    assert!(!loaded.blend);
    assert_eq!(loaded.character_ranges, config.character_ranges);
    assert_eq!(loaded.window_size(), config.window_size());
}

#[test]
fn skeleton_ranges_override_table_bounds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ranges.json");
    fs::write(
        &path,
        r#"{ "ranges": { "Run": { "from": 10, "to": 30 }, "Strafe_L": { "from": 31, "to": 40 } } }"#,
    )
    .unwrap();

    let skeleton = Skeleton::load_json(&path).unwrap();
    let table = AnimationRangeTable::new(60.0);
    let run = table.range_for(PlayerState::Run, Some(&skeleton)).unwrap();
    assert_eq!((run.start, run.end), (10.0, 30.0));
    assert!(run.looped);

    let mut config = GameConfig::new();
    config.character_ranges = Some(path);
    let (mut world, player) = started(config);
    assert_eq!(
        world
            .get::<PlayerRuntime>(player)
            .unwrap()
            .rig()
            .unwrap()
            .skeleton
            .ranges
            .len(),
        2
    );

    dispatch_key(&mut world, KeyCode::W, true);
    let handle = world.get::<PlayerRuntime>(player).unwrap().playback().unwrap();
    let request = world.resource::<Animator>().request(handle).unwrap();
    assert_eq!((request.from, request.to), (10.0, 30.0));
    assert!(request.looped);
    assert!(request.blend);
}

#[test]
fn missing_ranges_file_falls_back_to_static_table() {
    let dir = tempdir().unwrap();
    let mut config = GameConfig::new();
    config.character_ranges = Some(dir.path().join("absent.json"));
    let (mut world, player) = started(config);

    let rt = world.get::<PlayerRuntime>(player).unwrap();
    assert!(rt.rig().unwrap().skeleton.ranges.is_empty());
    assert_eq!(rt.current(), PlayerState::Idle);

    dispatch_key(&mut world, KeyCode::W, true);
    let handle = world.get::<PlayerRuntime>(player).unwrap().playback().unwrap();
    let request = world.resource::<Animator>().request(handle).unwrap();
    assert_eq!((request.from, request.to), (60.0, 83.0));
}

#[test]
fn zero_animation_fps_in_config_still_finishes_a_jump() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.ini");
    fs::write(&path, "[runner]\nanimation_fps = 0\n").unwrap();
    let mut config = GameConfig::with_path(&path);
    config.load_from_file().unwrap();
    assert!(config.animation_fps > 0.0);

    let (mut world, player) = started(config);
    let mut schedule = game::frame_schedule();
    dispatch_key(&mut world, KeyCode::Space, true);
    assert!(world.get::<PlayerRuntime>(player).unwrap().is_blocking());
    for _ in 0..600 {
        update_world_time(&mut world, DT);
        schedule.run(&mut world);
    }
    let rt = world.get::<PlayerRuntime>(player).unwrap();
    assert!(!rt.is_blocking());
    assert_eq!(rt.current(), PlayerState::Idle);
}

#[test]
fn malformed_ranges_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"ranges\": [").unwrap();
    let err = Skeleton::load_json(&path).unwrap_err();
    assert!(err.contains("parse"));
}
