//! Frame-by-frame integration tests: scene setup, input dispatch, the jump
//! chain driven by animation timing, lateral smoothing, ring recycling and
//! teardown.

use bevy_ecs::prelude::*;

use runway::components::lateral::LateralRelease;
use runway::components::locomotion::{PendingCharacter, PlayerRuntime, PlayerState};
use runway::components::segment::{BuildingVariant, Segment, SegmentClass};
use runway::components::worldposition::WorldPosition;
use runway::game;
use runway::resources::animator::Animator;
use runway::resources::gameconfig::GameConfig;
use runway::resources::input::KeyCode;
use runway::resources::roadscroll::RoadScroll;
use runway::resources::runstats::RunStats;
use runway::resources::segmentrings::SegmentRings;
use runway::resources::worldtime::WorldTime;
use runway::systems::input::dispatch_key;
use runway::systems::time::update_world_time;

const DT: f32 = 1.0 / 60.0;
const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(config: GameConfig) -> (World, Entity, Schedule) {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    let rings = SegmentRings::new(
        config.ground_length,
        config.building_spacing(),
        config.building_variants,
    )
    .with_seed(7);
    let player = game::setup_with_rings(&mut world, rings, config);
    game::register_observers(&mut world);
    (world, player, game::frame_schedule())
}

fn tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

/// World with the character attached and `Idle` playing.
fn started(config: GameConfig) -> (World, Entity, Schedule) {
    let (mut world, player, mut schedule) = make_world(config);
    tick(&mut world, &mut schedule, DT);
    (world, player, schedule)
}

fn runtime(world: &World, player: Entity) -> &PlayerRuntime {
    world.get::<PlayerRuntime>(player).unwrap()
}

fn ground_zs(world: &mut World) -> Vec<f32> {
    let mut query = world.query::<(&Segment, &WorldPosition)>();
    let mut anchors: Vec<(usize, f32)> = query
        .iter(world)
        .filter(|(segment, _)| segment.class == SegmentClass::Ground)
        .map(|(segment, position)| (segment.index, position.z))
        .collect();
    anchors.sort_by_key(|(index, _)| *index);
    anchors.into_iter().map(|(_, z)| z).collect()
}

/// Tick until `done` holds, recording every distinct state on the way.
fn run_until(
    world: &mut World,
    schedule: &mut Schedule,
    player: Entity,
    done: impl Fn(&PlayerRuntime) -> bool,
) -> Vec<PlayerState> {
    let mut seen = vec![runtime(world, player).current()];
    for _ in 0..1000 {
        tick(world, schedule, DT);
        let rt = runtime(world, player);
        if *seen.last().unwrap() != rt.current() {
            seen.push(rt.current());
        }
        if rt.current().is_blocking() {
            assert!(rt.is_blocking(), "{:?} must block", rt.current());
        }
        if done(rt) {
            return seen;
        }
    }
    panic!("state machine stalled after {:?}", seen);
}

#[test]
fn character_attaches_and_idle_starts_on_first_frame() {
    let (mut world, player, mut schedule) = make_world(GameConfig::new());
    assert!(runtime(&world, player).rig().is_none());

    tick(&mut world, &mut schedule, DT);
    assert!(world.get::<PendingCharacter>(player).is_none());
    let rt = runtime(&world, player);
    assert!(rt.rig().is_some());
    assert!(rt.idle_initialized());
    assert_eq!(rt.current(), PlayerState::Idle);
    assert_eq!(rt.scroll_speed(), 0.0);
    assert!(rt.playback().is_some());
    assert_eq!(world.resource::<Animator>().active_count(), 1);

    tick(&mut world, &mut schedule, DT);
    assert_eq!(runtime(&world, player).current(), PlayerState::Idle);
    assert_eq!(world.resource::<Animator>().active_count(), 1);
}

#[test]
fn jump_right_after_attach_survives_the_next_frame() {
    let (mut world, player, mut schedule) = make_world(GameConfig::new());
    tick(&mut world, &mut schedule, DT);
    dispatch_key(&mut world, KeyCode::Space, true);
    assert_eq!(runtime(&world, player).current(), PlayerState::Jump);

    tick(&mut world, &mut schedule, DT);
    let rt = runtime(&world, player);
    assert_eq!(rt.current(), PlayerState::Jump);
    assert!(rt.is_blocking());

    let seen = run_until(&mut world, &mut schedule, player, |rt| {
        !rt.is_blocking()
    });
    assert_eq!(
        seen[..3],
        [PlayerState::Jump, PlayerState::Fall, PlayerState::Getup]
    );
}

#[test]
fn forward_held_before_attach_runs_once_idle_starts() {
    let (mut world, player, mut schedule) = make_world(GameConfig::new());
    dispatch_key(&mut world, KeyCode::W, true);
    tick(&mut world, &mut schedule, DT);
    let rt = runtime(&world, player);
    assert!(rt.idle_initialized());
    assert_eq!(rt.current(), PlayerState::Run);
    assert_eq!(rt.scroll_speed(), 60.0);

    for _ in 0..30 {
        tick(&mut world, &mut schedule, DT);
    }
    assert_eq!(runtime(&world, player).current(), PlayerState::Run);
    assert!(world.resource::<RunStats>().distance > 0.0);
}

#[test]
fn forward_from_idle_runs_and_scrolls_at_base_speed() {
    let (mut world, player, mut schedule) = started(GameConfig::new());
    let before = ground_zs(&mut world);
    assert_eq!(before[..3], [0.0, -160.0, -320.0]);

    dispatch_key(&mut world, KeyCode::W, true);
    let rt = runtime(&world, player);
    assert_eq!(rt.current(), PlayerState::Run);
    assert_eq!(rt.scroll_speed(), 60.0);

    for _ in 0..30 {
        tick(&mut world, &mut schedule, DT);
    }
    let stats = *world.resource::<RunStats>();
    assert!(approx_eq(stats.distance, 30.0), "distance {}", stats.distance);
    let after = ground_zs(&mut world);
    assert!(approx_eq(after[0], 30.0));
    assert!(approx_eq(after[1], -130.0));
}

#[test]
fn key_repeat_and_alternate_keys_share_one_action() {
    let (mut world, player, _schedule) = started(GameConfig::new());
    dispatch_key(&mut world, KeyCode::ArrowUp, true);
    let playback = runtime(&world, player).playback();
    dispatch_key(&mut world, KeyCode::W, true);
    assert_eq!(runtime(&world, player).playback(), playback);

    dispatch_key(&mut world, KeyCode::ArrowUp, false);
    assert_eq!(runtime(&world, player).current(), PlayerState::RunIdle);
}

#[test]
fn jump_chain_then_winds_down_without_forward() {
    let (mut world, player, mut schedule) = started(GameConfig::new());
    dispatch_key(&mut world, KeyCode::Space, true);
    dispatch_key(&mut world, KeyCode::Space, false);
    assert_eq!(runtime(&world, player).current(), PlayerState::Jump);
    assert!(runtime(&world, player).is_blocking());

    let seen = run_until(&mut world, &mut schedule, player, |rt| {
        rt.current() == PlayerState::Idle
    });
    assert_eq!(
        seen,
        vec![
            PlayerState::Jump,
            PlayerState::Fall,
            PlayerState::Getup,
            PlayerState::RunIdle,
            PlayerState::Idle
        ]
    );
    assert!(!runtime(&world, player).is_blocking());
}

#[test]
fn jump_chain_resolves_into_run_when_forward_is_held() {
    let (mut world, player, mut schedule) = started(GameConfig::new());
    dispatch_key(&mut world, KeyCode::Space, true);
    // pressed mid-air: refused, but remembered as held
    dispatch_key(&mut world, KeyCode::W, true);
    assert_eq!(runtime(&world, player).current(), PlayerState::Jump);

    let seen = run_until(&mut world, &mut schedule, player, |rt| {
        !rt.is_blocking()
    });
    assert_eq!(
        seen,
        vec![
            PlayerState::Jump,
            PlayerState::Fall,
            PlayerState::Getup,
            PlayerState::Run
        ]
    );
    let rt = runtime(&world, player);
    assert_eq!(rt.scroll_speed(), 60.0);
    // the chain's playbacks were all stopped; only Run is tracked
    assert_eq!(world.resource::<Animator>().active_count(), 1);
    assert_eq!(world.resource::<Animator>().observer_count(), 0);
}

#[test]
fn jump_is_refused_while_sliding() {
    let (mut world, player, mut schedule) = started(GameConfig::new());
    dispatch_key(&mut world, KeyCode::S, true);
    assert_eq!(runtime(&world, player).current(), PlayerState::Slide);
    dispatch_key(&mut world, KeyCode::S, false);
    dispatch_key(&mut world, KeyCode::Space, true);
    assert_eq!(runtime(&world, player).current(), PlayerState::Slide);

    let seen = run_until(&mut world, &mut schedule, player, |rt| {
        !rt.is_blocking()
    });
    assert_eq!(seen, vec![PlayerState::Slide, PlayerState::Run]);
}

#[test]
fn lateral_returns_to_centre_after_release() {
    let config = GameConfig::new();
    let range = config.lateral_range;
    let bound = (range / config.return_speed / DT).ceil() as usize;
    let (mut world, player, mut schedule) = started(config);

    dispatch_key(&mut world, KeyCode::A, true);
    assert_eq!(runtime(&world, player).current(), PlayerState::StrafeL);
    for _ in 0..60 {
        tick(&mut world, &mut schedule, DT);
    }
    assert_eq!(world.get::<WorldPosition>(player).unwrap().x, range);

    dispatch_key(&mut world, KeyCode::A, false);
    let mut previous = range;
    let mut frames = 0;
    loop {
        tick(&mut world, &mut schedule, DT);
        frames += 1;
        let x = world.get::<WorldPosition>(player).unwrap().x;
        assert!(x <= previous && x >= 0.0, "x went from {} to {}", previous, x);
        previous = x;
        if x == 0.0 {
            break;
        }
        assert!(frames < bound, "not centred after {} frames", frames);
    }
    assert!(frames <= bound);
}

#[test]
fn hold_release_keeps_lateral_offset() {
    let mut config = GameConfig::new();
    config.release = LateralRelease::Hold;
    let (mut world, player, mut schedule) = started(config);

    dispatch_key(&mut world, KeyCode::D, true);
    for _ in 0..10 {
        tick(&mut world, &mut schedule, DT);
    }
    dispatch_key(&mut world, KeyCode::D, false);
    let x = world.get::<WorldPosition>(player).unwrap().x;
    assert!(x < -0.5);
    for _ in 0..30 {
        tick(&mut world, &mut schedule, DT);
    }
    assert_eq!(world.get::<WorldPosition>(player).unwrap().x, x);
}

#[test]
fn front_ground_segment_is_recycled_behind_the_rearmost() {
    let mut config = GameConfig::new();
    config.ground_segments = 3;
    config.ground_length = 160.0;
    config.base_scroll_speed = 200.0;
    let (mut world, _player, mut schedule) = started(config);
    assert_eq!(ground_zs(&mut world), vec![0.0, -160.0, -320.0]);

    dispatch_key(&mut world, KeyCode::W, true);
    tick(&mut world, &mut schedule, 1.0);

    let zs = ground_zs(&mut world);
    assert_eq!(zs, vec![-280.0, 40.0, -120.0]);
    let mut sorted = zs.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(sorted[1] - sorted[0], 160.0);
    assert_eq!(sorted[2] - sorted[1], 160.0);

    assert!(world.resource::<RunStats>().recycled >= 1);
    assert!(approx_eq(world.resource::<RoadScroll>().offset, 0.25));
}

#[test]
fn ring_stays_inside_its_window_while_running() {
    let (mut world, player, mut schedule) = started(GameConfig::new());
    dispatch_key(&mut world, KeyCode::W, true);
    let movement = runtime(&world, player).scroll_speed() * DT;
    for _ in 0..2000 {
        tick(&mut world, &mut schedule, DT);
        let zs = ground_zs(&mut world);
        assert_eq!(zs.len(), 6);
        let max = zs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(max <= 160.0 + movement + EPSILON, "max z {}", max);
    }
    let offset = world.resource::<RoadScroll>().offset;
    assert!((0.0..1.0).contains(&offset));
}

#[test]
fn empty_building_ring_is_skipped() {
    let mut config = GameConfig::new();
    config.building_segments = 0;
    let (mut world, _player, mut schedule) = started(config);
    assert!(world.resource::<SegmentRings>().buildings.is_empty());

    dispatch_key(&mut world, KeyCode::W, true);
    for _ in 0..120 {
        tick(&mut world, &mut schedule, DT);
    }
    assert!(approx_eq(world.resource::<RunStats>().distance, 120.0));
    let mut variants = world.query::<&BuildingVariant>();
    assert_eq!(variants.iter(&world).count(), 0);
}

#[test]
fn recycled_building_groups_keep_a_valid_variant() {
    let config = GameConfig::new();
    let models = config.building_variants;
    let (mut world, _player, mut schedule) = started(config);
    dispatch_key(&mut world, KeyCode::W, true);
    for _ in 0..600 {
        tick(&mut world, &mut schedule, DT);
    }
    assert!(world.resource::<RunStats>().recycled > 0);
    let mut variants = world.query::<&BuildingVariant>();
    assert_eq!(variants.iter(&world).count(), 5);
    assert!(variants.iter(&world).all(|v| v.model < models));
}

#[test]
fn teardown_stops_animation_and_clears_the_scene() {
    let (mut world, player, _schedule) = started(GameConfig::new());
    dispatch_key(&mut world, KeyCode::Space, true);
    assert_eq!(world.resource::<Animator>().observer_count(), 1);

    game::teardown(&mut world);

    let animator = world.resource::<Animator>();
    assert_eq!(animator.active_count(), 0);
    assert_eq!(animator.observer_count(), 0);
    assert!(world.get_entity(player).is_err());
    let mut segments = world.query::<&Segment>();
    assert_eq!(segments.iter(&world).count(), 0);
    let rings = world.resource::<SegmentRings>();
    assert!(rings.ground.is_empty() && rings.buildings.is_empty());
}
