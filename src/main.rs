//! Runway main entry point.
//!
//! An endless runner built on:
//! - **raylib** for windowing, input and drawing
//! - **bevy_ecs** for entity-component-system architecture
//!
//! The runner stays in place while ground tiles and building groups scroll
//! past and are recycled behind the horizon.
//!
//! # Main Loop
//!
//! 1. Parse the command line, load `config.ini`
//! 2. Open the window, build the ECS world, spawn the scene
//! 3. Each frame: update time, dispatch key edges, run the frame schedule,
//!    draw
//! 4. Tear the scene down on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features window
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;

use runway::game;
use runway::resources::gameconfig::GameConfig;
use runway::resources::rangetable::AnimationRangeTable;
use runway::resources::skeleton::Skeleton;
use runway::resources::worldtime::WorldTime;
use runway::systems::input::poll_keyboard;
use runway::systems::render::render_frame;
use runway::systems::time::update_world_time;

/// Runway, an endless runner
#[derive(Parser)]
#[command(version, about = "Endless runner on bevy_ecs and raylib")]
struct Cli {
    /// Configuration file to load.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Write the effective configuration and exit.
    /// Optionally provide a path (default: the --config path).
    #[arg(long, value_name = "PATH")]
    write_config: Option<Option<PathBuf>>,

    /// Print the effective animation range table as JSON and exit.
    #[arg(long)]
    dump_ranges: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }

    // Early-exit: write the configuration and quit before the window opens
    if let Some(maybe_path) = cli.write_config {
        if let Some(path) = maybe_path {
            config.config_path = path;
        }
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", config.config_path.display());
        return;
    }

    // Early-exit: dump the range table and quit before the window opens
    if cli.dump_ranges {
        let table = AnimationRangeTable::new(config.base_scroll_speed);
        let skeleton = config.character_ranges.as_ref().and_then(|path| {
            Skeleton::load_json(path)
                .map_err(|e| log::warn!("{}", e))
                .ok()
        });
        match serde_json::to_string_pretty(&table.resolved(skeleton.as_ref())) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing ranges: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    log::info!("Starting Runway");
    // --------------- Raylib window ---------------
    let (window_width, window_height) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(window_width as i32, window_height as i32)
        .resizable()
        .title("Runway")
        .build();
    rl.set_target_fps(config.target_fps);

    // --------------- ECS world + scene ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    game::setup(&mut world, config);
    game::register_observers(&mut world);
    let mut update = game::frame_schedule();

    // --------------- Main loop ---------------
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        update_world_time(&mut world, dt);
        poll_keyboard(&mut world, &rl);

        update.run(&mut world);
        world.clear_trackers();

        render_frame(&mut world, &mut rl, &thread);
    }

    game::teardown(&mut world);
}
