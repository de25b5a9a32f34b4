//! Game configuration resource.
//!
//! Manages runner settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 60
//!
//! [runner]
//! base_scroll_speed = 60
//! lateral_range = 3
//! strafe_speed = 6
//! return_speed = 6
//! release = recenter
//! animation_fps = 60
//! blend = true
//!
//! [world]
//! ground_segments = 6
//! ground_length = 160
//! building_segments = 5
//! building_depth = 120
//! building_overlap = 2
//! building_variants = 4
//!
//! [character]
//! ranges = ./assets/character_ranges.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::components::lateral::{LateralRelease, LateralSettings};

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_BASE_SCROLL_SPEED: f32 = 60.0;
const DEFAULT_LATERAL_RANGE: f32 = 3.0;
const DEFAULT_STRAFE_SPEED: f32 = 6.0;
const DEFAULT_RETURN_SPEED: f32 = 6.0;
const DEFAULT_ANIMATION_FPS: f32 = 60.0;
const DEFAULT_BLEND: bool = true;
const DEFAULT_GROUND_SEGMENTS: usize = 6;
const DEFAULT_GROUND_LENGTH: f32 = 160.0;
const DEFAULT_BUILDING_SEGMENTS: usize = 5;
const DEFAULT_BUILDING_DEPTH: f32 = 120.0;
const DEFAULT_BUILDING_OVERLAP: f32 = 2.0;
const DEFAULT_BUILDING_VARIANTS: usize = 4;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// Stores window settings, runner tuning, and the layout of the segment
/// rings.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// World-scroll speed (units/second) while running.
    pub base_scroll_speed: f32,
    /// Maximum sideways offset from the road centre.
    pub lateral_range: f32,
    /// Lateral speed while a strafe key is held.
    pub strafe_speed: f32,
    /// Lateral speed while returning to the centre.
    pub return_speed: f32,
    /// What the lateral target does when no strafe key is held.
    pub release: LateralRelease,
    /// Playback rate of the character animation, in frames per second.
    pub animation_fps: f32,
    /// Ask the animation engine to blend into each new range.
    pub blend: bool,
    /// Number of ground tiles in the ground ring.
    pub ground_segments: usize,
    /// Length of one ground tile; also the ground ring spacing.
    pub ground_length: f32,
    /// Number of building groups in the building ring.
    pub building_segments: usize,
    /// Measured bounding-box depth of one building group.
    pub building_depth: f32,
    /// Overlap subtracted from the building depth to hide seams.
    pub building_overlap: f32,
    /// Number of building models a group can be dressed with.
    pub building_variants: usize,
    /// JSON file with the character's named animation ranges.
    pub character_ranges: Option<PathBuf>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            base_scroll_speed: DEFAULT_BASE_SCROLL_SPEED,
            lateral_range: DEFAULT_LATERAL_RANGE,
            strafe_speed: DEFAULT_STRAFE_SPEED,
            return_speed: DEFAULT_RETURN_SPEED,
            release: LateralRelease::Recenter,
            animation_fps: DEFAULT_ANIMATION_FPS,
            blend: DEFAULT_BLEND,
            ground_segments: DEFAULT_GROUND_SEGMENTS,
            ground_length: DEFAULT_GROUND_LENGTH,
            building_segments: DEFAULT_BUILDING_SEGMENTS,
            building_depth: DEFAULT_BUILDING_DEPTH,
            building_overlap: DEFAULT_BUILDING_OVERLAP,
            building_variants: DEFAULT_BUILDING_VARIANTS,
            character_ranges: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config)?;

        info!(
            "Loaded config: {}x{} window, fps={}, scroll={}, lateral={}, ground {}x{}, buildings {}x{}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.base_scroll_speed,
            self.lateral_range,
            self.ground_segments,
            self.ground_length,
            self.building_segments,
            self.building_spacing()
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config)
    }

    fn apply_ini(&mut self, config: &Ini) -> Result<(), String> {
        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        // [runner] section
        let float = |section: &str, key: &str| {
            config
                .getfloat(section, key)
                .ok()
                .flatten()
                .map(|v| v as f32)
        };
        if let Some(speed) = float("runner", "base_scroll_speed") {
            self.base_scroll_speed = speed;
        }
        if let Some(range) = float("runner", "lateral_range") {
            self.lateral_range = range.abs();
        }
        if let Some(speed) = float("runner", "strafe_speed") {
            self.strafe_speed = speed.abs();
        }
        if let Some(speed) = float("runner", "return_speed") {
            self.return_speed = speed.abs();
        }
        if let Some(release) = config.get("runner", "release") {
            self.release = release.parse()?;
        }
        if let Some(fps) = float("runner", "animation_fps") {
            if fps.is_finite() && fps > 0.0 {
                self.animation_fps = fps;
            } else {
                warn!("Ignoring animation_fps = {}; it must be positive", fps);
            }
        }
        if let Some(blend) = config.getbool("runner", "blend").ok().flatten() {
            self.blend = blend;
        }

        // [world] section
        if let Some(count) = config.getuint("world", "ground_segments").ok().flatten() {
            self.ground_segments = count as usize;
        }
        if let Some(length) = float("world", "ground_length") {
            self.ground_length = length;
        }
        if let Some(count) = config.getuint("world", "building_segments").ok().flatten() {
            self.building_segments = count as usize;
        }
        if let Some(depth) = float("world", "building_depth") {
            self.building_depth = depth;
        }
        if let Some(overlap) = float("world", "building_overlap") {
            self.building_overlap = overlap;
        }
        if let Some(variants) = config.getuint("world", "building_variants").ok().flatten() {
            self.building_variants = variants as usize;
        }

        // [character] section
        if let Some(path) = config.get("character", "ranges") {
            let path = path.trim();
            self.character_ranges = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        // [runner] section
        config.set(
            "runner",
            "base_scroll_speed",
            Some(self.base_scroll_speed.to_string()),
        );
        config.set("runner", "lateral_range", Some(self.lateral_range.to_string()));
        config.set("runner", "strafe_speed", Some(self.strafe_speed.to_string()));
        config.set("runner", "return_speed", Some(self.return_speed.to_string()));
        config.set("runner", "release", Some(self.release.as_str().to_string()));
        config.set("runner", "animation_fps", Some(self.animation_fps.to_string()));
        config.set("runner", "blend", Some(self.blend.to_string()));

        // [world] section
        config.set(
            "world",
            "ground_segments",
            Some(self.ground_segments.to_string()),
        );
        config.set("world", "ground_length", Some(self.ground_length.to_string()));
        config.set(
            "world",
            "building_segments",
            Some(self.building_segments.to_string()),
        );
        config.set("world", "building_depth", Some(self.building_depth.to_string()));
        config.set(
            "world",
            "building_overlap",
            Some(self.building_overlap.to_string()),
        );
        config.set(
            "world",
            "building_variants",
            Some(self.building_variants.to_string()),
        );

        // [character] section
        if let Some(path) = &self.character_ranges {
            config.set("character", "ranges", Some(path.display().to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Spacing of the building ring: measured depth minus the seam overlap.
    pub fn building_spacing(&self) -> f32 {
        building_spacing(0.0, self.building_depth, self.building_overlap)
    }

    /// Lateral controller tuning derived from the runner section.
    pub fn lateral_settings(&self) -> LateralSettings {
        LateralSettings {
            range: self.lateral_range,
            strafe_speed: self.strafe_speed,
            return_speed: self.return_speed,
            release: self.release,
        }
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// Ring spacing for a segment whose bounding box spans `min_z..max_z`.
///
/// Adjacent groups are pulled together by `overlap` so no gap shows between
/// them. Never returns less than zero.
pub fn building_spacing(min_z: f32, max_z: f32, overlap: f32) -> f32 {
    ((max_z - min_z).abs() - overlap).max(0.0)
}
