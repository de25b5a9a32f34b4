//! Animation range table.
//!
//! Maps every [`PlayerState`] to the frame range the character plays for it,
//! whether that range loops, and the world-scroll speed active while it
//! plays. The table is built once at startup from the configured base scroll
//! speed and never mutated afterwards.
//!
//! Lookups go through [`AnimationRangeTable::range_for`], which lets a
//! skeleton's named ranges override the frame bounds while the loop flag and
//! scroll speed always come from the table.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::components::locomotion::PlayerState;
use crate::resources::skeleton::Skeleton;

/// One row of the range table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationRangeConfig {
    pub start: f32,
    pub end: f32,
    #[serde(rename = "loop")]
    pub looped: bool,
    /// World-scroll speed in units/second; 0 for stationary states.
    pub scroll: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct AnimationRangeTable {
    pub base_scroll_speed: f32,
    entries: FxHashMap<PlayerState, AnimationRangeConfig>,
}

impl Default for AnimationRangeTable {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl AnimationRangeTable {
    /// Build the stock table for a character authored at 60 fps.
    pub fn new(base_scroll_speed: f32) -> Self {
        let run = base_scroll_speed;
        let rows = [
            (PlayerState::Idle, 0.0, 59.0, true, 0.0),
            (PlayerState::Run, 60.0, 83.0, true, run),
            (PlayerState::StrafeL, 84.0, 107.0, true, run),
            (PlayerState::StrafeR, 108.0, 131.0, true, run),
            (PlayerState::Slide, 132.0, 171.0, false, run),
            (PlayerState::Jump, 172.0, 195.0, false, run),
            (PlayerState::Fall, 196.0, 215.0, false, run),
            (PlayerState::Getup, 216.0, 251.0, false, run * 0.5),
            (PlayerState::RunIdle, 252.0, 281.0, false, 0.0),
        ];
        let mut entries = FxHashMap::default();
        for (state, start, end, looped, scroll) in rows {
            entries.insert(
                state,
                AnimationRangeConfig {
                    start,
                    end,
                    looped,
                    scroll,
                },
            );
        }
        Self {
            base_scroll_speed,
            entries,
        }
    }

    /// An empty table. Every lookup misses; used to exercise the no-op path.
    pub fn empty(base_scroll_speed: f32) -> Self {
        Self {
            base_scroll_speed,
            entries: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, state: PlayerState, config: AnimationRangeConfig) {
        self.entries.insert(state, config);
    }

    /// Static row for `state`, ignoring any skeleton.
    pub fn get(&self, state: PlayerState) -> Option<AnimationRangeConfig> {
        self.entries.get(&state).copied()
    }

    /// Effective range for `state`.
    ///
    /// A named range on the skeleton replaces `start`/`end`; `looped` and
    /// `scroll` always come from the table.
    pub fn range_for(
        &self,
        state: PlayerState,
        skeleton: Option<&Skeleton>,
    ) -> Option<AnimationRangeConfig> {
        let mut config = self.get(state)?;
        if let Some(named) = skeleton.and_then(|s| s.named_range(state.range_name())) {
            config.start = named.from;
            config.end = named.to;
        }
        Some(config)
    }

    /// Effective table with skeleton overrides applied, keyed by range name.
    pub fn resolved(&self, skeleton: Option<&Skeleton>) -> Vec<(&'static str, AnimationRangeConfig)> {
        PlayerState::ALL
            .iter()
            .filter_map(|state| {
                self.range_for(*state, skeleton)
                    .map(|config| (state.range_name(), config))
            })
            .collect()
    }
}
