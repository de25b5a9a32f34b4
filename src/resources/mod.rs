//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `animator` – animation engine boundary and the frame-driven player
//! - `gameconfig` – INI-backed configuration
//! - `input` – held movement keys and key mapping
//! - `rangetable` – per-state frame ranges, loop flags and scroll speeds
//! - `roadscroll` – road texture offset
//! - `runstats` – distance travelled
//! - `segmentrings` – ground and building rings and the recycling step
//! - `skeleton` – named ranges of the loaded character
//! - `worldtime` – simulation time and delta
pub mod animator;
pub mod gameconfig;
pub mod input;
pub mod rangetable;
pub mod roadscroll;
pub mod runstats;
pub mod segmentrings;
pub mod skeleton;
pub mod worldtime;
