//! Runner systems.
//!
//! This module groups all ECS systems and observers that advance the
//! simulation, plus the host-side input and rendering passes.
//!
//! Submodules overview
//! - [`animation`] – advance animation playback and report completions
//! - [`input`] – turn physical key edges into [`crate::events::input::InputEvent`]s
//! - [`lateral`] – smooth the runner's sideways offset toward its target
//! - [`locomotion`] – input/completion observers, character attach, idle latch
//! - `render` – draw the scene using Raylib (window builds only)
//! - [`scroll`] – move and recycle the segment rings
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod input;
pub mod lateral;
pub mod locomotion;
#[cfg(feature = "window")]
pub mod render;
pub mod scroll;
pub mod time;
