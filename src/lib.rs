//! Runway library.
//!
//! This module exposes the runner's ECS components, resources, systems, and
//! events for use in integration tests and by the windowed host binary.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
