//! ECS components for entities.
//!
//! This module groups all component types attached to the runner and to the
//! world's segment anchors.
//!
//! Submodules overview:
//! - [`lateral`] – strafe target and rate-limited sideways motion
//! - [`locomotion`] – player states and the locomotion state machine
//! - [`segment`] – ground/building anchor tags and building variants
//! - [`worldposition`] – 3D position written to the engine's scene nodes

pub mod lateral;
pub mod locomotion;
pub mod segment;
pub mod worldposition;
