//! Event types exchanged between systems.
//!
//! Events decouple the host's key polling and the animation engine from the
//! locomotion state machine: both sides trigger events, observers in
//! [`crate::systems::locomotion`] apply them.
//!
//! Submodules:
//! - [`animation`] – playback completion notifications
//! - [`input`] – logical key press/release events
pub mod animation;
pub mod input;
