//! Input action events.
//!
//! This module defines [`InputEvent`] which is triggered whenever a bound key
//! is pressed or released. The [`InputAction`] enum lists the logical actions
//! the runner understands.
//!
//! The locomotion observer subscribes to these events; nothing else reads
//! raw keys.

use bevy_ecs::prelude::*;

/// Enumeration of logical input actions.
///
/// These abstract the physical keys into gameplay-meaningful actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Run forward (default: W / Up arrow). Level-triggered.
    Forward,
    /// Strafe left (default: A / Left arrow). Level-triggered.
    Left,
    /// Strafe right (default: D / Right arrow). Level-triggered.
    Right,
    /// Slide (default: S / Down arrow). The press is the trigger.
    Slide,
    /// Jump (default: Space). Edge-triggered.
    Jump,
}

/// Event emitted when an input action is pressed or released.
///
/// The `action` field identifies which logical action occurred, and `pressed`
/// indicates whether it was a press (true) or release (false).
#[derive(Event, Debug, Clone, Copy)]
pub struct InputEvent {
    /// The input action that triggered this event.
    pub action: InputAction,
    /// Whether the action was pressed (true) or released (false).
    pub pressed: bool,
}
