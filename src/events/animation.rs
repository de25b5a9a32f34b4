//! Animation completion events.
//!
//! When a non-looping playback with an attached completion observer reaches
//! its last frame, [`crate::systems::animation::advance_animations`] triggers
//! an [`AnimationCompletedEvent`] for it. The locomotion observer
//! ([`crate::systems::locomotion::animation_completed_observer`]) uses it to
//! move the blocking chains forward.

use bevy_ecs::prelude::*;

use crate::resources::animator::PlaybackHandle;

/// A playback finished.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCompletedEvent {
    /// Entity the range was played on.
    pub target: Entity,
    pub handle: PlaybackHandle,
}
