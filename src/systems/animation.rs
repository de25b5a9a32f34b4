//! Animation system.
//!
//! [`advance_animations`] moves every playback of the [`Animator`] forward by
//! the frame delta and turns each completion into an
//! [`AnimationCompletedEvent`].
//!
//! # Animation Flow
//!
//! 1. The locomotion state machine starts ranges on the [`Animator`] and
//!    attaches completion observers to non-looping ones
//! 2. `advance_animations` advances playheads from [`WorldTime`]
//! 3. Finished, observed playbacks are triggered as events in handle order
//! 4. [`animation_completed_observer`](crate::systems::locomotion::animation_completed_observer)
//!    hands them back to the state machine, which may start the next range
//!    synchronously
//!
//! # Related
//!
//! - [`crate::resources::animator::Animator`] – playback engine
//! - [`crate::components::locomotion::PlayerRuntime`] – state machine

use bevy_ecs::prelude::*;

use crate::events::animation::AnimationCompletedEvent;
use crate::resources::animator::Animator;
use crate::resources::worldtime::WorldTime;

/// Advance animation playback and report completions.
///
/// Contract
/// - Reads [`WorldTime`] for the frame delta.
/// - Mutates [`Animator`] playheads.
/// - Triggers one [`AnimationCompletedEvent`] per finished, observed playback.
pub fn advance_animations(
    mut animator: ResMut<Animator>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for completion in animator.advance(time.delta) {
        commands.trigger(AnimationCompletedEvent {
            target: completion.target,
            handle: completion.handle,
        });
    }
}
