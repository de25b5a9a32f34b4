//! Locomotion systems and observers.
//!
//! Primary state selection is edge-driven: [`input_observer`] re-evaluates
//! the state machine on every press and release, and
//! [`animation_completed_observer`] advances the blocking chains. The
//! per-frame systems only attach the character once it is available
//! ([`load_pending_character`]) and start `Idle` in the same frame
//! ([`idle_latch_system`]).

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::locomotion::{
    CharacterRig, LocomotionContext, PendingCharacter, PlayerRuntime,
};
use crate::events::animation::AnimationCompletedEvent;
use crate::events::input::{InputAction, InputEvent};
use crate::resources::animator::Animator;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::rangetable::AnimationRangeTable;
use crate::resources::skeleton::Skeleton;

/// Apply a key press/release to [`InputState`] and the state machine.
///
/// Auto-repeat presses are dropped. A Jump press triggers the jump chain;
/// every other change re-evaluates movement from the held keys.
pub fn input_observer(
    trigger: On<InputEvent>,
    mut input: ResMut<InputState>,
    mut players: Query<&mut PlayerRuntime>,
    table: Res<AnimationRangeTable>,
    mut animator: ResMut<Animator>,
    config: Res<GameConfig>,
) {
    let event = trigger.event();
    if !input.apply(event.action, event.pressed) {
        return;
    }
    let Ok(mut runtime) = players.single_mut() else {
        return;
    };
    let mut ctx = LocomotionContext {
        table: &table,
        backend: &mut *animator,
        blend: config.blend,
    };
    if event.action == InputAction::Jump {
        if event.pressed && !runtime.trigger_jump(&mut ctx) {
            debug!("jump ignored in {:?}", runtime.current());
        }
        return;
    }
    runtime.evaluate_movement(&input, &mut ctx);
}

/// Hand a finished playback back to the player it was played on.
pub fn animation_completed_observer(
    trigger: On<AnimationCompletedEvent>,
    input: Res<InputState>,
    mut players: Query<&mut PlayerRuntime>,
    table: Res<AnimationRangeTable>,
    mut animator: ResMut<Animator>,
    config: Res<GameConfig>,
) {
    let event = trigger.event();
    let Ok(mut runtime) = players.get_mut(event.target) else {
        debug!("completion {:?} for unknown {:?}", event.handle, event.target);
        return;
    };
    let mut ctx = LocomotionContext {
        table: &table,
        backend: &mut *animator,
        blend: config.blend,
    };
    runtime.on_animation_complete(event.handle, &input, &mut ctx);
}

/// Start `Idle` once per attached character, then apply keys already held.
///
/// Runs right after [`load_pending_character`], so no input can reach an
/// attached rig before the latch.
pub fn idle_latch_system(
    input: Res<InputState>,
    mut players: Query<&mut PlayerRuntime>,
    table: Res<AnimationRangeTable>,
    mut animator: ResMut<Animator>,
    config: Res<GameConfig>,
) {
    for mut runtime in players.iter_mut() {
        if runtime.idle_initialized() || runtime.rig().is_none() {
            continue;
        }
        let mut ctx = LocomotionContext {
            table: &table,
            backend: &mut *animator,
            blend: config.blend,
        };
        if runtime.ensure_idle_started(&mut ctx) {
            runtime.evaluate_movement(&input, &mut ctx);
        }
    }
}

/// Attach the character rig to players still waiting for it.
///
/// A missing or malformed ranges file degrades to an empty skeleton, which
/// leaves the static range table in charge.
pub fn load_pending_character(
    mut commands: Commands,
    mut players: Query<(Entity, &PendingCharacter, &mut PlayerRuntime)>,
) {
    for (entity, pending, mut runtime) in players.iter_mut() {
        let skeleton = match &pending.ranges {
            Some(path) => Skeleton::load_json(path).unwrap_or_else(|e| {
                warn!("{}; using built-in animation ranges", e);
                Skeleton::new()
            }),
            None => Skeleton::new(),
        };
        info!(
            "Character attached to {:?} with {} named ranges",
            entity,
            skeleton.ranges.len()
        );
        runtime.attach_character(CharacterRig {
            root: entity,
            skeleton,
        });
        commands.entity(entity).remove::<PendingCharacter>();
    }
}
