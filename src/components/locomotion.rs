//! Player locomotion state machine.
//!
//! [`PlayerRuntime`] owns the runner's current [`PlayerState`], whether a
//! blocking action is in flight and the world-scroll speed implied by the
//! state. It decides transitions from held input and from completions of
//! non-looping animations, and issues playback commands through an
//! [`AnimationBackend`].
//!
//! # Transition policy
//!
//! Outside a blocking action, [`PlayerRuntime::evaluate_movement`] picks the
//! first match of:
//!
//! 1. slide held: `Slide`
//! 2. exactly one of left/right held: `StrafeL` / `StrafeR`
//! 3. forward held: `Run`
//! 4. otherwise the idle transition (`RunIdle` once, then `Idle`)
//!
//! `Jump` is a separate edge trigger. It chains `Jump -> Fall -> Getup` through
//! completions and re-evaluates held input when `Getup` ends.
//!
//! # Blocking
//!
//! `Slide`, `Jump`, `Fall` and `Getup` are blocking. While one is playing every
//! unforced [`PlayerRuntime::set_state`] is refused; only the chain's own
//! completion handling (which forces) moves the machine on.
//!
//! # Missing character
//!
//! Until a [`CharacterRig`] is attached, transitions only record the new
//! current state. Nothing is played and nothing blocks.

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use log::debug;

use crate::events::input::InputAction;
use crate::resources::animator::{
    AnimationBackend, CompletionObserver, PlayRequest, PlaybackHandle,
};
use crate::resources::input::InputState;
use crate::resources::rangetable::AnimationRangeTable;
use crate::resources::skeleton::Skeleton;

/// Logical locomotion state of the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Run,
    StrafeL,
    StrafeR,
    Slide,
    Jump,
    Fall,
    Getup,
    RunIdle,
}

impl PlayerState {
    pub const ALL: [PlayerState; 9] = [
        PlayerState::Idle,
        PlayerState::Run,
        PlayerState::StrafeL,
        PlayerState::StrafeR,
        PlayerState::Slide,
        PlayerState::Jump,
        PlayerState::Fall,
        PlayerState::Getup,
        PlayerState::RunIdle,
    ];

    /// Name of the skeleton range that may override this state's frames.
    pub fn range_name(&self) -> &'static str {
        match self {
            PlayerState::Idle => "Idle",
            PlayerState::Run => "Run",
            PlayerState::StrafeL => "Strafe_L",
            PlayerState::StrafeR => "Strafe_R",
            PlayerState::Slide => "Slide",
            PlayerState::Jump => "Jump",
            PlayerState::Fall => "Fall",
            PlayerState::Getup => "Getup",
            PlayerState::RunIdle => "Run_Idle",
        }
    }

    /// Must run to completion before other transitions are accepted.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            PlayerState::Slide | PlayerState::Jump | PlayerState::Fall | PlayerState::Getup
        )
    }
}

/// The loaded character: the entity its animations play on and its skeleton.
#[derive(Debug, Clone)]
pub struct CharacterRig {
    pub root: Entity,
    pub skeleton: Skeleton,
}

/// Marks a player whose character asset has not been attached yet.
///
/// Removed by [`crate::systems::locomotion::load_pending_character`] once the
/// rig is in place.
#[derive(Component, Debug, Clone, Default)]
pub struct PendingCharacter {
    /// JSON file with the skeleton's named ranges. `None` uses the static table.
    pub ranges: Option<PathBuf>,
}

/// Everything a transition needs besides the runtime itself.
pub struct LocomotionContext<'a> {
    pub table: &'a AnimationRangeTable,
    pub backend: &'a mut dyn AnimationBackend,
    /// Ask the backend to blend from the previous pose.
    pub blend: bool,
}

/// Locomotion state of the player entity.
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerRuntime {
    current: PlayerState,
    blocking: bool,
    scroll_speed: f32,
    idle_initialized: bool,
    rig: Option<CharacterRig>,
    playback: Option<PlaybackHandle>,
    observer: Option<CompletionObserver>,
}

impl PlayerRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PlayerState {
        self.current
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// World-scroll speed of the current state, units/second.
    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    pub fn idle_initialized(&self) -> bool {
        self.idle_initialized
    }

    pub fn rig(&self) -> Option<&CharacterRig> {
        self.rig.as_ref()
    }

    pub fn playback(&self) -> Option<PlaybackHandle> {
        self.playback
    }

    pub fn observer(&self) -> Option<CompletionObserver> {
        self.observer
    }

    /// Attach the character once its asset is available.
    pub fn attach_character(&mut self, rig: CharacterRig) {
        self.rig = Some(rig);
    }

    /// Request a transition to `next`.
    ///
    /// Returns `false` when the request was refused (blocking action in
    /// flight and not forced) or skipped (no table row for `next`).
    pub fn set_state(
        &mut self,
        next: PlayerState,
        force: bool,
        ctx: &mut LocomotionContext<'_>,
    ) -> bool {
        if self.blocking && !force {
            debug!("{:?} refused: {:?} is blocking", next, self.current);
            return false;
        }
        let skeleton = self.rig.as_ref().map(|rig| &rig.skeleton);
        let Some(range) = ctx.table.range_for(next, skeleton) else {
            debug!("no animation range for {:?}", next);
            return false;
        };
        let Some(root) = self.rig.as_ref().map(|rig| rig.root) else {
            self.current = next;
            return true;
        };

        if !force && next == self.current && range.looped && self.playback.is_some() {
            self.scroll_speed = range.scroll;
            return true;
        }

        self.stop_current_animation(ctx.backend);
        let handle = ctx.backend.play_range(
            root,
            PlayRequest {
                from: range.start,
                to: range.end,
                looped: range.looped,
                speed_ratio: 1.0,
                blend: ctx.blend,
            },
        );
        self.playback = Some(handle);
        if !range.looped {
            self.observer = ctx.backend.observe_completion(handle);
        }
        self.scroll_speed = range.scroll;
        self.blocking = next.is_blocking();
        debug!("{:?} -> {:?}", self.current, next);
        self.current = next;
        true
    }

    /// Pick the next state from held input.
    pub fn evaluate_movement(&mut self, input: &InputState, ctx: &mut LocomotionContext<'_>) {
        let forward = input.forward || self.blocking;
        if input.slide {
            self.set_state(PlayerState::Slide, false, ctx);
            return;
        }
        match input.strafe_only() {
            Some(InputAction::Left) => {
                self.set_state(PlayerState::StrafeL, false, ctx);
            }
            Some(InputAction::Right) => {
                self.set_state(PlayerState::StrafeR, false, ctx);
            }
            _ if forward => {
                self.set_state(PlayerState::Run, false, ctx);
            }
            _ => self.transition_to_idle(ctx),
        }
    }

    /// Wind down to `Idle`, through `RunIdle` unless already idle.
    pub fn transition_to_idle(&mut self, ctx: &mut LocomotionContext<'_>) {
        match self.current {
            PlayerState::Idle => {
                self.set_state(PlayerState::Idle, false, ctx);
            }
            PlayerState::RunIdle => {}
            _ => {
                self.set_state(PlayerState::RunIdle, false, ctx);
            }
        }
    }

    /// Start the jump chain. Refused while another blocking action plays.
    pub fn trigger_jump(&mut self, ctx: &mut LocomotionContext<'_>) -> bool {
        self.set_state(PlayerState::Jump, false, ctx)
    }

    /// React to the completion of a non-looping playback.
    ///
    /// Completions of anything but the current playback are stale and ignored.
    pub fn on_animation_complete(
        &mut self,
        handle: PlaybackHandle,
        input: &InputState,
        ctx: &mut LocomotionContext<'_>,
    ) {
        if self.playback != Some(handle) {
            debug!("stale completion {:?} ignored", handle);
            return;
        }
        // the backend consumed the observer when it reported completion
        self.observer = None;
        match self.current {
            PlayerState::Slide => {
                self.blocking = false;
                self.set_state(PlayerState::Run, true, ctx);
            }
            PlayerState::Jump => {
                self.set_state(PlayerState::Fall, true, ctx);
            }
            PlayerState::Fall => {
                self.set_state(PlayerState::Getup, true, ctx);
            }
            PlayerState::Getup => {
                self.blocking = false;
                self.evaluate_movement(input, ctx);
            }
            PlayerState::RunIdle => {
                self.set_state(PlayerState::Idle, true, ctx);
            }
            _ => {}
        }
    }

    /// Start `Idle` the first time a character is available.
    ///
    /// A playback that is already running is left alone; only the latch is
    /// set. Returns `true` on the call that started `Idle`.
    pub fn ensure_idle_started(&mut self, ctx: &mut LocomotionContext<'_>) -> bool {
        if self.idle_initialized || self.rig.is_none() {
            return false;
        }
        self.idle_initialized = true;
        if self.playback.is_some() {
            return false;
        }
        self.set_state(PlayerState::Idle, true, ctx)
    }

    /// Stop the in-flight playback and detach its observer. Safe to repeat.
    pub fn stop_current_animation(&mut self, backend: &mut dyn AnimationBackend) {
        if let Some(observer) = self.observer.take() {
            backend.remove_completion_observer(observer);
        }
        if let Some(handle) = self.playback.take() {
            backend.stop(handle);
        }
    }

    /// Release the character at scene end.
    pub fn teardown(&mut self, backend: &mut dyn AnimationBackend) {
        self.stop_current_animation(backend);
        self.rig = None;
        self.blocking = false;
        self.scroll_speed = 0.0;
        self.idle_initialized = false;
        self.current = PlayerState::Idle;
    }
}
