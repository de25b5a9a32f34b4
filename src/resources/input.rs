//! Held-key input resource and key mapping.
//!
//! [`InputState`] captures which movement keys are currently held. It is
//! mutated only through [`InputState::apply`], which the locomotion input
//! observer calls for every [`InputEvent`](crate::events::input::InputEvent);
//! every other system reads it.
//!
//! [`KeyCode`] names the physical keys the runner listens to and [`map_key`]
//! turns a key into the logical [`InputAction`]. Defaults use WASD for
//! movement, arrow keys as an alternate set, and Space for jump.
use bevy_ecs::prelude::*;

use crate::events::input::InputAction;

/// Physical keys the runner listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowLeft,
    ArrowDown,
    ArrowRight,
    Space,
}

impl KeyCode {
    /// Every key with a default binding, in polling order.
    pub const ALL: [KeyCode; 9] = [
        KeyCode::W,
        KeyCode::A,
        KeyCode::S,
        KeyCode::D,
        KeyCode::ArrowUp,
        KeyCode::ArrowLeft,
        KeyCode::ArrowDown,
        KeyCode::ArrowRight,
        KeyCode::Space,
    ];
}

/// Map a physical key to the logical action it drives.
pub fn map_key(key: KeyCode) -> InputAction {
    match key {
        KeyCode::W | KeyCode::ArrowUp => InputAction::Forward,
        KeyCode::A | KeyCode::ArrowLeft => InputAction::Left,
        KeyCode::D | KeyCode::ArrowRight => InputAction::Right,
        KeyCode::S | KeyCode::ArrowDown => InputAction::Slide,
        KeyCode::Space => InputAction::Jump,
    }
}

/// Currently held movement keys.
///
/// `jump` is tracked only so a key-repeat of Space is not mistaken for a new
/// jump press; the state machine never reads it.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub left: bool,
    pub right: bool,
    pub slide: bool,
    pub jump: bool,
}

impl InputState {
    /// Record a press or release.
    ///
    /// Returns `true` when the held state actually changed, `false` for
    /// auto-repeat presses and releases of keys that were not down.
    pub fn apply(&mut self, action: InputAction, pressed: bool) -> bool {
        let slot = match action {
            InputAction::Forward => &mut self.forward,
            InputAction::Left => &mut self.left,
            InputAction::Right => &mut self.right,
            InputAction::Slide => &mut self.slide,
            InputAction::Jump => &mut self.jump,
        };
        if *slot == pressed {
            return false;
        }
        *slot = pressed;
        true
    }

    /// Exactly one of left/right is held.
    pub fn strafe_only(&self) -> Option<InputAction> {
        match (self.left, self.right) {
            (true, false) => Some(InputAction::Left),
            (false, true) => Some(InputAction::Right),
            _ => None,
        }
    }
}
