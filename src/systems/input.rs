//! Input dispatch.
//!
//! - [`dispatch_key`] turns one physical key press/release into an
//!   [`InputEvent`] and triggers it on the world. The locomotion observer
//!   does the rest.
//! - `poll_keyboard` (window builds) reads Raylib's key edges each frame and
//!   dispatches them.
use bevy_ecs::prelude::*;

use crate::events::input::InputEvent;
use crate::resources::input::{KeyCode, map_key};

/// Trigger the [`InputEvent`] for a physical key edge.
pub fn dispatch_key(world: &mut World, key: KeyCode, pressed: bool) {
    world.trigger(InputEvent {
        action: map_key(key),
        pressed,
    });
}

/// Poll Raylib for key edges and dispatch them.
///
/// A release is only dispatched when no other key bound to the same action
/// is still down, so letting go of `ArrowUp` while `W` is held keeps running.
#[cfg(feature = "window")]
pub fn poll_keyboard(world: &mut World, rl: &raylib::RaylibHandle) {
    for key in KeyCode::ALL {
        let binding = raylib_key(key);
        if rl.is_key_pressed(binding) {
            dispatch_key(world, key, true);
        }
        if rl.is_key_released(binding) {
            let action = map_key(key);
            let still_held = KeyCode::ALL.iter().any(|other| {
                *other != key && map_key(*other) == action && rl.is_key_down(raylib_key(*other))
            });
            if !still_held {
                dispatch_key(world, key, false);
            }
        }
    }
}

#[cfg(feature = "window")]
fn raylib_key(key: KeyCode) -> raylib::ffi::KeyboardKey {
    use raylib::ffi::KeyboardKey;
    match key {
        KeyCode::W => KeyboardKey::KEY_W,
        KeyCode::A => KeyboardKey::KEY_A,
        KeyCode::S => KeyboardKey::KEY_S,
        KeyCode::D => KeyboardKey::KEY_D,
        KeyCode::ArrowUp => KeyboardKey::KEY_UP,
        KeyCode::ArrowLeft => KeyboardKey::KEY_LEFT,
        KeyCode::ArrowDown => KeyboardKey::KEY_DOWN,
        KeyCode::ArrowRight => KeyboardKey::KEY_RIGHT,
        KeyCode::Space => KeyboardKey::KEY_SPACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::input::InputAction;
    use bevy_ecs::observer::On;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_maps_key_to_action() {
        let mut world = World::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        world.add_observer(move |trigger: On<InputEvent>| {
            let event = trigger.event();
            seen_clone.lock().unwrap().push((event.action, event.pressed));
        });
        world.flush();

        dispatch_key(&mut world, KeyCode::ArrowUp, true);
        dispatch_key(&mut world, KeyCode::Space, true);
        dispatch_key(&mut world, KeyCode::A, false);

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[
                (InputAction::Forward, true),
                (InputAction::Jump, true),
                (InputAction::Left, false)
            ]
        );
    }
}
