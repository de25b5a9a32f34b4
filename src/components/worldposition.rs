use bevy_ecs::prelude::Component;

/// Local position of a scene node, in world units.
///
/// The camera looks down -z, so larger z is closer to the camera. Systems
/// write here; the host copies it to the engine's node transform.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}
