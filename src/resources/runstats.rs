use bevy_ecs::prelude::Resource;

/// Distance the world has scrolled past the runner since the scene started.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub distance: f32,
    /// Segments teleported to the back of their ring.
    pub recycled: u64,
}
