//! Road texture offset kept in lock-step with the ground ring.
use bevy_ecs::prelude::Resource;

/// Scroll offset of the road's lane-marking texture, in texture repeats.
///
/// Always in `[0, 1)`. One full repeat corresponds to `repeat_length` world
/// units, the ground tile length, so the markings stay aligned with the
/// geometry while tiles are recycled underneath them.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct RoadScroll {
    pub offset: f32,
    pub repeat_length: f32,
}

impl RoadScroll {
    pub fn new(repeat_length: f32) -> Self {
        Self {
            offset: 0.0,
            repeat_length,
        }
    }

    pub fn advance(&mut self, movement: f32) {
        if self.repeat_length <= 0.0 || !movement.is_finite() {
            return;
        }
        let offset = (self.offset + movement / self.repeat_length).rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative inputs
        self.offset = if offset >= 1.0 { 0.0 } else { offset };
    }
}

impl Default for RoadScroll {
    fn default() -> Self {
        Self::new(160.0)
    }
}
