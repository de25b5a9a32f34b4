//! Lateral smoothing system.
//!
//! Runs every frame, independently of the state machine: strafing only
//! selects the animation, the sideways offset itself comes from here.
use bevy_ecs::prelude::*;

use crate::components::lateral::LateralState;
use crate::components::worldposition::WorldPosition;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

/// Move every laterally-controlled entity toward its target x.
pub fn lateral_system(
    mut query: Query<(&mut LateralState, &mut WorldPosition)>,
    input: Res<InputState>,
    config: Res<GameConfig>,
    time: Res<WorldTime>,
) {
    let settings = config.lateral_settings();
    for (mut lateral, mut position) in query.iter_mut() {
        position.x = lateral.update(&input, position.x, time.delta, &settings);
    }
}
