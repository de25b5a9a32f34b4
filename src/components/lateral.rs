//! Lateral (strafe) motion.
//!
//! The runner never steers freely: holding left or right pulls its x toward
//! one edge of the road, releasing both lets it drift back. [`LateralState`]
//! stores the current pull target; [`step_toward`] performs the rate-limited
//! move so the character slides sideways instead of snapping.
//!
//! Convention: left pulls toward `+range`, right toward `-range`.

use std::str::FromStr;

use bevy_ecs::prelude::Component;

use crate::events::input::InputAction;
use crate::resources::input::InputState;

/// Remaining distance under which the position snaps onto its target.
pub const SNAP_EPSILON: f32 = 0.01;

/// What the lateral target does when no strafe key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LateralRelease {
    /// Return to the road centre at the return speed.
    #[default]
    Recenter,
    /// Stay wherever the runner currently is.
    Hold,
}

impl LateralRelease {
    pub fn as_str(&self) -> &'static str {
        match self {
            LateralRelease::Recenter => "recenter",
            LateralRelease::Hold => "hold",
        }
    }
}

impl FromStr for LateralRelease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recenter" | "center" => Ok(LateralRelease::Recenter),
            "hold" => Ok(LateralRelease::Hold),
            other => Err(format!("Unknown lateral release mode '{}'", other)),
        }
    }
}

/// Tuning for the lateral controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralSettings {
    /// Half-width of the strafe band.
    pub range: f32,
    pub strafe_speed: f32,
    pub return_speed: f32,
    pub release: LateralRelease,
}

impl Default for LateralSettings {
    fn default() -> Self {
        Self {
            range: 3.0,
            strafe_speed: 6.0,
            return_speed: 6.0,
            release: LateralRelease::Recenter,
        }
    }
}

/// Desired sideways offset of the runner.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct LateralState {
    pub target: f32,
}

impl LateralState {
    /// Target implied by the held keys, clamped to the strafe band.
    pub fn target_for(input: &InputState, current_x: f32, settings: &LateralSettings) -> f32 {
        let range = settings.range.abs();
        let target = match input.strafe_only() {
            Some(InputAction::Left) => range,
            Some(InputAction::Right) => -range,
            _ => match settings.release {
                LateralRelease::Recenter => 0.0,
                LateralRelease::Hold => current_x,
            },
        };
        target.clamp(-range, range)
    }

    /// Refresh the target from input and return the runner's next x.
    pub fn update(
        &mut self,
        input: &InputState,
        current_x: f32,
        dt: f32,
        settings: &LateralSettings,
    ) -> f32 {
        self.target = Self::target_for(input, current_x, settings);
        let speed = if self.target == 0.0 {
            settings.return_speed
        } else {
            settings.strafe_speed
        };
        step_toward(current_x, self.target, speed, dt, settings.range)
    }
}

/// Move `current` toward `target` by at most `speed * dt`, clamped to `±range`.
///
/// Snaps onto the target once less than [`SNAP_EPSILON`] remains, so the
/// approach always terminates.
pub fn step_toward(current: f32, target: f32, speed: f32, dt: f32, range: f32) -> f32 {
    let range = range.abs();
    let distance = target - current;
    let next = if distance.abs() < SNAP_EPSILON {
        target
    } else {
        let max_step = speed.abs() * dt.max(0.0);
        let next = current + distance.signum() * distance.abs().min(max_step);
        if (target - next).abs() < SNAP_EPSILON {
            target
        } else {
            next
        }
    };
    next.clamp(-range, range)
}
