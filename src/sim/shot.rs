//! Shot engine: (power, angle) plus player stats to a launch velocity

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::screen_direction;
use crate::settings::PhysicsConfig;

/// Player input for one stroke
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShotInput {
    /// 0..=100, clamped
    pub power: f32,
    /// Degrees, counter-clockwise from +x (0 = right, 90 = straight up)
    pub angle_degrees: f32,
}

impl ShotInput {
    pub fn new(power: f32, angle_degrees: f32) -> Self {
        Self {
            power,
            angle_degrees,
        }
    }
}

/// Speed multiplier from the power stat (50 -> 1.5x)
#[inline]
pub fn power_multiplier(power_stat: u32) -> f32 {
    1.0 + power_stat as f32 / 100.0
}

/// Total angular spread in degrees. Accuracy at or above 100 shoots straight.
#[inline]
pub fn spread_degrees(accuracy_stat: u32, spread_scale: f32) -> f32 {
    let accuracy = accuracy_stat as f32 / 100.0;
    (1.0 - accuracy).max(0.0) * spread_scale
}

/// Launch speed before spread is applied
#[inline]
pub fn launch_speed(power: f32, power_stat: u32, config: &PhysicsConfig) -> f32 {
    let power = if power.is_finite() { power.clamp(0.0, 100.0) } else { 0.0 };
    power / 100.0 * config.base_shot_speed * power_multiplier(power_stat)
}

/// Initial velocity for a shot. The angle is perturbed uniformly by ±spread/2.
pub fn launch_velocity<R: Rng + ?Sized>(
    input: ShotInput,
    power_stat: u32,
    accuracy_stat: u32,
    config: &PhysicsConfig,
    rng: &mut R,
) -> Vec2 {
    let spread = spread_degrees(accuracy_stat, config.spread_degrees);
    let jitter = (rng.random::<f32>() - 0.5) * spread;
    let angle = (input.angle_degrees + jitter).to_radians();

    screen_direction(angle) * launch_speed(input.power, power_stat, config)
}
