//! Per-tick ball integration and rest detection
//!
//! Order within a tick is fixed: wind, gravity, friction, then position.
//! Rest is contact-gated: a ball only comes to rest while supported by the
//! floor or the top of a hazard. Gravity makes every unsupported low-speed
//! state transient (an apex), so there is no open-air rest threshold.

use glam::Vec2;

use super::state::Ball;
use crate::both_axes_below;
use crate::settings::PhysicsConfig;

/// Forces acting on the ball for the lifetime of one hole load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceModel {
    pub gravity: f32,
    /// Velocity scale per tick, strictly below 1
    pub friction: f32,
    pub wind: Vec2,
    pub wind_scale: f32,
}

impl ForceModel {
    pub fn new(config: &PhysicsConfig, wind: Vec2) -> Self {
        Self {
            gravity: config.gravity,
            friction: config.friction.min(0.999),
            wind: wind.clamp(Vec2::splat(-config.max_wind), Vec2::splat(config.max_wind)),
            wind_scale: config.wind_scale,
        }
    }

    /// Velocity added by wind each tick
    #[inline]
    pub fn wind_accel(&self) -> Vec2 {
        self.wind * self.wind_scale
    }
}

/// Advance the ball by one tick (explicit Euler)
pub fn integrate(ball: &mut Ball, forces: &ForceModel) {
    ball.vel += forces.wind_accel();
    ball.vel.y += forces.gravity;
    ball.vel *= forces.friction;
    ball.pos += ball.vel;
}

/// Zero the velocity and return true if a supported ball is slow enough to stop
pub fn settle(ball: &mut Ball, supported: bool, rest_epsilon: f32) -> bool {
    if supported && both_axes_below(ball.vel, rest_epsilon) {
        ball.vel = Vec2::ZERO;
        return true;
    }
    false
}
