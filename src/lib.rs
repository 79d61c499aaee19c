//! Mini Golf - a single-player 2D mini-golf simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, shots, hole/round state machine)
//! - `progression`: Scoring labels, XP/leveling, career stats and achievements
//! - `persistence`: Save snapshot with field-by-field restore
//! - `settings`: Data-driven physics, course and progression tuning
//! - `highscores`: Best-rounds board

pub mod highscores;
pub mod persistence;
pub mod progression;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use persistence::SaveData;
pub use progression::{Career, StatKind};
pub use settings::Settings;
pub use sim::{Session, Snapshot};

use glam::Vec2;

/// Game configuration constants (defaults for `Settings`)
pub mod consts {
    /// Course dimensions (screen units, y grows downward)
    pub const COURSE_WIDTH: f32 = 800.0;
    pub const COURSE_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Sink capture radius
    pub const SINK_RADIUS: f32 = 20.0;

    /// Gravity added to vy every tick
    pub const GRAVITY: f32 = 0.3;
    /// Velocity scale applied every tick (must stay < 1)
    pub const FRICTION: f32 = 0.99;
    /// Fraction of the wind vector added to velocity every tick
    pub const WIND_SCALE: f32 = 0.01;
    /// Bound on each wind component
    pub const MAX_WIND: f32 = 1.0;

    /// Floor bounce (vy is inverted and scaled)
    pub const FLOOR_RESTITUTION: f32 = 0.6;
    /// Wall and ceiling bounce
    pub const WALL_RESTITUTION: f32 = 0.8;
    /// vx scale on every floor contact
    pub const FLOOR_ROLL_DAMPING: f32 = 0.8;
    /// Upward bounce slower than this after a support contact settles to zero
    pub const SETTLE_SPEED: f32 = 0.5;
    /// Both velocity components under this while supported = at rest
    pub const REST_EPSILON: f32 = 0.1;
    /// Both components must be under this to drop into the sink
    pub const SINK_CAPTURE_SPEED: f32 = 2.0;
    /// Hard cap on a single flight (60 seconds at 60 ticks/s)
    pub const MAX_FLIGHT_TICKS: u32 = 3600;

    /// Shot speed at power 100 with a zero power stat
    pub const BASE_SHOT_SPEED: f32 = 15.0;
    /// Angular spread (degrees) at zero accuracy
    pub const SPREAD_DEGREES: f32 = 10.0;

    /// Holes per round
    pub const HOLES_PER_ROUND: usize = 9;
    /// Hazards generated per hole (inclusive range)
    pub const MIN_HAZARDS: u32 = 1;
    pub const MAX_HAZARDS: u32 = 3;

    /// Progression
    pub const START_XP_TO_NEXT: u32 = 100;
    pub const XP_GROWTH: f32 = 1.5;
    pub const START_STAT: u32 = 50;
    pub const UPGRADE_COST: u32 = 50;
    pub const UPGRADE_INCREMENT: u32 = 5;
    pub const MAX_STAT_VALUE: u32 = 150;
    pub const BIRDIE_STREAK_TARGET: u32 = 3;
}

/// Unit direction for an angle in radians, screen convention (up is -y)
#[inline]
pub fn screen_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

/// Returns true if both components of `v` are strictly under `limit` in magnitude
#[inline]
pub fn both_axes_below(v: Vec2, limit: f32) -> bool {
    v.x.abs() < limit && v.y.abs() < limit
}
