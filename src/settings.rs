//! Game settings and tuning
//!
//! Physics, course and progression knobs. Loaded from a JSON file; every
//! missing field takes the default from `crate::consts`.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::PersistError;
use crate::progression::ScoreLabel;
use crate::sim::HoleLayout;

/// Per-tick force and collision tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Strictly below 1 so speed always decays
    pub friction: f32,
    pub wind_scale: f32,
    /// Bound on each wind component, sampled once per hole load
    pub max_wind: f32,
    pub floor_restitution: f32,
    pub wall_restitution: f32,
    pub floor_roll_damping: f32,
    pub settle_speed: f32,
    pub rest_epsilon: f32,
    pub sink_capture_speed: f32,
    pub max_flight_ticks: u32,
    pub base_shot_speed: f32,
    pub spread_degrees: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            wind_scale: WIND_SCALE,
            max_wind: MAX_WIND,
            floor_restitution: FLOOR_RESTITUTION,
            wall_restitution: WALL_RESTITUTION,
            floor_roll_damping: FLOOR_ROLL_DAMPING,
            settle_speed: SETTLE_SPEED,
            rest_epsilon: REST_EPSILON,
            sink_capture_speed: SINK_CAPTURE_SPEED,
            max_flight_ticks: MAX_FLIGHT_TICKS,
            base_shot_speed: BASE_SHOT_SPEED,
            spread_degrees: SPREAD_DEGREES,
        }
    }
}

/// Course geometry and generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    pub width: f32,
    pub height: f32,
    pub ball_radius: f32,
    pub sink_radius: f32,
    pub min_hazards: u32,
    pub max_hazards: u32,
    /// Authored layouts; when set, generation is skipped
    pub holes: Option<Vec<HoleLayout>>,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            width: COURSE_WIDTH,
            height: COURSE_HEIGHT,
            ball_radius: BALL_RADIUS,
            sink_radius: SINK_RADIUS,
            min_hazards: MIN_HAZARDS,
            max_hazards: MAX_HAZARDS,
            holes: None,
        }
    }
}

impl CourseConfig {
    #[inline]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// XP awarded per hole classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpTable {
    pub hole_in_one: u32,
    pub eagle: u32,
    pub birdie: u32,
    pub par: u32,
    pub bogey: u32,
    pub over_par: u32,
}

impl Default for XpTable {
    fn default() -> Self {
        Self {
            hole_in_one: 100,
            eagle: 80,
            birdie: 50,
            par: 30,
            bogey: 10,
            over_par: 10,
        }
    }
}

impl XpTable {
    pub fn award(&self, label: ScoreLabel) -> u32 {
        match label {
            ScoreLabel::HoleInOne => self.hole_in_one,
            ScoreLabel::Eagle => self.eagle,
            ScoreLabel::Birdie => self.birdie,
            ScoreLabel::Par => self.par,
            ScoreLabel::Bogey => self.bogey,
            ScoreLabel::OverPar => self.over_par,
        }
    }
}

/// RPG layer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub xp: XpTable,
    /// Threshold multiplier per level, > 1
    pub xp_growth: f32,
    pub start_xp_to_next: u32,
    pub start_power: u32,
    pub start_accuracy: u32,
    pub upgrade_cost: u32,
    pub upgrade_increment: u32,
    pub max_stat: u32,
    pub birdie_streak_target: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp: XpTable::default(),
            xp_growth: XP_GROWTH,
            start_xp_to_next: START_XP_TO_NEXT,
            start_power: START_STAT,
            start_accuracy: START_STAT,
            upgrade_cost: UPGRADE_COST,
            upgrade_increment: UPGRADE_INCREMENT,
            max_stat: MAX_STAT_VALUE,
            birdie_streak_target: BIRDIE_STREAK_TARGET,
        }
    }
}

/// All tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for shot spread, wind and hazard placement
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub course: CourseConfig,
    pub progression: ProgressionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_601F,
            physics: PhysicsConfig::default(),
            course: CourseConfig::default(),
            progression: ProgressionConfig::default(),
        }
    }
}

impl Settings {
    /// Settings with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Clamp values that would break termination or leveling
    pub fn sanitized(mut self) -> Self {
        let physics = &mut self.physics;
        if !(physics.friction > 0.0 && physics.friction < 1.0) {
            log::warn!("friction {} out of (0, 1), using default", physics.friction);
            physics.friction = FRICTION;
        }
        physics.max_wind = physics.max_wind.abs();
        physics.rest_epsilon = physics.rest_epsilon.max(f32::EPSILON);
        physics.max_flight_ticks = physics.max_flight_ticks.max(1);

        let course = &mut self.course;
        course.ball_radius = course.ball_radius.max(0.5);
        course.width = course.width.max(course.ball_radius * 4.0);
        course.height = course.height.max(course.ball_radius * 4.0);
        if course.min_hazards > course.max_hazards {
            std::mem::swap(&mut course.min_hazards, &mut course.max_hazards);
        }
        if course.holes.as_ref().is_some_and(|holes| holes.is_empty()) {
            log::warn!("Authored course has no holes, falling back to generated course");
            course.holes = None;
        }

        let progression = &mut self.progression;
        if !(progression.xp_growth > 1.0) {
            progression.xp_growth = XP_GROWTH;
        }
        progression.start_xp_to_next = progression.start_xp_to_next.max(1);
        progression.birdie_streak_target = progression.birdie_streak_target.max(1);

        self
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.sanitized()
                }
                Err(err) => {
                    log::warn!("Invalid settings in {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
