//! Game state and core simulation types
//!
//! Static hole geometry (hazards, sink, layout) plus the one mutable entity, the ball.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::progression::{AchievementId, ScoreLabel};

/// Current phase of the hole/round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball at rest, waiting for a shot
    #[default]
    Aiming,
    /// Ball moving; ticks advance kinematics and collisions
    InFlight,
    /// Sink entered; scoring has run, waiting for advance
    HoleComplete,
    /// Last hole finished; waiting for restart
    RoundComplete,
}

/// The ball. A point mass with a fixed collision radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn at_rest(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Hazard surface type. Changes how a hit bounces, never the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    /// Soft: absorbs most of the bounce
    Sand,
    Water,
    #[default]
    Rough,
}

impl HazardKind {
    pub const ALL: [HazardKind; 3] = [HazardKind::Sand, HazardKind::Water, HazardKind::Rough];

    /// Scale applied to the inverted velocity component on the hit axis
    pub fn restitution(&self) -> f32 {
        match self {
            HazardKind::Sand => 0.5,
            HazardKind::Water => 0.75,
            HazardKind::Rough => 0.8,
        }
    }

    /// Scale applied to the velocity component along the hit surface.
    /// Stays below 0.9 so bounded wind cannot keep a supported ball rolling.
    pub fn tangential_damping(&self) -> f32 {
        match self {
            HazardKind::Sand => 0.6,
            HazardKind::Water => 0.85,
            HazardKind::Rough => 0.8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::Sand => "sand",
            HazardKind::Water => "water",
            HazardKind::Rough => "rough",
        }
    }
}

/// Axis-aligned rectangular hazard. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub kind: HazardKind,
}

impl Hazard {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: HazardKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            kind,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Strict containment of `p` in the rectangle grown by `margin` on every side
    pub fn contains_expanded(&self, p: Vec2, margin: f32) -> bool {
        let lo = self.min() - Vec2::splat(margin);
        let hi = self.max() + Vec2::splat(margin);
        p.x > lo.x && p.x < hi.x && p.y > lo.y && p.y < hi.y
    }
}

/// Target circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sink {
    pub pos: Vec2,
    pub radius: f32,
}

impl Sink {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance(self.pos) < self.radius
    }
}

/// Static layout of one hole. Never mutated once the round is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleLayout {
    pub par: u32,
    pub start: Vec2,
    pub sink: Sink,
    #[serde(default)]
    pub hazards: Vec<Hazard>,
}

/// Notifications queued for the UI collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotTaken { hole: usize, stroke: u32 },
    /// Ball stopped without reaching the sink
    CameToRest { pos: Vec2 },
    HoleCompleted {
        hole: usize,
        strokes: u32,
        par: u32,
        label: ScoreLabel,
        xp: u32,
    },
    LevelUp { level: u32 },
    AchievementUnlocked { id: AchievementId },
    RoundCompleted { score: i32 },
    /// An input was ignored (shot mid-flight, not enough XP, ...)
    Notice(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_expanded_is_strict() {
        let hazard = Hazard::new(100.0, 100.0, 50.0, 20.0, HazardKind::Sand);
        assert!(hazard.contains_expanded(Vec2::new(95.0, 110.0), 8.0));
        assert!(!hazard.contains_expanded(Vec2::new(92.0, 110.0), 8.0));
        assert!(!hazard.contains_expanded(Vec2::new(125.0, 128.0), 8.0));
        assert!(hazard.contains_expanded(Vec2::new(125.0, 127.9), 8.0));
    }

    #[test]
    fn test_sand_is_softest() {
        for kind in HazardKind::ALL {
            assert!(HazardKind::Sand.restitution() <= kind.restitution());
            assert!(kind.tangential_damping() < 0.9);
        }
    }

    #[test]
    fn test_sink_contains() {
        let sink = Sink {
            pos: Vec2::new(700.0, 100.0),
            radius: 20.0,
        };
        assert!(sink.contains(Vec2::new(710.0, 110.0)));
        assert!(!sink.contains(Vec2::new(720.0, 100.0)));
    }

    #[test]
    fn test_hazard_kind_serde_lowercase() {
        let json = serde_json::to_string(&HazardKind::Water).unwrap();
        assert_eq!(json, "\"water\"");
    }
}
