//! Read-only view of a session for the render/UI layer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, GamePhase, Hazard, Sink};
use crate::progression::{Achievement, CareerStats, PlayerProgression, ScoreLabel};

/// Classification and message of the most recently finished hole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleSummary {
    pub hole: usize,
    pub strokes: u32,
    pub par: u32,
    pub label: ScoreLabel,
    pub message: String,
    pub xp: u32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub ball: Ball,
    pub hazards: Vec<Hazard>,
    pub sink: Sink,
    /// Course width and height
    pub bounds: Vec2,
    pub wind: Vec2,
    /// 1-based
    pub hole_index: usize,
    pub hole_count: usize,
    pub par: u32,
    pub strokes: u32,
    pub round_score: i32,
    pub player: PlayerProgression,
    pub stats: CareerStats,
    pub achievements: Vec<Achievement>,
    pub last_hole: Option<HoleSummary>,
}

impl Snapshot {
    /// True when the UI should offer the shoot control
    pub fn can_shoot(&self) -> bool {
        self.phase == GamePhase::Aiming
    }

    /// "E", "+2", "-1" style round score
    pub fn round_score_label(&self) -> String {
        match self.round_score {
            0 => "E".to_string(),
            s => format!("{s:+}"),
        }
    }
}
