//! Hole layouts for a round
//!
//! The par/start/sink table is authored; hazards are placed from the session
//! RNG once per round and never change until the next round is generated.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Hazard, HazardKind, HoleLayout, Sink};
use crate::settings::CourseConfig;

/// (par, start, sink) on the reference 800x600 course
const HOLE_TABLE: [(u32, (f32, f32), (f32, f32)); 9] = [
    (3, (100.0, 500.0), (700.0, 100.0)),
    (4, (100.0, 300.0), (700.0, 500.0)),
    (3, (100.0, 100.0), (700.0, 300.0)),
    (5, (100.0, 500.0), (700.0, 50.0)),
    (3, (100.0, 200.0), (700.0, 400.0)),
    (4, (100.0, 450.0), (700.0, 150.0)),
    (3, (100.0, 300.0), (700.0, 300.0)),
    (4, (100.0, 100.0), (700.0, 500.0)),
    (5, (100.0, 500.0), (700.0, 100.0)),
];
const REFERENCE_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// Hazards stay this far from the course edges
const HAZARD_MARGIN: f32 = 100.0;
const HAZARD_MIN_SIZE: f32 = 40.0;
const HAZARD_SIZE_RANGE: f32 = 80.0;
/// Placement attempts per hazard before giving up on it
const PLACEMENT_ATTEMPTS: u32 = 16;

/// Where a course came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseSource {
    /// Authored table plus seeded hazards; regenerated each round
    Generated,
    /// Fully authored in settings; reused every round
    Authored,
}

/// Ordered hole layouts for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub holes: Vec<HoleLayout>,
    pub source: CourseSource,
}

impl Course {
    pub fn len(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }

    /// Layout for a 1-based hole index
    pub fn hole(&self, index: usize) -> Option<&HoleLayout> {
        index.checked_sub(1).and_then(|i| self.holes.get(i))
    }

    pub fn total_par(&self) -> u32 {
        self.holes.iter().map(|h| h.par).sum()
    }
}

/// The authored par/start/sink table scaled to the configured course, no hazards
pub fn authored_holes(config: &CourseConfig) -> Vec<HoleLayout> {
    let scale = config.bounds() / REFERENCE_SIZE;
    HOLE_TABLE
        .iter()
        .map(|&(par, (sx, sy), (hx, hy))| HoleLayout {
            par,
            start: Vec2::new(sx, sy) * scale,
            sink: Sink {
                pos: Vec2::new(hx, hy) * scale,
                radius: config.sink_radius,
            },
            hazards: Vec::new(),
        })
        .collect()
}

/// Build the course for a new round
pub fn generate_course<R: Rng + ?Sized>(config: &CourseConfig, rng: &mut R) -> Course {
    if let Some(holes) = &config.holes {
        let holes = holes
            .iter()
            .cloned()
            .map(|mut hole| {
                hole.par = hole.par.max(1);
                hole
            })
            .collect();
        return Course {
            holes,
            source: CourseSource::Authored,
        };
    }

    let mut holes = authored_holes(config);
    for (index, hole) in holes.iter_mut().enumerate() {
        hole.hazards = generate_hazards(hole, config, rng);
        log::debug!(
            "Hole {} (par {}): {} hazards",
            index + 1,
            hole.par,
            hole.hazards.len()
        );
    }

    Course {
        holes,
        source: CourseSource::Generated,
    }
}

/// Place hazards fully inside the course, clear of the tee and the sink
pub fn generate_hazards<R: Rng + ?Sized>(
    hole: &HoleLayout,
    config: &CourseConfig,
    rng: &mut R,
) -> Vec<Hazard> {
    let count = rng.random_range(config.min_hazards..=config.max_hazards);
    let tee_clearance = config.ball_radius * 3.0;
    let sink_clearance = hole.sink.radius + config.ball_radius * 2.0;
    let margin = HAZARD_MARGIN.min(config.width / 4.0).min(config.height / 4.0);

    let mut hazards = Vec::with_capacity(count as usize);
    for _ in 0..count {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let size = Vec2::new(
                HAZARD_MIN_SIZE + rng.random::<f32>() * HAZARD_SIZE_RANGE,
                HAZARD_MIN_SIZE + rng.random::<f32>() * HAZARD_SIZE_RANGE,
            );
            let room = (config.bounds() - Vec2::splat(margin * 2.0) - size).max(Vec2::ZERO);
            let pos = Vec2::splat(margin) + Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * room;
            let kind = HazardKind::ALL[rng.random_range(0..HazardKind::ALL.len())];
            let hazard = Hazard { pos, size, kind };

            let fits = hazard.max().x <= config.width && hazard.max().y <= config.height;
            if fits
                && !hazard.contains_expanded(hole.start, tee_clearance)
                && !hazard.contains_expanded(hole.sink.pos, sink_clearance)
            {
                hazards.push(hazard);
                break;
            }
        }
    }
    hazards
}
