//! Hole/round state machine
//!
//! `Session` owns every piece of mutable state (ball, round, career, RNG) and
//! exposes the only entry points that mutate it: `shoot`, `reset_attempt`,
//! `advance_after_complete`, `restart_round`, `upgrade_stat` and `tick`.
//! Illegal calls are no-ops that queue a `GameEvent::Notice`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::resolve;
use super::course::{Course, CourseSource, generate_course};
use super::kinematics::{ForceModel, integrate, settle};
use super::shot::{ShotInput, launch_velocity};
use super::snapshot::{HoleSummary, Snapshot};
use super::state::{Ball, GameEvent, GamePhase, HoleLayout};
use crate::progression::{AchievementId, Career, StatKind, UpgradeOutcome};
use crate::settings::Settings;

/// One player's game: current round plus career progression
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) settings: Settings,
    pub(crate) rng: Pcg32,
    pub(crate) course: Course,
    /// Geometry of the hole being played (copied from `course` on load)
    pub(crate) hole: HoleLayout,
    /// 1-based
    pub(crate) hole_index: usize,
    pub(crate) phase: GamePhase,
    pub(crate) ball: Ball,
    pub(crate) strokes: u32,
    /// Sum of (strokes - par) over completed holes this round
    pub(crate) round_score: i32,
    /// Strokes per completed hole this round
    pub(crate) scorecard: Vec<u32>,
    pub(crate) wind: Vec2,
    pub(crate) forces: ForceModel,
    /// One-shot guard: set when the current hole has been scored
    pub(crate) hole_scored: bool,
    pub(crate) flight_ticks: u32,
    pub(crate) time_ticks: u64,
    pub(crate) career: Career,
    pub(crate) last_hole: Option<HoleSummary>,
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    /// Start a new career at hole 1 of a fresh round
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let course = generate_course(&settings.course, &mut rng);
        let hole = course.holes[0].clone();
        let career = Career::new(settings.progression.clone());
        let forces = ForceModel::new(&settings.physics, Vec2::ZERO);
        let ball = Ball::at_rest(hole.start, settings.course.ball_radius);

        let mut session = Self {
            settings,
            rng,
            course,
            hole,
            hole_index: 1,
            phase: GamePhase::Aiming,
            ball,
            strokes: 0,
            round_score: 0,
            scorecard: Vec::new(),
            wind: Vec2::ZERO,
            forces,
            hole_scored: false,
            flight_ticks: 0,
            time_ticks: 0,
            career,
            last_hole: None,
            events: Vec::new(),
        };
        session.load_hole(1);
        session
    }

    /// Load a hole: ball to the tee, strokes to zero, fresh wind
    pub(crate) fn load_hole(&mut self, index: usize) {
        let index = index.clamp(1, self.course.len());
        self.hole_index = index;
        self.hole = self.course.holes[index - 1].clone();
        self.ball = Ball::at_rest(self.hole.start, self.settings.course.ball_radius);
        self.strokes = 0;
        self.hole_scored = false;
        self.flight_ticks = 0;
        self.phase = GamePhase::Aiming;

        let max_wind = self.settings.physics.max_wind;
        self.wind = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 2.0 * max_wind,
            (self.rng.random::<f32>() - 0.5) * 2.0 * max_wind,
        );
        self.forces = ForceModel::new(&self.settings.physics, self.wind);

        log::info!(
            "Hole {}/{} loaded: par {}, {} hazards, wind ({:.2}, {:.2})",
            index,
            self.course.len(),
            self.hole.par,
            self.hole.hazards.len(),
            self.wind.x,
            self.wind.y
        );
    }

    fn notice(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.events.push(GameEvent::Notice(message));
    }

    /// Take a stroke. Only legal while aiming.
    pub fn shoot(&mut self, input: ShotInput) -> bool {
        if self.phase != GamePhase::Aiming {
            self.notice(format!("Cannot shoot while {:?}", self.phase));
            return false;
        }

        let player = &self.career.player;
        self.ball.vel = launch_velocity(
            input,
            player.power,
            player.accuracy,
            &self.settings.physics,
            &mut self.rng,
        );
        self.strokes += 1;
        self.flight_ticks = 0;
        self.phase = GamePhase::InFlight;

        log::debug!(
            "Stroke {} on hole {}: power {:.0}, angle {:.0} -> vel ({:.2}, {:.2})",
            self.strokes,
            self.hole_index,
            input.power,
            input.angle_degrees,
            self.ball.vel.x,
            self.ball.vel.y
        );
        self.events.push(GameEvent::ShotTaken {
            hole: self.hole_index,
            stroke: self.strokes,
        });
        if self.career.record_shot() {
            self.events.push(GameEvent::AchievementUnlocked {
                id: AchievementId::FirstShot,
            });
        }
        true
    }

    /// Put the ball back on the tee. Strokes taken on this hole still count.
    pub fn reset_attempt(&mut self) -> bool {
        match self.phase {
            GamePhase::Aiming | GamePhase::InFlight => {
                self.ball = Ball::at_rest(self.hole.start, self.ball.radius);
                self.flight_ticks = 0;
                self.phase = GamePhase::Aiming;
                log::debug!("Hole {} attempt reset", self.hole_index);
                true
            }
            _ => {
                self.notice("Nothing to reset");
                false
            }
        }
    }

    /// Move on from a completed hole: next hole, or end of round
    pub fn advance_after_complete(&mut self) -> bool {
        if self.phase != GamePhase::HoleComplete {
            self.notice("No completed hole to advance from");
            return false;
        }

        if self.hole_index < self.course.len() {
            self.load_hole(self.hole_index + 1);
        } else {
            self.phase = GamePhase::RoundComplete;
            log::info!(
                "Round complete: {} strokes, score {:+}",
                self.scorecard.iter().sum::<u32>(),
                self.round_score
            );
            self.events.push(GameEvent::RoundCompleted {
                score: self.round_score,
            });
            for id in self.career.record_round() {
                self.events.push(GameEvent::AchievementUnlocked { id });
            }
        }
        true
    }

    /// Begin a new round from hole 1. Career progression carries over.
    pub fn restart_round(&mut self) -> bool {
        if self.phase != GamePhase::RoundComplete {
            self.notice("Round is still in progress");
            return false;
        }

        if self.course.source == CourseSource::Generated {
            self.course = generate_course(&self.settings.course, &mut self.rng);
        }
        self.round_score = 0;
        self.scorecard.clear();
        self.last_hole = None;
        self.load_hole(1);
        true
    }

    /// Spend XP on a stat
    pub fn upgrade_stat(&mut self, kind: StatKind) -> bool {
        match self.career.upgrade(kind) {
            UpgradeOutcome::Upgraded { value, unlocked } => {
                log::info!("{kind:?} upgraded to {value}");
                for id in unlocked {
                    self.events.push(GameEvent::AchievementUnlocked { id });
                }
                true
            }
            UpgradeOutcome::NotEnoughXp { have, need } => {
                self.notice(format!("Not enough XP ({have}/{need})"));
                false
            }
            UpgradeOutcome::AtMax => {
                self.notice(format!("{kind:?} is already maxed"));
                false
            }
        }
    }

    /// Advance the simulation by one frame. Does nothing unless the ball is in flight.
    pub fn tick(&mut self) {
        if self.phase != GamePhase::InFlight {
            return;
        }
        self.time_ticks += 1;
        self.flight_ticks += 1;

        let prev = self.ball.pos;
        integrate(&mut self.ball, &self.forces);
        let bounds = self.settings.course.bounds();
        let physics = &self.settings.physics;
        let contact = resolve(&mut self.ball, prev, &self.hole, bounds, physics);

        if contact.entered_sink {
            self.complete_hole();
        } else if settle(&mut self.ball, contact.supported, physics.rest_epsilon) {
            self.phase = GamePhase::Aiming;
            self.events.push(GameEvent::CameToRest { pos: self.ball.pos });
        } else if self.flight_ticks >= physics.max_flight_ticks {
            log::warn!(
                "Ball still moving after {} ticks, forcing rest at ({:.1}, {:.1})",
                self.flight_ticks,
                self.ball.pos.x,
                self.ball.pos.y
            );
            self.ball.vel = Vec2::ZERO;
            self.phase = GamePhase::Aiming;
            self.events.push(GameEvent::CameToRest { pos: self.ball.pos });
        }
    }

    /// Tick until the ball stops, sinks, or `max_ticks` elapse. Returns ticks run.
    pub fn run_until_settled(&mut self, max_ticks: u32) -> u32 {
        let mut ticks = 0;
        while self.phase == GamePhase::InFlight && ticks < max_ticks {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Score the hole exactly once
    fn complete_hole(&mut self) {
        self.phase = GamePhase::HoleComplete;
        if self.hole_scored {
            return;
        }
        self.hole_scored = true;

        let outcome = self.career.record_hole(self.strokes, self.hole.par);
        self.round_score += outcome.delta;
        self.scorecard.push(self.strokes);

        log::info!(
            "Hole {} complete in {} strokes (par {}): {} +{} XP",
            self.hole_index,
            self.strokes,
            self.hole.par,
            outcome.message,
            outcome.xp
        );

        self.events.push(GameEvent::HoleCompleted {
            hole: self.hole_index,
            strokes: self.strokes,
            par: self.hole.par,
            label: outcome.label,
            xp: outcome.xp,
        });
        for &level in &outcome.levels_reached {
            self.events.push(GameEvent::LevelUp { level });
        }
        for &id in &outcome.unlocked {
            self.events.push(GameEvent::AchievementUnlocked { id });
        }

        self.last_hole = Some(HoleSummary {
            hole: self.hole_index,
            strokes: self.strokes,
            par: self.hole.par,
            label: outcome.label,
            message: outcome.message,
            xp: outcome.xp,
        });
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            ball: self.ball,
            hazards: self.hole.hazards.clone(),
            sink: self.hole.sink,
            bounds: self.settings.course.bounds(),
            wind: self.wind,
            hole_index: self.hole_index,
            hole_count: self.course.len(),
            par: self.hole.par,
            strokes: self.strokes,
            round_score: self.round_score,
            player: self.career.player.clone(),
            stats: self.career.stats.clone(),
            achievements: self.career.achievements.list.clone(),
            last_hole: self.last_hole.clone(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn hole(&self) -> &HoleLayout {
        &self.hole
    }

    pub fn hole_index(&self) -> usize {
        self.hole_index
    }

    pub fn strokes(&self) -> u32 {
        self.strokes
    }

    pub fn round_score(&self) -> i32 {
        self.round_score
    }

    pub fn scorecard(&self) -> &[u32] {
        &self.scorecard
    }

    pub fn wind(&self) -> Vec2 {
        self.wind
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn career(&self) -> &Career {
        &self.career
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
