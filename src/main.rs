//! Mini Golf headless driver
//!
//! Plays rounds automatically against the simulation core: every stroke is
//! chosen by trying a grid of (power, angle) candidates on cloned sessions
//! and keeping the one that sinks the ball or finishes closest to the cup.
//!
//! Usage: `mini-golf [rounds]`
//! Paths come from `MINI_GOLF_SETTINGS`, `MINI_GOLF_SAVE` and `MINI_GOLF_SCORES`.

#[cfg(not(target_arch = "wasm32"))]
mod driver {
    use std::env;
    use std::time::{SystemTime, UNIX_EPOCH};

    use mini_golf::highscores::HighScoreEntry;
    use mini_golf::persistence::{load_from_path, save_to_path};
    use mini_golf::sim::{GameEvent, GamePhase, ShotInput};
    use mini_golf::{HighScores, Session, Settings, StatKind};

    const DEFAULT_SETTINGS_PATH: &str = "mini_golf_settings.json";
    const DEFAULT_SAVE_PATH: &str = "mini_golf_save.json";
    const DEFAULT_SCORES_PATH: &str = "mini_golf_scores.json";

    /// Give up on a hole after this many strokes
    const MAX_STROKES_PER_HOLE: u32 = 12;
    const POWER_STEP: usize = 5;
    const ANGLE_STEP: usize = 5;

    fn path_from_env(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Remaining distance to the cup after a trial shot, zero when sunk
    fn trial(session: &Session, input: ShotInput) -> f32 {
        let mut trial = session.clone();
        trial.shoot(input);
        trial.run_until_settled(trial.settings().physics.max_flight_ticks);
        if trial.phase() == GamePhase::HoleComplete {
            0.0
        } else {
            trial.ball().pos.distance(trial.hole().sink.pos)
        }
    }

    /// Best candidate shot from the current position
    fn choose_shot(session: &Session) -> ShotInput {
        let mut best = (f32::INFINITY, ShotInput::new(50.0, 45.0));
        for power in (POWER_STEP..=100).step_by(POWER_STEP) {
            for angle in (0..=180).step_by(ANGLE_STEP) {
                let input = ShotInput::new(power as f32, angle as f32);
                let distance = trial(session, input);
                if distance < best.0 {
                    best = (distance, input);
                    if distance == 0.0 {
                        return input;
                    }
                }
            }
        }
        best.1
    }

    fn report(events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::HoleCompleted {
                    hole,
                    strokes,
                    par,
                    label,
                    xp,
                } => println!(
                    "  hole {hole}: {strokes} strokes (par {par}) {} +{xp} XP",
                    label.as_str()
                ),
                GameEvent::LevelUp { level } => println!("  level up! now level {level}"),
                GameEvent::AchievementUnlocked { id } => {
                    println!("  achievement unlocked: {}", id.title())
                }
                _ => {}
            }
        }
    }

    /// Play the rest of the current round. Returns false if a hole was abandoned.
    fn play_round(session: &mut Session) -> bool {
        while session.phase() != GamePhase::RoundComplete {
            match session.phase() {
                GamePhase::Aiming => {
                    if session.strokes() >= MAX_STROKES_PER_HOLE {
                        log::warn!(
                            "Giving up on hole {} after {} strokes",
                            session.hole_index(),
                            session.strokes()
                        );
                        return false;
                    }
                    let input = choose_shot(session);
                    session.shoot(input);
                }
                GamePhase::InFlight => {
                    session.run_until_settled(session.settings().physics.max_flight_ticks);
                }
                GamePhase::HoleComplete => {
                    session.advance_after_complete();
                }
                GamePhase::RoundComplete => {}
            }
            report(session.drain_events());
        }
        true
    }

    /// Spend spare XP on the weaker stat
    fn spend_xp(session: &mut Session) {
        loop {
            let player = &session.career().player;
            let kind = if player.accuracy <= player.power {
                StatKind::Accuracy
            } else {
                StatKind::Power
            };
            if !session.upgrade_stat(kind) {
                break;
            }
        }
        session.drain_events();
    }

    pub fn run() {
        env_logger::init();

        let rounds: u32 = env::args().nth(1).and_then(|a| a.parse().ok()).unwrap_or(1);
        let settings = Settings::load(path_from_env("MINI_GOLF_SETTINGS", DEFAULT_SETTINGS_PATH));
        let save_path = path_from_env("MINI_GOLF_SAVE", DEFAULT_SAVE_PATH);
        let scores_path = path_from_env("MINI_GOLF_SCORES", DEFAULT_SCORES_PATH);
        log::info!("Mini Golf starting (seed {}, {rounds} rounds)", settings.seed);

        let mut session = Session::new(settings);
        session.restore(load_from_path(&save_path));
        let mut scores = HighScores::load(&scores_path);

        for round in 1..=rounds {
            if round > 1 {
                session.restart_round();
            }
            println!("Round {round}, starting at hole {}", session.hole_index());
            if !play_round(&mut session) {
                println!("Round {round} abandoned");
                break;
            }

            let snapshot = session.snapshot();
            let strokes: u32 = session.scorecard().iter().sum();
            println!(
                "Round {round} complete: {strokes} strokes, {}",
                snapshot.round_score_label()
            );
            let entry = HighScoreEntry {
                score: session.round_score(),
                strokes,
                holes: session.scorecard().len(),
                timestamp: now_secs(),
            };
            if let Some(rank) = scores.add_score(entry) {
                println!("New best round, rank {rank}");
            }
            spend_xp(&mut session);
        }

        let player = &session.career().player;
        println!(
            "Level {} ({}/{} XP), power {}, accuracy {}",
            player.level, player.xp, player.xp_to_next, player.power, player.accuracy
        );

        if let Err(err) = save_to_path(&save_path, &session.save_data()) {
            log::error!("Failed to save progress: {err}");
        }
        if let Err(err) = scores.save(&scores_path) {
            log::error!("Failed to save high scores: {err}");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    driver::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the only wasm surface
}
