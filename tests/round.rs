//! Full-round and physics property tests through the public input surface

use glam::Vec2;
use mini_golf::persistence::SaveData;
use mini_golf::progression::{AchievementId, ScoreLabel};
use mini_golf::sim::{GameEvent, GamePhase, Hazard, HazardKind, HoleLayout, ShotInput, Sink};
use mini_golf::{Session, Settings, StatKind};
use proptest::prelude::*;

/// A soft tap from a tee placed on the cup drops in on the first tick
const TAP: ShotInput = ShotInput {
    power: 5.0,
    angle_degrees: 0.0,
};

fn cup_on_tee(par: u32) -> HoleLayout {
    HoleLayout {
        par,
        start: Vec2::new(400.0, 300.0),
        sink: Sink {
            pos: Vec2::new(400.0, 300.0),
            radius: 20.0,
        },
        hazards: Vec::new(),
    }
}

fn three_hole_settings() -> Settings {
    let mut settings = Settings::with_seed(17);
    settings.physics.max_wind = 0.0;
    settings.course.holes = Some(vec![cup_on_tee(3), cup_on_tee(4), cup_on_tee(5)]);
    settings
}

fn play_hole(session: &mut Session, input: ShotInput) -> Vec<GameEvent> {
    assert!(session.shoot(input));
    session.run_until_settled(10);
    assert_eq!(session.phase(), GamePhase::HoleComplete);
    session.drain_events()
}

#[test]
fn test_full_round_of_aces() {
    let mut session = Session::new(three_hole_settings());

    let events = play_hole(&mut session, TAP);
    assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    assert!(events.contains(&GameEvent::AchievementUnlocked {
        id: AchievementId::FirstShot
    }));
    assert!(events.contains(&GameEvent::AchievementUnlocked {
        id: AchievementId::HoleInOne
    }));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::HoleCompleted {
            hole: 1,
            strokes: 1,
            label: ScoreLabel::HoleInOne,
            xp: 100,
            ..
        }
    )));

    assert!(session.advance_after_complete());
    assert_eq!(session.hole_index(), 2);
    play_hole(&mut session, TAP);

    assert!(session.advance_after_complete());
    let events = play_hole(&mut session, TAP);
    assert!(events.contains(&GameEvent::AchievementUnlocked {
        id: AchievementId::BirdieStreak
    }));
    assert!(events.contains(&GameEvent::LevelUp { level: 3 }));

    assert!(session.advance_after_complete());
    assert_eq!(session.phase(), GamePhase::RoundComplete);
    let events = session.drain_events();
    assert!(events.contains(&GameEvent::RoundCompleted { score: -9 }));
    assert!(events.contains(&GameEvent::AchievementUnlocked {
        id: AchievementId::CompleteRound
    }));

    let career = session.career();
    assert_eq!(session.scorecard(), &[1, 1, 1]);
    assert_eq!(career.stats.holes_in_one, 3);
    assert_eq!(career.stats.holes_completed, 3);
    assert_eq!(career.stats.best_score, Some(1));
    assert_eq!(career.stats.total_xp, 300);
    assert_eq!(career.stats.rounds_completed, 1);
    assert_eq!(
        (career.player.level, career.player.xp, career.player.xp_to_next),
        (3, 50, 225)
    );

    let snapshot = session.snapshot();
    assert_eq!(snapshot.round_score_label(), "-9");
    assert!(!snapshot.can_shoot());
}

#[test]
fn test_reset_keeps_stroke_count() {
    let mut session = Session::new(three_hole_settings());

    assert!(session.shoot(ShotInput::new(100.0, 90.0)));
    for _ in 0..5 {
        session.tick();
    }
    assert_eq!(session.phase(), GamePhase::InFlight);
    assert!(session.reset_attempt());
    assert_eq!(session.ball().pos, session.hole().start);

    let events = play_hole(&mut session, TAP);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::HoleCompleted {
            strokes: 2,
            label: ScoreLabel::Birdie,
            ..
        }
    )));
    assert_eq!(session.round_score(), -1);
    assert_eq!(session.career().stats.birdies, 1);
    assert_eq!(session.career().stats.total_strokes, 2);
}

#[test]
fn test_restart_then_save_and_restore() {
    let mut session = Session::new(three_hole_settings());
    for _ in 0..3 {
        play_hole(&mut session, TAP);
        session.advance_after_complete();
    }
    assert_eq!(session.phase(), GamePhase::RoundComplete);

    assert!(session.upgrade_stat(StatKind::Power));
    assert_eq!(session.career().player.power, 55);
    assert!(
        session
            .career()
            .achievements
            .is_unlocked(AchievementId::Power50)
    );

    assert!(session.restart_round());
    assert_eq!(session.hole_index(), 1);
    assert_eq!(session.round_score(), 0);
    assert!(session.scorecard().is_empty());

    let json = session.save_data().to_json().unwrap();
    let mut fresh = Session::new(three_hole_settings());
    fresh.restore(SaveData::from_json(&json));
    assert_eq!(fresh.career().player, session.career().player);
    assert_eq!(fresh.career().stats, session.career().stats);
    assert_eq!(
        fresh.career().achievements.unlocked_count(),
        session.career().achievements.unlocked_count()
    );
}

#[test]
fn test_actions_in_wrong_phase_are_noops() {
    let mut session = Session::new(three_hole_settings());
    assert!(!session.advance_after_complete());
    assert!(!session.restart_round());

    play_hole(&mut session, TAP);
    assert!(!session.shoot(TAP));
    assert!(!session.reset_attempt());
    assert_eq!(session.strokes(), 1);

    let notices = session
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::Notice(_)))
        .count();
    assert_eq!(notices, 2);
}

/// Natural flights stop well inside this many ticks
const REST_TICK_BOUND: u32 = 1_000;

fn shot() -> impl Strategy<Value = ShotInput> {
    (0.0..=100.0_f32, 0.0..360.0_f32).prop_map(|(power, angle)| ShotInput::new(power, angle))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn ball_stays_on_course(seed in any::<u64>(), input in shot()) {
        let mut session = Session::new(Settings::with_seed(seed));
        let bounds = Vec2::new(session.settings().course.width, session.settings().course.height);
        let r = session.ball().radius;

        session.shoot(input);
        while session.phase() == GamePhase::InFlight {
            session.tick();
            let pos = session.ball().pos;
            prop_assert!(pos.x >= r - 1e-3 && pos.x <= bounds.x - r + 1e-3, "x escaped: {pos}");
            prop_assert!(pos.y >= r - 1e-3 && pos.y <= bounds.y - r + 1e-3, "y escaped: {pos}");
        }
    }

    #[test]
    fn every_flight_rests_on_its_own(seed in any::<u64>(), input in shot()) {
        let mut settings = Settings::with_seed(seed);
        settings.physics.max_flight_ticks = 1_000_000;
        let mut session = Session::new(settings);

        session.shoot(input);
        let ticks = session.run_until_settled(REST_TICK_BOUND);
        prop_assert!(ticks < REST_TICK_BOUND, "still moving after {ticks} ticks");
        prop_assert_ne!(session.phase(), GamePhase::InFlight);
        if session.phase() == GamePhase::Aiming {
            prop_assert_eq!(session.ball().vel, Vec2::ZERO);
        }
    }

    #[test]
    fn ball_never_enters_a_hazard(input in shot(), kind in 0..3usize) {
        let hazard = Hazard::new(300.0, 350.0, 200.0, 80.0, HazardKind::ALL[kind]);
        let mut settings = Settings::with_seed(3);
        settings.course.holes = Some(vec![HoleLayout {
            par: 3,
            start: Vec2::new(100.0, 592.0),
            sink: Sink { pos: Vec2::new(700.0, 100.0), radius: 20.0 },
            hazards: vec![hazard],
        }]);
        let mut session = Session::new(settings);
        let r = session.ball().radius;

        session.shoot(input);
        while session.phase() == GamePhase::InFlight {
            session.tick();
            let pos = session.ball().pos;
            prop_assert!(!hazard.contains_expanded(pos, r - 0.01), "inside hazard at {pos}");
        }
    }
}
