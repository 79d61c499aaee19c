//! Scoring, XP/leveling, career stats and achievements
//!
//! Composed with the simulation by `Session`, but has no dependency on it:
//! everything here is driven by "hole finished", "shot taken", "round
//! finished" and "upgrade requested" calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::ProgressionConfig;

/// Classification of a finished hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    HoleInOne,
    Eagle,
    Birdie,
    Par,
    Bogey,
    OverPar,
}

impl ScoreLabel {
    /// One stroke is always a hole in one; otherwise classify strokes - par
    pub fn classify(strokes: u32, par: u32) -> Self {
        if strokes == 1 {
            return ScoreLabel::HoleInOne;
        }
        match strokes as i64 - par as i64 {
            d if d <= -2 => ScoreLabel::Eagle,
            -1 => ScoreLabel::Birdie,
            0 => ScoreLabel::Par,
            1 => ScoreLabel::Bogey,
            _ => ScoreLabel::OverPar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::HoleInOne => "hole in one",
            ScoreLabel::Eagle => "eagle",
            ScoreLabel::Birdie => "birdie",
            ScoreLabel::Par => "par",
            ScoreLabel::Bogey => "bogey",
            ScoreLabel::OverPar => "over par",
        }
    }

    /// Counts toward the birdie streak
    pub fn is_birdie_or_better(&self) -> bool {
        matches!(
            self,
            ScoreLabel::HoleInOne | ScoreLabel::Eagle | ScoreLabel::Birdie
        )
    }

    /// Player-facing message for a hole finished `delta` strokes off par
    pub fn message(&self, delta: i32) -> String {
        match self {
            ScoreLabel::HoleInOne => "HOLE IN ONE!".to_string(),
            ScoreLabel::Eagle => "EAGLE! Amazing!".to_string(),
            ScoreLabel::Birdie => "BIRDIE! Great shot!".to_string(),
            ScoreLabel::Par => "PAR! Well done!".to_string(),
            ScoreLabel::Bogey => format!("Bogey ({delta:+})"),
            ScoreLabel::OverPar => format!("Over par ({delta:+})"),
        }
    }
}

/// Achievement identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    #[serde(rename = "first_shot")]
    FirstShot,
    #[serde(rename = "hole_in_one")]
    HoleInOne,
    #[serde(rename = "complete_round")]
    CompleteRound,
    #[serde(rename = "level_5")]
    Level5,
    #[serde(rename = "level_10")]
    Level10,
    #[serde(rename = "eagle")]
    Eagle,
    #[serde(rename = "birdie_streak")]
    BirdieStreak,
    #[serde(rename = "power_50")]
    Power50,
    #[serde(rename = "power_100")]
    Power100,
    #[serde(rename = "accuracy_100")]
    Accuracy100,
}

impl AchievementId {
    pub const ALL: [AchievementId; 10] = [
        AchievementId::FirstShot,
        AchievementId::HoleInOne,
        AchievementId::CompleteRound,
        AchievementId::Level5,
        AchievementId::Level10,
        AchievementId::Eagle,
        AchievementId::BirdieStreak,
        AchievementId::Power50,
        AchievementId::Power100,
        AchievementId::Accuracy100,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::FirstShot => "first_shot",
            AchievementId::HoleInOne => "hole_in_one",
            AchievementId::CompleteRound => "complete_round",
            AchievementId::Level5 => "level_5",
            AchievementId::Level10 => "level_10",
            AchievementId::Eagle => "eagle",
            AchievementId::BirdieStreak => "birdie_streak",
            AchievementId::Power50 => "power_50",
            AchievementId::Power100 => "power_100",
            AchievementId::Accuracy100 => "accuracy_100",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AchievementId::FirstShot => "First Swing",
            AchievementId::HoleInOne => "Hole in One!",
            AchievementId::CompleteRound => "Full Round",
            AchievementId::Level5 => "Level 5",
            AchievementId::Level10 => "Level 10",
            AchievementId::Eagle => "Eagle",
            AchievementId::BirdieStreak => "Birdie Master",
            AchievementId::Power50 => "Strong Golfer",
            AchievementId::Power100 => "Power Master",
            AchievementId::Accuracy100 => "Sharpshooter",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementId::FirstShot => "Take your first shot",
            AchievementId::HoleInOne => "Complete a hole in one stroke",
            AchievementId::CompleteRound => "Complete every hole of a round",
            AchievementId::Level5 => "Reach level 5",
            AchievementId::Level10 => "Reach level 10",
            AchievementId::Eagle => "Score 2 under par",
            AchievementId::BirdieStreak => "Get 3 birdies in a row",
            AchievementId::Power50 => "Reach 50 power",
            AchievementId::Power100 => "Reach 100 power",
            AchievementId::Accuracy100 => "Reach 100 accuracy",
        }
    }
}

/// Achievement id string that matches no known achievement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAchievement(pub String);

impl fmt::Display for UnknownAchievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown achievement {}", self.0)
    }
}

impl std::error::Error for UnknownAchievement {}

impl FromStr for AchievementId {
    type Err = UnknownAchievement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownAchievement(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub unlocked: bool,
}

/// The achievement list. Unlocks are monotonic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    pub list: Vec<Achievement>,
}

impl Default for Achievements {
    fn default() -> Self {
        Self {
            list: AchievementId::ALL
                .into_iter()
                .map(|id| Achievement {
                    id,
                    title: id.title().to_string(),
                    description: id.description().to_string(),
                    unlocked: false,
                })
                .collect(),
        }
    }
}

impl Achievements {
    /// Returns true only on the first unlock of `id`
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        match self.list.iter_mut().find(|a| a.id == id) {
            Some(achievement) if !achievement.unlocked => {
                achievement.unlocked = true;
                log::info!("Achievement unlocked: {}", achievement.title);
                true
            }
            _ => false,
        }
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.list.iter().any(|a| a.id == id && a.unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.list.iter().filter(|a| a.unlocked).count()
    }
}

/// Upgradable player stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Power,
    Accuracy,
}

/// Level, XP and stats. Invariant: `xp < xp_to_next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgression {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub power: u32,
    pub accuracy: u32,
}

impl Default for PlayerProgression {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: START_XP_TO_NEXT,
            power: START_STAT,
            accuracy: START_STAT,
        }
    }
}

impl PlayerProgression {
    pub fn new(config: &ProgressionConfig) -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: config.start_xp_to_next.max(1),
            power: config.start_power,
            accuracy: config.start_accuracy,
        }
    }

    /// Add XP and level up as many times as it covers. Returns each level reached.
    pub fn add_xp(&mut self, amount: u32, growth: f32) -> Vec<u32> {
        self.xp = self.xp.saturating_add(amount);
        self.apply_level_ups(growth)
    }

    /// Pop thresholds while XP covers them
    pub fn apply_level_ups(&mut self, growth: f32) -> Vec<u32> {
        let mut reached = Vec::new();
        self.xp_to_next = self.xp_to_next.max(1);
        while self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level = self.level.saturating_add(1);
            self.xp_to_next = next_threshold(self.xp_to_next, growth);
            reached.push(self.level);
        }
        reached
    }

    pub fn stat(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Power => self.power,
            StatKind::Accuracy => self.accuracy,
        }
    }

    fn stat_mut(&mut self, kind: StatKind) -> &mut u32 {
        match kind {
            StatKind::Power => &mut self.power,
            StatKind::Accuracy => &mut self.accuracy,
        }
    }
}

/// Grow a threshold, always by at least one point
#[inline]
pub fn next_threshold(current: u32, growth: f32) -> u32 {
    let grown = (current as f64 * growth as f64).floor();
    let grown = if grown >= u32::MAX as f64 { u32::MAX } else { grown as u32 };
    grown.max(current.saturating_add(1))
}

/// Lifetime counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerStats {
    pub holes_completed: u32,
    pub total_strokes: u32,
    /// Fewest strokes on any single hole
    pub best_score: Option<u32>,
    pub holes_in_one: u32,
    pub eagles: u32,
    pub birdies: u32,
    pub pars: u32,
    pub rounds_completed: u32,
    pub total_xp: u64,
}

/// Everything scoring produced for one finished hole
#[derive(Debug, Clone, PartialEq)]
pub struct HoleOutcome {
    pub label: ScoreLabel,
    pub delta: i32,
    pub xp: u32,
    pub message: String,
    pub levels_reached: Vec<u32>,
    pub unlocked: Vec<AchievementId>,
}

/// Result of a stat upgrade request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Upgraded {
        value: u32,
        unlocked: Vec<AchievementId>,
    },
    NotEnoughXp {
        have: u32,
        need: u32,
    },
    AtMax,
}

/// Player progression, stats and achievements for one career
#[derive(Debug, Clone, PartialEq)]
pub struct Career {
    pub player: PlayerProgression,
    pub stats: CareerStats,
    pub achievements: Achievements,
    /// Consecutive birdie-or-better holes
    pub birdie_streak: u32,
    pub config: ProgressionConfig,
}

impl Career {
    pub fn new(config: ProgressionConfig) -> Self {
        Self {
            player: PlayerProgression::new(&config),
            stats: CareerStats::default(),
            achievements: Achievements::default(),
            birdie_streak: 0,
            config,
        }
    }

    /// Returns true if this was the first shot ever taken
    pub fn record_shot(&mut self) -> bool {
        self.achievements.unlock(AchievementId::FirstShot)
    }

    /// Score a finished hole, award XP and check milestones
    pub fn record_hole(&mut self, strokes: u32, par: u32) -> HoleOutcome {
        let label = ScoreLabel::classify(strokes, par);
        let delta = strokes as i32 - par as i32;
        let xp = self.config.xp.award(label);
        let mut unlocked = Vec::new();

        match label {
            ScoreLabel::HoleInOne => {
                self.stats.holes_in_one = self.stats.holes_in_one.saturating_add(1);
                if self.achievements.unlock(AchievementId::HoleInOne) {
                    unlocked.push(AchievementId::HoleInOne);
                }
            }
            ScoreLabel::Eagle => {
                self.stats.eagles = self.stats.eagles.saturating_add(1);
                if self.achievements.unlock(AchievementId::Eagle) {
                    unlocked.push(AchievementId::Eagle);
                }
            }
            ScoreLabel::Birdie => self.stats.birdies = self.stats.birdies.saturating_add(1),
            ScoreLabel::Par => self.stats.pars = self.stats.pars.saturating_add(1),
            ScoreLabel::Bogey | ScoreLabel::OverPar => {}
        }

        if label.is_birdie_or_better() {
            self.birdie_streak = self.birdie_streak.saturating_add(1);
        } else {
            self.birdie_streak = 0;
        }
        if self.birdie_streak >= self.config.birdie_streak_target
            && self.achievements.unlock(AchievementId::BirdieStreak)
        {
            unlocked.push(AchievementId::BirdieStreak);
        }

        self.stats.holes_completed = self.stats.holes_completed.saturating_add(1);
        self.stats.total_strokes = self.stats.total_strokes.saturating_add(strokes);
        self.stats.best_score = Some(self.stats.best_score.map_or(strokes, |b| b.min(strokes)));

        let (levels_reached, level_unlocks) = self.gain_xp(xp);
        unlocked.extend(level_unlocks);

        HoleOutcome {
            label,
            delta,
            xp,
            message: label.message(delta),
            levels_reached,
            unlocked,
        }
    }

    /// Add XP, level up, and check level milestones
    pub fn gain_xp(&mut self, amount: u32) -> (Vec<u32>, Vec<AchievementId>) {
        self.stats.total_xp = self.stats.total_xp.saturating_add(amount as u64);
        let levels = self.player.add_xp(amount, self.config.xp_growth);
        let mut unlocked = Vec::new();
        for &level in &levels {
            log::info!("Level up! Now level {level}");
            if level >= 5 && self.achievements.unlock(AchievementId::Level5) {
                unlocked.push(AchievementId::Level5);
            }
            if level >= 10 && self.achievements.unlock(AchievementId::Level10) {
                unlocked.push(AchievementId::Level10);
            }
        }
        (levels, unlocked)
    }

    /// Returns the achievements unlocked by finishing a round
    pub fn record_round(&mut self) -> Vec<AchievementId> {
        self.stats.rounds_completed = self.stats.rounds_completed.saturating_add(1);
        if self.achievements.unlock(AchievementId::CompleteRound) {
            vec![AchievementId::CompleteRound]
        } else {
            Vec::new()
        }
    }

    /// Spend XP to raise a stat
    pub fn upgrade(&mut self, kind: StatKind) -> UpgradeOutcome {
        let cost = self.config.upgrade_cost;
        let max = self.config.max_stat;

        if self.player.stat(kind) >= max {
            return UpgradeOutcome::AtMax;
        }
        if self.player.xp < cost {
            return UpgradeOutcome::NotEnoughXp {
                have: self.player.xp,
                need: cost,
            };
        }

        self.player.xp -= cost;
        let increment = self.config.upgrade_increment;
        let stat = self.player.stat_mut(kind);
        *stat = stat.saturating_add(increment).min(max);
        let value = *stat;

        let mut unlocked = Vec::new();
        let thresholds: &[(u32, AchievementId)] = match kind {
            StatKind::Power => &[(50, AchievementId::Power50), (100, AchievementId::Power100)],
            StatKind::Accuracy => &[(100, AchievementId::Accuracy100)],
        };
        for &(threshold, id) in thresholds {
            if value >= threshold && self.achievements.unlock(id) {
                unlocked.push(id);
            }
        }

        UpgradeOutcome::Upgraded { value, unlocked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn career() -> Career {
        Career::new(ProgressionConfig::default())
    }

    #[test]
    fn test_classify_table() {
        assert_eq!(ScoreLabel::classify(1, 3), ScoreLabel::HoleInOne);
        assert_eq!(ScoreLabel::classify(1, 1), ScoreLabel::HoleInOne);
        assert_eq!(ScoreLabel::classify(1, 5), ScoreLabel::HoleInOne);
        assert_eq!(ScoreLabel::classify(3, 5), ScoreLabel::Eagle);
        assert_eq!(ScoreLabel::classify(2, 5), ScoreLabel::Eagle);
        assert_eq!(ScoreLabel::classify(3, 4), ScoreLabel::Birdie);
        assert_eq!(ScoreLabel::classify(3, 3), ScoreLabel::Par);
        assert_eq!(ScoreLabel::classify(4, 3), ScoreLabel::Bogey);
        assert_eq!(ScoreLabel::classify(7, 3), ScoreLabel::OverPar);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ScoreLabel::Bogey.message(1), "Bogey (+1)");
        assert_eq!(ScoreLabel::OverPar.message(3), "Over par (+3)");
        assert_eq!(ScoreLabel::Par.message(0), "PAR! Well done!");
    }

    #[test]
    fn test_par_awards_par_xp() {
        let mut career = career();
        let outcome = career.record_hole(3, 3);
        assert_eq!(outcome.label, ScoreLabel::Par);
        assert_eq!(outcome.delta, 0);
        assert_eq!(outcome.xp, career.config.xp.par);
        assert_eq!(career.player.xp, career.config.xp.par);
        assert_eq!(career.stats.pars, 1);
        assert_eq!(career.stats.best_score, Some(3));
    }

    #[test]
    fn test_multi_level_jump() {
        let mut player = PlayerProgression::default();
        let levels = player.add_xp(250, 1.5);

        assert_eq!(levels, vec![2, 3]);
        assert_eq!(player.level, 3);
        // 250 - 100 - 150
        assert_eq!(player.xp, 0);
        assert_eq!(player.xp_to_next, 225);
    }

    #[test]
    fn test_level_up_keeps_remainder() {
        let mut player = PlayerProgression::default();
        player.add_xp(130, 1.5);
        assert_eq!((player.level, player.xp, player.xp_to_next), (2, 30, 150));
        player.add_xp(119, 1.5);
        assert_eq!((player.level, player.xp), (2, 149));
        assert!(player.xp < player.xp_to_next);
    }

    #[test]
    fn test_next_threshold_always_grows() {
        assert_eq!(next_threshold(100, 1.5), 150);
        assert_eq!(next_threshold(1, 1.5), 2);
        assert_eq!(next_threshold(u32::MAX, 1.5), u32::MAX);
    }

    #[test]
    fn test_birdie_streak_unlocks_once() {
        let mut career = career();
        career.record_hole(2, 3);
        career.record_hole(3, 4);
        let third = career.record_hole(4, 5);
        assert!(third.unlocked.contains(&AchievementId::BirdieStreak));

        let fourth = career.record_hole(2, 3);
        assert!(!fourth.unlocked.contains(&AchievementId::BirdieStreak));
        assert_eq!(career.birdie_streak, 4);

        career.record_hole(3, 3);
        assert_eq!(career.birdie_streak, 0);
        assert!(career.achievements.is_unlocked(AchievementId::BirdieStreak));
    }

    #[test]
    fn test_hole_in_one_unlocks_and_counts() {
        let mut career = career();
        let outcome = career.record_hole(1, 3);
        assert_eq!(outcome.xp, 100);
        assert_eq!(outcome.unlocked, vec![AchievementId::HoleInOne]);
        assert_eq!(career.stats.holes_in_one, 1);
        // 100 XP pops exactly one level
        assert_eq!(outcome.levels_reached, vec![2]);

        let again = career.record_hole(1, 4);
        assert!(again.unlocked.is_empty());
        assert_eq!(career.stats.holes_in_one, 2);
    }

    #[test]
    fn test_unlock_is_monotonic() {
        let mut achievements = Achievements::default();
        assert!(achievements.unlock(AchievementId::Eagle));
        assert!(!achievements.unlock(AchievementId::Eagle));
        assert!(achievements.is_unlocked(AchievementId::Eagle));
        assert_eq!(achievements.unlocked_count(), 1);
    }

    #[test]
    fn test_level_milestones() {
        let mut career = career();
        let (levels, unlocked) = career.gain_xp(100_000);
        assert!(levels.len() >= 10);
        assert_eq!(unlocked, vec![AchievementId::Level5, AchievementId::Level10]);
        assert!(career.player.xp < career.player.xp_to_next);
    }

    #[test]
    fn test_upgrade_requires_xp() {
        let mut career = career();
        assert_eq!(
            career.upgrade(StatKind::Power),
            UpgradeOutcome::NotEnoughXp { have: 0, need: 50 }
        );
        assert_eq!(career.player.power, 50);

        career.player.xp = 60;
        let outcome = career.upgrade(StatKind::Power);
        assert_eq!(
            outcome,
            UpgradeOutcome::Upgraded {
                value: 55,
                unlocked: vec![AchievementId::Power50]
            }
        );
        assert_eq!(career.player.xp, 10);
    }

    #[test]
    fn test_upgrade_caps_at_max() {
        let mut career = career();
        career.player.accuracy = 148;
        career.player.xp = 99;
        assert!(matches!(
            career.upgrade(StatKind::Accuracy),
            UpgradeOutcome::Upgraded { value: 150, .. }
        ));
        assert_eq!(career.upgrade(StatKind::Accuracy), UpgradeOutcome::AtMax);
        assert_eq!(career.player.xp, 49);
        assert!(career.achievements.is_unlocked(AchievementId::Accuracy100));
    }

    #[test]
    fn test_achievement_id_strings() {
        for id in AchievementId::ALL {
            assert_eq!(id.as_str().parse::<AchievementId>(), Ok(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert_eq!(
            "level_99".parse::<AchievementId>(),
            Err(UnknownAchievement("level_99".to_string()))
        );
    }
}
