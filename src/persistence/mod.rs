//! Save/load of career progress
//!
//! Features:
//! - Versioned JSON document {player, stats, achievements, current_hole}
//! - Field-by-field restore: a missing or malformed field falls back to its
//!   default without discarding the rest of the save
//! - Restored values are sanitized before they reach the session

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::progression::{AchievementId, CareerStats, PlayerProgression};
use crate::sim::Session;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Errors from reading or writing save files
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(err) => write!(f, "save file I/O failed: {err}"),
            PersistError::Json(err) => write!(f, "save data is not valid JSON: {err}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(err) => Some(err),
            PersistError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        PersistError::Io(err)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::Json(err)
    }
}

/// Unlock flag for one achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAchievement {
    pub id: AchievementId,
    pub unlocked: bool,
}

/// Persisted career snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub player: PlayerProgression,
    pub stats: CareerStats,
    pub achievements: Vec<SavedAchievement>,
    /// 1-based
    pub current_hole: usize,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            player: PlayerProgression::default(),
            stats: CareerStats::default(),
            achievements: Vec::new(),
            current_hole: 1,
        }
    }
}

/// Extract `key` from `obj`, falling back to `default` when missing or malformed
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, section: &str, key: &str, default: T) -> T {
    match obj.get(key) {
        None => {
            log::warn!("Save is missing {section}.{key}, using default");
            default
        }
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("Save has invalid {section}.{key} ({err}), using default");
                default
            }
        },
    }
}

fn section<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    match root.get(key) {
        Some(Value::Object(obj)) => Some(obj),
        Some(_) => {
            log::warn!("Save section {key} is not an object, using defaults");
            None
        }
        None => {
            log::warn!("Save is missing section {key}, using defaults");
            None
        }
    }
}

impl SaveData {
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a save. Never fails: anything unreadable becomes a default.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                log::warn!("Save data is not valid JSON ({err}), starting fresh");
                Self::default()
            }
        }
    }

    /// Field-by-field extraction from an already parsed document
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(root) = value.as_object() else {
            log::warn!("Save data is not an object, starting fresh");
            return defaults;
        };

        let player = match section(root, "player") {
            Some(obj) => {
                let d = &defaults.player;
                PlayerProgression {
                    level: field(obj, "player", "level", d.level),
                    xp: field(obj, "player", "xp", d.xp),
                    xp_to_next: field(obj, "player", "xp_to_next", d.xp_to_next),
                    power: field(obj, "player", "power", d.power),
                    accuracy: field(obj, "player", "accuracy", d.accuracy),
                }
            }
            None => defaults.player.clone(),
        };

        let stats = match section(root, "stats") {
            Some(obj) => CareerStats {
                holes_completed: field(obj, "stats", "holes_completed", 0),
                total_strokes: field(obj, "stats", "total_strokes", 0),
                best_score: field(obj, "stats", "best_score", None),
                holes_in_one: field(obj, "stats", "holes_in_one", 0),
                eagles: field(obj, "stats", "eagles", 0),
                birdies: field(obj, "stats", "birdies", 0),
                pars: field(obj, "stats", "pars", 0),
                rounds_completed: field(obj, "stats", "rounds_completed", 0),
                total_xp: field(obj, "stats", "total_xp", 0),
            },
            None => CareerStats::default(),
        };

        let achievements = match root.get("achievements") {
            Some(Value::Array(items)) => items.iter().filter_map(parse_achievement).collect(),
            Some(_) => {
                log::warn!("Save achievements is not a list, using defaults");
                Vec::new()
            }
            None => Vec::new(),
        };

        Self {
            version: field(root, "save", "version", SAVE_VERSION),
            player,
            stats,
            achievements,
            current_hole: field(root, "save", "current_hole", 1usize).max(1),
        }
    }
}

/// Entries are matched by id; unknown ids are skipped
fn parse_achievement(item: &Value) -> Option<SavedAchievement> {
    let id = item.get("id").and_then(Value::as_str)?;
    let id = match id.parse::<AchievementId>() {
        Ok(id) => id,
        Err(err) => {
            log::warn!("Save has {err}, skipping");
            return None;
        }
    };
    let unlocked = item.get("unlocked").and_then(Value::as_bool).unwrap_or(false);
    Some(SavedAchievement { id, unlocked })
}

/// Write a save file
pub fn save_to_path(path: impl AsRef<Path>, data: &SaveData) -> Result<(), PersistError> {
    fs::write(path.as_ref(), data.to_json()?)?;
    log::info!("Progress saved to {}", path.as_ref().display());
    Ok(())
}

/// Read a save file; absent or unreadable files yield defaults
pub fn load_from_path(path: impl AsRef<Path>) -> SaveData {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(json) => {
            log::info!("Loaded save from {}", path.display());
            SaveData::from_json(&json)
        }
        Err(err) => {
            log::info!("No save at {} ({err}), starting fresh", path.display());
            SaveData::default()
        }
    }
}

impl Session {
    /// Persistable career snapshot
    pub fn save_data(&self) -> SaveData {
        SaveData {
            version: SAVE_VERSION,
            player: self.career.player.clone(),
            stats: self.career.stats.clone(),
            achievements: self
                .career
                .achievements
                .list
                .iter()
                .map(|a| SavedAchievement {
                    id: a.id,
                    unlocked: a.unlocked,
                })
                .collect(),
            current_hole: self.hole_index,
        }
    }

    /// Apply a save. Any hole in progress is discarded; the ball goes to the
    /// restored hole's tee. Unlocks already held by this session are kept.
    pub fn restore(&mut self, data: SaveData) {
        let config = &self.settings.progression;
        let mut player = data.player;
        player.level = player.level.max(1);
        player.power = player.power.min(config.max_stat);
        player.accuracy = player.accuracy.min(config.max_stat);
        let folded = player.apply_level_ups(config.xp_growth);
        if !folded.is_empty() {
            log::warn!("Restored XP exceeded its threshold, now level {}", player.level);
        }

        self.career.player = player;
        self.career.stats = data.stats;
        self.career.birdie_streak = 0;
        for saved in data.achievements.iter().filter(|a| a.unlocked) {
            self.career.achievements.unlock(saved.id);
        }

        let hole = data.current_hole.clamp(1, self.course.len());
        if hole != data.current_hole {
            log::warn!("Restored hole {} out of range, using {hole}", data.current_hole);
        }
        self.round_score = 0;
        self.scorecard.clear();
        self.last_hole = None;
        self.load_hole(hole);
        log::info!(
            "Restored level {} ({}/{} XP) at hole {hole}",
            self.career.player.level,
            self.career.player.xp,
            self.career.player.xp_to_next
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::GamePhase;

    #[test]
    fn test_save_restore_round_trip() {
        let mut session = Session::new(Settings::with_seed(4));
        session.career.gain_xp(180);
        session.career.achievements.unlock(AchievementId::Eagle);
        session.career.stats.holes_completed = 12;
        session.load_hole(5);

        let json = session.save_data().to_json().unwrap();
        let mut restored = Session::new(Settings::with_seed(4));
        restored.restore(SaveData::from_json(&json));

        assert_eq!(restored.career.player, session.career.player);
        assert_eq!(restored.career.stats, session.career.stats);
        assert!(restored.career.achievements.is_unlocked(AchievementId::Eagle));
        assert_eq!(restored.hole_index(), 5);
        assert_eq!(restored.phase(), GamePhase::Aiming);
    }

    #[test]
    fn test_malformed_fields_fall_back_individually() {
        let json = r#"{
            "player": { "level": "seven", "xp": 40, "xp_to_next": 150, "power": 70 },
            "stats": { "holes_completed": 3, "best_score": null, "total_strokes": -4 },
            "achievements": [
                { "id": "first_shot", "title": "First Swing", "unlocked": true },
                { "id": "no_such_thing", "unlocked": true },
                { "unlocked": true }
            ],
            "current_hole": 4
        }"#;
        let data = SaveData::from_json(json);

        assert_eq!(data.player.level, 1);
        assert_eq!(data.player.xp, 40);
        assert_eq!(data.player.xp_to_next, 150);
        assert_eq!(data.player.power, 70);
        assert_eq!(data.player.accuracy, 50);
        assert_eq!(data.stats.holes_completed, 3);
        assert_eq!(data.stats.total_strokes, 0);
        assert_eq!(data.stats.best_score, None);
        assert_eq!(
            data.achievements,
            vec![SavedAchievement {
                id: AchievementId::FirstShot,
                unlocked: true
            }]
        );
        assert_eq!(data.current_hole, 4);
    }

    #[test]
    fn test_garbage_is_default() {
        assert_eq!(SaveData::from_json("not json"), SaveData::default());
        assert_eq!(SaveData::from_json("[1, 2, 3]"), SaveData::default());
        let data = SaveData::from_json(r#"{ "player": 5, "current_hole": 0 }"#);
        assert_eq!(data.player, PlayerProgression::default());
        assert_eq!(data.current_hole, 1);
    }

    #[test]
    fn test_restore_sanitizes() {
        let mut session = Session::new(Settings::with_seed(4));
        let data = SaveData {
            player: PlayerProgression {
                level: 0,
                xp: 260,
                xp_to_next: 100,
                power: 900,
                accuracy: 60,
            },
            current_hole: 42,
            ..SaveData::default()
        };
        session.restore(data);

        let player = &session.career.player;
        assert_eq!(player.level, 3);
        assert_eq!(player.xp, 10);
        assert_eq!(player.xp_to_next, 225);
        assert_eq!(player.power, 150);
        assert_eq!(session.hole_index(), 9);
    }

    #[test]
    fn test_restore_saturates_huge_counters() {
        let mut session = Session::new(Settings::with_seed(4));
        let data = SaveData {
            player: PlayerProgression {
                level: u32::MAX,
                xp: 500,
                xp_to_next: 100,
                ..PlayerProgression::default()
            },
            stats: CareerStats {
                holes_completed: u32::MAX,
                total_strokes: u32::MAX - 1,
                pars: u32::MAX,
                total_xp: u64::MAX,
                ..CareerStats::default()
            },
            ..SaveData::default()
        };
        session.restore(data);

        let player = &session.career.player;
        assert_eq!(player.level, u32::MAX);
        assert_eq!((player.xp, player.xp_to_next), (25, 337));

        session.career.record_hole(3, 3);
        let stats = &session.career.stats;
        assert_eq!(stats.holes_completed, u32::MAX);
        assert_eq!(stats.total_strokes, u32::MAX);
        assert_eq!(stats.pars, u32::MAX);
        assert_eq!(stats.total_xp, u64::MAX);
        assert_eq!(session.career.player.level, u32::MAX);
    }

    #[test]
    fn test_restore_never_relocks() {
        let mut session = Session::new(Settings::with_seed(4));
        session.career.achievements.unlock(AchievementId::HoleInOne);
        session.restore(SaveData::default());
        assert!(session.career.achievements.is_unlocked(AchievementId::HoleInOne));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("mini_golf_save_{}.json", std::process::id()));
        let data = SaveData {
            current_hole: 3,
            ..SaveData::default()
        };
        save_to_path(&path, &data).unwrap();
        assert_eq!(load_from_path(&path), data);
        let _ = fs::remove_file(&path);

        assert_eq!(load_from_path(&path), SaveData::default());
    }
}
