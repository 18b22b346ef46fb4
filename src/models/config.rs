//! Per-session configuration: lanes, difficulty, modifiers and key tables.
//!
//! Loaded from TOML; every field has a default so partial files work.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const SUPPORTED_LANE_COUNTS: [usize; 3] = [4, 6, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitWindowMode {
    #[default]
    Standard,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyPreset {
    Easy,
    Normal,
    Hard,
    Expert,
    Master,
}

impl FromStr for DifficultyPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            "expert" => Ok(Self::Expert),
            "master" => Ok(Self::Master),
            other => Err(ConfigError::Invalid(format!(
                "unknown difficulty preset '{other}'"
            ))),
        }
    }
}

/// Difficulty profile driving chart density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    /// Display name, also part of the result storage key.
    pub name: String,
    /// 1 to 5. Holds appear from 3 stars.
    pub star_rating: u8,
    /// Fraction of beats kept as taps (0-1].
    pub note_density: f64,
    /// Segments above this confidence become taps.
    pub segment_confidence_threshold: f64,
}

impl Difficulty {
    pub fn preset(preset: DifficultyPreset) -> Self {
        let (name, star_rating, note_density, segment_confidence_threshold) = match preset {
            DifficultyPreset::Easy => ("Easy", 1, 0.25, 0.9),
            DifficultyPreset::Normal => ("Normal", 2, 0.5, 0.8),
            DifficultyPreset::Hard => ("Hard", 3, 0.5, 0.7),
            DifficultyPreset::Expert => ("Expert", 4, 1.0, 0.6),
            DifficultyPreset::Master => ("Master", 5, 1.0, 0.5),
        };
        Self {
            name: name.to_string(),
            star_rating,
            note_density,
            segment_confidence_threshold,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::preset(DifficultyPreset::Normal)
    }
}

/// Independent gameplay modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Reflect lane indices.
    pub mirror: bool,
    /// Draw a uniformly random lane per note.
    pub random: bool,
    /// Misses never cost health.
    pub no_fail: bool,
    /// Notes fade out before the judgement line.
    pub hidden: bool,
    /// Notes appear only near the judgement line.
    pub sudden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub lane_count: usize,
    pub difficulty: Difficulty,
    pub modifiers: Modifiers,
    /// Added to the corrected playback time before every timing comparison.
    pub sync_offset_ms: i32,
    pub hit_window: HitWindowMode,
    /// Key names per lane, keyed by lane count ("4", "6", "8").
    pub keybinds: HashMap<String, Vec<String>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lane_count: 4,
            difficulty: Difficulty::default(),
            modifiers: Modifiers::default(),
            sync_offset_ms: 0,
            hit_window: HitWindowMode::Standard,
            keybinds: HashMap::new(),
        }
    }
}

impl GameConfig {
    /// Loads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("CONFIG: Loaded {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_LANE_COUNTS.contains(&self.lane_count) {
            return Err(ConfigError::Invalid(format!(
                "lane_count must be one of {:?}, got {}",
                SUPPORTED_LANE_COUNTS, self.lane_count
            )));
        }
        if !(1..=5).contains(&self.difficulty.star_rating) {
            return Err(ConfigError::Invalid(format!(
                "star_rating must be between 1 and 5, got {}",
                self.difficulty.star_rating
            )));
        }
        if !(self.difficulty.note_density > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "note_density must be positive, got {}",
                self.difficulty.note_density
            )));
        }
        if !(0.0..=1.0).contains(&self.difficulty.segment_confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "segment_confidence_threshold must be within [0, 1], got {}",
                self.difficulty.segment_confidence_threshold
            )));
        }
        Ok(())
    }

    /// Key names for the configured lane count, falling back to the defaults.
    pub fn lane_keys(&self) -> Vec<String> {
        self.keybinds
            .get(&self.lane_count.to_string())
            .filter(|keys| !keys.is_empty())
            .cloned()
            .unwrap_or_else(|| default_lane_keys(self.lane_count))
    }
}

pub fn default_lane_keys(lane_count: usize) -> Vec<String> {
    let keys: &[&str] = match lane_count {
        4 => &["KeyD", "KeyF", "KeyJ", "KeyK"],
        6 => &["KeyS", "KeyD", "KeyF", "KeyJ", "KeyK", "KeyL"],
        8 => &[
            "KeyA",
            "KeyS",
            "KeyD",
            "KeyF",
            "KeyJ",
            "KeyK",
            "KeyL",
            "Semicolon",
        ],
        _ => &[],
    };
    keys.iter().map(|k| k.to_string()).collect()
}
