//! Game balance settings
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files only override what they name.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Casual,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Casual => "Casual",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" | "easy" => Some(Difficulty::Casual),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Size ratio needed to instantly absorb
    pub fn absorb_threshold(&self) -> f32 {
        match self {
            Difficulty::Casual => 1.3,
            Difficulty::Normal => 1.35,
            Difficulty::Hard => 1.5,
        }
    }

    /// Minimum live enemy population before expansions
    pub fn min_enemies(&self) -> usize {
        match self {
            Difficulty::Casual => 40,
            Difficulty::Normal => 50,
            Difficulty::Hard => 65,
        }
    }

    /// Match length in seconds
    pub fn match_duration_secs(&self) -> f32 {
        match self {
            Difficulty::Casual => 240.0,
            Difficulty::Normal => 180.0,
            Difficulty::Hard => 150.0,
        }
    }
}

/// Tunable balance values for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Collisions ===
    /// Size ratio at which the larger body swallows the smaller whole
    pub absorb_threshold: f32,
    /// Fraction of the smaller body's area lost on a bump
    pub bump_penalty: f32,
    /// Ticks before a food particle can be eaten
    pub food_grace_ticks: u32,

    // === Match ===
    /// Countdown length in seconds
    pub match_duration_secs: f32,

    // === World ===
    /// Arena edge length at match start
    pub initial_world_size: f32,
    /// Multiplier applied to the world on each expansion
    pub expansion_factor: f32,
    /// Player size that triggers the first expansion
    pub first_expansion_size: f32,

    // === Population ===
    pub initial_enemies: usize,
    pub initial_food: usize,
    /// Live enemy floor before any expansion
    pub min_enemies: usize,
    /// Live food floor before any expansion
    pub min_food: usize,
    /// Floor increase per expansion
    pub enemies_per_expansion: usize,
    pub food_per_expansion: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            absorb_threshold: 1.35,
            bump_penalty: 0.15,
            food_grace_ticks: 15,

            match_duration_secs: 180.0,

            initial_world_size: 3000.0,
            expansion_factor: 1.5,
            first_expansion_size: 120.0,

            initial_enemies: 60,
            initial_food: 100,
            min_enemies: 50,
            min_food: 50,
            enemies_per_expansion: 10,
            food_per_expansion: 20,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates difficulty-dependent settings)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.absorb_threshold = preset.absorb_threshold();
        self.min_enemies = preset.min_enemies();
        self.match_duration_secs = preset.match_duration_secs();
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Live enemy floor after `expansions` world expansions
    pub fn enemy_target(&self, expansions: u32) -> usize {
        self.min_enemies + self.enemies_per_expansion * expansions as usize
    }

    /// Live food floor after `expansions` world expansions
    pub fn food_target(&self, expansions: u32) -> usize {
        self.min_food + self.food_per_expansion * expansions as usize
    }

    /// Clamp values that would break simulation invariants
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(self.absorb_threshold > 1.0) {
            log::warn!(
                "absorb_threshold {} must exceed 1.0, using {}",
                self.absorb_threshold,
                defaults.absorb_threshold
            );
            self.absorb_threshold = defaults.absorb_threshold;
        }
        if !(self.bump_penalty > 0.0 && self.bump_penalty < 1.0) {
            log::warn!(
                "bump_penalty {} must be in (0, 1), using {}",
                self.bump_penalty,
                defaults.bump_penalty
            );
            self.bump_penalty = defaults.bump_penalty;
        }
        if !(self.match_duration_secs > 0.0) {
            log::warn!(
                "match_duration_secs {} must be positive, using {}",
                self.match_duration_secs,
                defaults.match_duration_secs
            );
            self.match_duration_secs = defaults.match_duration_secs;
        }
        if !(self.expansion_factor > 1.0) {
            log::warn!(
                "expansion_factor {} must exceed 1.0, using {}",
                self.expansion_factor,
                defaults.expansion_factor
            );
            self.expansion_factor = defaults.expansion_factor;
        }
        if !(self.initial_world_size >= 1000.0) {
            log::warn!(
                "initial_world_size {} too small, using {}",
                self.initial_world_size,
                defaults.initial_world_size
            );
            self.initial_world_size = defaults.initial_world_size;
        }
        if !(self.first_expansion_size > crate::consts::PLAYER_START_SIZE) {
            log::warn!(
                "first_expansion_size {} must exceed the starting size, using {}",
                self.first_expansion_size,
                defaults.first_expansion_size
            );
            self.first_expansion_size = defaults.first_expansion_size;
        }

        self
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.validated()
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Settings for a run: the optional file, then an explicit preset on top
    ///
    /// Without a preset the file's own values (including its difficulty
    /// fields) are used unchanged.
    pub fn resolve(path: Option<&Path>, preset: Option<Difficulty>) -> Self {
        let mut settings = match path {
            Some(path) => Self::load(path),
            None => Self::default(),
        };
        if let Some(preset) = preset {
            settings.apply_preset(preset);
        }
        settings
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Casual));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "bump_penalty": 0.2 }"#).unwrap();
        assert_eq!(settings.bump_penalty, 0.2);
        assert_eq!(settings.absorb_threshold, 1.35);
        assert_eq!(settings.initial_enemies, 60);
    }

    #[test]
    fn test_validated_repairs_bad_values() {
        let settings = Settings {
            absorb_threshold: 0.9,
            bump_penalty: 1.5,
            expansion_factor: 1.0,
            ..Default::default()
        }
        .validated();
        assert_eq!(settings.absorb_threshold, 1.35);
        assert_eq!(settings.bump_penalty, 0.15);
        assert_eq!(settings.expansion_factor, 1.5);
    }

    #[test]
    fn test_preset_applies() {
        let settings = Settings::from_preset(Difficulty::Hard);
        assert_eq!(settings.absorb_threshold, 1.5);
        assert_eq!(settings.match_duration_secs, 150.0);
        assert_eq!(settings.enemy_target(2), 65 + 20);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load("/nonexistent/block-devourer.json");
        assert_eq!(settings, Settings::default());
    }

    fn temp_settings_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("block-devourer-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_settings_path("save");
        let settings = Settings {
            bump_penalty: 0.2,
            initial_food: 40,
            ..Settings::from_preset(Difficulty::Hard)
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_resolve_keeps_file_values_without_preset() {
        let path = temp_settings_path("resolve");
        std::fs::write(
            &path,
            r#"{ "difficulty": "Hard", "absorb_threshold": 1.42, "match_duration_secs": 99.0, "min_enemies": 12 }"#,
        )
        .unwrap();

        let from_file = Settings::resolve(Some(&path), None);
        let overridden = Settings::resolve(Some(&path), Some(Difficulty::Casual));
        let _ = std::fs::remove_file(&path);

        assert_eq!(from_file.difficulty, Difficulty::Hard);
        assert_eq!(from_file.absorb_threshold, 1.42);
        assert_eq!(from_file.match_duration_secs, 99.0);
        assert_eq!(from_file.min_enemies, 12);

        assert_eq!(overridden.difficulty, Difficulty::Casual);
        assert_eq!(overridden.absorb_threshold, 1.3);
        assert_eq!(overridden.match_duration_secs, 240.0);
    }

    #[test]
    fn test_resolve_without_file() {
        assert_eq!(Settings::resolve(None, None), Settings::default());
        assert_eq!(
            Settings::resolve(None, Some(Difficulty::Hard)),
            Settings::from_preset(Difficulty::Hard)
        );
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::from_preset(Difficulty::Casual);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
