//! Game settings and balance
//!
//! Loaded from JSON (a file on native, LocalStorage on the web). Every field
//! has a default, so partial documents are fine.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::{LevelCatalog, LevelDef, ObjectiveKind};

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    pub player_bottom_offset: f32,
    pub player_max_tilt: f32,
    pub player_tilt_easing: f32,

    // === Bullets ===
    pub bullet_size: f32,
    pub bullet_speed: f32,

    // === Hazards ===
    pub hazard_size: f32,
    pub hazard_base_speed: f32,
    pub hazard_speed_per_level: f32,
    pub hazard_speed_jitter: f32,

    // === Spawning ===
    pub spawn_threshold_start: u32,
    pub spawn_threshold_step: u32,
    pub spawn_threshold_floor: u32,

    // === Misc ===
    pub particle_count: usize,
    /// Level banner duration in milliseconds of real time
    pub level_intro_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            player_max_tilt: PLAYER_MAX_TILT,
            player_tilt_easing: PLAYER_TILT_EASING,

            bullet_size: BULLET_SIZE,
            bullet_speed: BULLET_SPEED,

            hazard_size: HAZARD_SIZE,
            hazard_base_speed: HAZARD_BASE_SPEED,
            hazard_speed_per_level: HAZARD_SPEED_PER_LEVEL,
            hazard_speed_jitter: HAZARD_SPEED_JITTER,

            spawn_threshold_start: SPAWN_THRESHOLD_START,
            spawn_threshold_step: SPAWN_THRESHOLD_STEP,
            spawn_threshold_floor: SPAWN_THRESHOLD_FLOOR,

            particle_count: PARTICLE_COUNT,
            level_intro_ms: LEVEL_INTRO_MS,
        }
    }
}

impl Tuning {
    /// Upper bound on the decorative particle population
    pub const MAX_PARTICLES: usize = 10_000;

    /// Reject balance values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("player_size", self.player_size),
            ("player_speed", self.player_speed),
            ("bullet_size", self.bullet_size),
            ("bullet_speed", self.bullet_speed),
            ("hazard_size", self.hazard_size),
            ("hazard_base_speed", self.hazard_base_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        let non_negative = [
            ("player_bottom_offset", self.player_bottom_offset),
            ("player_max_tilt", self.player_max_tilt),
            ("hazard_speed_per_level", self.hazard_speed_per_level),
            ("hazard_speed_jitter", self.hazard_speed_jitter),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::Invalid(format!("{} must not be negative, got {}", name, value)));
            }
        }

        if !(0.0..=1.0).contains(&self.player_tilt_easing) {
            return Err(SettingsError::Invalid(format!(
                "player_tilt_easing {} outside 0..1",
                self.player_tilt_easing
            )));
        }
        if self.particle_count > Self::MAX_PARTICLES {
            return Err(SettingsError::Invalid(format!(
                "particle_count {} exceeds {}",
                self.particle_count,
                Self::MAX_PARTICLES
            )));
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial play area; platforms replace it with the real canvas size
    pub screen_width: f32,
    pub screen_height: f32,
    /// Fixed run seed; a fresh one is drawn per session when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    /// Balance
    pub tuning: Tuning,
    /// Replaces the built-in level table when present
    pub levels: Option<Vec<LevelDef>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            seed: None,
            music_volume: 0.7,
            muted: false,
            tuning: Tuning::default(),
            levels: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "ocean_sweep_settings";

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "screen must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(SettingsError::Invalid(format!(
                "music_volume {} outside 0..1",
                self.music_volume
            )));
        }
        self.tuning.validate()?;
        if let Some(levels) = &self.levels {
            for level in levels {
                match level.objective.kind {
                    ObjectiveKind::Collect { amount: 0 } | ObjectiveKind::Survive { amount: 0 } => {
                        return Err(SettingsError::Invalid(format!(
                            "level `{}` has a zero objective amount",
                            level.title
                        )));
                    }
                    _ => {}
                }
            }
        }
        self.catalog().map(|_| ())
    }

    /// The level table in effect
    pub fn catalog(&self) -> Result<LevelCatalog, SettingsError> {
        match &self.levels {
            Some(levels) => LevelCatalog::new(levels.clone()),
            None => Ok(LevelCatalog::default()),
        }
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 5, "tuning": { "bullet_size": 20 } }"#).unwrap();
        assert_eq!(settings.seed, Some(5));
        assert_eq!(settings.tuning.bullet_size, 20.0);
        assert_eq!(settings.tuning.bullet_speed, BULLET_SPEED);
        assert_eq!(settings.screen_width, SCREEN_WIDTH);
        assert_eq!(settings.catalog().unwrap().len(), 4);
    }

    #[test]
    fn test_roundtrip_defaults() {
        let json = Settings::default().to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), Settings::default());
    }

    #[test]
    fn test_stored_document_reloads_with_custom_levels() {
        let settings = Settings {
            seed: Some(12),
            muted: true,
            levels: Some(LevelCatalog::default().iter().take(2).cloned().collect()),
            ..Default::default()
        };
        let stored = settings.to_json().unwrap();
        let reloaded = Settings::from_json(&stored).unwrap();
        assert_eq!(reloaded, settings);
        assert_eq!(reloaded.catalog().unwrap().len(), 2);
    }

    #[test]
    fn test_custom_catalog() {
        let json = r#"{
            "levels": [
                {
                    "title": "Only",
                    "objective": { "type": "survive", "amount": 2, "text": "Hold on" },
                    "allowed_hazards": ["tire"]
                }
            ]
        }"#;
        let catalog = Settings::from_json(json).unwrap().catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.level(1).objective.kind, ObjectiveKind::Survive { amount: 2 });
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "screen_width": 0 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "levels": [] }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "levels": [{ "title": "x", "objective": { "type": "collect", "amount": 0, "text": "" }, "allowed_hazards": ["can"] }] }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(Settings::from_json("not json"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_out_of_range_tuning_rejected() {
        for json in [
            r#"{ "tuning": { "player_tilt_easing": 1.5 } }"#,
            r#"{ "tuning": { "player_tilt_easing": -0.1 } }"#,
            r#"{ "tuning": { "player_speed": -6 } }"#,
            r#"{ "tuning": { "hazard_size": 0 } }"#,
            r#"{ "tuning": { "hazard_speed_jitter": -1 } }"#,
            r#"{ "tuning": { "particle_count": 5000000 } }"#,
        ] {
            assert!(
                matches!(Settings::from_json(json), Err(SettingsError::Invalid(_))),
                "accepted {}",
                json
            );
        }
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_mute_zeroes_volume() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_music_volume(), 0.0);
    }
}
