//! Level catalog
//!
//! An ordered, immutable table of level definitions keyed by a 1-based level
//! number. Built once at startup (built-in or from settings) and never mutated.

use serde::{Deserialize, Serialize};

use super::entity::HazardKind;
use crate::error::SettingsError;

/// Completion condition of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectiveKind {
    /// Destroy `amount` hazards
    Collect { amount: u32 },
    /// Stay alive for `amount` seconds
    Survive { amount: u32 },
    /// Never completes
    Endless,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(flatten)]
    pub kind: ObjectiveKind,
    /// Shown in the level banner and the HUD
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    pub title: String,
    pub objective: Objective,
    pub allowed_hazards: Vec<HazardKind>,
}

impl LevelDef {
    fn new(title: &str, kind: ObjectiveKind, text: &str, allowed_hazards: &[HazardKind]) -> Self {
        Self {
            title: title.to_string(),
            objective: Objective {
                kind,
                text: text.to_string(),
            },
            allowed_hazards: allowed_hazards.to_vec(),
        }
    }
}

/// Result of asking the catalog for the level after the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(u32),
    /// Already on the last entry; replay it
    Clamped(u32),
}

impl Advance {
    pub fn level(self) -> u32 {
        match self {
            Advance::Next(level) | Advance::Clamped(level) => level,
        }
    }
}

/// Ordered level table. Never empty, and every level allows at least one hazard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<LevelDef>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        use HazardKind::*;
        Self {
            levels: vec![
                LevelDef::new(
                    "Level 1",
                    ObjectiveKind::Collect { amount: 10 },
                    "Destroy 10 pieces of litter",
                    &[Bottle, Can],
                ),
                LevelDef::new(
                    "Level 2",
                    ObjectiveKind::Collect { amount: 20 },
                    "Destroy 20 pieces of litter",
                    &[Bottle, Can, Banana],
                ),
                LevelDef::new(
                    "Level 3",
                    ObjectiveKind::Survive { amount: 30 },
                    "Survive for 30 seconds!",
                    &[Bottle, Can, Banana, Tire],
                ),
                LevelDef::new(
                    "Endless Mode",
                    ObjectiveKind::Endless,
                    "Get the highest score!",
                    &[Banana, Bottle, Can, Tire],
                ),
            ],
        }
    }
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, SettingsError> {
        if levels.is_empty() {
            return Err(SettingsError::Invalid("level catalog is empty".into()));
        }
        for (i, level) in levels.iter().enumerate() {
            if level.allowed_hazards.is_empty() {
                return Err(SettingsError::Invalid(format!(
                    "level {} (`{}`) allows no hazard types",
                    i + 1,
                    level.title
                )));
            }
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn first_level(&self) -> u32 {
        1
    }

    pub fn last_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Look up a level by its 1-based number
    pub fn get(&self, level: u32) -> Option<&LevelDef> {
        let index = (level as usize).checked_sub(1)?;
        self.levels.get(index)
    }

    /// Look up a level, clamping out-of-range numbers into the table
    pub fn level(&self, level: u32) -> &LevelDef {
        let index = (level as usize).clamp(1, self.levels.len()) - 1;
        &self.levels[index]
    }

    /// The level that follows `level`, pinned at the last entry
    pub fn advance(&self, level: u32) -> Advance {
        let next = level.saturating_add(1);
        if self.get(next).is_some() {
            Advance::Next(next)
        } else {
            Advance::Clamped(self.last_level())
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = LevelCatalog::default();
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.level(1).objective.kind,
            ObjectiveKind::Collect { amount: 10 }
        );
        assert_eq!(
            catalog.level(3).objective.kind,
            ObjectiveKind::Survive { amount: 30 }
        );
        assert_eq!(catalog.level(4).objective.kind, ObjectiveKind::Endless);
        assert!(catalog.iter().all(|l| !l.allowed_hazards.is_empty()));
    }

    #[test]
    fn test_advance_clamps_at_last_level() {
        let catalog = LevelCatalog::default();
        assert_eq!(catalog.advance(1), Advance::Next(2));
        assert_eq!(catalog.advance(3), Advance::Next(4));
        assert_eq!(catalog.advance(4), Advance::Clamped(4));
        assert_eq!(catalog.advance(u32::MAX), Advance::Clamped(4));
    }

    #[test]
    fn test_lookup_bounds() {
        let catalog = LevelCatalog::default();
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(5).is_none());
        assert_eq!(catalog.level(0).title, "Level 1");
        assert_eq!(catalog.level(99).title, "Endless Mode");
    }

    #[test]
    fn test_rejects_empty_tables() {
        assert!(LevelCatalog::new(Vec::new()).is_err());

        let mut level = LevelCatalog::default().level(1).clone();
        level.allowed_hazards.clear();
        assert!(LevelCatalog::new(vec![level]).is_err());
    }

    #[test]
    fn test_objective_json_shape() {
        let json = r#"{
            "title": "Warmup",
            "objective": { "type": "collect", "amount": 3, "text": "Destroy 3" },
            "allowed_hazards": ["bottle"]
        }"#;
        let level: LevelDef = serde_json::from_str(json).unwrap();
        assert_eq!(level.objective.kind, ObjectiveKind::Collect { amount: 3 });
        assert_eq!(level.allowed_hazards, vec![HazardKind::Bottle]);

        let endless = r#"{ "type": "endless", "text": "Forever" }"#;
        let objective: Objective = serde_json::from_str(endless).unwrap();
        assert_eq!(objective.kind, ObjectiveKind::Endless);
    }
}
