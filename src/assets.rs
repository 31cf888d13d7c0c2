//! Asset manifest and readiness gate
//!
//! Loading happens elsewhere (the platform layer), one asset at a time and in
//! any order. The tracker only counts terminal results: a failed asset counts
//! toward readiness so the game never waits forever, and the failure is
//! returned to the caller as a diagnostic.

use crate::error::AssetError;
use crate::sim::HazardKind;

/// A named image the game expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub key: String,
    pub path: String,
}

impl AssetEntry {
    pub fn new(key: &str, path: &str) -> Self {
        Self {
            key: key.to_string(),
            path: path.to_string(),
        }
    }
}

pub const PLAYER_ASSET: &str = "player";
pub const BULLET_ASSET: &str = "bullet";
pub const BACKGROUND_ASSET: &str = "background";

/// Images the built-in game draws
pub fn default_manifest() -> Vec<AssetEntry> {
    let mut manifest = vec![
        AssetEntry::new(PLAYER_ASSET, "assets/submarine.png"),
        AssetEntry::new(BULLET_ASSET, "assets/bubble.png"),
        AssetEntry::new(BACKGROUND_ASSET, "assets/ocean.png"),
    ];
    for kind in HazardKind::ALL {
        let key = kind.asset_key();
        let file = key.trim_start_matches("hazard_");
        manifest.push(AssetEntry::new(key, &format!("assets/{file}.png")));
    }
    manifest
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed,
}

/// Completion signal reported by the loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetEvent {
    Loaded(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AssetTracker {
    entries: Vec<(AssetEntry, AssetStatus)>,
}

impl AssetTracker {
    pub fn new(manifest: Vec<AssetEntry>) -> Self {
        Self {
            entries: manifest
                .into_iter()
                .map(|entry| (entry, AssetStatus::Pending))
                .collect(),
        }
    }

    pub fn manifest(&self) -> impl Iterator<Item = &AssetEntry> {
        self.entries.iter().map(|(entry, _)| entry)
    }

    /// Apply a completion signal. Each asset settles once; repeated signals
    /// for a settled asset are ignored.
    pub fn record(&mut self, event: &AssetEvent) -> Result<(), AssetError> {
        let (key, status) = match event {
            AssetEvent::Loaded(key) => (key, AssetStatus::Loaded),
            AssetEvent::Failed(key) => (key, AssetStatus::Failed),
        };
        let Some((entry, slot)) = self.entries.iter_mut().find(|(e, _)| &e.key == key) else {
            return Err(AssetError::Unknown(key.clone()));
        };
        if *slot != AssetStatus::Pending {
            return Ok(());
        }
        *slot = status;
        if status == AssetStatus::Failed {
            return Err(AssetError::Failed {
                key: entry.key.clone(),
                source_path: entry.path.clone(),
            });
        }
        Ok(())
    }

    pub fn status(&self, key: &str) -> Option<AssetStatus> {
        self.entries
            .iter()
            .find(|(e, _)| e.key == key)
            .map(|(_, status)| *status)
    }

    /// Loaded and drawable
    pub fn is_available(&self, key: &str) -> bool {
        self.status(key) == Some(AssetStatus::Loaded)
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.count(AssetStatus::Loaded)
    }

    pub fn failed_count(&self) -> usize {
        self.count(AssetStatus::Failed)
    }

    /// Assets that reached a terminal state
    pub fn settled_count(&self) -> usize {
        self.total() - self.count(AssetStatus::Pending)
    }

    /// Every declared asset has settled
    pub fn is_ready(&self) -> bool {
        self.settled_count() == self.total()
    }

    fn count(&self, status: AssetStatus) -> usize {
        self.entries.iter().filter(|(_, s)| *s == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_covers_every_hazard() {
        let tracker = AssetTracker::new(default_manifest());
        assert_eq!(tracker.total(), 7);
        for kind in HazardKind::ALL {
            assert_eq!(tracker.status(kind.asset_key()), Some(AssetStatus::Pending));
        }
    }

    #[test]
    fn test_ready_in_any_order() {
        let mut tracker = AssetTracker::new(default_manifest());
        let keys: Vec<String> = tracker.manifest().map(|e| e.key.clone()).collect();
        for key in keys.iter().rev() {
            assert!(!tracker.is_ready());
            tracker.record(&AssetEvent::Loaded(key.clone())).unwrap();
        }
        assert!(tracker.is_ready());
        assert_eq!(tracker.loaded_count(), 7);
    }

    #[test]
    fn test_failure_counts_toward_readiness() {
        let mut tracker = AssetTracker::new(vec![
            AssetEntry::new("a", "a.png"),
            AssetEntry::new("b", "b.png"),
        ]);
        tracker.record(&AssetEvent::Loaded("a".into())).unwrap();
        let err = tracker.record(&AssetEvent::Failed("b".into())).unwrap_err();
        assert_eq!(
            err,
            AssetError::Failed {
                key: "b".into(),
                source_path: "b.png".into()
            }
        );
        assert!(tracker.is_ready());
        assert!(!tracker.is_available("b"));
        assert_eq!(tracker.failed_count(), 1);
    }

    #[test]
    fn test_duplicate_signals_count_once() {
        let mut tracker = AssetTracker::new(vec![
            AssetEntry::new("a", "a.png"),
            AssetEntry::new("b", "b.png"),
        ]);
        tracker.record(&AssetEvent::Loaded("a".into())).unwrap();
        tracker.record(&AssetEvent::Loaded("a".into())).unwrap();
        tracker.record(&AssetEvent::Failed("a".into())).unwrap();
        assert_eq!(tracker.settled_count(), 1);
        assert!(!tracker.is_ready());
        assert!(tracker.is_available("a"));
    }

    #[test]
    fn test_unknown_asset_rejected() {
        let mut tracker = AssetTracker::new(default_manifest());
        assert_eq!(
            tracker.record(&AssetEvent::Loaded("nope".into())),
            Err(AssetError::Unknown("nope".into()))
        );
    }
}
