//! Error types
//!
//! None of these abort the game: asset and audio failures are reported and
//! play continues, settings failures fall back to defaults.

/// An asset that reached a terminal state without loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load asset `{key}` from {source_path}")]
    Failed { key: String, source_path: String },

    #[error("asset `{0}` is not in the manifest")]
    Unknown(String),
}

/// Music playback could not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// Typically the browser refusing playback until a user gesture
    #[error("playback blocked: {0}")]
    Blocked(String),

    #[error("no audio output available")]
    Unavailable,
}

/// Settings could not be read or are inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
