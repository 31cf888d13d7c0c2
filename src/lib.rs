//! Ocean Sweep - a submarine arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, levels, collisions, session state)
//! - `machine`: Top-level game phases and their transitions
//! - `driver`: Per-frame entry point, the only holder of "now"
//! - `assets`: Asset manifest and load-readiness gate
//! - `scene`: Draw primitives handed to the presentation layer
//! - `audio`: Music start/stop control
//! - `settings`: Data-driven configuration and game balance

pub mod assets;
pub mod audio;
pub mod driver;
pub mod error;
pub mod machine;
pub mod platform;
pub mod scene;
pub mod settings;
pub mod sim;

pub use driver::{FrameDriver, FrameInput};
pub use error::{AssetError, AudioError, SettingsError};
pub use machine::{GameMachine, GamePhase};
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate used for every time-based conversion
    pub const SIM_RATE: u32 = 60;

    /// Default screen dimensions (the platform normally overrides these)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player craft
    pub const PLAYER_SIZE: f32 = 80.0;
    pub const PLAYER_SPEED: f32 = 6.0;
    /// Distance from the bottom edge to the player's top
    pub const PLAYER_BOTTOM_OFFSET: f32 = 200.0;
    /// Maximum tilt (radians) and the easing factor toward it
    pub const PLAYER_MAX_TILT: f32 = 0.2;
    pub const PLAYER_TILT_EASING: f32 = 0.1;

    /// Bullets travel straight up
    pub const BULLET_SIZE: f32 = 30.0;
    pub const BULLET_SPEED: f32 = 8.0;

    /// Hazard speed is `BASE + level * PER_LEVEL + U[0, JITTER)`
    pub const HAZARD_SIZE: f32 = 70.0;
    pub const HAZARD_BASE_SPEED: f32 = 2.0;
    pub const HAZARD_SPEED_PER_LEVEL: f32 = 0.5;
    pub const HAZARD_SPEED_JITTER: f32 = 2.0;

    /// Spawn threshold is `max(FLOOR, START - level * STEP)` ticks
    pub const SPAWN_THRESHOLD_START: u32 = 60;
    pub const SPAWN_THRESHOLD_STEP: u32 = 5;
    pub const SPAWN_THRESHOLD_FLOOR: u32 = 20;

    /// Decorative particles
    pub const PARTICLE_COUNT: usize = 50;

    /// Points per destroyed hazard
    pub const KILL_SCORE: u64 = 10;

    /// Real-time length of the level intro banner
    pub const LEVEL_INTRO_MS: u64 = 3000;

    /// Surface wave decoration
    pub const SURFACE_Y: f32 = 60.0;
    pub const WAVE_AMPLITUDE: f32 = 10.0;
    pub const WAVE_FREQUENCY: f32 = 0.02;
    pub const WAVE_PHASE_STEP: f32 = 0.05;
}
