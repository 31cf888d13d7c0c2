//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (time-based rules count steps at `SIM_RATE`)
//! - Seeded RNG only
//! - No clocks, rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod level;
pub mod objective;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::CollisionResult;
pub use entity::{Aabb, Bullet, Hazard, HazardKind, Particle, Player, Steer};
pub use level::{Advance, LevelCatalog, LevelDef, Objective, ObjectiveKind};
pub use objective::ObjectiveTracker;
pub use spawner::{Spawner, spawn_threshold};
pub use state::Session;
pub use tick::{TickInput, TickOutcome, tick};
