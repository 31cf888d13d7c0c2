//! Session state
//!
//! Everything one playthrough mutates lives in `Session`. A restart replaces
//! the whole value, so no step ever sees a mix of old and new state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Bullet, Hazard, Particle, Player};
use super::level::LevelCatalog;
use super::objective::ObjectiveTracker;
use super::spawner::Spawner;
use crate::settings::Tuning;

/// One playthrough
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Current play area in pixels
    pub screen: Vec2,
    pub score: u64,
    /// Active level number (1-based)
    pub level: u32,
    pub objective: ObjectiveTracker,
    pub spawner: Spawner,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub hazards: Vec<Hazard>,
    /// Decorative, fixed population
    pub particles: Vec<Particle>,
    /// Set on player/hazard contact, never cleared within a session
    pub over: bool,
    /// Surface wave decoration phase
    pub wave_phase: f32,
    /// Simulation steps run in this session
    pub time_ticks: u64,
    next_id: u32,
}

impl Session {
    /// A fresh session positioned at the first catalog level
    pub fn new(seed: u64, screen: Vec2, catalog: &LevelCatalog, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = (0..tuning.particle_count)
            .map(|_| Particle::random(screen, &mut rng))
            .collect();
        let level = catalog.first_level();

        Self {
            seed,
            rng,
            screen,
            score: 0,
            level,
            objective: ObjectiveTracker::start(catalog.level(level).objective.kind),
            spawner: Spawner::default(),
            player: Player::spawn(screen, tuning),
            bullets: Vec::new(),
            hazards: Vec::new(),
            particles,
            over: false,
            wave_phase: 0.0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Enter `level`: objective counters restart and live entities carry
    /// over, except hazards of a type the new level does not allow
    pub fn begin_level(&mut self, level: u32, catalog: &LevelCatalog) {
        let def = catalog.level(level);
        self.level = level;
        self.objective = ObjectiveTracker::start(def.objective.kind);

        let before = self.hazards.len();
        self.hazards.retain(|h| def.allowed_hazards.contains(&h.kind));
        let dropped = before - self.hazards.len();
        if dropped > 0 {
            log::debug!("Dropped {} hazards not allowed on level {}", dropped, level);
        }
    }

    /// Append a bullet at the player's horizontal center
    pub fn fire(&mut self, tuning: &Tuning) -> bool {
        if self.over {
            return false;
        }
        let id = self.next_entity_id();
        let bullet = Bullet::fire(id, &self.player, tuning);
        self.bullets.push(bullet);
        true
    }

    /// Adopt a new play area. Entities keep their positions; the player is
    /// pulled back inside horizontally.
    pub fn resize(&mut self, screen: Vec2) {
        self.screen = screen;
        let max_x = (screen.x - self.player.size.x).max(0.0);
        self.player.pos.x = self.player.pos.x.clamp(0.0, max_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::HazardKind;

    fn session() -> Session {
        Session::new(42, Vec2::new(800.0, 600.0), &LevelCatalog::default(), &Tuning::default())
    }

    #[test]
    fn test_new_session_is_clean() {
        let s = session();
        assert_eq!(s.score, 0);
        assert_eq!(s.level, 1);
        assert_eq!(s.objective.progress(), 0);
        assert!(s.bullets.is_empty());
        assert!(s.hazards.is_empty());
        assert_eq!(s.particles.len(), Tuning::default().particle_count);
        assert!(!s.over);
    }

    #[test]
    fn test_fire_requires_live_session() {
        let tuning = Tuning::default();
        let mut s = session();
        assert!(s.fire(&tuning));
        assert_eq!(s.bullets.len(), 1);

        s.over = true;
        assert!(!s.fire(&tuning));
        assert_eq!(s.bullets.len(), 1);
    }

    #[test]
    fn test_begin_level_resets_objective_only() {
        let tuning = Tuning::default();
        let catalog = LevelCatalog::default();
        let mut s = session();
        s.objective.record_kills(4);
        s.score = 40;
        s.fire(&tuning);

        s.begin_level(3, &catalog);
        assert_eq!(s.level, 3);
        assert_eq!(s.objective.progress(), 0);
        assert_eq!(s.objective.survival_ticks(), 1800);
        assert_eq!(s.score, 40);
        assert_eq!(s.bullets.len(), 1);
    }

    #[test]
    fn test_begin_level_drops_disallowed_hazards() {
        let json = r#"[
            { "title": "A", "objective": { "type": "collect", "amount": 1, "text": "a" }, "allowed_hazards": ["tire", "can"] },
            { "title": "B", "objective": { "type": "endless", "text": "b" }, "allowed_hazards": ["can"] }
        ]"#;
        let catalog = LevelCatalog::new(serde_json::from_str(json).unwrap()).unwrap();
        let tuning = Tuning::default();
        let mut s = Session::new(3, Vec2::new(800.0, 600.0), &catalog, &tuning);
        for kind in [HazardKind::Tire, HazardKind::Can, HazardKind::Tire] {
            let id = s.next_entity_id();
            s.hazards.push(Hazard {
                id,
                pos: Vec2::new(100.0, 50.0),
                size: Vec2::splat(70.0),
                speed: 1.0,
                kind,
            });
        }

        s.begin_level(2, &catalog);
        assert_eq!(s.hazards.len(), 1);
        assert!(s.hazards.iter().all(|h| h.kind == HazardKind::Can));
    }

    #[test]
    fn test_same_seed_same_particles() {
        let a = session();
        let b = session();
        assert_eq!(a.particles, b.particles);
    }

    #[test]
    fn test_resize_clamps_player() {
        let mut s = session();
        s.player.pos.x = 700.0;
        s.resize(Vec2::new(400.0, 300.0));
        assert_eq!(s.player.pos.x, 320.0);
    }
}
