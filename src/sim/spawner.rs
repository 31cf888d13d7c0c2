//! Time-gated hazard creation

use rand::Rng;
use rand::seq::IndexedRandom;

use super::entity::{Hazard, HazardKind};
use crate::settings::Tuning;

/// Steps the spawn timer must exceed on `level`. Shrinks with level down to a floor.
pub fn spawn_threshold(level: u32, tuning: &Tuning) -> u32 {
    tuning
        .spawn_threshold_start
        .saturating_sub(level.saturating_mul(tuning.spawn_threshold_step))
        .max(tuning.spawn_threshold_floor)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spawner {
    timer: u32,
}

impl Spawner {
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Advance one step; returns true (and resets) when a hazard is due
    pub fn tick(&mut self, level: u32, tuning: &Tuning) -> bool {
        self.timer += 1;
        if self.timer > spawn_threshold(level, tuning) {
            self.timer = 0;
            true
        } else {
            false
        }
    }
}

/// Create a hazard of a type drawn uniformly from `allowed`
pub fn spawn_hazard(
    id: u32,
    level: u32,
    allowed: &[HazardKind],
    screen_width: f32,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Option<Hazard> {
    let kind = *allowed.choose(rng)?;
    Some(Hazard::spawn(id, kind, level, screen_width, tuning, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_threshold_decreases_to_floor() {
        let tuning = Tuning::default();
        assert_eq!(spawn_threshold(1, &tuning), 55);
        assert_eq!(spawn_threshold(4, &tuning), 40);
        assert_eq!(spawn_threshold(8, &tuning), 20);
        assert_eq!(spawn_threshold(100, &tuning), 20);
        assert_eq!(spawn_threshold(u32::MAX, &tuning), 20);

        let thresholds: Vec<u32> = (1..20).map(|l| spawn_threshold(l, &tuning)).collect();
        assert!(thresholds.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_spawner_fires_after_threshold() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::default();
        // Level 1 threshold is 55: the 56th tick spawns
        for _ in 0..55 {
            assert!(!spawner.tick(1, &tuning));
        }
        assert!(spawner.tick(1, &tuning));
        assert_eq!(spawner.timer(), 0);
    }

    #[test]
    fn test_spawned_kind_is_allowed() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let allowed = [HazardKind::Bottle, HazardKind::Can];
        for id in 0..200 {
            let hazard = spawn_hazard(id, 1, &allowed, 800.0, &tuning, &mut rng).unwrap();
            assert!(allowed.contains(&hazard.kind));
        }
    }

    #[test]
    fn test_no_spawn_without_kinds() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        assert!(spawn_hazard(0, 1, &[], 800.0, &tuning, &mut rng).is_none());
    }
}
