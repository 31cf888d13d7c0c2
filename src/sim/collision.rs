//! Collision detection and scoring input
//!
//! Everything here runs after the entities have moved for the step. Matches
//! are gathered into removal sets first and applied afterwards, so the scan
//! never mutates the collections it is walking.

use std::collections::HashSet;

use super::entity::{Bullet, Hazard, Player};

/// Outcome of one step's collision scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// The player overlapped a hazard; the session ends
    pub player_hit: bool,
    /// Hazards destroyed by bullets this step
    pub destroyed_hazards: HashSet<u32>,
    /// Bullets consumed by those hits
    pub spent_bullets: HashSet<u32>,
}

impl CollisionResult {
    /// Hazards credited this step
    pub fn kills(&self) -> u32 {
        self.destroyed_hazards.len() as u32
    }
}

/// Does the player overlap any live hazard?
pub fn player_hit(player: &Player, hazards: &[Hazard]) -> bool {
    let bounds = player.bounds();
    hazards.iter().any(|h| bounds.overlaps(&h.bounds()))
}

/// Pair bullets with hazards. Each hazard is credited at most once and each
/// bullet scores against at most one hazard.
pub fn bullet_hits(bullets: &[Bullet], hazards: &[Hazard]) -> (HashSet<u32>, HashSet<u32>) {
    let mut destroyed = HashSet::new();
    let mut spent = HashSet::new();

    for hazard in hazards {
        let hazard_bounds = hazard.bounds();
        let hit = bullets
            .iter()
            .find(|b| !spent.contains(&b.id) && b.bounds().overlaps(&hazard_bounds));
        if let Some(bullet) = hit {
            destroyed.insert(hazard.id);
            spent.insert(bullet.id);
        }
    }

    (destroyed, spent)
}

/// Full scan for one step
pub fn detect(player: &Player, bullets: &[Bullet], hazards: &[Hazard]) -> CollisionResult {
    if player_hit(player, hazards) {
        return CollisionResult {
            player_hit: true,
            ..Default::default()
        };
    }

    let (destroyed_hazards, spent_bullets) = bullet_hits(bullets, hazards);
    CollisionResult {
        player_hit: false,
        destroyed_hazards,
        spent_bullets,
    }
}

/// Purge matched pairs
pub fn apply_removals(result: &CollisionResult, bullets: &mut Vec<Bullet>, hazards: &mut Vec<Hazard>) {
    if !result.spent_bullets.is_empty() {
        bullets.retain(|b| !result.spent_bullets.contains(&b.id));
    }
    if !result.destroyed_hazards.is_empty() {
        hazards.retain(|h| !result.destroyed_hazards.contains(&h.id));
    }
}

/// Drop bullets past the top edge and hazards past the bottom edge
pub fn purge_off_screen(bullets: &mut Vec<Bullet>, hazards: &mut Vec<Hazard>, screen_height: f32) {
    bullets.retain(|b| !b.is_off_screen());
    hazards.retain(|h| !h.is_off_screen(screen_height));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::HazardKind;
    use glam::Vec2;

    fn hazard(id: u32, x: f32, y: f32) -> Hazard {
        Hazard {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::splat(70.0),
            speed: 2.0,
            kind: HazardKind::Bottle,
        }
    }

    fn bullet(id: u32, center_x: f32, y: f32) -> Bullet {
        Bullet {
            id,
            pos: Vec2::new(center_x, y),
            size: Vec2::splat(30.0),
            speed: 8.0,
        }
    }

    fn player() -> Player {
        Player {
            pos: Vec2::new(360.0, 400.0),
            size: Vec2::splat(80.0),
            speed: 6.0,
            tilt: 0.0,
        }
    }

    #[test]
    fn test_player_hit_detected() {
        let hazards = vec![hazard(1, 0.0, 0.0), hazard(2, 380.0, 350.0)];
        assert!(player_hit(&player(), &hazards));
        assert!(!player_hit(&player(), &hazards[..1]));
    }

    #[test]
    fn test_player_hit_skips_scoring() {
        let hazards = vec![hazard(1, 380.0, 350.0), hazard(2, 100.0, 100.0)];
        let bullets = vec![bullet(10, 135.0, 120.0)];
        let result = detect(&player(), &bullets, &hazards);
        assert!(result.player_hit);
        assert_eq!(result.kills(), 0);
    }

    #[test]
    fn test_two_bullets_one_hazard_credits_once() {
        let hazards = vec![hazard(1, 100.0, 100.0)];
        let bullets = vec![bullet(10, 120.0, 120.0), bullet(11, 140.0, 130.0)];
        let (destroyed, spent) = bullet_hits(&bullets, &hazards);
        assert_eq!(destroyed.len(), 1);
        assert_eq!(spent.len(), 1);
    }

    #[test]
    fn test_one_bullet_two_hazards_credits_once() {
        // Both hazards overlap the same bullet
        let hazards = vec![hazard(1, 100.0, 100.0), hazard(2, 130.0, 110.0)];
        let bullets = vec![bullet(10, 160.0, 120.0)];
        let (destroyed, spent) = bullet_hits(&bullets, &hazards);
        assert_eq!(destroyed.len(), 1);
        assert_eq!(spent.len(), 1);
    }

    #[test]
    fn test_apply_and_purge() {
        let mut hazards = vec![hazard(1, 100.0, 100.0), hazard(2, 500.0, 601.0), hazard(3, 600.0, 10.0)];
        let mut bullets = vec![bullet(10, 120.0, 120.0), bullet(11, 700.0, -1.0), bullet(12, 50.0, 300.0)];
        let result = detect(&player(), &bullets, &hazards);
        assert_eq!(result.kills(), 1);

        apply_removals(&result, &mut bullets, &mut hazards);
        purge_off_screen(&mut bullets, &mut hazards, 600.0);

        let hazard_ids: Vec<u32> = hazards.iter().map(|h| h.id).collect();
        let bullet_ids: Vec<u32> = bullets.iter().map(|b| b.id).collect();
        assert_eq!(hazard_ids, vec![3]);
        assert_eq!(bullet_ids, vec![12]);
    }
}
