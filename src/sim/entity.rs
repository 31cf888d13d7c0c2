//! Entity records and their per-step update rules
//!
//! Plain kinematic data. Positions are screen pixels with +y pointing down.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::WAVE_PHASE_STEP;
use crate::settings::Tuning;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap: boxes that only share an edge do not touch
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Visual type of a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Bottle,
    Can,
    Banana,
    Tire,
}

impl HazardKind {
    pub const ALL: [HazardKind; 4] = [
        HazardKind::Bottle,
        HazardKind::Can,
        HazardKind::Banana,
        HazardKind::Tire,
    ];

    /// Manifest key of the image drawn for this hazard
    pub fn asset_key(self) -> &'static str {
        match self {
            HazardKind::Bottle => "hazard_bottle",
            HazardKind::Can => "hazard_can",
            HazardKind::Banana => "hazard_banana",
            HazardKind::Tire => "hazard_tire",
        }
    }
}

/// Held-direction input for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steer {
    pub left: bool,
    pub right: bool,
}

/// The player's craft
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Tilt angle in radians, positive leans right
    pub tilt: f32,
}

impl Player {
    /// Centered horizontally, `bottom_offset` above the bottom edge
    pub fn spawn(screen: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                screen.x / 2.0 - tuning.player_size / 2.0,
                screen.y - tuning.player_bottom_offset,
            ),
            size: Vec2::splat(tuning.player_size),
            speed: tuning.player_speed,
            tilt: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Move within `[0, screen_width - width]` and ease the tilt.
    ///
    /// Left wins when both directions are held, unless the craft is already
    /// against the left edge.
    pub fn steer(&mut self, steer: Steer, screen_width: f32, tuning: &Tuning) {
        let max_x = (screen_width - self.size.x).max(0.0);
        let max_tilt = tuning.player_max_tilt;
        let easing = tuning.player_tilt_easing;

        if steer.left && self.pos.x > 0.0 {
            self.pos.x -= self.speed;
            self.tilt += (-max_tilt - self.tilt) * easing;
        } else if steer.right && self.pos.x < max_x {
            self.pos.x += self.speed;
            self.tilt += (max_tilt - self.tilt) * easing;
        } else {
            self.tilt *= 1.0 - easing;
        }

        self.pos.x = self.pos.x.clamp(0.0, max_x);
        self.tilt = self.tilt.clamp(-max_tilt, max_tilt);
    }
}

/// A projectile travelling straight up
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: u32,
    /// Horizontal center, top edge
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Bullet {
    /// Fired from the top of the player, centered on it
    pub fn fire(id: u32, player: &Player, tuning: &Tuning) -> Self {
        Self {
            id,
            pos: Vec2::new(player.center().x, player.pos.y),
            size: Vec2::splat(tuning.bullet_size),
            speed: tuning.bullet_speed,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(Vec2::new(self.pos.x - self.size.x / 2.0, self.pos.y), self.size)
    }

    pub fn update(&mut self) {
        self.pos.y -= self.speed;
    }

    /// Past the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y <= 0.0
    }
}

/// A descending obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub kind: HazardKind,
}

impl Hazard {
    /// Just above the visible area at a random column, speed scaled by level
    pub fn spawn(
        id: u32,
        kind: HazardKind,
        level: u32,
        screen_width: f32,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Self {
        let size = tuning.hazard_size;
        let span = (screen_width - size).max(0.0);
        let jitter: f32 = rng.random();
        let column: f32 = rng.random();
        Self {
            id,
            pos: Vec2::new(column * span, -size),
            size: Vec2::splat(size),
            speed: tuning.hazard_base_speed
                + level as f32 * tuning.hazard_speed_per_level
                + jitter * tuning.hazard_speed_jitter,
            kind,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    /// Past the bottom edge
    pub fn is_off_screen(&self, screen_height: f32) -> bool {
        self.pos.y > screen_height
    }
}

/// Decorative drifting point; never touches gameplay
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub opacity: f32,
}

impl Particle {
    pub fn random(screen: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * screen.x,
                rng.random::<f32>() * screen.y,
            ),
            radius: rng.random_range(1.0..3.0),
            speed: rng.random_range(0.2..0.7),
            opacity: rng.random_range(0.2..0.7),
        }
    }

    /// Drift up; wrap to the bottom at a fresh column after leaving the top
    pub fn update(&mut self, screen: Vec2, rng: &mut impl Rng) {
        self.pos.y -= self.speed;
        if self.pos.y < 0.0 {
            self.pos.y = screen.y;
            self.pos.x = rng.random::<f32>() * screen.x;
        }
    }
}

/// Phase of the decorative surface waves after one more step
pub fn advance_wave_phase(phase: f32) -> f32 {
    (phase + WAVE_PHASE_STEP) % std::f32::consts::TAU
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Aabb::new(Vec2::new(5.0, 5.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_player_spawn_position() {
        let tuning = Tuning::default();
        let player = Player::spawn(SCREEN, &tuning);
        assert_eq!(player.pos, Vec2::new(360.0, 400.0));
        assert_eq!(player.tilt, 0.0);
    }

    #[test]
    fn test_player_stays_on_screen() {
        let tuning = Tuning::default();
        let mut player = Player::spawn(SCREEN, &tuning);
        let left = Steer { left: true, right: false };
        for _ in 0..200 {
            player.steer(left, SCREEN.x, &tuning);
        }
        assert_eq!(player.pos.x, 0.0);

        let right = Steer { left: false, right: true };
        for _ in 0..200 {
            player.steer(right, SCREEN.x, &tuning);
        }
        assert_eq!(player.pos.x, SCREEN.x - player.size.x);
    }

    #[test]
    fn test_tilt_eases_and_decays() {
        let tuning = Tuning::default();
        let mut player = Player::spawn(SCREEN, &tuning);
        let right = Steer { left: false, right: true };

        player.steer(right, SCREEN.x, &tuning);
        let first = player.tilt;
        assert!(first > 0.0 && first < tuning.player_max_tilt);
        player.steer(right, SCREEN.x, &tuning);
        assert!(player.tilt > first);
        assert!(player.tilt <= tuning.player_max_tilt);

        let held = player.tilt;
        player.steer(Steer::default(), SCREEN.x, &tuning);
        assert!(player.tilt < held && player.tilt > 0.0);
    }

    #[test]
    fn test_bullet_fires_from_player_center() {
        let tuning = Tuning::default();
        let player = Player::spawn(SCREEN, &tuning);
        let mut bullet = Bullet::fire(1, &player, &tuning);
        assert_eq!(bullet.pos.x, player.center().x);
        assert_eq!(bullet.bounds().min.x, player.center().x - tuning.bullet_size / 2.0);

        bullet.update();
        assert_eq!(bullet.pos.y, player.pos.y - tuning.bullet_speed);
    }

    #[test]
    fn test_hazard_spawn_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for level in 1..=4 {
            for _ in 0..100 {
                let hazard = Hazard::spawn(1, HazardKind::Can, level, SCREEN.x, &tuning, &mut rng);
                assert_eq!(hazard.pos.y, -tuning.hazard_size);
                assert!(hazard.pos.x >= 0.0 && hazard.pos.x <= SCREEN.x - tuning.hazard_size);
                let min = tuning.hazard_base_speed + level as f32 * tuning.hazard_speed_per_level;
                assert!(hazard.speed >= min && hazard.speed < min + tuning.hazard_speed_jitter);
            }
        }
    }

    #[test]
    fn test_particle_wraps_to_bottom() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particle = Particle {
            pos: Vec2::new(100.0, 0.1),
            radius: 1.0,
            speed: 0.5,
            opacity: 0.5,
        };
        particle.update(SCREEN, &mut rng);
        assert_eq!(particle.pos.y, SCREEN.y);
        assert!(particle.pos.x >= 0.0 && particle.pos.x < SCREEN.x);
    }
}
