//! Fixed-step simulation tick
//!
//! Advances a `Session` by one step of the `playing` phase.

use super::collision;
use super::entity::{Steer, advance_wave_phase};
use super::level::LevelCatalog;
use super::spawner::spawn_hazard;
use super::state::Session;
use crate::consts::KILL_SCORE;
use crate::settings::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Discrete fire actions issued since the previous step
    pub fire: u32,
}

/// What the step decided for the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Player touched a hazard
    GameOver,
    /// The level's objective is satisfied
    LevelComplete,
}

/// Advance the session by one fixed step
pub fn tick(
    session: &mut Session,
    input: &TickInput,
    catalog: &LevelCatalog,
    tuning: &Tuning,
) -> TickOutcome {
    if session.over {
        return TickOutcome::GameOver;
    }

    session.time_ticks += 1;

    for _ in 0..input.fire {
        session.fire(tuning);
    }

    let steer = Steer {
        left: input.left,
        right: input.right,
    };
    let screen = session.screen;
    session.player.steer(steer, screen.x, tuning);

    let rng = &mut session.rng;
    for particle in &mut session.particles {
        particle.update(screen, rng);
    }
    for bullet in &mut session.bullets {
        bullet.update();
    }
    for hazard in &mut session.hazards {
        hazard.update();
    }

    let result = collision::detect(&session.player, &session.bullets, &session.hazards);
    if result.player_hit {
        log::debug!(
            "Player hit on level {} at tick {}",
            session.level,
            session.time_ticks
        );
        session.over = true;
        collision::purge_off_screen(&mut session.bullets, &mut session.hazards, screen.y);
        return TickOutcome::GameOver;
    }

    let kills = result.kills();
    if kills > 0 {
        session.score += u64::from(kills) * KILL_SCORE;
        session.objective.record_kills(kills);
        log::trace!("{} hazards destroyed, score {}", kills, session.score);
    }
    collision::apply_removals(&result, &mut session.bullets, &mut session.hazards);
    collision::purge_off_screen(&mut session.bullets, &mut session.hazards, screen.y);

    if session.spawner.tick(session.level, tuning) {
        let id = session.next_entity_id();
        let allowed = &catalog.level(session.level).allowed_hazards;
        if let Some(hazard) =
            spawn_hazard(id, session.level, allowed, screen.x, tuning, &mut session.rng)
        {
            session.hazards.push(hazard);
        }
    }

    session.objective.tick();
    session.wave_phase = advance_wave_phase(session.wave_phase);

    if session.objective.is_complete() {
        TickOutcome::LevelComplete
    } else {
        TickOutcome::Running
    }
}
