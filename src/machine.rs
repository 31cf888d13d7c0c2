//! Game state machine
//!
//! Strict phases: `Loading → Menu → LevelIntro → Playing → GameOver`, plus
//! `Playing → LevelIntro` on level advance and `GameOver → LevelIntro` on
//! restart. At most one transition fires per frame.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::AudioControl;
use crate::driver::FrameInput;
use crate::error::SettingsError;
use crate::settings::{Settings, Tuning};
use crate::sim::{Advance, LevelCatalog, LevelDef, Session, TickInput, TickOutcome, tick};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for every declared asset to settle
    Loading,
    /// Start menu
    Menu,
    /// Level banner; the world is drawn but frozen until `until`
    LevelIntro { until: Duration },
    /// Active simulation
    Playing,
    /// Session ended, waiting for a restart
    GameOver,
}

/// A transition that fired this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    AssetsReady,
    SessionStarted { level: u32 },
    IntroFinished { level: u32 },
    LevelAdvanced { from: u32, to: u32, clamped: bool },
    GameOver { score: u64, level: u32 },
    Restarted { level: u32 },
}

/// Where session seeds come from
#[derive(Debug, Clone)]
enum SeedSource {
    Fixed(u64),
    Drawn(Pcg32),
}

impl SeedSource {
    fn next(&mut self) -> u64 {
        match self {
            SeedSource::Fixed(seed) => *seed,
            SeedSource::Drawn(rng) => rng.random(),
        }
    }
}

pub struct GameMachine {
    phase: GamePhase,
    catalog: LevelCatalog,
    tuning: Tuning,
    screen: Vec2,
    session: Option<Session>,
    seeds: SeedSource,
    audio: Box<dyn AudioControl>,
}

impl GameMachine {
    /// A machine in `Loading`. `base_seed` only matters when the settings
    /// leave the seed open.
    pub fn new(
        settings: &Settings,
        base_seed: u64,
        audio: Box<dyn AudioControl>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seeds = match settings.seed {
            Some(seed) => SeedSource::Fixed(seed),
            None => SeedSource::Drawn(Pcg32::seed_from_u64(base_seed)),
        };
        Ok(Self {
            phase: GamePhase::Loading,
            catalog: settings.catalog()?,
            tuning: settings.tuning.clone(),
            screen: Vec2::new(settings.screen_width, settings.screen_height),
            session: None,
            seeds,
            audio,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    /// Definition of the active level (the first one before any session)
    pub fn current_level(&self) -> &LevelDef {
        let level = self
            .session
            .as_ref()
            .map_or(self.catalog.first_level(), |s| s.level);
        self.catalog.level(level)
    }

    pub fn resize(&mut self, screen: Vec2) {
        if screen.x <= 0.0 || screen.y <= 0.0 {
            log::warn!("Ignoring degenerate screen size {}x{}", screen.x, screen.y);
            return;
        }
        self.screen = screen;
        if let Some(session) = &mut self.session {
            session.resize(screen);
        }
    }

    /// Evaluate this frame's single transition condition and run the phase
    pub fn update(&mut self, now: Duration, input: &FrameInput, assets_ready: bool) -> Option<Transition> {
        let transition = match self.phase {
            GamePhase::Loading => {
                if assets_ready {
                    self.phase = GamePhase::Menu;
                    Some(Transition::AssetsReady)
                } else {
                    None
                }
            }
            GamePhase::Menu => {
                if input.start {
                    let level = self.start_session(now);
                    Some(Transition::SessionStarted { level })
                } else {
                    None
                }
            }
            GamePhase::LevelIntro { until } => {
                if now >= until {
                    self.phase = GamePhase::Playing;
                    Some(Transition::IntroFinished {
                        level: self.current_level_number(),
                    })
                } else {
                    None
                }
            }
            GamePhase::Playing => self.step(now, input),
            GamePhase::GameOver => {
                if input.restart {
                    let level = self.start_session(now);
                    Some(Transition::Restarted { level })
                } else {
                    None
                }
            }
        };

        if let Some(t) = &transition {
            log::info!("{:?} -> phase {:?}", t, self.phase);
        }
        transition
    }

    fn current_level_number(&self) -> u32 {
        self.session
            .as_ref()
            .map_or(self.catalog.first_level(), |s| s.level)
    }

    fn intro_deadline(&self, now: Duration) -> Duration {
        now + Duration::from_millis(self.tuning.level_intro_ms)
    }

    /// Replace the whole session and start the first level's intro
    fn start_session(&mut self, now: Duration) -> u32 {
        let seed = self.seeds.next();
        let session = Session::new(seed, self.screen, &self.catalog, &self.tuning);
        let level = session.level;
        log::info!("New session (seed {}) on level {}", seed, level);
        self.session = Some(session);
        self.phase = GamePhase::LevelIntro {
            until: self.intro_deadline(now),
        };

        if let Err(e) = self.audio.play() {
            log::warn!("Music unavailable, continuing without sound: {}", e);
        }
        level
    }

    fn step(&mut self, now: Duration, input: &FrameInput) -> Option<Transition> {
        let session = self.session.as_mut()?;
        let tick_input = TickInput {
            left: input.left,
            right: input.right,
            fire: input.fire,
        };

        match tick(session, &tick_input, &self.catalog, &self.tuning) {
            TickOutcome::Running => None,
            TickOutcome::GameOver => {
                let (score, level) = (session.score, session.level);
                self.phase = GamePhase::GameOver;
                self.audio.pause();
                self.audio.rewind();
                Some(Transition::GameOver { score, level })
            }
            TickOutcome::LevelComplete => {
                let from = session.level;
                let advance = self.catalog.advance(from);
                let to = advance.level();
                session.begin_level(to, &self.catalog);
                self.phase = GamePhase::LevelIntro {
                    until: self.intro_deadline(now),
                };
                Some(Transition::LevelAdvanced {
                    from,
                    to,
                    clamped: matches!(advance, Advance::Clamped(_)),
                })
            }
        }
    }
}
