//! Headless platform: simulated clock, scripted input, counting sink
//!
//! Lets the whole game run without a window, for the native binary and tests.

use std::time::Duration;

use crate::assets::{AssetEvent, AssetTracker, default_manifest};
use crate::audio::SilentAudio;
use crate::consts::SIM_RATE;
use crate::driver::{FrameDriver, FrameInput, ManualClock};
use crate::error::SettingsError;
use crate::machine::{GameMachine, GamePhase, Transition};
use crate::scene::{Frame, PresentationSink};
use crate::settings::Settings;
use crate::sim::Session;

/// Counts what would have been drawn
#[derive(Debug, Default)]
pub struct CountingSink {
    pub frames: u64,
    pub commands: u64,
}

impl PresentationSink for CountingSink {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        self.commands += frame.commands.len() as u64;
        log::trace!("frame {}: {} primitives", self.frames, frame.commands.len());
    }
}

/// Plays by lining up under the lowest hazard and firing on a cadence
#[derive(Debug, Clone)]
pub struct Autopilot {
    fire_every: u64,
    frame: u64,
    /// Restart after game over instead of stopping
    pub keep_playing: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            fire_every: 8,
            frame: 0,
            keep_playing: false,
        }
    }
}

impl Autopilot {
    pub fn new(keep_playing: bool) -> Self {
        Self {
            keep_playing,
            ..Default::default()
        }
    }

    pub fn next_input(&mut self, phase: GamePhase, session: Option<&Session>) -> FrameInput {
        self.frame += 1;
        match phase {
            GamePhase::Menu => FrameInput {
                start: true,
                ..Default::default()
            },
            GamePhase::GameOver => FrameInput {
                restart: self.keep_playing,
                ..Default::default()
            },
            GamePhase::Playing => session.map_or_else(FrameInput::default, |s| self.steer(s)),
            GamePhase::Loading | GamePhase::LevelIntro { .. } => FrameInput::default(),
        }
    }

    fn steer(&self, session: &Session) -> FrameInput {
        let center = session.player.center().x;
        let target = session
            .hazards
            .iter()
            .filter(|h| h.pos.y + h.size.y < session.player.pos.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|h| h.pos.x + h.size.x / 2.0);

        let dead_zone = session.player.speed;
        let (left, right) = match target {
            Some(x) if x < center - dead_zone => (true, false),
            Some(x) if x > center + dead_zone => (false, true),
            _ => (false, false),
        };
        FrameInput {
            left,
            right,
            fire: u32::from(self.frame % self.fire_every == 0),
            ..Default::default()
        }
    }
}

/// Summary of a headless run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub frames: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub sessions: u32,
    pub commands: u64,
}

/// Run up to `max_frames` at the simulation rate with every asset loaded.
/// Stops early at the first game over unless `autopilot.keep_playing`.
pub fn run_demo(
    settings: &Settings,
    base_seed: u64,
    max_frames: u64,
    mut autopilot: Autopilot,
) -> Result<DemoReport, SettingsError> {
    let machine = GameMachine::new(settings, base_seed, Box::new(SilentAudio))?;
    let clock = ManualClock::default();
    let mut driver = FrameDriver::new(
        machine,
        AssetTracker::new(default_manifest()),
        Box::new(clock.clone()),
    );
    let keys: Vec<String> = driver.assets().manifest().map(|e| e.key.clone()).collect();
    for key in keys {
        driver.asset_event(AssetEvent::Loaded(key));
    }

    let frame_time = Duration::from_secs(1) / SIM_RATE;
    let mut sink = CountingSink::default();
    let mut sessions = 0;

    for _ in 0..max_frames {
        let input = autopilot.next_input(driver.phase(), driver.machine().session());
        match driver.frame(&input, &mut sink) {
            Some(Transition::SessionStarted { .. } | Transition::Restarted { .. }) => sessions += 1,
            Some(Transition::GameOver { .. }) if !autopilot.keep_playing => break,
            _ => {}
        }
        clock.advance(frame_time);
    }

    let session = driver.machine().session();
    Ok(DemoReport {
        frames: driver.frames(),
        phase: driver.phase(),
        score: session.map_or(0, |s| s.score),
        level: session.map_or(0, |s| s.level),
        sessions,
        commands: sink.commands,
    })
}
