//! Frame driver
//!
//! Called once per display refresh. It is the only place that reads the clock:
//! it samples "now", feeds asset readiness and the frame's input into the state
//! machine, then composes and presents the frame.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;

use crate::assets::{AssetEvent, AssetTracker};
use crate::machine::{GameMachine, GamePhase, Transition};
use crate::scene::{self, PresentationSink};

/// Input signals for one frame. Held directions are levels; the rest are
/// one-shot presses since the previous frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    /// Fire presses since the previous frame, one bullet each
    pub fire: u32,
    /// Start button in the menu
    pub start: bool,
    /// Pointer/touch activation on the game-over screen
    pub restart: bool,
}

/// Accumulates raw input events between frames
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    left: bool,
    right: bool,
    fire: u32,
    start: bool,
    restart: bool,
}

impl InputLatch {
    pub fn set_left(&mut self, held: bool) {
        self.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.right = held;
    }

    pub fn press_fire(&mut self) {
        self.fire = self.fire.saturating_add(1);
    }

    pub fn press_start(&mut self) {
        self.start = true;
    }

    pub fn press_restart(&mut self) {
        self.restart = true;
    }

    /// Snapshot for this frame; presses are consumed, held keys persist
    pub fn take(&mut self) -> FrameInput {
        let input = FrameInput {
            left: self.left,
            right: self.right,
            fire: self.fire,
            start: self.start,
            restart: self.restart,
        };
        self.fire = 0;
        self.start = false;
        self.restart = false;
        input
    }
}

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock since construction
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Clock advanced by hand; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

pub struct FrameDriver {
    machine: GameMachine,
    assets: AssetTracker,
    clock: Box<dyn Clock>,
    frames: u64,
}

impl FrameDriver {
    pub fn new(machine: GameMachine, assets: AssetTracker, clock: Box<dyn Clock>) -> Self {
        Self {
            machine,
            assets,
            clock,
            frames: 0,
        }
    }

    pub fn machine(&self) -> &GameMachine {
        &self.machine
    }

    pub fn assets(&self) -> &AssetTracker {
        &self.assets
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Feed a loader completion signal; failures are logged, never fatal
    pub fn asset_event(&mut self, event: AssetEvent) {
        match self.assets.record(&event) {
            Ok(()) => log::debug!(
                "Assets {}/{} settled",
                self.assets.settled_count(),
                self.assets.total()
            ),
            Err(e) => log::warn!("{}", e),
        }
    }

    pub fn resize(&mut self, screen: Vec2) {
        self.machine.resize(screen);
    }

    /// Run one frame: update the machine, then present
    pub fn frame(
        &mut self,
        input: &FrameInput,
        sink: &mut dyn PresentationSink,
    ) -> Option<Transition> {
        let now = self.clock.now();
        let transition = self.machine.update(now, input, self.assets.is_ready());
        let frame = scene::compose(&self.machine, &self.assets);
        sink.present(&frame);
        self.frames += 1;
        transition
    }
}
