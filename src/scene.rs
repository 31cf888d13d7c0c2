//! Presentation interface
//!
//! The core never owns a drawing surface. Each frame it builds a `Frame`: a
//! list of draw primitives in painter's order plus the DOM-style overlays that
//! should be visible, and hands it to a `PresentationSink`.

use glam::Vec2;

use crate::assets::{AssetTracker, BACKGROUND_ASSET, BULLET_ASSET, PLAYER_ASSET};
use crate::consts::{SURFACE_Y, WAVE_AMPLITUDE, WAVE_FREQUENCY};
use crate::machine::{GameMachine, GamePhase};
use crate::sim::{ObjectiveKind, Session};

/// RGBA color, alpha in 0..1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const DEEP_NAVY: Color = Color::rgb(0x00, 0x1f, 0x3f);
    pub const SURFACE: Color = Color::rgb(0x00, 0x77, 0xb6);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string for canvas APIs
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A single draw primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Blit an image; `rotation` (radians) turns it about its center
    Image {
        key: &'static str,
        pos: Vec2,
        size: Vec2,
        rotation: f32,
    },
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        font_px: f32,
        align: TextAlign,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Closed filled polygon
    Polygon { points: Vec<Vec2>, color: Color },
}

/// Level title and objective shown during the intro
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelBanner {
    pub title: String,
    pub objective: String,
}

/// Page-level UI visibility
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlays {
    pub show_menu: bool,
    pub show_touch_controls: bool,
    pub level_banner: Option<LevelBanner>,
}

/// Everything to present for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub screen: Vec2,
    pub commands: Vec<DrawCommand>,
    pub overlays: Overlays,
}

/// Receives one composed frame per display refresh
pub trait PresentationSink {
    fn present(&mut self, frame: &Frame);
}

/// Compose the frame for the machine's current phase
pub fn compose(machine: &GameMachine, assets: &AssetTracker) -> Frame {
    let screen = machine.screen();
    let mut frame = Frame {
        screen,
        ..Default::default()
    };

    match machine.phase() {
        GamePhase::Loading => {
            frame.commands.push(DrawCommand::Rect {
                pos: Vec2::ZERO,
                size: screen,
                color: Color::DEEP_NAVY,
            });
            frame.commands.push(centered_text(
                "Loading...",
                screen / 2.0,
                30.0,
            ));
        }
        GamePhase::Menu => {
            frame.overlays.show_menu = true;
        }
        GamePhase::LevelIntro { .. } | GamePhase::Playing | GamePhase::GameOver => {
            frame.overlays.show_touch_controls = true;
            if let Some(session) = machine.session() {
                draw_world(&mut frame.commands, session, assets);
                draw_hud(&mut frame.commands, session, machine);
            }
        }
    }

    if let GamePhase::LevelIntro { .. } = machine.phase() {
        let level = machine.current_level();
        frame.overlays.level_banner = Some(LevelBanner {
            title: level.title.clone(),
            objective: level.objective.text.clone(),
        });
    }

    if machine.phase() == GamePhase::GameOver {
        frame.commands.push(DrawCommand::Rect {
            pos: Vec2::ZERO,
            size: screen,
            color: Color::rgba(0, 0, 0, 0.7),
        });
        frame.commands.push(centered_text(
            "GAME OVER",
            Vec2::new(screen.x / 2.0, screen.y / 2.0 - 40.0),
            50.0,
        ));
        frame.commands.push(centered_text(
            "Tap to restart",
            Vec2::new(screen.x / 2.0, screen.y / 2.0 + 20.0),
            24.0,
        ));
    }

    frame
}

fn centered_text(text: &str, pos: Vec2, font_px: f32) -> DrawCommand {
    DrawCommand::Text {
        text: text.to_string(),
        pos,
        font_px,
        align: TextAlign::Center,
        color: Color::WHITE,
    }
}

fn hud_text(text: String, y: f32) -> DrawCommand {
    DrawCommand::Text {
        text,
        pos: Vec2::new(20.0, y),
        font_px: 28.0,
        align: TextAlign::Left,
        color: Color::WHITE,
    }
}

/// Push an image blit if the asset actually loaded
fn blit(
    out: &mut Vec<DrawCommand>,
    assets: &AssetTracker,
    key: &'static str,
    pos: Vec2,
    size: Vec2,
    rotation: f32,
) {
    if assets.is_available(key) {
        out.push(DrawCommand::Image {
            key,
            pos,
            size,
            rotation,
        });
    }
}

fn draw_world(out: &mut Vec<DrawCommand>, session: &Session, assets: &AssetTracker) {
    blit(out, assets, BACKGROUND_ASSET, Vec2::ZERO, session.screen, 0.0);

    for p in &session.particles {
        out.push(DrawCommand::Circle {
            center: p.pos,
            radius: p.radius,
            color: Color::rgba(255, 255, 255, p.opacity),
        });
    }

    out.push(DrawCommand::Polygon {
        points: surface_wave(session.screen.x, session.wave_phase),
        color: Color::SURFACE,
    });

    let player = &session.player;
    blit(out, assets, PLAYER_ASSET, player.pos, player.size, player.tilt);

    for b in &session.bullets {
        let bounds = b.bounds();
        blit(out, assets, BULLET_ASSET, bounds.min, bounds.size, 0.0);
    }
    for h in &session.hazards {
        blit(out, assets, h.kind.asset_key(), h.pos, h.size, 0.0);
    }
}

fn draw_hud(out: &mut Vec<DrawCommand>, session: &Session, machine: &GameMachine) {
    out.push(hud_text(format!("Score: {}", session.score), 40.0));

    let objective = &machine.current_level().objective;
    let line = match objective.kind {
        ObjectiveKind::Collect { amount } => {
            format!("{}: {}/{}", objective.text, session.objective.progress(), amount)
        }
        ObjectiveKind::Survive { .. } => {
            format!("{}: {}s", objective.text, session.objective.remaining_secs())
        }
        ObjectiveKind::Endless => objective.text.clone(),
    };
    out.push(hud_text(line, 80.0));
}

/// Outline of the water surface band across the top of the screen
pub fn surface_wave(width: f32, phase: f32) -> Vec<Vec2> {
    const STEP: usize = 4;
    let mut points: Vec<Vec2> = (0..=width.max(0.0) as usize)
        .step_by(STEP)
        .map(|x| {
            let x = x as f32;
            Vec2::new(x, SURFACE_Y + (x * WAVE_FREQUENCY + phase).sin() * WAVE_AMPLITUDE)
        })
        .collect();
    points.push(Vec2::new(width, SURFACE_Y + (width * WAVE_FREQUENCY + phase).sin() * WAVE_AMPLITUDE));
    points.push(Vec2::new(width, 0.0));
    points.push(Vec2::new(0.0, 0.0));
    points
}
