//! Browser platform: canvas presentation, `<img>` loading, DOM input, rAF loop

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::assets::{AssetEntry, AssetEvent, AssetTracker, default_manifest};
use crate::audio::HtmlMusic;
use crate::driver::{Clock, FrameDriver, InputLatch};
use crate::machine::GameMachine;
use crate::scene::{DrawCommand, Frame, PresentationSink, TextAlign};
use crate::settings::Settings;

/// `performance.now()` as a monotonic clock
struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

impl Clock for PerformanceClock {
    fn now(&self) -> Duration {
        let ms = self.performance.as_ref().map_or(0.0, |p| p.now());
        Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }
}

/// Draws frames onto a 2D canvas and toggles the page overlays
struct CanvasSink {
    ctx: CanvasRenderingContext2d,
    document: Document,
    images: HashMap<String, HtmlImageElement>,
}

impl CanvasSink {
    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn draw(&self, command: &DrawCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Image {
                key,
                pos,
                size,
                rotation,
            } => {
                let Some(img) = self.images.get(*key) else {
                    return Ok(());
                };
                let (x, y, w, h) = (pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                if *rotation == 0.0 {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)?;
                } else {
                    ctx.save();
                    ctx.translate(x + w / 2.0, y + h / 2.0)?;
                    ctx.rotate(*rotation as f64)?;
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h / 2.0, w, h)?;
                    ctx.restore();
                }
            }
            DrawCommand::Rect { pos, size, color } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            DrawCommand::Text {
                text,
                pos,
                font_px,
                align,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.set_font(&format!("{}px Arial", font_px));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill();
            }
            DrawCommand::Polygon { points, color } => {
                let Some(first) = points.first() else {
                    return Ok(());
                };
                ctx.set_fill_style_str(&color.to_css());
                ctx.begin_path();
                ctx.move_to(first.x as f64, first.y as f64);
                for p in &points[1..] {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                ctx.close_path();
                ctx.fill();
            }
        }
        Ok(())
    }
}

impl PresentationSink for CanvasSink {
    fn present(&mut self, frame: &Frame) {
        self.ctx
            .clear_rect(0.0, 0.0, frame.screen.x as f64, frame.screen.y as f64);
        for command in &frame.commands {
            if let Err(e) = self.draw(command) {
                log::warn!("Draw failed: {:?}", e);
            }
        }

        let overlays = &frame.overlays;
        self.set_hidden("start-menu", !overlays.show_menu);
        self.set_hidden("touch-controls", !overlays.show_touch_controls);
        match &overlays.level_banner {
            Some(banner) => {
                self.set_text("level-title", &banner.title);
                self.set_text("objective-text", &banner.objective);
                self.set_hidden("level-objective", false);
            }
            None => self.set_hidden("level-objective", true),
        }
    }
}

struct App {
    driver: FrameDriver,
    sink: CanvasSink,
    input: InputLatch,
}

type Shared = Rc<RefCell<App>>;

fn window_size(window: &web_sys::Window) -> Vec2 {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
    Vec2::new(w as f32, h as f32)
}

fn fit_canvas(canvas: &HtmlCanvasElement, size: Vec2) {
    canvas.set_width(size.x as u32);
    canvas.set_height(size.y as u32);
}

pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Ocean Sweep starting...");

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id("gameCanvas")
        .ok_or("no #gameCanvas")?
        .dyn_into()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or("no 2d context")?
        .dyn_into()?;

    let mut settings = Settings::load();
    // Stored document is normalized to the full current schema
    settings.save();
    let size = window_size(&window);
    fit_canvas(&canvas, size);
    settings.screen_width = size.x;
    settings.screen_height = size.y;

    let audio = HtmlMusic::from_element_id("background-music", settings.effective_music_volume());
    let seed = js_sys::Date::now() as u64;
    let machine = GameMachine::new(&settings, seed, Box::new(audio))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::info!("Game initialized with seed: {}", seed);

    let manifest = default_manifest();
    let clock = PerformanceClock {
        performance: window.performance(),
    };
    let driver = FrameDriver::new(machine, AssetTracker::new(manifest.clone()), Box::new(clock));
    let app = Rc::new(RefCell::new(App {
        driver,
        sink: CanvasSink {
            ctx,
            document: document.clone(),
            images: HashMap::new(),
        },
        input: InputLatch::default(),
    }));

    load_images(&app, manifest)?;
    setup_input_handlers(&window, &document, &canvas, &app)?;
    request_animation_frame(app);

    log::info!("Ocean Sweep running!");
    Ok(())
}

/// Start every image load; completions land in the tracker as events
fn load_images(app: &Shared, manifest: Vec<AssetEntry>) -> Result<(), JsValue> {
    for entry in manifest {
        let img = HtmlImageElement::new()?;

        let onload = {
            let app = app.clone();
            let key = entry.key.clone();
            Closure::<dyn FnMut()>::new(move || {
                app.borrow_mut().driver.asset_event(AssetEvent::Loaded(key.clone()));
            })
        };
        let onerror = {
            let app = app.clone();
            let key = entry.key.clone();
            Closure::<dyn FnMut()>::new(move || {
                app.borrow_mut().driver.asset_event(AssetEvent::Failed(key.clone()));
            })
        };
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();

        img.set_src(&entry.path);
        app.borrow_mut().sink.images.insert(entry.key, img);
    }
    Ok(())
}

fn on<E, F>(target: &web_sys::EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_element<E, F>(document: &Document, id: &str, event: &str, handler: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    match document.get_element_by_id(id) {
        Some(el) => on(&el, event, handler),
        None => {
            log::warn!("Missing #{} - control disabled", id);
            Ok(())
        }
    }
}

fn setup_input_handlers(
    window: &web_sys::Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
    app: &Shared,
) -> Result<(), JsValue> {
    // Keyboard
    {
        let app = app.clone();
        on(window, "keydown", move |e: web_sys::KeyboardEvent| {
            let mut app = app.borrow_mut();
            let input = &mut app.input;
            match e.key().as_str() {
                "ArrowLeft" => input.set_left(true),
                "ArrowRight" => input.set_right(true),
                " " => input.press_fire(),
                _ => {}
            }
        })?;
    }
    {
        let app = app.clone();
        on(window, "keyup", move |e: web_sys::KeyboardEvent| {
            let mut app = app.borrow_mut();
            let input = &mut app.input;
            match e.key().as_str() {
                "ArrowLeft" => input.set_left(false),
                "ArrowRight" => input.set_right(false),
                _ => {}
            }
        })?;
    }

    // Touch buttons
    for (id, left) in [("left-btn", true), ("right-btn", false)] {
        let down = app.clone();
        on_element(document, id, "touchstart", move |e: web_sys::TouchEvent| {
            e.prevent_default();
            let mut app = down.borrow_mut();
            let input = &mut app.input;
            if left {
                input.set_left(true);
            } else {
                input.set_right(true);
            }
        })?;
        let up = app.clone();
        on_element(document, id, "touchend", move |_e: web_sys::TouchEvent| {
            let mut app = up.borrow_mut();
            let input = &mut app.input;
            if left {
                input.set_left(false);
            } else {
                input.set_right(false);
            }
        })?;
    }
    {
        let app = app.clone();
        on_element(document, "shoot-btn", "touchstart", move |e: web_sys::TouchEvent| {
            e.prevent_default();
            app.borrow_mut().input.press_fire();
        })?;
    }

    // Menu start
    {
        let app = app.clone();
        on_element(document, "start-btn", "click", move |_e: web_sys::MouseEvent| {
            app.borrow_mut().input.press_start();
        })?;
    }

    // Restart by pointer or touch on the canvas
    {
        let app = app.clone();
        on(canvas, "click", move |_e: web_sys::MouseEvent| {
            app.borrow_mut().input.press_restart();
        })?;
    }
    {
        let app = app.clone();
        on(canvas, "touchstart", move |_e: web_sys::TouchEvent| {
            app.borrow_mut().input.press_restart();
        })?;
    }

    // Resize
    {
        let app = app.clone();
        let canvas = canvas.clone();
        on(window, "resize", move |_e: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let size = window_size(&window);
            fit_canvas(&canvas, size);
            app.borrow_mut().driver.resize(size);
        })?;
    }
    Ok(())
}

fn request_animation_frame(app: Shared) {
    let Some(window) = web_sys::window() else {
        log::error!("No window - game loop stopped");
        return;
    };
    let closure = Closure::once(move |_time: f64| {
        game_loop(app);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(app: Shared) {
    {
        let mut guard = app.borrow_mut();
        let App { driver, sink, input } = &mut *guard;
        let frame_input = input.take();
        driver.frame(&frame_input, sink);
    }

    request_animation_frame(app);
}
