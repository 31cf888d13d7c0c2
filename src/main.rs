//! Ocean Sweep entry point
//!
//! On the web this boots the canvas game. Natively it runs the game headless
//! with an autopilot and reports how the run went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    ocean_sweep::platform::web::run()
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Run Ocean Sweep headless with an autopilot", long_about = None)]
struct Args {
    /// Settings JSON; defaults apply when omitted
    settings: Option<std::path::PathBuf>,
    /// Maximum frames to simulate (60 per second of game time)
    #[arg(long, default_value_t = 60 * 120)]
    frames: u64,
    /// Seed used when the settings do not fix one
    #[arg(long)]
    seed: Option<u64>,
    /// Restart after each game over until the frame budget runs out
    #[arg(long)]
    keep_playing: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), ocean_sweep::SettingsError> {
    use clap::Parser;
    use ocean_sweep::Settings;
    use ocean_sweep::platform::headless::{Autopilot, run_demo};

    env_logger::init();
    let args = Args::parse();
    log::info!("Ocean Sweep (headless) starting...");

    let settings = match &args.settings {
        Some(path) => {
            let settings = Settings::load_file(path)?;
            log::info!("Loaded settings from {}", path.display());
            settings
        }
        None => Settings::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    let autopilot = Autopilot::new(args.keep_playing);
    let report = run_demo(&settings, seed, args.frames, autopilot)?;

    log::info!(
        "Finished after {} frames in {:?}: score {}, level {}, {} session(s)",
        report.frames,
        report.phase,
        report.score,
        report.level,
        report.sessions
    );
    println!(
        "score={} level={} frames={} sessions={}",
        report.score, report.level, report.frames, report.sessions
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
