//! Application entry point — Gram Sahayak.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the AI gateway from config (disabled stub when no key).
//! 5. Create assistant channels (`command`, `event`).
//! 6. Spawn the assistant orchestrator on the tokio runtime.
//! 7. Probe the speaker (rodio) and microphone (cpal) — both optional.
//! 8. Run [`eframe::run_native`] — blocks the main thread until the
//!    window is closed.

use eframe::egui;
use tokio::sync::mpsc;

use gram_sahayak::{
    ai::build_gateway,
    app::DashboardApp,
    assistant::{run_assistant, AssistantCommand, AssistantEvent},
    audio::{AudioPlaybackEngine, RodioOutput},
    config::AppConfig,
    speech::VoiceRecorder,
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([980.0, 760.0])
        .with_min_inner_size([640.0, 480.0]);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Gram Sahayak starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads — gateway calls are I/O bound)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. AI gateway
    let gateway = build_gateway(&config.ai);

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<AssistantCommand>(32);
    let (event_tx, event_rx) = mpsc::channel::<AssistantEvent>(64);

    // 6. Spawn the assistant orchestrator onto the tokio runtime
    rt.spawn(run_assistant(gateway, command_rx, event_tx));

    // 7. Optional audio surfaces — the dashboard works without either.
    let playback = match RodioOutput::new() {
        Ok(output) => Some(AudioPlaybackEngine::new(output)),
        Err(e) => {
            log::warn!("speech playback unavailable: {e}");
            None
        }
    };

    let voice = VoiceRecorder::detect(&config.audio);
    if voice.is_none() {
        log::info!("no microphone detected; voice input controls hidden");
    }

    // 8. Build the dashboard and run it (blocks until the window closes)
    let options = native_options(&config);
    let app = DashboardApp::new(command_tx, event_rx, config, playback, voice);

    eframe::run_native(
        "Gram Sahayak",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
