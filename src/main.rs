//! Desktop front end for yt-dlp: saves MP3 and/or MP4 copies of a video

// Main window and event handling
mod app;
// Fixed settings
mod config;
// Orchestration of a download on the worker runtime
mod downloader;
// Error types
mod error;
// yt-dlp invocation
mod extractor;
// Link detection and clipboard access
mod link;
// Request and outcome types
mod model;
// File browser and icon loading
mod platform;
// Idle/Downloading state of the window
mod shell;

use eframe::egui::{self, Visuals};
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::DownloaderApp, config::AppConfig, error::AppError};

/// Program entry point: initializes logging and the runtime, then launches the GUI
fn main() -> Result<(), AppError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    // Downloads run on this runtime; it lives until the window closes
    let rt = Runtime::new()?;
    let handle = rt.handle().clone();

    let config = AppConfig::default();

    // The app id groups the window in the taskbar where the platform supports it
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(&config.title)
        .with_app_id(&config.app_id)
        .with_inner_size(config.window_size);
    if let Some(icon) = platform::load_icon(&config.icon_file) {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    tracing::info!("starting {}", config.title);
    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            // Use dark theme visuals
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(DownloaderApp::new(&config, handle))
        }),
    )?;
    drop(rt);
    Ok(())
}
