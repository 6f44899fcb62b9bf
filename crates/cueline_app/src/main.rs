// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cueline - timeline scrubber host.
//!
//! Opens a window with a timeline strip at the bottom:
//! - Current time and duration inputs
//! - Time ruler with drag-to-scrub
//! - Track list and keyframe area with mirrored scrolling
//!
//! Settings are read from the RON file given as the first argument, or
//! `cueline.ron` in the working directory.

mod app;

use app::CueApp;
use cueline_timeline::{ConfigError, TimelineConfig, CONFIG_FILE_NAME};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "cueline_app=debug,cueline_timeline=debug,wgpu=warn,naga=warn";

fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Cueline v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();

    if let Err(e) = CueApp::run(config) {
        tracing::error!("Cueline crashed: {e}");
        std::process::exit(1);
    }
}

/// Settings from the first argument or the default file, else defaults
fn load_config() -> TimelineConfig {
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), PathBuf::from);

    match TimelineConfig::load(&path) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("No settings at {}, using defaults", path.display());
            TimelineConfig::default()
        }
        Err(e) => {
            tracing::warn!("Ignoring settings at {}: {e}", path.display());
            TimelineConfig::default()
        }
    }
}
