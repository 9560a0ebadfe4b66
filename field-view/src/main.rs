//! Application entry point for the desktop particle field viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! animation and drawing to [`Viewer`] from the `viewer` module.

mod canvas;
mod viewer;

use std::path::PathBuf;

use field_core::config::{FieldConfig, Preset};
use viewer::Viewer;

/// Where "Save config" writes when no path argument is given.
const DEFAULT_CONFIG_PATH: &str = "particle-field.json";

/// Picks the configuration for the first session.
///
/// With a path argument the JSON file is loaded and validated; on any
/// failure the hero preset is used instead. The path (or the default
/// one) is also where the viewer saves the configuration.
fn initial_config() -> (FieldConfig, Option<Preset>, PathBuf) {
    let Some(path) = std::env::args().nth(1) else {
        return (
            Preset::Hero.config(),
            Some(Preset::Hero),
            PathBuf::from(DEFAULT_CONFIG_PATH),
        );
    };
    match FieldConfig::load(&path) {
        Ok(cfg) => {
            log::info!("loaded field config from {path}");
            (cfg, None, PathBuf::from(path))
        }
        Err(e) => {
            log::warn!("{e}; using the {} preset", Preset::Hero.name());
            (Preset::Hero.config(), Some(Preset::Hero), PathBuf::from(path))
        }
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (cfg, preset, config_path) = initial_config();
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Particle Field",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg, preset, config_path)))),
    )
}
