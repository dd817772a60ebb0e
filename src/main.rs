//! Gomoku GUI
//!
//! A graphical interface for playing Gomoku against the engine or another player.
//! Set `GOMOKU_CONFIG` to a JSON file to override the engine settings.

use gomoku::ui::GomokuApp;
use gomoku::EngineConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "GOMOKU_CONFIG";

fn load_config() -> EngineConfig {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return EngineConfig::default();
    };
    match EngineConfig::load(&path) {
        Ok(config) => {
            info!(path = ?path, "engine config loaded");
            config
        }
        Err(e) => {
            warn!(path = ?path, error = %e, "falling back to default engine config");
            EngineConfig::default()
        }
    }
}

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Gomoku"),
        ..Default::default()
    };

    eframe::run_native(
        "Gomoku",
        options,
        Box::new(|cc| Ok(Box::new(GomokuApp::new(cc, config)?))),
    )
}
