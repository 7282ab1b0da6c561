mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::LitterTallyApp;
use config::Config;
use data::loader;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Invalid configuration, using defaults: {e:#}");
            Config::default()
        }
    };

    let state = initial_state(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Litter Tally – Cumulative Mass",
        options,
        Box::new(|_cc| Ok(Box::new(LitterTallyApp::new(state, config)))),
    )
}

/// Load the dataset once before the window opens. Failures are shown in the
/// UI rather than aborting.
fn initial_state(config: &Config) -> AppState {
    let mut state = AppState::default();

    let (result, what) = match &config.data_file {
        Some(path) => (loader::load_file(path), "Failed to load file"),
        None if config.offline => {
            log::info!("Offline mode, skipping startup fetch");
            return state;
        }
        None => (
            loader::load_url(&config.data_url, config.fetch_timeout),
            "Failed to fetch data",
        ),
    };

    match result {
        Ok(dataset) => {
            log::info!("Loaded {} rows from {}", dataset.len(), dataset.source);
            state.set_dataset(dataset);
        }
        Err(e) => state.set_error(what, &e),
    }
    state
}
