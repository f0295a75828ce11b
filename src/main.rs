mod app;
mod color;
mod state;
mod ui;

use std::path::Path;

use anyhow::Result;
use app::CatalogLensApp;
use catalog_lens::config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))?;
    log::info!("Catalog source: {}", config.source);

    // Blocking fetch before the window opens; failures are shown in-app.
    let mut state = AppState::new(config);
    let source = state.source.clone();
    state.load(&source);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Catalog Lens",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogLensApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
