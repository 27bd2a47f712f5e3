use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_explorer::app::CatalogApp;
use catalog_explorer::config::Config;
use catalog_explorer::data;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env().context("reading configuration")?;
    log::debug!("Configuration: {config:?}");

    // Without data there is nothing to show, so a load failure ends the process here.
    let rows = data::loader::load_raw_rows(&config).inspect_err(|e| log::error!("{e}"))?;
    let dataset = Arc::new(data::prepare::prepare(rows));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Catalog Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(CatalogApp::new(cc, dataset)?))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
