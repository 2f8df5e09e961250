use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use mean_age_explorer::app::MeanAgeApp;
use mean_age_explorer::auth::PassphraseGate;
use mean_age_explorer::config::Config;
use mean_age_explorer::data;
use mean_age_explorer::state::{AppState, ViewSettings};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::parse();
    config.validate()?;

    // The table is read once; a bad file stops the program here.
    let dataset = data::loader::load_file(&config.data).inspect_err(|e| {
        log::error!("Failed to load data: {e:#}");
    })?;
    log::info!(
        "Loaded {} records: {} locations, {} sexes, {} years",
        dataset.len(),
        dataset.domain.locations.len(),
        dataset.domain.sexes.len(),
        dataset.domain.years.len()
    );

    let state = AppState::new(
        Arc::new(dataset),
        ViewSettings::from(&config),
        PassphraseGate::new(config.passphrase.clone()),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Exploring the Mean Age of Suicide Mortality",
        options,
        Box::new(|_cc| Ok(Box::new(MeanAgeApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the UI")
}
