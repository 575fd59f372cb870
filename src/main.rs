mod app;
mod cli;
mod color;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::Result;
use app::SurgicalScopeApp;
use clap::Parser;
use cli::{Cli, Commands};
use eframe::egui;
use surgical_scope::config::AppConfig;
use surgical_scope::data::filter::filter;
use surgical_scope::data::loader::load_dataset;

const DEFAULT_CONFIG: &str = "surgical-scope.toml";

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(Path::new(DEFAULT_CONFIG))?,
    };
    if let Some(data) = cli.data {
        config.data.csv = data;
    }
    if let Some(geojson) = cli.geojson {
        config.data.geojson = geojson;
    }

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => run_dashboard(config),
        Commands::Summary { filters } => {
            let dataset = load_dataset(&config.data.csv)?;
            let view = filter(&dataset, &filters.selection(&dataset));
            cli::print_summary(&view);
            Ok(())
        }
        Commands::Export { filters, out } => {
            let dataset = load_dataset(&config.data.csv)?;
            let view = filter(&dataset, &filters.selection(&dataset));
            let out = out.unwrap_or_else(|| PathBuf::from(&config.export.filename));
            cli::export(&view, &out)
        }
    }
}

fn run_dashboard(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Surgical Scope – Cancer Procedure Trends in California",
        options,
        Box::new(|_cc| Ok(Box::new(SurgicalScopeApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard failed: {e}"))
}
