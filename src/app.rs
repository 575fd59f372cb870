use std::sync::Arc;

use eframe::egui;
use surgical_scope::config::AppConfig;
use surgical_scope::data::filter::filter;

use crate::state::{AppState, Tab};
use crate::ui::{charts, export, overview, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SurgicalScopeApp {
    pub state: AppState,
}

impl SurgicalScopeApp {
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config);
        let path = state.data_path.clone();
        state.load_dataset(&path);
        Self { state }
    }
}

impl eframe::App for SurgicalScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        let Some(dataset) = self.state.dataset.as_ref().map(Arc::clone) else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a surgery CSV to begin  (File → Open…)");
                });
            });
            return;
        };

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &dataset);
            });

        // Recomputed every frame from the shared dataset.
        let view = filter(&dataset, &self.state.selection);

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Overview => overview::overview_tab(ui, &self.state, &view),
            Tab::Visualizations => charts::visualizations_tab(ui, &mut self.state, &view),
            Tab::Export => export::export_tab(ui, &mut self.state, &view),
        });
    }
}
