use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use surgical_scope::data::model::{region_label, Dataset};

use crate::state::{AppState, Dimension, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the filter panel. Changes apply on the next frame's recompute.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, dataset: &Dataset) {
    ui.heading("🎛️ Filter Your View");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let years: Vec<(i32, String)> =
                dataset.years.iter().map(|y| (*y, y.to_string())).collect();
            filter_group(ui, state, Dimension::Years, "Year(s)", &years, true);

            let surgeries: Vec<(String, String)> =
                dataset.surgeries.iter().map(|s| (s.clone(), s.clone())).collect();
            filter_group(ui, state, Dimension::Surgeries, "Surgery Type(s)", &surgeries, true);

            let regions: Vec<(String, String)> = state
                .region_options
                .iter()
                .map(|r| (r.clone(), region_label(r).to_string()))
                .collect();
            filter_group(ui, state, Dimension::Regions, "Region(s)", &regions, false);
        });
}

/// Values a filter dimension can hold.
trait FilterValue: Ord + Clone {
    fn selected(state: &mut AppState, dimension: Dimension) -> &mut BTreeSet<Self>;
}

impl FilterValue for i32 {
    fn selected(state: &mut AppState, _dimension: Dimension) -> &mut BTreeSet<Self> {
        &mut state.selection.years
    }
}

impl FilterValue for String {
    fn selected(state: &mut AppState, dimension: Dimension) -> &mut BTreeSet<Self> {
        match dimension {
            Dimension::Regions => &mut state.selection.regions,
            _ => &mut state.selection.surgeries,
        }
    }
}

fn filter_group<T: FilterValue>(
    ui: &mut Ui,
    state: &mut AppState,
    dimension: Dimension,
    title: &str,
    options: &[(T, String)],
    default_open: bool,
) {
    // Show count of selected / total in the header
    let n_selected = T::selected(state, dimension).len();
    let header_text = format!("{title}  ({n_selected}/{})", options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(default_open)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dimension);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(dimension);
                }
            });

            let selected = T::selected(state, dimension);
            for (value, label) in options {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, label.as_str()).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, tab switcher and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                state.reset_regions();
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} records loaded from {}", ds.len(), state.data_path.display()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open surgery data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_dataset(&path);
    }
}
