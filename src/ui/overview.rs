use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use surgical_scope::data::aggregate::{distinct_hospital_count, top_surgery_label, total_cases};
use surgical_scope::data::model::{FilteredView, Record};

use crate::state::AppState;
use crate::ui::thousands;

/// Rows shown in the preview table.
const PREVIEW_ROWS: usize = 5;

pub fn overview_tab(ui: &mut Ui, state: &AppState, view: &FilteredView<'_>) {
    ui.heading("📋 Overview");
    ui.add_space(8.0);

    ui.columns(2, |cols| {
        cols[0].strong("Filtered Records");
        records_table(&mut cols[0], view, !state.selection.includes_statewide());

        cols[1].strong("Summary Stats");
        metric(&mut cols[1], "Total Surgeries", &thousands(total_cases(view)));
        metric(&mut cols[1], "Top Surgery Type", top_surgery_label(view));
        metric(&mut cols[1], "Hospitals Represented", &distinct_hospital_count(view).to_string());
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.add_space(6.0);
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).size(26.0).strong());
}

/// First rows of the view. Coordinates are hidden while the statewide
/// sentinel is selected, since those rows carry none.
fn records_table(ui: &mut Ui, view: &FilteredView<'_>, show_coordinates: bool) {
    if view.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    let mut headers = vec!["year", "surgery", "hospital", "county", "cases"];
    if show_coordinates {
        headers.extend(["longitude", "latitude"]);
    }

    TableBuilder::new(ui)
        .id_salt("overview_records")
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(48.0), headers.len())
        .header(20.0, |mut header| {
            for name in &headers {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|mut body| {
            for rec in view.iter().take(PREVIEW_ROWS) {
                body.row(18.0, |mut row| {
                    for cell in record_cells(rec, show_coordinates) {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

fn record_cells(rec: &Record, show_coordinates: bool) -> Vec<String> {
    let mut cells = vec![
        rec.year.to_string(),
        rec.surgery.clone(),
        rec.hospital.clone(),
        rec.county.clone(),
        thousands(rec.cases),
    ];
    if show_coordinates {
        let coord = |v: Option<f64>| v.map(|v| format!("{v:.4}")).unwrap_or_default();
        cells.push(coord(rec.longitude));
        cells.push(coord(rec.latitude));
    }
    cells
}
