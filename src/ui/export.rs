use eframe::egui::{RichText, Ui};
use surgical_scope::data::export::save_csv;
use surgical_scope::data::model::FilteredView;

use crate::state::AppState;

const METHODOLOGY: &str = "This dataset comes from California's HCAI open data portal. \
It includes 11 surgery types from 2013–2022. \
Use caution when comparing 2015 due to ICD coding changes.";

pub fn export_tab(ui: &mut Ui, state: &mut AppState, view: &FilteredView<'_>) {
    ui.heading("💾 Export Filtered Data");
    ui.label(
        "You can download the currently filtered dataset as a CSV file. \
         This can be used for further analysis or sharing.",
    );
    ui.add_space(8.0);

    if ui
        .button(format!("📥 Download CSV ({} records)", view.len()))
        .clicked()
    {
        save_dialog(state, view);
    }

    ui.add_space(16.0);
    ui.heading("📝 Methodology Notes");
    ui.label(RichText::new(METHODOLOGY).italics());
}

fn save_dialog(state: &mut AppState, view: &FilteredView<'_>) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(state.config.export.filename.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else {
        return;
    };

    match save_csv(view, &path) {
        Ok(()) => state.status_message = None,
        Err(e) => {
            log::error!("Export failed: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
