use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use surgical_scope::data::aggregate::{year_by_surgery_pivot, RankDirection, FILTERED_TOTAL};
use surgical_scope::data::model::FilteredView;
use surgical_scope::data::stats::{surgery_distributions, DistributionOutcome};

use crate::color::TOTAL_COLOR;
use crate::state::{AppState, MapMode};
use crate::ui::maps;

// ---------------------------------------------------------------------------
// Visualizations tab
// ---------------------------------------------------------------------------

pub fn visualizations_tab(ui: &mut Ui, state: &mut AppState, view: &FilteredView<'_>) {
    ui.heading("📊 Interactive Visualizations");

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new("🎛️ View KDE Distribution Options")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    distribution_controls(ui, state);
                    distribution_plot(ui, state, view);
                });

            egui::CollapsingHeader::new("📈 View Surgery Volume Trends")
                .default_open(true)
                .show(ui, |ui: &mut Ui| trend_section(ui, state, view));

            ui.add_space(8.0);
            ui.strong("📍 Location Visualizations");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Choose Map Type:");
                for mode in MapMode::ALL {
                    ui.radio_value(&mut state.map_mode, mode, mode.label());
                }
            });

            match state.map_mode {
                MapMode::None => {}
                MapMode::HospitalBubbles => maps::hospital_bubble_map(ui, state, view),
                MapMode::CountyChoropleth => maps::county_choropleth(ui, state, view),
            }
        });
}

pub fn warning(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(format!("⚠ {text}")).color(Color32::from_rgb(200, 140, 0)));
}

// ---------------------------------------------------------------------------
// Case-count distribution
// ---------------------------------------------------------------------------

fn distribution_controls(ui: &mut Ui, state: &mut AppState) {
    let max_top_n = state.config.charts.max_top_n;
    let options = &mut state.distribution;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Surgery Group");
        for direction in [RankDirection::Most, RankDirection::Least] {
            ui.radio_value(&mut options.direction, direction, direction.label());
        }
        ui.separator();
        ui.checkbox(&mut options.remove_outliers, "Remove Outliers");
        ui.separator();
        ui.add(
            egui::Slider::new(&mut options.top_n, 1..=max_top_n).text("Number of Surgery Types"),
        );
    });
}

fn distribution_plot(ui: &mut Ui, state: &AppState, view: &FilteredView<'_>) {
    let options = &state.distribution;
    let outcome = surgery_distributions(
        view,
        options.top_n,
        options.direction,
        options.remove_outliers,
        state.config.charts.kde_points,
    );

    let curves = match outcome {
        DistributionOutcome::NoData => return warning(ui, "No data available to plot."),
        DistributionOutcome::EmptyAfterFiltering => {
            return warning(ui, "No data available after filtering and outlier removal.")
        }
        DistributionOutcome::Curves(curves) => curves,
    };

    ui.label(RichText::new("Surgery Type Distribution (KDE)").strong());
    Plot::new("kde_plot")
        .legend(Legend::default())
        .height(280.0)
        .x_axis_label("Number of Cases")
        .y_axis_label("Density")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for density in curves {
                let color = state.colors.color_for(&density.surgery);
                let line = Line::new(PlotPoints::from(density.curve))
                    .name(&density.surgery)
                    .color(color)
                    .fill(0.0)
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Volume trends
// ---------------------------------------------------------------------------

fn trend_section(ui: &mut Ui, state: &mut AppState, view: &FilteredView<'_>) {
    if view.is_empty() {
        return warning(ui, "No data available for trend analysis.");
    }

    let available: Vec<String> = view.surgeries().into_iter().map(str::to_string).collect();
    let mut chosen = state.trend_surgeries(&available);

    ui.label("Select Surgery Types to Display");
    let mut changed = false;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for surgery in &available {
            let mut checked = chosen.contains(surgery);
            let text = RichText::new(surgery).color(state.colors.color_for(surgery));
            if ui.checkbox(&mut checked, text).changed() {
                changed = true;
                if checked {
                    chosen.push(surgery.clone());
                } else {
                    chosen.retain(|s| s != surgery);
                }
            }
        }
    });
    if changed {
        state.trend.surgeries = Some(chosen.clone());
    }
    ui.checkbox(&mut state.trend.include_total, "Include Total Line");

    let include_total = state.trend.include_total;
    if chosen.is_empty() && !include_total {
        return warning(ui, "Select at least one surgery type or include the total line.");
    }

    // With nothing chosen the total covers every surgery in the view.
    let pivot = year_by_surgery_pivot(view, &chosen, include_total);
    if pivot.is_empty() {
        return warning(ui, "No matching surgeries found in selected filters.");
    }

    Plot::new("trend_plot")
        .legend(Legend::default())
        .height(280.0)
        .x_axis_label("Year")
        .y_axis_label("Cases")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for column in &pivot.columns {
                let points: PlotPoints = pivot
                    .series(column)
                    .into_iter()
                    .map(|(year, cases)| [year as f64, cases as f64])
                    .collect();
                let line = if column == FILTERED_TOTAL {
                    Line::new(points).color(TOTAL_COLOR).width(2.5)
                } else {
                    Line::new(points).color(state.colors.color_for(column)).width(1.5)
                };
                plot_ui.line(line.name(column));
            }
        });
}
