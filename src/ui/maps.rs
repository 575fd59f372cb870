use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Points, Polygon};
use surgical_scope::data::geo::{hospital_points, join_cases_to_regions, HospitalPoints};
use surgical_scope::data::model::FilteredView;

use crate::color::{choropleth_fill, BUBBLE_COLOR};
use crate::state::AppState;
use crate::ui::charts::warning;
use crate::ui::thousands;

/// Latitude the map projection is centred on (California).
const CENTER_LATITUDE: f64 = 36.7783;

/// Bubble radius range in screen pixels.
const MIN_BUBBLE_PX: f32 = 2.0;
const MAX_BUBBLE_PX: f32 = 28.0;

/// Longitude degrees shrink with cos(latitude).
fn map_aspect() -> f32 {
    (1.0 / CENTER_LATITUDE.to_radians().cos()) as f32
}

// ---------------------------------------------------------------------------
// Hospital bubbles
// ---------------------------------------------------------------------------

pub fn hospital_bubble_map(ui: &mut Ui, state: &AppState, view: &FilteredView<'_>) {
    let points = match hospital_points(view, state.config.charts.bubble_radius_scale) {
        HospitalPoints::EmptyView => return warning(ui, "No data available for hospital map."),
        HospitalPoints::NoLocationData => {
            return warning(ui, "Location data not available for the current selection.")
        }
        HospitalPoints::Points(points) => points,
    };

    let max_radius = points.iter().map(|p| p.radius).fold(0.0_f64, f64::max);

    Plot::new("hospital_map")
        .data_aspect(map_aspect())
        .height(520.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{:.3}, {:.3}", value.x, value.y)
            } else {
                name.to_string()
            }
        })
        .show(ui, |plot_ui| {
            for point in &points {
                let share = if max_radius > 0.0 { point.radius / max_radius } else { 0.0 };
                let radius = (share as f32 * MAX_BUBBLE_PX).max(MIN_BUBBLE_PX);
                let marker = Points::new(vec![[point.longitude, point.latitude]])
                    .radius(radius)
                    .filled(true)
                    .color(BUBBLE_COLOR)
                    .name(format!(
                        "Hospital: {}\nCases: {}",
                        point.hospital,
                        thousands(point.cases)
                    ));
                plot_ui.points(marker);
            }
        });
}

// ---------------------------------------------------------------------------
// County choropleth
// ---------------------------------------------------------------------------

pub fn county_choropleth(ui: &mut Ui, state: &mut AppState, view: &FilteredView<'_>) {
    if view.is_empty() {
        return warning(ui, "No data available for county-level map.");
    }

    let source = match state.regions() {
        Ok(source) => source,
        Err(msg) => {
            ui.colored_label(Color32::RED, format!("County map unavailable: {msg}"));
            return;
        }
    };

    let regions = join_cases_to_regions(view, source);
    let max_cases = regions.iter().map(|r| r.cases).max().unwrap_or(0);

    Plot::new("county_map")
        .data_aspect(map_aspect())
        .height(520.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for region in &regions {
                let fill = choropleth_fill(region.cases, max_cases);
                let label = format!("{}\nCases: {}", region.key, thousands(region.cases));
                // egui fills polygons as convex hulls; outlines stay exact.
                for ring in &region.rings {
                    let polygon = Polygon::new(PlotPoints::from(ring.clone()))
                        .fill_color(fill)
                        .stroke(Stroke::new(0.5, Color32::from_gray(90)))
                        .name(&label);
                    plot_ui.polygon(polygon);
                }
            }
        });
}
