use std::path::{Path, PathBuf};
use std::sync::Arc;

use surgical_scope::config::AppConfig;
use surgical_scope::data::aggregate::RankDirection;
use surgical_scope::data::cache::DatasetCache;
use surgical_scope::data::filter::region_options;
use surgical_scope::data::geo::{load_regions, RegionSource};
use surgical_scope::data::model::{Dataset, Selection};

use crate::color::SurgeryColors;

// ---------------------------------------------------------------------------
// View options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Visualizations,
    Export,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Visualizations, Tab::Export];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "🔍 Overview",
            Tab::Visualizations => "📊 Visualizations",
            Tab::Export => "💾 Export",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    #[default]
    None,
    HospitalBubbles,
    CountyChoropleth,
}

impl MapMode {
    pub const ALL: [MapMode; 3] = [
        MapMode::None,
        MapMode::HospitalBubbles,
        MapMode::CountyChoropleth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MapMode::None => "None",
            MapMode::HospitalBubbles => "Hospital Bubble Map",
            MapMode::CountyChoropleth => "County Choropleth Map",
        }
    }
}

/// Options of the density chart.
#[derive(Debug, Clone)]
pub struct DistributionOptions {
    pub direction: RankDirection,
    pub remove_outliers: bool,
    pub top_n: usize,
}

/// Options of the trend chart.
#[derive(Debug, Clone)]
pub struct TrendOptions {
    /// `None` until the user edits the list; then the explicit choice.
    pub surgeries: Option<Vec<String>>,
    pub include_total: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Only the dataset cache and the county boundaries outlive an interaction;
/// every filtered view and aggregate is recomputed from `dataset` each frame.
pub struct AppState {
    pub config: AppConfig,
    cache: DatasetCache,

    /// Path of the loaded (or last attempted) dataset.
    pub data_path: PathBuf,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Region filter values in display order.
    pub region_options: Vec<String>,

    pub selection: Selection,
    pub colors: SurgeryColors,

    pub tab: Tab,
    pub distribution: DistributionOptions,
    pub trend: TrendOptions,
    pub map_mode: MapMode,

    /// County boundaries, loaded on first use of the choropleth.
    geo: Option<Result<RegionSource, String>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let distribution = DistributionOptions {
            direction: RankDirection::Most,
            remove_outliers: false,
            top_n: config.charts.default_top_n,
        };
        Self {
            data_path: config.data.csv.clone(),
            config,
            cache: DatasetCache::new(),
            dataset: None,
            region_options: Vec::new(),
            selection: Selection::default(),
            colors: SurgeryColors::default(),
            tab: Tab::default(),
            distribution,
            trend: TrendOptions {
                surgeries: None,
                include_total: true,
            },
            map_mode: MapMode::default(),
            geo: None,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the dataset at `path` and reset filters.
    pub fn load_dataset(&mut self, path: &Path) {
        self.data_path = path.to_path_buf();
        match self.cache.get_or_load(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.dataset = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached copy and load the current file again.
    pub fn reload(&mut self) {
        let path = self.data_path.clone();
        self.cache.invalidate(&path);
        self.load_dataset(&path);
    }

    fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        let filters = &self.config.filters;
        self.selection = Selection::with_defaults(
            &dataset,
            &filters.default_surgeries,
            &filters.default_regions,
        );
        self.region_options = region_options(&dataset);
        self.colors = SurgeryColors::new(&dataset.surgeries);
        self.trend.surgeries = None;
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Select every value of a filter dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match dimension {
            Dimension::Years => self.selection.years = ds.years.clone(),
            Dimension::Surgeries => self.selection.surgeries = ds.surgeries.clone(),
            Dimension::Regions => self.selection.regions = ds.regions.clone(),
        }
    }

    /// Deselect every value of a filter dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Years => self.selection.years.clear(),
            Dimension::Surgeries => self.selection.surgeries.clear(),
            Dimension::Regions => self.selection.regions.clear(),
        }
    }

    /// Surgeries plotted by the trend chart, limited to `available`.
    pub fn trend_surgeries(&self, available: &[String]) -> Vec<String> {
        match &self.trend.surgeries {
            Some(chosen) => available.iter().filter(|s| chosen.contains(s)).cloned().collect(),
            None => available
                .iter()
                .take(self.config.charts.trend_default_series)
                .cloned()
                .collect(),
        }
    }

    /// County boundaries, loading them the first time.
    ///
    /// A failure is remembered so the file is not re-read every frame.
    pub fn regions(&mut self) -> Result<&RegionSource, &str> {
        if self.geo.is_none() {
            let path = self.config.data.geojson.clone();
            self.geo = Some(load_regions(&path).map_err(|e| {
                if e.is_contained() {
                    log::warn!("County map disabled: {e}");
                } else {
                    log::error!("County boundaries failed to load: {e}");
                }
                e.to_string()
            }));
        }
        match &self.geo {
            Some(Ok(source)) => Ok(source),
            Some(Err(msg)) => Err(msg.as_str()),
            None => Err("boundaries not loaded"),
        }
    }

    /// Forget a failed or stale boundary load.
    pub fn reset_regions(&mut self) {
        self.geo = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Years,
    Surgeries,
    Regions,
}
