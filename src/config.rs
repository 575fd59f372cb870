use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::export::DEFAULT_EXPORT_FILENAME;
use crate::data::geo::DEFAULT_RADIUS_SCALE;

/// Settings read from `surgical-scope.toml`. Every section is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub filters: FilterConfig,
    pub charts: ChartConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub csv: PathBuf,
    pub geojson: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv: PathBuf::from("data/surgeries.csv"),
            geojson: PathBuf::from("data/ca_counties.geojson"),
        }
    }
}

/// Initial filter values; entries missing from the data are ignored.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FilterConfig {
    pub default_surgeries: Vec<String>,
    pub default_regions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_surgeries: ["Breast", "Colon", "Prostate", "Esophagus", "Pancreas", "Stomach"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_regions: vec!["Los Angeles".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartConfig {
    pub default_top_n: usize,
    pub max_top_n: usize,
    pub kde_points: usize,
    pub bubble_radius_scale: f64,
    /// How many surgeries the trend chart shows before the user picks.
    pub trend_default_series: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_top_n: 3,
            max_top_n: 5,
            kde_points: 200,
            bubble_radius_scale: DEFAULT_RADIUS_SCALE,
            trend_default_series: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let charts = &self.charts;
        anyhow::ensure!(charts.max_top_n >= 1, "charts.max_top_n must be at least 1");
        anyhow::ensure!(
            (1..=charts.max_top_n).contains(&charts.default_top_n),
            "charts.default_top_n must be between 1 and {}",
            charts.max_top_n
        );
        anyhow::ensure!(charts.kde_points >= 2, "charts.kde_points must be at least 2");
        anyhow::ensure!(
            charts.bubble_radius_scale.is_finite() && charts.bubble_radius_scale > 0.0,
            "charts.bubble_radius_scale must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.data.csv, PathBuf::from("data/surgeries.csv"));
        assert_eq!(config.filters.default_regions, vec!["Los Angeles"]);
        assert_eq!(config.charts.default_top_n, 3);
        assert_eq!(config.export.filename, DEFAULT_EXPORT_FILENAME);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [data]
            csv = "other.csv"

            [charts]
            max_top_n = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.data.csv, PathBuf::from("other.csv"));
        assert_eq!(config.data.geojson, PathBuf::from("data/ca_counties.geojson"));
        assert_eq!(config.charts.max_top_n, 8);
        assert_eq!(config.charts.kde_points, 200);
    }

    #[test]
    fn rejects_out_of_range_top_n() {
        assert!(AppConfig::from_toml("[charts]\ndefault_top_n = 9\n").is_err());
    }

    #[test]
    fn missing_default_path_is_not_an_error() {
        let config = AppConfig::load_or_default(Path::new("/no/such/surgical-scope.toml")).unwrap();
        assert_eq!(config.charts.max_top_n, 5);
    }
}
