use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use geojson::{Feature, FeatureCollection, GeoJson, Value};
use serde_json::Value as JsonValue;

use super::aggregate::cases_by_county;
use super::error::DataError;
use super::model::FilteredView;

/// Property holding the polygon name used as the join key.
pub const NAME_PROPERTY: &str = "name";

/// Property written by the join.
pub const CASES_PROPERTY: &str = "cases";

/// Default bubble scale: one case draws a 10 m radius.
pub const DEFAULT_RADIUS_SCALE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Boundary source
// ---------------------------------------------------------------------------

/// A parsed GeoJSON FeatureCollection whose features all carry a string
/// `name` property.
#[derive(Debug, Clone)]
pub struct RegionSource {
    collection: FeatureCollection,
}

impl RegionSource {
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }
}

/// Read county boundaries from a GeoJSON file.
pub fn load_regions(path: &Path) -> Result<RegionSource, DataError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DataError::GeoData(format!("{}: {e}", path.display())))?;
    let source = parse_regions(&text)?;
    log::info!("Loaded {} boundary polygons from {}", source.len(), path.display());
    Ok(source)
}

/// Parse county boundaries from GeoJSON text.
pub fn parse_regions(text: &str) -> Result<RegionSource, DataError> {
    let geojson = GeoJson::from_str(text).map_err(|e| DataError::GeoData(e.to_string()))?;
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(DataError::GeoData("expected a FeatureCollection".to_string())),
    };

    if let Some(i) = collection.features.iter().position(|f| feature_name(f).is_none()) {
        return Err(DataError::GeoData(format!(
            "feature {i} has no string '{NAME_PROPERTY}' property"
        )));
    }

    Ok(RegionSource { collection })
}

fn feature_name(feature: &Feature) -> Option<&str> {
    feature.property(NAME_PROPERTY).and_then(JsonValue::as_str)
}

// ---------------------------------------------------------------------------
// County join
// ---------------------------------------------------------------------------

/// A boundary polygon annotated with the summed cases of its county.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRegion {
    /// Name as written in the boundary file.
    pub name: String,
    /// Lower-cased name used for matching.
    pub key: String,
    pub cases: u64,
    /// Outer and inner rings as `[longitude, latitude]` pairs.
    pub rings: Vec<Vec<[f64; 2]>>,
}

/// County totals keyed by lower-cased county name.
///
/// Counties differing only in case are summed together.
fn county_totals(view: &FilteredView<'_>) -> HashMap<String, u64> {
    let mut totals = HashMap::new();
    for (county, cases) in cases_by_county(view) {
        *totals.entry(county.to_lowercase()).or_insert(0) += cases;
    }
    totals
}

/// Attach per-county case totals to every polygon.
///
/// Matching is case-insensitive and otherwise exact. Polygons without a
/// matching county get 0; counties without a polygon are ignored.
pub fn join_cases_to_regions(view: &FilteredView<'_>, source: &RegionSource) -> Vec<GeoRegion> {
    let totals = county_totals(view);

    let regions: Vec<GeoRegion> = source
        .collection
        .features
        .iter()
        .filter_map(|feature| {
            let name = feature_name(feature)?;
            let key = name.to_lowercase();
            let cases = totals.get(&key).copied().unwrap_or(0);
            Some(GeoRegion {
                name: name.to_string(),
                key,
                cases,
                rings: feature.geometry.as_ref().map(|g| rings(&g.value)).unwrap_or_default(),
            })
        })
        .collect();

    let matched = regions.iter().filter(|r| totals.contains_key(&r.key)).count();
    log::debug!(
        "Joined {} counties onto {} polygons ({} matched)",
        totals.len(),
        regions.len(),
        matched
    );
    regions
}

/// The join expressed as GeoJSON: each feature's `name` lower-cased and a
/// `cases` property added.
pub fn annotated_feature_collection(
    view: &FilteredView<'_>,
    source: &RegionSource,
) -> FeatureCollection {
    let totals = county_totals(view);
    let mut collection = source.collection.clone();

    for feature in &mut collection.features {
        let Some(key) = feature_name(feature).map(str::to_lowercase) else {
            continue;
        };
        let cases = totals.get(&key).copied().unwrap_or(0);
        feature.set_property(NAME_PROPERTY, key);
        feature.set_property(CASES_PROPERTY, cases);
    }
    collection
}

fn rings(value: &Value) -> Vec<Vec<[f64; 2]>> {
    let to_ring = |line: &Vec<Vec<f64>>| -> Vec<[f64; 2]> {
        line.iter()
            .filter(|pos| pos.len() >= 2)
            .map(|pos| [pos[0], pos[1]])
            .collect()
    };

    match value {
        Value::Polygon(polygon) => polygon.iter().map(to_ring).collect(),
        Value::MultiPolygon(polygons) => polygons.iter().flatten().map(to_ring).collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(|g| rings(&g.value)).collect()
        }
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Hospital points
// ---------------------------------------------------------------------------

/// One located hospital row for the bubble map.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalPoint {
    pub hospital: String,
    pub county: String,
    pub longitude: f64,
    pub latitude: f64,
    pub cases: u64,
    /// Bubble radius in metres, proportional to `cases`.
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HospitalPoints {
    /// The filtered view was empty.
    EmptyView,
    /// Records exist but none has coordinates outside the statewide rows.
    NoLocationData,
    Points(Vec<HospitalPoint>),
}

/// Located, non-statewide records as map points.
pub fn hospital_points(view: &FilteredView<'_>, radius_scale: f64) -> HospitalPoints {
    if view.is_empty() {
        return HospitalPoints::EmptyView;
    }

    let points: Vec<HospitalPoint> = view
        .iter()
        .filter(|r| !r.is_statewide())
        .filter_map(|r| {
            let (longitude, latitude) = r.location()?;
            Some(HospitalPoint {
                hospital: r.hospital.clone(),
                county: r.county.clone(),
                longitude,
                latitude,
                cases: r.cases,
                radius: r.cases as f64 * radius_scale,
            })
        })
        .collect();

    if points.is_empty() {
        HospitalPoints::NoLocationData
    } else {
        HospitalPoints::Points(points)
    }
}
