//! Writes a synthetic surgery table and matching county boundaries to
//! `data/` so the dashboard can run without the HCAI download.

use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

const SURGERIES: [&str; 11] = [
    "BREAST",
    "COLON",
    "ESOPHAGUS",
    "LIVER",
    "LUNG",
    "OVARY",
    "PANCREAS",
    "PROSTATE",
    "RECTUM",
    "STOMACH",
    "THYROID",
];

/// (county, centre longitude, centre latitude, half-width in degrees, volume weight)
const COUNTIES: [(&str, f64, f64, f64, f64); 6] = [
    ("Los Angeles", -118.23, 34.32, 0.55, 5.0),
    ("Orange", -117.76, 33.70, 0.25, 2.0),
    ("San Diego", -116.74, 33.03, 0.55, 2.5),
    ("Sacramento", -121.34, 38.45, 0.30, 1.2),
    ("Fresno", -119.65, 36.76, 0.70, 0.8),
    ("Alameda", -121.92, 37.65, 0.25, 1.5),
];

const HOSPITALS_PER_COUNTY: usize = 3;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn main() -> Result<()> {
    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).context("creating data/")?;

    let rows = write_surgeries(&out_dir.join("surgeries.csv"))?;
    write_counties(&out_dir.join("ca_counties.geojson"))?;

    println!(
        "Wrote {rows} rows to data/surgeries.csv and {} counties to data/ca_counties.geojson",
        COUNTIES.len()
    );
    Ok(())
}

fn write_surgeries(path: &Path) -> Result<usize> {
    let mut rng = SimpleRng::new(42);
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "Year",
        "County",
        "Hospital",
        "Surgery",
        "# of Cases",
        "LONGITUDE",
        "LATITUDE",
    ])?;

    let mut rows = 0;
    for year in 2013..=2022 {
        for (s_idx, surgery) in SURGERIES.iter().enumerate() {
            // Breast and prostate dominate; thyroid and liver are rare.
            let base = 40.0 / (1.0 + s_idx as f64 * 0.35);
            let mut statewide = 0u64;

            for &(county, lon, lat, half, weight) in &COUNTIES {
                for h in 0..HOSPITALS_PER_COUNTY {
                    let cases = (base * weight * rng.range(0.4, 1.6)).round() as u64;
                    statewide += cases;
                    let hospital = format!("{} MEDICAL CENTER {}", county.to_uppercase(), h + 1);
                    let longitude = lon + rng.range(-half, half) * 0.6;
                    let latitude = lat + rng.range(-half, half) * 0.6;
                    writer.write_record([
                        year.to_string(),
                        county.to_string(),
                        hospital,
                        surgery.to_string(),
                        cases.to_string(),
                        format!("{longitude:.5}"),
                        format!("{latitude:.5}"),
                    ])?;
                    rows += 1;
                }
            }

            // Statewide summary rows carry no county and no coordinates.
            writer.write_record([
                year.to_string(),
                String::new(),
                "STATEWIDE".to_string(),
                surgery.to_string(),
                statewide.to_string(),
                String::new(),
                String::new(),
            ])?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

fn write_counties(path: &Path) -> Result<()> {
    let features = COUNTIES
        .iter()
        .map(|&(county, lon, lat, half, _)| {
            let ring = vec![
                vec![lon - half, lat - half],
                vec![lon + half, lat - half],
                vec![lon + half, lat + half],
                vec![lon - half, lat + half],
                vec![lon - half, lat - half],
            ];
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), county.into());
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    std::fs::write(path, collection.to_string())
        .with_context(|| format!("writing {}", path.display()))
}
