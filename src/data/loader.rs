use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;

use super::error::DataError;
use super::model::{Dataset, Record, STATEWIDE};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean the surgery table at `path`.
///
/// The file is read as Latin-1. See [`parse_dataset`] for the cleaning rules.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let bytes = std::fs::read(path).map_err(|source| DataError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    // WHATWG maps the latin1 label onto windows-1252, a superset.
    let (text, _, had_errors) = WINDOWS_1252.decode(&bytes);
    if had_errors {
        log::warn!("{}: some bytes could not be decoded as Latin-1", path.display());
    }

    let dataset = parse_dataset(&text)?;
    log::info!(
        "Loaded {} records ({} years, {} surgery types, {} regions) from {}",
        dataset.len(),
        dataset.years.len(),
        dataset.surgeries.len(),
        dataset.regions.len(),
        path.display()
    );
    Ok(dataset)
}

/// Clean an in-memory CSV table into a [`Dataset`].
///
/// * column names are trimmed, lower-cased and spaces become underscores
/// * `# of Cases` / `Number of Cases` become `cases`
/// * rows without a surgery or year are dropped
/// * `year` and `cases` must be non-negative integers
/// * surgery and hospital are title-cased
/// * an empty or absent county becomes `Statewide`
pub fn parse_dataset(text: &str) -> Result<Dataset, DataError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        // Row numbers as a spreadsheet would show them (header is row 1).
        let line = row_no + 2;

        let surgery = columns.surgery.cell(&row);
        let year = columns.year.cell(&row);
        if surgery.is_empty() || year.is_empty() {
            dropped += 1;
            continue;
        }

        let year = coerce_integer(year, line, "year")?;
        let year = i32::try_from(year).map_err(|_| DataError::TypeCoercion {
            row: line,
            column: "year",
            value: year.to_string(),
        })?;
        let cases = coerce_integer(columns.cases.cell(&row), line, "cases")?;

        let county = columns
            .county
            .map(|c| c.cell(&row))
            .filter(|c| !c.is_empty())
            .unwrap_or(STATEWIDE);

        records.push(Record {
            year,
            surgery: title_case(surgery),
            hospital: title_case(columns.hospital.cell(&row)),
            county: title_case(county),
            cases,
            longitude: columns.longitude.and_then(|c| parse_coordinate(c.cell(&row))),
            latitude: columns.latitude.and_then(|c| parse_coordinate(c.cell(&row))),
        });
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} rows with a missing surgery or year");
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct ColumnIndex(usize);

impl ColumnIndex {
    fn cell<'r>(&self, row: &'r StringRecord) -> &'r str {
        row.get(self.0).unwrap_or("")
    }
}

struct Columns {
    year: ColumnIndex,
    surgery: ColumnIndex,
    hospital: ColumnIndex,
    cases: ColumnIndex,
    county: Option<ColumnIndex>,
    longitude: Option<ColumnIndex>,
    latitude: Option<ColumnIndex>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, DataError> {
        let names: Vec<String> = headers.iter().map(normalize_column_name).collect();
        let find = |wanted: &str| names.iter().position(|n| n == wanted).map(ColumnIndex);
        let require =
            |wanted: &str| find(wanted).ok_or_else(|| DataError::Schema(wanted.to_string()));

        Ok(Columns {
            year: require("year")?,
            surgery: require("surgery")?,
            hospital: require("hospital")?,
            cases: require("cases")?,
            county: find("county"),
            longitude: find("longitude"),
            latitude: find("latitude"),
        })
    }
}

/// Normalize a header: trim, lower-case, spaces to underscores, then apply
/// the known renames.
pub fn normalize_column_name(raw: &str) -> String {
    let name = raw.trim().to_lowercase().replace(' ', "_");
    match name.as_str() {
        "#_of_cases" | "number_of_cases" => "cases".to_string(),
        _ => name,
    }
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

/// Parse a non-negative integer, accepting integral floats like `12.0`.
fn coerce_integer(value: &str, row: usize, column: &'static str) -> Result<u64, DataError> {
    let err = || DataError::TypeCoercion {
        row,
        column,
        value: value.to_string(),
    };

    if let Ok(n) = value.parse::<u64>() {
        return Ok(n);
    }
    let f = value.parse::<f64>().map_err(|_| err())?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Ok(f as u64)
    } else {
        Err(err())
    }
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
///
/// `"BREAST"` → `"Breast"`, `"st. mary's"` → `"St. Mary'S"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
