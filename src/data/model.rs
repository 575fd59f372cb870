use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Region label used for rows without a county.
pub const STATEWIDE: &str = "Statewide";

/// How the statewide sentinel is shown to the user.
pub const STATEWIDE_DISPLAY: &str = "California (Statewide)";

// ---------------------------------------------------------------------------
// Record – one cleaned row
// ---------------------------------------------------------------------------

/// One cleaned row of surgery-count data.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub year: i32,
    pub surgery: String,
    pub hospital: String,
    pub county: String,
    pub cases: u64,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl Record {
    /// Both coordinates, if present.
    pub fn location(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }

    pub fn is_statewide(&self) -> bool {
        self.county.eq_ignore_ascii_case(STATEWIDE)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full cleaned table with pre-computed filter domains.
///
/// Never mutated after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Sorted unique years.
    pub years: BTreeSet<i32>,
    /// Sorted unique surgery types.
    pub surgeries: BTreeSet<String>,
    /// Sorted unique regions (counties plus the statewide sentinel).
    pub regions: BTreeSet<String>,
}

impl Dataset {
    /// Build filter domains from the cleaned records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut years = BTreeSet::new();
        let mut surgeries = BTreeSet::new();
        let mut regions = BTreeSet::new();

        for rec in &records {
            years.insert(rec.year);
            surgeries.insert(rec.surgery.clone());
            regions.insert(rec.county.clone());
        }

        Dataset {
            records,
            years,
            surgeries,
            regions,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of `cases` over every record.
    pub fn total_cases(&self) -> u64 {
        self.records.iter().map(|r| r.cases).sum()
    }
}

// ---------------------------------------------------------------------------
// Selection – the user's filter values
// ---------------------------------------------------------------------------

/// Selected values along the three filter dimensions.
///
/// An empty set selects nothing along that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub years: BTreeSet<i32>,
    pub surgeries: BTreeSet<String>,
    pub regions: BTreeSet<String>,
}

impl Selection {
    /// Select every value present in the dataset.
    pub fn everything(dataset: &Dataset) -> Self {
        Selection {
            years: dataset.years.clone(),
            surgeries: dataset.surgeries.clone(),
            regions: dataset.regions.clone(),
        }
    }

    /// All years plus the configured default surgeries and regions that the
    /// dataset actually contains.
    pub fn with_defaults(
        dataset: &Dataset,
        default_surgeries: &[String],
        default_regions: &[String],
    ) -> Self {
        let surgeries = default_surgeries
            .iter()
            .filter(|s| dataset.surgeries.contains(*s))
            .cloned()
            .collect();
        let regions = default_regions
            .iter()
            .filter(|r| dataset.regions.contains(*r))
            .cloned()
            .collect();

        Selection {
            years: dataset.years.clone(),
            surgeries,
            regions,
        }
    }

    pub fn includes(&self, record: &Record) -> bool {
        self.years.contains(&record.year)
            && self.surgeries.contains(&record.surgery)
            && self.regions.contains(&record.county)
    }

    pub fn includes_statewide(&self) -> bool {
        self.regions.contains(STATEWIDE)
    }
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subsequence of the dataset
// ---------------------------------------------------------------------------

/// Records of a [`Dataset`] that matched a [`Selection`], in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn new(records: Vec<&'a Record>) -> Self {
        FilteredView { records }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sub-view keeping only records from `year`.
    pub fn restrict_year(&self, year: i32) -> FilteredView<'a> {
        self.retain(|r| r.year == year)
    }

    /// Sub-view keeping only the listed surgeries.
    pub fn restrict_surgeries(&self, surgeries: &[String]) -> FilteredView<'a> {
        self.retain(|r| surgeries.iter().any(|s| *s == r.surgery))
    }

    fn retain(&self, keep: impl Fn(&Record) -> bool) -> FilteredView<'a> {
        FilteredView {
            records: self.records.iter().copied().filter(|r| keep(r)).collect(),
        }
    }

    /// Distinct surgeries in the view, sorted.
    pub fn surgeries(&self) -> BTreeSet<&'a str> {
        self.records.iter().map(|r| r.surgery.as_str()).collect()
    }
}

impl fmt::Display for FilteredView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} records", self.records.len())
    }
}

/// Label shown for a region value.
pub fn region_label(region: &str) -> &str {
    if region == STATEWIDE {
        STATEWIDE_DISPLAY
    } else {
        region
    }
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
