use std::collections::{BTreeMap, BTreeSet};

use super::model::FilteredView;

/// Column name of the synthetic per-year total in a [`TrendPivot`].
pub const FILTERED_TOTAL: &str = "Filtered Total";

/// Shown instead of a surgery name when the view is empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Whether a ranking picks the largest or the smallest totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDirection {
    #[default]
    Most,
    Least,
}

impl RankDirection {
    pub fn label(self) -> &'static str {
        match self {
            RankDirection::Most => "Most Common",
            RankDirection::Least => "Least Common",
        }
    }
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

pub fn total_cases(view: &FilteredView<'_>) -> u64 {
    view.iter().map(|r| r.cases).sum()
}

/// Surgery with the largest summed cases.
///
/// Ties go to the lexicographically smallest surgery name.
pub fn top_surgery_by_volume<'a>(view: &FilteredView<'a>) -> Option<&'a str> {
    let mut best: Option<(&'a str, u64)> = None;
    for (surgery, total) in cases_by_surgery(view) {
        if best.map_or(true, |(_, max)| total > max) {
            best = Some((surgery, total));
        }
    }
    best.map(|(surgery, _)| surgery)
}

/// [`top_surgery_by_volume`] with the `N/A` placeholder.
pub fn top_surgery_label<'a>(view: &FilteredView<'a>) -> &'a str {
    top_surgery_by_volume(view).unwrap_or(NOT_AVAILABLE)
}

/// Distinct hospital names; blank names are not counted.
pub fn distinct_hospital_count(view: &FilteredView<'_>) -> usize {
    view.iter()
        .map(|r| r.hospital.as_str())
        .filter(|h| !h.is_empty())
        .collect::<BTreeSet<_>>()
        .len()
}

// ---------------------------------------------------------------------------
// Grouped sums
// ---------------------------------------------------------------------------

pub fn cases_by_surgery<'a>(view: &FilteredView<'a>) -> BTreeMap<&'a str, u64> {
    let mut totals = BTreeMap::new();
    for rec in view.iter() {
        *totals.entry(rec.surgery.as_str()).or_insert(0) += rec.cases;
    }
    totals
}

pub fn cases_by_county<'a>(view: &FilteredView<'a>) -> BTreeMap<&'a str, u64> {
    let mut totals = BTreeMap::new();
    for rec in view.iter() {
        *totals.entry(rec.county.as_str()).or_insert(0) += rec.cases;
    }
    totals
}

pub fn cases_by_year_and_surgery<'a>(view: &FilteredView<'a>) -> BTreeMap<(i32, &'a str), u64> {
    let mut totals = BTreeMap::new();
    for rec in view.iter() {
        *totals.entry((rec.year, rec.surgery.as_str())).or_insert(0) += rec.cases;
    }
    totals
}

/// The `n` surgeries with the largest (or smallest) total cases.
///
/// Equal totals keep alphabetical order. An empty view yields an empty list.
pub fn ranked_surgeries(
    view: &FilteredView<'_>,
    n: usize,
    direction: RankDirection,
) -> Vec<String> {
    let mut totals: Vec<(&str, u64)> = cases_by_surgery(view).into_iter().collect();
    // Stable sort, so ties stay in name order.
    match direction {
        RankDirection::Most => totals.sort_by(|a, b| b.1.cmp(&a.1)),
        RankDirection::Least => totals.sort_by(|a, b| a.1.cmp(&b.1)),
    }
    totals
        .into_iter()
        .take(n)
        .map(|(surgery, _)| surgery.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Year × surgery pivot
// ---------------------------------------------------------------------------

/// Cases per year and surgery with every gap filled with zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendPivot {
    /// Series names in column order; [`FILTERED_TOTAL`] last when present.
    pub columns: Vec<String>,
    /// year → (series → cases)
    pub rows: BTreeMap<i32, BTreeMap<String, u64>>,
}

impl TrendPivot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    pub fn value(&self, year: i32, column: &str) -> u64 {
        self.rows
            .get(&year)
            .and_then(|row| row.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// `(year, cases)` points of one series, in year order.
    pub fn series(&self, column: &str) -> Vec<(i32, u64)> {
        self.years().map(|y| (y, self.value(y, column))).collect()
    }

    pub fn has_total(&self) -> bool {
        self.columns.last().map(String::as_str) == Some(FILTERED_TOTAL)
    }
}

/// Pivot the view into year rows and surgery columns.
///
/// `surgeries` restricts the columns; an empty slice keeps every surgery.
/// With `include_total` a [`FILTERED_TOTAL`] column holds each row's sum.
pub fn year_by_surgery_pivot(
    view: &FilteredView<'_>,
    surgeries: &[String],
    include_total: bool,
) -> TrendPivot {
    let scoped;
    let view = if surgeries.is_empty() {
        view
    } else {
        scoped = view.restrict_surgeries(surgeries);
        &scoped
    };

    if view.is_empty() {
        return TrendPivot::default();
    }

    let mut columns: Vec<String> = view.surgeries().into_iter().map(str::to_string).collect();
    let sums = cases_by_year_and_surgery(view);

    let mut rows: BTreeMap<i32, BTreeMap<String, u64>> = BTreeMap::new();
    for rec in view.iter() {
        rows.entry(rec.year).or_insert_with(|| {
            columns.iter().map(|c| (c.clone(), 0)).collect()
        });
    }
    for ((year, surgery), total) in sums {
        if let Some(row) = rows.get_mut(&year) {
            row.insert(surgery.to_string(), total);
        }
    }

    if include_total {
        for row in rows.values_mut() {
            let total = row.values().sum();
            row.insert(FILTERED_TOTAL.to_string(), total);
        }
        columns.push(FILTERED_TOTAL.to_string());
    }

    TrendPivot { columns, rows }
}
