use super::model::{Dataset, FilteredView, Selection, STATEWIDE};

// ---------------------------------------------------------------------------
// Filter predicate: year AND surgery AND region membership
// ---------------------------------------------------------------------------

/// Return the records of `dataset` that pass all three selection sets.
///
/// A record passes when its year, surgery and county are each in the
/// corresponding set. An empty set therefore yields an empty view.
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredView<'a> {
    let view = FilteredView::new(
        dataset
            .records
            .iter()
            .filter(|rec| selection.includes(rec))
            .collect(),
    );
    log::debug!("Filter kept {} of {} records", view.len(), dataset.len());
    view
}

/// Re-apply a selection to an existing view.
pub fn refilter<'a>(view: &FilteredView<'a>, selection: &Selection) -> FilteredView<'a> {
    FilteredView::new(view.iter().filter(|rec| selection.includes(rec)).collect())
}

/// Regions in display order: the statewide sentinel first, then counties
/// alphabetically.
pub fn region_options(dataset: &Dataset) -> Vec<String> {
    let mut regions: Vec<String> = Vec::with_capacity(dataset.regions.len());
    if dataset.regions.contains(STATEWIDE) {
        regions.push(STATEWIDE.to_string());
    }
    regions.extend(dataset.regions.iter().filter(|r| *r != STATEWIDE).cloned());
    regions
}
