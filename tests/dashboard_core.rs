use std::sync::Arc;

use surgical_scope::data::aggregate::{
    ranked_surgeries, top_surgery_label, total_cases, year_by_surgery_pivot, RankDirection,
    FILTERED_TOTAL,
};
use surgical_scope::data::cache::DatasetCache;
use surgical_scope::data::filter::{filter, refilter};
use surgical_scope::data::geo::{join_cases_to_regions, parse_regions};
use surgical_scope::data::loader::parse_dataset;
use surgical_scope::data::model::{Dataset, FilteredView, Record, Selection, STATEWIDE};
use surgical_scope::data::stats::{surgery_distributions, DistributionOutcome};

const TABLE: &str = "\
Year,County,Hospital,Surgery,# of Cases,LONGITUDE,LATITUDE
2020,Los Angeles,Good Samaritan,BREAST,60,-118.26,34.05
2020,Los Angeles,Cedars,COLON,40,-118.38,34.07
2021,Orange,Hoag,BREAST,25,-117.93,33.62
2021,,STATEWIDE,BREAST,500,,
2021,Los Angeles,Cedars,PROSTATE,15,-118.38,34.07
2022,Orange,Hoag,LUNG,5,-117.93,33.62
";

const COUNTIES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "name": "Los Angeles" },
      "geometry": { "type": "Polygon", "coordinates": [[[-119,33],[-117,33],[-117,35],[-119,35],[-119,33]]] } },
    { "type": "Feature", "properties": { "name": "Orange" },
      "geometry": { "type": "Polygon", "coordinates": [[[-118,33],[-117,33],[-117,34],[-118,34],[-118,33]]] } }
  ]
}"#;

fn dataset() -> Dataset {
    parse_dataset(TABLE).unwrap()
}

fn selection(years: &[i32], surgeries: &[&str], regions: &[&str]) -> Selection {
    Selection {
        years: years.iter().copied().collect(),
        surgeries: surgeries.iter().map(|s| s.to_string()).collect(),
        regions: regions.iter().map(|r| r.to_string()).collect(),
    }
}

#[test]
fn los_angeles_2020_summary() {
    let ds = dataset();
    let view = filter(&ds, &selection(&[2020], &["Breast", "Colon"], &["Los Angeles"]));

    assert_eq!(view.len(), 2);
    assert_eq!(total_cases(&view), 100);
    assert_eq!(top_surgery_label(&view), "Breast");
}

#[test]
fn filtering_twice_changes_nothing() {
    let ds = dataset();
    let sel = selection(&[2020, 2021], &["Breast", "Colon"], &["Los Angeles", "Orange"]);
    let once = filter(&ds, &sel);
    let twice = refilter(&once, &sel);
    assert_eq!(once.records(), twice.records());
}

fn is_subset(smaller: &FilteredView<'_>, larger: &FilteredView<'_>) -> bool {
    smaller.iter().all(|r| larger.iter().any(|l| std::ptr::eq(l, r)))
}

#[test]
fn enlarging_a_selection_never_drops_records() {
    let ds = dataset();
    let mut sel = selection(&[2021], &["Breast"], &["Orange"]);
    let mut previous = filter(&ds, &sel);
    assert_eq!(previous.len(), 1);

    let steps: [fn(&mut Selection); 6] = [
        |s| {
            s.regions.insert(STATEWIDE.to_string());
        },
        |s| {
            s.years.insert(2020);
        },
        |s| {
            s.surgeries.insert("Colon".to_string());
        },
        |s| {
            s.regions.insert("Los Angeles".to_string());
        },
        |s| {
            s.years.insert(2022);
        },
        |s| {
            s.surgeries.insert("Lung".to_string());
        },
    ];

    for enlarge in steps {
        enlarge(&mut sel);
        let current = filter(&ds, &sel);
        assert!(is_subset(&previous, &current));
        assert!(total_cases(&previous) <= total_cases(&current));
        previous = current;
    }
    assert_eq!(previous.len(), 5);
}

#[test]
fn two_year_two_county_scenario() {
    let record = |year, surgery: &str, hospital: &str, county: &str, cases| Record {
        year,
        surgery: surgery.to_string(),
        hospital: hospital.to_string(),
        county: county.to_string(),
        cases,
        longitude: None,
        latitude: None,
    };
    let ds = Dataset::from_records(vec![
        record(2020, "Breast", "H1", "LA", 50),
        record(2020, "Colon", "H1", "LA", 30),
        record(2021, "Breast", "H2", "Orange", 20),
    ]);

    let view = filter(&ds, &selection(&[2020, 2021], &["Breast", "Colon"], &["LA", "Orange"]));
    assert_eq!(view.len(), 3);
    assert_eq!(total_cases(&view), 100);
    assert_eq!(top_surgery_label(&view), "Breast");
}

#[test]
fn full_selection_covers_every_case() {
    let ds = dataset();
    let view = filter(&ds, &Selection::everything(&ds));
    assert_eq!(view.len(), ds.len());
    assert_eq!(total_cases(&view), ds.total_cases());
    assert_eq!(total_cases(&view), 645);
}

#[test]
fn rankings_are_bounded_and_ordered() {
    let ds = dataset();
    let view = filter(&ds, &Selection::everything(&ds));

    let most = ranked_surgeries(&view, 2, RankDirection::Most);
    assert_eq!(most, vec!["Breast".to_string(), "Colon".to_string()]);

    let least = ranked_surgeries(&view, 2, RankDirection::Least);
    assert_eq!(least, vec!["Lung".to_string(), "Prostate".to_string()]);

    assert_eq!(ranked_surgeries(&view, 10, RankDirection::Most).len(), 4);
}

#[test]
fn pivot_total_matches_each_year() {
    let ds = dataset();
    let view = filter(&ds, &Selection::everything(&ds));
    let surgeries = vec!["Breast".to_string(), "Colon".to_string()];
    let pivot = year_by_surgery_pivot(&view, &surgeries, true);

    let restricted = view.restrict_surgeries(&surgeries);
    for year in pivot.years().collect::<Vec<_>>() {
        let row_sum: u64 = surgeries.iter().map(|s| pivot.value(year, s)).sum();
        assert_eq!(row_sum, pivot.value(year, FILTERED_TOTAL));
        assert_eq!(row_sum, total_cases(&restricted.restrict_year(year)));
    }
}

#[test]
fn county_join_fills_missing_counties_with_zero() {
    let ds = dataset();
    let sel = selection(&[2020], &["Breast", "Colon"], &["Los Angeles", "Orange"]);
    let view = filter(&ds, &sel);
    let source = parse_regions(COUNTIES).unwrap();

    let joined = join_cases_to_regions(&view, &source);
    let cases = |name: &str| joined.iter().find(|r| r.name == name).map(|r| r.cases);
    assert_eq!(cases("Los Angeles"), Some(100));
    assert_eq!(cases("Orange"), Some(0));
}

#[test]
fn distributions_report_empty_views() {
    let ds = dataset();
    let view = filter(&ds, &selection(&[1999], &["Breast"], &["Orange"]));
    let outcome = surgery_distributions(&view, 3, RankDirection::Most, true, 50);
    assert!(matches!(outcome, DistributionOutcome::NoData));
}

#[test]
fn cached_file_is_shared_between_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("surgeries.csv");
    std::fs::write(&path, TABLE).unwrap();

    let mut cache = DatasetCache::new();
    let first = cache.get_or_load(&path).unwrap();
    let second = cache.get_or_load(&path).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 6);
    assert!(first.regions.contains(STATEWIDE));
}
