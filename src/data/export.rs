use std::io::Write;
use std::path::Path;

use super::error::DataError;
use super::model::FilteredView;

/// Suggested file name for downloads.
pub const DEFAULT_EXPORT_FILENAME: &str = "filtered_cancer_surgeries.csv";

/// Write the view as UTF-8 CSV with a header row.
///
/// Columns follow [`Record`](super::model::Record) field order. Missing
/// coordinates are written as empty cells.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<(), DataError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if view.is_empty() {
        csv_writer
            .write_record(HEADER)
            .map_err(|e| DataError::Export(e.to_string()))?;
    }
    for rec in view.iter() {
        csv_writer
            .serialize(rec)
            .map_err(|e| DataError::Export(e.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| DataError::Export(e.to_string()))?;
    Ok(())
}

/// Write the view to `path`, replacing any existing file.
pub fn save_csv(view: &FilteredView<'_>, path: &Path) -> Result<(), DataError> {
    let bytes = to_csv_bytes(view)?;
    std::fs::write(path, bytes)
        .map_err(|e| DataError::Export(format!("{}: {e}", path.display())))?;
    log::info!("Exported {} records to {}", view.len(), path.display());
    Ok(())
}

/// The view as CSV bytes, ready to save or send.
pub fn to_csv_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>, DataError> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

// serde only emits headers alongside the first row.
const HEADER: [&str; 7] = [
    "year",
    "surgery",
    "hospital",
    "county",
    "cases",
    "longitude",
    "latitude",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use crate::data::model::Record;

    struct DiskFull;

    impl Write for DiskFull {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(cases: u64) -> Record {
        Record {
            year: 2020,
            surgery: "Breast".to_string(),
            hospital: "Cedars-Sinai Medical Center".to_string(),
            county: "Los Angeles".to_string(),
            cases,
            longitude: Some(-118.38),
            latitude: Some(34.07),
        }
    }

    #[test]
    fn header_and_rows() {
        let records = vec![
            Record {
                year: 2020,
                surgery: "Breast".to_string(),
                hospital: "Señora Hospital".to_string(),
                county: "Orange".to_string(),
                cases: 12,
                longitude: Some(-117.8),
                latitude: Some(33.7),
            },
            Record {
                year: 2021,
                surgery: "Colon".to_string(),
                hospital: "Statewide Total".to_string(),
                county: "Statewide".to_string(),
                cases: 300,
                longitude: None,
                latitude: None,
            },
        ];
        let view = FilteredView::new(records.iter().collect());

        let text = String::from_utf8(to_csv_bytes(&view).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "year,surgery,hospital,county,cases,longitude,latitude");
        assert_eq!(lines[1], "2020,Breast,Señora Hospital,Orange,12,-117.8,33.7");
        assert_eq!(lines[2], "2021,Colon,Statewide Total,Statewide,300,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_view_still_has_header() {
        let text = String::from_utf8(to_csv_bytes(&FilteredView::default()).unwrap()).unwrap();
        assert_eq!(text, "year,surgery,hospital,county,cases,longitude,latitude\n");
    }

    #[test]
    fn export_round_trips_through_loader() {
        let records = vec![Record {
            year: 2019,
            surgery: "Lung".to_string(),
            hospital: "A".to_string(),
            county: "Kern".to_string(),
            cases: 4,
            longitude: None,
            latitude: None,
        }];
        let view = FilteredView::new(records.iter().collect());
        let text = String::from_utf8(to_csv_bytes(&view).unwrap()).unwrap();

        let reloaded = crate::data::loader::parse_dataset(&text).unwrap();
        assert_eq!(reloaded.records, records);
    }

    #[test]
    fn write_failures_are_export_errors() {
        // Enough rows to overflow the csv writer's internal buffer.
        let records: Vec<Record> = (0..2_000).map(record).collect();
        let view = FilteredView::new(records.iter().collect());

        let err = write_csv(&view, DiskFull).unwrap_err();
        assert!(matches!(err, DataError::Export(_)));
        assert!(err.is_contained());

        let err = write_csv(&FilteredView::default(), DiskFull).unwrap_err();
        assert!(matches!(err, DataError::Export(_)));
    }

    #[test]
    fn save_csv_writes_file() {
        let records = vec![record(7)];
        let view = FilteredView::new(records.iter().collect());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILENAME);

        save_csv(&view, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);

        let missing = dir.path().join("no_such_dir").join("out.csv");
        assert!(matches!(save_csv(&view, &missing), Err(DataError::Export(_))));
    }
}
