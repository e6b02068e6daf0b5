//! Tests for saving, loading and importing sheets

use cellflow::prelude::*;
use cellflow::{JsonError, SheetReader, SheetWriteOptions, SheetWriter};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn r(identifier: &str) -> CellReference {
    CellReference::parse(identifier).unwrap()
}

fn snapshot(sheet: &Sheet) -> Vec<(String, String, String)> {
    sheet
        .iter()
        .map(|(reference, cell)| {
            (
                reference.identifier(),
                cell.text().to_string(),
                cell.display_value(),
            )
        })
        .collect()
}

fn sample_sheet() -> Sheet {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "=B1 + B2").unwrap();
    sheet.set_cell("B1", "1.5").unwrap();
    sheet.set_cell("B2", "=C3 * 2").unwrap();
    sheet.set_cell("C3", "4").unwrap();
    sheet.set_cell("D1", "label").unwrap();
    sheet
}

#[test]
fn test_export_order() {
    let identifiers: Vec<_> = sample_sheet()
        .export_all()
        .into_iter()
        .map(|record| record.reference.identifier())
        .collect();
    assert_eq!(identifiers, vec!["B1", "D1", "C3", "A1", "B2"]);
}

#[test]
fn test_import_matches_live_edits() {
    let original = sample_sheet();
    assert_eq!(original.display_value(0, 1), "9.5");

    let mut copy = Sheet::new();
    copy.import(original.export_all());
    assert_eq!(snapshot(&copy), snapshot(&original));
}

#[test]
fn test_import_order_does_not_matter_after_recalculation() {
    // Formulas first, each reading a cell that does not exist yet
    let records = vec![
        SheetRecord::new(r("A1"), "=A2 * 10"),
        SheetRecord::new(r("A2"), "=A3 + 1"),
        SheetRecord::new(r("A3"), "1"),
    ];

    let mut sheet = Sheet::new();
    sheet.import(records.clone());
    assert_eq!(sheet.display_value(0, 1), "20");

    // Replayed edits alone already settle once the last input arrives
    let mut sheet = Sheet::with_options(SheetOptions {
        recalculate_after_import: false,
        ..Default::default()
    });
    sheet.import(records);
    assert_eq!(sheet.display_value(0, 1), "20");
}

#[test]
fn test_import_keeps_cycles_errored() {
    let records = vec![
        SheetRecord::new(r("A1"), "=B1"),
        SheetRecord::new(r("B1"), "=A1"),
        SheetRecord::new(r("C1"), "=A1 + 1"),
        SheetRecord::new(r("D1"), "5"),
    ];
    let mut sheet = Sheet::new();
    sheet.import(records);
    assert_eq!(sheet.display_value(0, 1), "ERR");
    assert_eq!(sheet.display_value(0, 2), "ERR");
    assert_eq!(sheet.display_value(0, 3), "ERR");
    assert_eq!(sheet.display_value(0, 4), "5");
}

#[test]
fn test_save_and_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("budget.sheets");

    let original = sample_sheet();
    original.save(&path).unwrap();

    let loaded = Sheet::open(&path).unwrap();
    assert_eq!(snapshot(&loaded), snapshot(&original));

    let records = SheetReader::read_file(&path).unwrap();
    assert_eq!(records, original.export_all());
}

#[test]
fn test_open_reads_compact_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("compact.sheets");
    let records = vec![
        SheetRecord::new(r("A1"), "2"),
        SheetRecord::new(r("A2"), "=POW(A1, 10)"),
    ];
    SheetWriter::write_file(&records, &path, &SheetWriteOptions { pretty: false }).unwrap();

    let sheet = Sheet::open(&path).unwrap();
    assert_eq!(sheet.display_value(1, 1), "1024");
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("budget.csv");

    let err = sample_sheet().save(&path).unwrap_err();
    assert!(matches!(err, Error::Json(JsonError::UnsupportedFormat(_))));
    assert!(!path.exists());
}
