// End-to-end ingestion: file on disk -> Table ready for comparison

use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use sheetdiff_io::{load_table, LoadError, LoadOptions};
use sheetdiff_recon::{compare, CellValue, ColumnMapping};
use tempfile::tempdir;

fn write_csv(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn csv_export_with_footer() {
    let dir = tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "stock.csv",
        "Code,Name,Incoming\nA1,Widget,10\nB2,Gadget,4\nTotal,,14\n",
    );

    let table = load_table(&path, "File 1", &LoadOptions::default()).unwrap();
    assert_eq!(table.name(), "File 1");
    assert_eq!(table.len(), 2);
    assert_eq!(table.label(2), Some("Incoming"));
    assert_eq!(table.records()[1][0], CellValue::text("B2"));
    assert_eq!(table.records()[1][2], CellValue::number(4.0));
}

#[test]
fn tsv_extension_forces_tab() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "stock.tsv", "Code\tName,Alias\nA1\tWidget,W\n");

    let options = LoadOptions { trailing_rows: 0, ..LoadOptions::default() };
    let table = load_table(&path, "t", &options).unwrap();
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.label(1), Some("Name,Alias"));
}

#[test]
fn csv_and_xlsx_compare_equal() {
    let dir = tempdir().unwrap();
    let csv_path = write_csv(
        dir.path(),
        "a.csv",
        "Code,Name,Qty\nA1,Widget,10\nB2,Gadget,4\nfooter\n",
    );

    let xlsx_path = dir.path().join("b.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, label) in ["Code", "Name", "Qty"].iter().enumerate() {
        sheet.write_string(0, col as u16, *label).unwrap();
    }
    sheet.write_string(1, 0, "A1").unwrap();
    sheet.write_string(1, 1, "Widget").unwrap();
    sheet.write_number(1, 2, 10.0).unwrap();
    sheet.write_string(2, 0, "B2").unwrap();
    sheet.write_string(2, 1, "Gadget").unwrap();
    sheet.write_number(2, 2, 5.0).unwrap();
    sheet.write_string(3, 0, "footer").unwrap();
    workbook.save(&xlsx_path).unwrap();

    let a = load_table(&csv_path, "File 1", &LoadOptions::default()).unwrap();
    let b = load_table(&xlsx_path, "File 2", &LoadOptions::default()).unwrap();

    let mapping = ColumnMapping::new(0, 1).with_custom("Qty", 2);
    let result = compare(&a, &b, &mapping, false).unwrap();
    assert!(result.only_in_a.is_empty());
    assert!(result.only_in_b.is_empty());
    assert_eq!(result.differences.len(), 1);
    let change = result.differences[0].field("Qty").unwrap();
    assert_eq!(change.value_a, CellValue::number(4.0));
    assert_eq!(change.value_b, CellValue::number(5.0));
}

#[test]
fn footer_only_file_has_no_header() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "empty.csv", "Total,0\n");

    let err = load_table(&path, "t", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::NoHeader { .. }));
    assert_eq!(err.path(), path.as_path());
    assert!(err.to_string().contains("no header row"));
}

#[test]
fn unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "notes.pdf", "x");

    let err = load_table(&path, "t", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains(".pdf"));
}
