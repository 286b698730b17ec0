// Workbook ingestion (xlsx, xlsm, xls, xlsb, ods) through calamine
//
// Values only. Formulas contribute their cached results, formatting is ignored.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use sheetdiff_recon::CellValue;
use tracing::debug;

use crate::error::LoadError;
use crate::grid::Grid;

/// Read one worksheet into a raw grid. `sheet = None` reads the first sheet.
pub fn read_grid(path: &Path, sheet: Option<&str>) -> Result<Grid, LoadError> {
    let workbook_err = |message: String| LoadError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(LoadError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: name.to_string(),
                    available: sheet_names,
                });
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| workbook_err("workbook contains no sheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| workbook_err(format!("failed to read sheet '{sheet_name}': {e}")))?;

    // Range start offset (data may not begin at A1). Leading blank rows are
    // skipped; leading blank columns keep their positions so indices line up
    // with the column letters a user sees.
    let (_, data_start_col) = range.start().unwrap_or((0, 0));
    let lead = data_start_col as usize;

    let mut rows = Vec::with_capacity(range.height());
    for row in range.rows() {
        let mut cells = Vec::with_capacity(lead + row.len());
        cells.resize(lead, CellValue::Empty);
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }

    debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = rows.len(),
        start_col = lead,
        "read worksheet"
    );
    Ok(Grid { rows })
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(n) => CellValue::number(*n),
        Data::Int(n) => CellValue::number(*n as f64),
        // Stored the way spreadsheets display them
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => CellValue::text(e.to_string()),
        // Serial number, 1900 date system
        Data::DateTime(dt) => CellValue::number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::text(s.as_str()),
        Data::DurationIso(s) => CellValue::text(s.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn write_fixture(path: &Path) {
        let mut workbook = Workbook::new();

        let summary = workbook.add_worksheet();
        summary.set_name("Summary").unwrap();
        summary.write_string(0, 0, "Report").unwrap();

        let stock = workbook.add_worksheet();
        stock.set_name("Stock").unwrap();
        stock.write_string(0, 0, "Code").unwrap();
        stock.write_string(0, 1, "Name").unwrap();
        stock.write_string(0, 2, "Qty").unwrap();
        stock.write_string(1, 0, "001").unwrap();
        stock.write_string(1, 1, "Widget").unwrap();
        stock.write_number(1, 2, 12.0).unwrap();
        stock.write_boolean(2, 0, true).unwrap();
        stock.write_number(2, 2, 0.5).unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_reads_first_sheet_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stock.xlsx");
        write_fixture(&path);

        let grid = read_grid(&path, None).unwrap();
        assert_eq!(grid.rows.len(), 1);
        assert_eq!(grid.rows[0][0], CellValue::text("Report"));
    }

    #[test]
    fn test_reads_named_sheet_with_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stock.xlsx");
        write_fixture(&path);

        let grid = read_grid(&path, Some("Stock")).unwrap();
        assert_eq!(grid.rows.len(), 3);
        assert_eq!(grid.rows[0][2], CellValue::text("Qty"));
        // Text stays text, leading zeros intact
        assert_eq!(grid.rows[1][0], CellValue::text("001"));
        assert_eq!(grid.rows[1][2], CellValue::number(12.0));
        assert_eq!(grid.rows[2][0], CellValue::text("TRUE"));
        assert_eq!(grid.rows[2][1], CellValue::Empty);
        assert_eq!(grid.rows[2][2], CellValue::number(0.5));
    }

    #[test]
    fn test_missing_sheet_lists_available() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stock.xlsx");
        write_fixture(&path);

        let err = read_grid(&path, Some("Inventory")).unwrap_err();
        match err {
            LoadError::SheetNotFound { sheet, available, .. } => {
                assert_eq!(sheet, "Inventory");
                assert_eq!(available, vec!["Summary".to_string(), "Stock".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_leading_blank_columns_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 1, "Code").unwrap();
        sheet.write_string(3, 1, "A").unwrap();
        workbook.save(&path).unwrap();

        let grid = read_grid(&path, None).unwrap();
        assert_eq!(grid.rows[0], vec![CellValue::Empty, CellValue::text("Code")]);
        assert_eq!(grid.rows[1][1], CellValue::text("A"));
    }

    #[test]
    fn test_error_cells_use_spreadsheet_text() {
        use calamine::CellErrorType;

        let cases = [
            (CellErrorType::Div0, "#DIV/0!"),
            (CellErrorType::NA, "#N/A"),
            (CellErrorType::Ref, "#REF!"),
            (CellErrorType::Value, "#VALUE!"),
        ];
        for (error, shown) in cases {
            assert_eq!(cell_value(&Data::Error(error)), CellValue::text(shown));
        }
    }

    #[test]
    fn test_garbage_file_is_workbook_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let err = read_grid(&path, None).unwrap_err();
        assert!(matches!(err, LoadError::Workbook { .. }));
    }
}
