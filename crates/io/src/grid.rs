// Raw cell grid shared by the readers, and its conversion into a Table

use std::path::PathBuf;

use sheetdiff_recon::{CellValue, Table};

use crate::error::LoadError;

/// Number of footer rows stripped from the end of an export by default.
pub const DEFAULT_TRAILING_ROWS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Worksheet name (workbooks only); `None` = first sheet.
    pub sheet: Option<String>,
    /// CSV delimiter; `None` = sniff.
    pub delimiter: Option<u8>,
    /// Rows dropped from the end before the header is taken.
    pub trailing_rows: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            delimiter: None,
            trailing_rows: DEFAULT_TRAILING_ROWS,
        }
    }
}

/// Rows of cells as read from a file, header included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Drop footer rows, take the first row as the header and the rest as
    /// records. Short rows are padded to the widest row.
    pub fn into_table(mut self, name: &str, options: &LoadOptions) -> Result<Table, LoadError> {
        let keep = self.rows.len().saturating_sub(options.trailing_rows);
        self.rows.truncate(keep);

        let width = self.width();
        let mut rows = self.rows.into_iter();
        let header_row = rows.next().ok_or(LoadError::NoHeader { path: PathBuf::new() })?;

        let header: Vec<String> = (0..width)
            .map(|col| match header_row.get(col) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => col_letter(col),
            })
            .collect();

        Table::from_records(name, header, rows.collect()).map_err(|source| LoadError::Shape {
            path: PathBuf::new(),
            source,
        })
    }
}

/// Spreadsheet column letter for a zero-based index (0 → A, 26 → AA).
pub fn col_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col + 1;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}
