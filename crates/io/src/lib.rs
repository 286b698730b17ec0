// Table ingestion: spreadsheet and CSV files into comparison tables

pub mod csv;
pub mod error;
pub mod grid;
pub mod xlsx;

use std::path::Path;

use sheetdiff_recon::Table;
use tracing::debug;

pub use error::LoadError;
pub use grid::{Grid, LoadOptions};

/// Source format, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// xlsx, xlsm, xls, xlsb, ods (read through calamine)
    Workbook,
    Csv,
    Tsv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            }),
        }
    }
}

/// Load a file into a table named `name`: read the raw grid, drop the
/// trailing footer rows, take the first remaining row as the header.
pub fn load_table(path: &Path, name: &str, options: &LoadOptions) -> Result<Table, LoadError> {
    let grid = match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => xlsx::read_grid(path, options.sheet.as_deref())?,
        SourceFormat::Csv => csv::read_grid(path, options.delimiter)?,
        SourceFormat::Tsv => csv::read_grid(path, Some(b'\t'))?,
    };
    debug!(path = %path.display(), rows = grid.rows.len(), width = grid.width(), "read grid");
    grid.into_table(name, options).map_err(|e| e.with_path(path))
}
