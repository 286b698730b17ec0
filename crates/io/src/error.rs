use std::fmt;
use std::path::{Path, PathBuf};

use sheetdiff_recon::TableError;

#[derive(Debug)]
pub enum LoadError {
    /// File could not be read.
    Io { path: PathBuf, message: String },
    /// Extension not recognised as a workbook or delimited text.
    UnsupportedFormat { path: PathBuf, extension: String },
    /// calamine failed to open or read the workbook.
    Workbook { path: PathBuf, message: String },
    /// Requested worksheet does not exist.
    SheetNotFound { path: PathBuf, sheet: String, available: Vec<String> },
    /// CSV parse error.
    Csv { path: PathBuf, message: String },
    /// Nothing left to use as a header after dropping footer rows.
    NoHeader { path: PathBuf },
    /// Grid could not be shaped into a table.
    Shape { path: PathBuf, source: TableError },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::UnsupportedFormat { path, .. }
            | Self::Workbook { path, .. }
            | Self::SheetNotFound { path, .. }
            | Self::Csv { path, .. }
            | Self::NoHeader { path }
            | Self::Shape { path, .. } => path,
        }
    }

    /// Fill in the path for errors raised before it was known.
    pub(crate) fn with_path(self, path: &Path) -> Self {
        match self {
            Self::NoHeader { .. } => Self::NoHeader { path: path.to_path_buf() },
            Self::Shape { source, .. } => Self::Shape { path: path.to_path_buf(), source },
            other => other,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::UnsupportedFormat { path, extension } => {
                if extension.is_empty() {
                    write!(f, "{}: cannot infer format (no file extension)", path.display())
                } else {
                    write!(f, "{}: unsupported format '.{extension}'", path.display())
                }
            }
            Self::Workbook { path, message } => {
                write!(f, "{}: failed to read workbook: {message}", path.display())
            }
            Self::SheetNotFound { path, sheet, available } => write!(
                f,
                "{}: sheet '{sheet}' not found (available: {})",
                path.display(),
                available.join(", ")
            ),
            Self::Csv { path, message } => write!(f, "{}: {message}", path.display()),
            Self::NoHeader { path } => {
                write!(f, "{}: no header row left after removing footer rows", path.display())
            }
            Self::Shape { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shape { source, .. } => Some(source),
            _ => None,
        }
    }
}
