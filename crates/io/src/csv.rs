// CSV/TSV ingestion

use std::io::Read;
use std::path::Path;

use sheetdiff_recon::CellValue;
use tracing::debug;

use crate::error::LoadError;
use crate::grid::Grid;

/// Read a delimited text file into a raw grid. `delimiter = None` sniffs it.
pub fn read_grid(path: &Path, delimiter: Option<u8>) -> Result<Grid, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    debug!(
        path = %path.display(),
        delimiter = %(delimiter as char).escape_default(),
        "reading delimited text"
    );
    grid_from_string(&content, delimiter).map_err(|message| LoadError::Csv {
        path: path.to_path_buf(),
        message,
    })
}

/// Pick the delimiter whose field count on the header line is matched by the
/// most sample lines, weighted by that count. Falls back to `,` when no
/// candidate splits the header.
pub fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];
    const SAMPLE_LINES: usize = 10;

    let sample: Vec<&str> = content.lines().take(SAMPLE_LINES).collect();
    let Some(header) = sample.first() else {
        return b',';
    };

    CANDIDATES
        .iter()
        .filter_map(|&delim| {
            let width = fields_in_line(header, delim);
            if width < 2 {
                return None;
            }
            let agreeing = sample
                .iter()
                .filter(|line| fields_in_line(line, delim) == width)
                .count();
            Some((agreeing * width, delim))
        })
        // First candidate wins ties
        .fold(None, |best: Option<(usize, u8)>, (score, delim)| match best {
            Some((top, _)) if top >= score => best,
            _ => Some((score, delim)),
        })
        .map_or(b',', |(_, delim)| delim)
}

/// Quote-aware field count of a single line.
fn fields_in_line(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |record| record.len())
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let io_err = |e: std::io::Error| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Excel-exported CSVs are commonly Windows-1252
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Numbers stay numbers so `5` in one file matches `5.0` in another.
pub fn parse_field(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::number(n),
        _ => CellValue::text(field),
    }
}

fn grid_from_string(content: &str, delimiter: u8) -> Result<Grid, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(parse_field).collect());
    }
    Ok(Grid { rows })
}
