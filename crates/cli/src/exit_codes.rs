//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract, scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success; for `compare`, the files are identical      |
//! | 1    | `compare` found differences (like `diff(1)`)         |
//! | 2    | Usage error (bad arguments)                          |
//! | 3    | Column mapping does not fit the loaded tables        |
//! | 4    | Duplicate keys with `--on-duplicate error`           |
//! | 5    | Input file could not be loaded or parsed             |
//! | 6    | Settings file invalid or could not be written        |
//! | 7    | Report could not be written                          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use sheetdiff_recon::CompareError;

/// Success - command completed, no differences.
pub const EXIT_SUCCESS: u8 = 0;

/// Differences found between the two files.
pub const EXIT_DIFFS: u8 = 1;

/// Usage error - bad arguments, malformed option values.
/// Matches the code clap uses for its own parse failures.
pub const EXIT_USAGE: u8 = 2;

/// A key, description or detailed-triad index is outside a table's columns.
pub const EXIT_CONFIG: u8 = 3;

/// Duplicate keys found in input and the policy rejects them.
pub const EXIT_DUPLICATE: u8 = 4;

/// Input file unreadable, unsupported, or without a header row.
pub const EXIT_LOAD: u8 = 5;

/// Settings failed validation, or could not be saved.
pub const EXIT_SETTINGS: u8 = 6;

/// Writing the report (stdout or --output) failed.
pub const EXIT_OUTPUT: u8 = 7;

/// Map a comparison failure to its exit code.
pub fn compare_exit_code(err: &CompareError) -> u8 {
    match err {
        CompareError::Configuration { .. } => EXIT_CONFIG,
        CompareError::DuplicateKeys(_) => EXIT_DUPLICATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetdiff_recon::{DuplicateKey, MappingField, Side};

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_DIFFS,
            EXIT_USAGE,
            EXIT_CONFIG,
            EXIT_DUPLICATE,
            EXIT_LOAD,
            EXIT_SETTINGS,
            EXIT_OUTPUT,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn compare_errors_map_to_codes() {
        let config = CompareError::Configuration {
            field: MappingField::Key,
            index: 9,
            columns: 3,
            table: "File 1".to_string(),
        };
        assert_eq!(compare_exit_code(&config), EXIT_CONFIG);

        let dups = CompareError::DuplicateKeys(vec![DuplicateKey {
            side: Side::A,
            key: "001".into(),
            count: 2,
        }]);
        assert_eq!(compare_exit_code(&dups), EXIT_DUPLICATE);
    }
}
