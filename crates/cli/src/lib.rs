// Library surface of the sheetdiff CLI, shared with its integration tests

pub mod report;
