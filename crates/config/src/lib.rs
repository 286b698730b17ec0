// Configuration loading

pub mod settings;

pub use settings::{parse_index, CustomComparison, Settings, SettingsError, SETTINGS_ENV};
