// Comparison settings
// Loaded from ~/.config/sheetdiff/settings.json (or $SHEETDIFF_SETTINGS)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use sheetdiff_recon::{config as recon, ColumnMapping, CustomField};

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "SHEETDIFF_SETTINGS";

#[derive(Debug)]
pub enum SettingsError {
    Io { path: PathBuf, message: String },
    /// File exists but is not valid settings JSON.
    Parse { path: PathBuf, message: String },
    Serialize(String),
    UnknownKey(String),
    /// Value is not a non-negative integer.
    InvalidValue { key: String, value: String },
    /// Settings failed validation.
    Invalid(String),
    NoSuchCustom(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "{}: invalid settings file: {message}", path.display())
            }
            Self::Serialize(message) => write!(f, "failed to serialize settings: {message}"),
            Self::UnknownKey(key) => write!(
                f,
                "unknown setting '{key}' (expected one of: {})",
                Settings::KEYS.join(", ")
            ),
            Self::InvalidValue { key, value } => write!(
                f,
                "invalid value '{value}' for '{key}': expected a number (0 or greater)"
            ),
            Self::Invalid(message) => write!(f, "invalid settings: {message}"),
            Self::NoSuchCustom(name) => write!(f, "no custom comparison named '{name}'"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// One user-defined comparison column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomComparison {
    pub name: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub code_column_index: usize,
    pub name_column_index: usize,
    pub incoming_column_index: usize,
    pub outgoing_column_index: usize,
    pub remaining_column_index: usize,
    pub custom_comparisons: Vec<CustomComparison>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            code_column_index: recon::DEFAULT_KEY_INDEX,
            name_column_index: recon::DEFAULT_DESCRIPTION_INDEX,
            incoming_column_index: recon::DEFAULT_INCOMING_INDEX,
            outgoing_column_index: recon::DEFAULT_OUTGOING_INDEX,
            remaining_column_index: recon::DEFAULT_REMAINING_INDEX,
            custom_comparisons: Vec::new(),
        }
    }
}

impl Settings {
    /// Index keys addressable through `get` / `set`.
    pub const KEYS: [&'static str; 5] = [
        "code_column_index",
        "name_column_index",
        "incoming_column_index",
        "outgoing_column_index",
        "remaining_column_index",
    ];

    /// Get the settings file path
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(SETTINGS_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetdiff")
            .join("settings.json")
    }

    /// Load settings from disk, falling back to defaults.
    ///
    /// A missing file is created with the defaults. An unreadable or
    /// malformed file is reported and left untouched.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = settings.save_to(path) {
                warn!(error = %e, "could not create default settings file");
            } else {
                debug!(path = %path.display(), "created default settings file");
            }
            return settings;
        }

        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Strict load for commands that write the file back: a missing file
    /// gives defaults, anything unreadable or malformed is an error.
    pub fn try_load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // Strip comments (lines starting with //)
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save current settings to disk
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |e: std::io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;

        fs::write(path, json).map_err(io_err)
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, key: &str) -> Result<usize, SettingsError> {
        match key {
            "code_column_index" => Ok(self.code_column_index),
            "name_column_index" => Ok(self.name_column_index),
            "incoming_column_index" => Ok(self.incoming_column_index),
            "outgoing_column_index" => Ok(self.outgoing_column_index),
            "remaining_column_index" => Ok(self.remaining_column_index),
            _ => Err(SettingsError::UnknownKey(key.to_string())),
        }
    }

    pub fn set(&mut self, key: &str, value: usize) -> Result<(), SettingsError> {
        let slot = match key {
            "code_column_index" => &mut self.code_column_index,
            "name_column_index" => &mut self.name_column_index,
            "incoming_column_index" => &mut self.incoming_column_index,
            "outgoing_column_index" => &mut self.outgoing_column_index,
            "remaining_column_index" => &mut self.remaining_column_index,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        };
        *slot = value;
        Ok(())
    }

    /// Add a custom comparison; an existing entry with the same name gets the new index.
    pub fn add_custom(&mut self, name: &str, index: usize) -> Result<(), SettingsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SettingsError::Invalid(
                "custom comparison name must not be empty".to_string(),
            ));
        }
        match self.custom_comparisons.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.index = index,
            None => self.custom_comparisons.push(CustomComparison {
                name: name.to_string(),
                index,
            }),
        }
        Ok(())
    }

    pub fn remove_custom(&mut self, name: &str) -> Result<(), SettingsError> {
        let before = self.custom_comparisons.len();
        self.custom_comparisons.retain(|c| c.name != name);
        if self.custom_comparisons.len() == before {
            return Err(SettingsError::NoSuchCustom(name.to_string()));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (pos, custom) in self.custom_comparisons.iter().enumerate() {
            if custom.name.trim().is_empty() {
                return Err(SettingsError::Invalid(format!(
                    "custom comparison #{} (index {}) has no name",
                    pos + 1,
                    custom.index
                )));
            }
        }
        Ok(())
    }

    pub fn column_mapping(&self) -> ColumnMapping {
        ColumnMapping {
            key_index: self.code_column_index,
            description_index: self.name_column_index,
            incoming_index: self.incoming_column_index,
            outgoing_index: self.outgoing_column_index,
            remaining_index: self.remaining_column_index,
            custom_fields: self
                .custom_comparisons
                .iter()
                .map(|c| CustomField::new(c.name.clone(), c.index))
                .collect(),
        }
    }
}

/// Parse a column index the way the settings form accepts it: digits only.
pub fn parse_index(key: &str, value: &str) -> Result<usize, SettingsError> {
    let trimmed = value.trim();
    let invalid = || SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    trimmed.parse().map_err(|_| invalid())
}
