// sheetdiff CLI - compare two spreadsheet exports by key column

mod exit_codes;

use sheetdiff_cli::report::{self, ReportMeta};

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use sheetdiff_config::{parse_index, Settings, SettingsError};
use sheetdiff_io::{load_table, LoadError, LoadOptions};
use sheetdiff_recon::{
    compare_with_options, CompareError, CompareOptions, CustomField, DuplicateKeyPolicy,
};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use exit_codes::{
    compare_exit_code, EXIT_DIFFS, EXIT_LOAD, EXIT_OUTPUT, EXIT_SETTINGS, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(about = "Compare two spreadsheet exports by key column")]
#[command(version)]
struct Cli {
    /// Verbose logging to stderr (-v debug, -vv trace; RUST_LOG overrides)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (default: $SHEETDIFF_SETTINGS or the user config dir)
    #[arg(long, value_name = "PATH", global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two files: keys missing on either side, and changed values
    #[command(after_help = "\
Column indices are zero-based and come from the settings file unless overridden.

Examples:
  sheetdiff compare january.xlsx february.xlsx
  sheetdiff compare a.xlsx b.xlsx --detailed --custom Price=9
  sheetdiff compare a.csv b.csv --key 0 --description 1 --format json
  sheetdiff compare a.xlsx b.xlsx --sheet Stock --trailing-rows 0 --on-duplicate error

Exit codes:
  0 identical, 1 differences, 2 usage, 3 column mapping, 4 duplicate keys,
  5 input load, 6 settings, 7 writing output")]
    Compare {
        /// First file (xlsx, xlsm, xls, xlsb, ods, csv, tsv, txt)
        file_a: PathBuf,

        /// Second file
        file_b: PathBuf,

        /// Also compare the Incoming / Outgoing / Remaining columns
        #[arg(long)]
        detailed: bool,

        /// Report format
        #[arg(long, default_value = "text")]
        format: ReportFormat,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Key column index (overrides settings)
        #[arg(long)]
        key: Option<usize>,

        /// Description column index (overrides settings)
        #[arg(long)]
        description: Option<usize>,

        /// Extra comparison column, repeatable (added to settings)
        #[arg(long = "custom", value_name = "NAME=INDEX")]
        custom: Vec<String>,

        /// Worksheet name (workbooks only; default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Footer rows to drop from the end of each file
        #[arg(long, default_value = "1")]
        trailing_rows: usize,

        /// CSV delimiter (default: sniffed)
        #[arg(long)]
        delimiter: Option<char>,

        /// Policy for keys appearing more than once in a file
        #[arg(long, default_value = "first")]
        on_duplicate: DuplicatePolicyArg,
    },

    /// Inspect or edit the saved column mapping
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the current settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the settings file location
    Path,
    /// Restore default column indices and clear custom comparisons
    Reset,
    /// Set a column index (e.g. code_column_index 0)
    #[command(after_help = "\
Keys:
  code_column_index, name_column_index, incoming_column_index,
  outgoing_column_index, remaining_column_index")]
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Add (or re-index) a custom comparison column
    AddCustom {
        name: String,
        #[arg(allow_hyphen_values = true)]
        index: String,
    },
    /// Remove a custom comparison column
    RemoveCustom {
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum DuplicatePolicyArg {
    /// Keep the first row for each key
    First,
    /// Fail with exit code 4
    Error,
}

impl From<DuplicatePolicyArg> for DuplicateKeyPolicy {
    fn from(arg: DuplicatePolicyArg) -> Self {
        match arg {
            DuplicatePolicyArg::First => DuplicateKeyPolicy::FirstWins,
            DuplicatePolicyArg::Error => DuplicateKeyPolicy::Reject,
        }
    }
}

struct CompareArgs {
    file_a: PathBuf,
    file_b: PathBuf,
    detailed: bool,
    format: ReportFormat,
    output: Option<PathBuf>,
    key: Option<usize>,
    description: Option<usize>,
    custom: Vec<String>,
    sheet: Option<String>,
    trailing_rows: usize,
    delimiter: Option<char>,
    on_duplicate: DuplicatePolicyArg,
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // stdout carries the report; logs go to stderr
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false)
                .with_filter(env_filter),
        )
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings_path = cli.settings.unwrap_or_else(Settings::default_path);
    debug!(path = %settings_path.display(), "settings file");

    let result = match cli.command {
        Commands::Compare {
            file_a,
            file_b,
            detailed,
            format,
            output,
            key,
            description,
            custom,
            sheet,
            trailing_rows,
            delimiter,
            on_duplicate,
        } => cmd_compare(
            &settings_path,
            CompareArgs {
                file_a,
                file_b,
                detailed,
                format,
                output,
                key,
                description,
                custom,
                sheet,
                trailing_rows,
                delimiter,
                on_duplicate,
            },
        ),
        Commands::Settings(settings_cmd) => match settings_cmd {
            SettingsCommands::Show { json } => cmd_settings_show(&settings_path, json),
            SettingsCommands::Path => {
                println!("{}", settings_path.display());
                Ok(())
            }
            SettingsCommands::Reset => cmd_settings_reset(&settings_path),
            SettingsCommands::Set { key, value } => cmd_settings_set(&settings_path, &key, &value),
            SettingsCommands::AddCustom { name, index } => {
                cmd_settings_add_custom(&settings_path, &name, &index)
            }
            SettingsCommands::RemoveCustom { name } => {
                cmd_settings_remove_custom(&settings_path, &name)
            }
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Differences found. Not an error message, only an exit status.
    pub fn diffs() -> Self {
        Self { code: EXIT_DIFFS, message: String::new(), hint: None }
    }

    pub fn load(err: LoadError) -> Self {
        let hint = match &err {
            LoadError::UnsupportedFormat { .. } => {
                Some("supported formats: xlsx, xlsm, xls, xlsb, ods, csv, tsv, txt".to_string())
            }
            LoadError::NoHeader { .. } => {
                Some("lower --trailing-rows if the file has no footer row".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_LOAD, message: err.to_string(), hint }
    }

    pub fn compare(err: CompareError) -> Self {
        let hint = match &err {
            CompareError::Configuration { .. } => {
                Some("check the column indices with `sheetdiff settings show`".to_string())
            }
            CompareError::DuplicateKeys(_) => {
                Some("use --on-duplicate first to keep the first row per key".to_string())
            }
        };
        Self {
            code: compare_exit_code(&err),
            message: err.to_string().trim_end().to_string(),
            hint,
        }
    }

    pub fn settings(err: SettingsError) -> Self {
        Self { code: EXIT_SETTINGS, message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// compare
// ============================================================================

fn cmd_compare(settings_path: &Path, args: CompareArgs) -> Result<(), CliError> {
    let settings = Settings::load_from(settings_path);
    settings.validate().map_err(|e| {
        CliError::settings(e).with_hint(format!("edit or reset {}", settings_path.display()))
    })?;

    let mut mapping = settings.column_mapping();
    if let Some(key) = args.key {
        mapping.key_index = key;
    }
    if let Some(description) = args.description {
        mapping.description_index = description;
    }
    for arg in &args.custom {
        mapping.custom_fields.push(parse_custom(arg)?);
    }

    let delimiter = match args.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => {
            return Err(CliError::args(format!(
                "delimiter must be a single ASCII character, got '{c}'"
            )))
        }
        None => None,
    };
    let load_options = LoadOptions {
        sheet: args.sheet,
        delimiter,
        trailing_rows: args.trailing_rows,
    };

    let table_a = load_table(&args.file_a, "File 1", &load_options).map_err(CliError::load)?;
    let table_b = load_table(&args.file_b, "File 2", &load_options).map_err(CliError::load)?;
    info!(
        file_a = %args.file_a.display(),
        rows_a = table_a.len(),
        file_b = %args.file_b.display(),
        rows_b = table_b.len(),
        "tables loaded"
    );

    let options = CompareOptions {
        include_detailed_fields: args.detailed,
        duplicate_keys: args.on_duplicate.into(),
    };
    let result =
        compare_with_options(&table_a, &table_b, &mapping, &options).map_err(CliError::compare)?;

    let summary = result.summary();
    info!(
        only_in_a = summary.only_in_a,
        only_in_b = summary.only_in_b,
        differences = summary.differences,
        "comparison complete"
    );

    let body = match args.format {
        ReportFormat::Text => report::render_text(&result),
        ReportFormat::Json => {
            let meta = ReportMeta::new(
                args.file_a.display().to_string(),
                args.file_b.display().to_string(),
                args.detailed,
            );
            let mut json = report::render_json(&meta, &result)
                .map_err(|e| CliError::output(format!("failed to serialize report: {e}")))?;
            json.push('\n');
            json
        }
    };
    write_report(args.output.as_deref(), &body)?;

    if summary.identical {
        Ok(())
    } else {
        Err(CliError::diffs())
    }
}

/// Parse `NAME=INDEX`.
fn parse_custom(arg: &str) -> Result<CustomField, CliError> {
    let (name, index) = arg
        .rsplit_once('=')
        .ok_or_else(|| CliError::args(format!("invalid --custom '{arg}': expected NAME=INDEX")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::args(format!("invalid --custom '{arg}': name is empty")));
    }
    let index = parse_index(name, index).map_err(|e| CliError::args(e.to_string()))?;
    Ok(CustomField::new(name, index))
}

fn write_report(output: Option<&Path>, body: &str) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, body)
            .map_err(|e| CliError::output(format!("{}: {}", path.display(), e))),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(body.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::output(e.to_string()))
        }
    }
}

// ============================================================================
// settings
// ============================================================================

fn cmd_settings_show(path: &Path, json: bool) -> Result<(), CliError> {
    let settings = Settings::load_from(path);

    if json {
        let out = serde_json::to_string_pretty(&settings)
            .map_err(|e| CliError::output(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    println!("Settings file: {}", path.display());
    println!();
    for key in Settings::KEYS {
        let value = settings.get(key).map_err(CliError::settings)?;
        println!("  {:<24} {}", key, value);
    }
    println!();
    if settings.custom_comparisons.is_empty() {
        println!("  custom_comparisons       (none)");
    } else {
        println!("  custom_comparisons");
        for custom in &settings.custom_comparisons {
            println!("    {:<22} {}", custom.name, custom.index);
        }
    }
    Ok(())
}

fn cmd_settings_reset(path: &Path) -> Result<(), CliError> {
    // Lenient load: reset is how a malformed file gets replaced.
    let mut settings = Settings::load_from(path);
    settings.reset_to_defaults();
    save(&settings, path)?;
    eprintln!("Settings reset to defaults");
    Ok(())
}

fn cmd_settings_set(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let mut settings = load_for_edit(path)?;
    let index = parse_index(key, value).map_err(CliError::settings)?;
    settings.set(key, index).map_err(CliError::settings)?;
    save(&settings, path)?;
    eprintln!("{} = {}", key, index);
    Ok(())
}

fn cmd_settings_add_custom(path: &Path, name: &str, index: &str) -> Result<(), CliError> {
    let mut settings = load_for_edit(path)?;
    let index = parse_index(name, index).map_err(CliError::settings)?;
    settings.add_custom(name, index).map_err(CliError::settings)?;
    save(&settings, path)?;
    eprintln!("Custom comparison '{}' -> column {}", name.trim(), index);
    Ok(())
}

fn cmd_settings_remove_custom(path: &Path, name: &str) -> Result<(), CliError> {
    let mut settings = load_for_edit(path)?;
    settings.remove_custom(name).map_err(|e| {
        CliError::settings(e).with_hint("list custom comparisons with `sheetdiff settings show`")
    })?;
    save(&settings, path)?;
    eprintln!("Removed custom comparison '{}'", name);
    Ok(())
}

/// Edits must not replace a file they could not read.
fn load_for_edit(path: &Path) -> Result<Settings, CliError> {
    Settings::try_load_from(path).map_err(|e| {
        CliError::settings(e)
            .with_hint("fix the file by hand or run `sheetdiff settings reset` to restore defaults")
    })
}

fn save(settings: &Settings, path: &Path) -> Result<(), CliError> {
    settings.validate().map_err(CliError::settings)?;
    settings.save_to(path).map_err(CliError::settings)
}
