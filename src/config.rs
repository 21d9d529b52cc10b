use crate::error::SplitError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_INPUT_DIR: &str = "input_files";
pub const DEFAULT_OUTPUT_DIR: &str = "output_files";
pub const DEFAULT_MAX_ROWS: usize = 1000;

const SETTINGS_SECTION: &str = "settings";

/// Run settings, read once at startup and shared read-only by every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub max_rows: NonZeroUsize,
    pub csv_output: bool,
    pub excel_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::from(DEFAULT_INPUT_DIR),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_rows: NonZeroUsize::new(DEFAULT_MAX_ROWS).unwrap_or(NonZeroUsize::MIN),
            csv_output: true,
            excel_output: true,
        }
    }
}

impl Settings {
    /// Loads the `[settings]` section of an INI-style file.
    ///
    /// A missing file is not an error: every key takes its default. A file
    /// that exists but cannot be read or parsed is.
    pub fn load(path: &Path) -> Result<Self, SplitError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "Settings file {} not found, using defaults",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(SplitError::Config(format!(
                    "cannot read settings file {}: {err}",
                    path.display()
                )))
            }
        };
        debug!("Loaded settings file {}", path.display());
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, SplitError> {
        let values = parse_section(text, SETTINGS_SECTION)?;
        let mut settings = Self::default();

        if let Some(dir) = values.get("input_directory") {
            settings.input_directory = parse_dir("input_directory", dir)?;
        }
        if let Some(dir) = values.get("output_directory") {
            settings.output_directory = parse_dir("output_directory", dir)?;
        }
        if let Some(raw) = values.get("max_rows") {
            settings.max_rows = parse_max_rows(raw)?;
        }
        if let Some(raw) = values.get("csv_output") {
            settings.csv_output = parse_bool("CSV_output", raw)?;
        }
        if let Some(raw) = values.get("excel_output") {
            settings.excel_output = parse_bool("EXCEL_output", raw)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SplitError> {
        if !self.csv_output && !self.excel_output {
            return Err(SplitError::Config(
                "CSV_output and EXCEL_output are both disabled, nothing would be written".into(),
            ));
        }
        Ok(())
    }
}

fn parse_section(text: &str, wanted: &str) -> Result<HashMap<String, String>, SplitError> {
    let mut section: Option<String> = None;
    let mut values = HashMap::new();

    for (idx, raw) in text.trim_start_matches('\u{feff}').lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest.strip_suffix(']').ok_or_else(|| {
                SplitError::Config(format!("line {line_no}: unterminated section header"))
            })?;
            section = Some(name.trim().to_ascii_lowercase());
            continue;
        }

        let Some(split_at) = line.find(['=', ':']) else {
            return Err(SplitError::Config(format!(
                "line {line_no}: expected `key = value`, got {line:?}"
            )));
        };
        let Some(current) = section.as_deref() else {
            return Err(SplitError::Config(format!(
                "line {line_no}: key outside of any [section]"
            )));
        };
        if current != wanted {
            continue;
        }

        let key = line[..split_at].trim().to_ascii_lowercase();
        let value = line[split_at + 1..].trim().to_string();
        values.insert(key, value);
    }

    Ok(values)
}

fn parse_dir(key: &str, raw: &str) -> Result<PathBuf, SplitError> {
    if raw.is_empty() {
        return Err(SplitError::Config(format!("{key} must not be empty")));
    }
    Ok(PathBuf::from(raw))
}

fn parse_max_rows(raw: &str) -> Result<NonZeroUsize, SplitError> {
    raw.parse::<NonZeroUsize>().map_err(|_| {
        SplitError::Config(format!("max_rows must be a positive integer, got {raw:?}"))
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, SplitError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(SplitError::Config(format!(
            "{key} must be a boolean, got {raw:?}"
        ))),
    }
}
