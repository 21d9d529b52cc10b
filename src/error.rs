use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unsupported file type: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to read {}: {reason}", path.display())]
    CorruptFile { path: PathBuf, reason: String },

    #[error("Failed to write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

impl SplitError {
    pub fn corrupt(path: &Path, reason: impl ToString) -> Self {
        Self::CorruptFile {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: &Path, reason: impl ToString) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Short tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::UnsupportedFormat { .. } => "UnsupportedFormatError",
            Self::CorruptFile { .. } => "CorruptFileError",
            Self::Write { .. } => "WriteError",
        }
    }
}
