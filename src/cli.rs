use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tabsplit::{Settings, SplitError};

#[derive(Parser, Debug)]
#[command(
    name = "tabsplit",
    version,
    about = "Splits CSV and Excel files into parts with a bounded number of rows."
)]
pub struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/config.ini",
        help = "Settings file with a [settings] section"
    )]
    pub config: PathBuf,

    #[arg(
        long = "input-dir",
        value_name = "DIR",
        help = "Overrides input_directory from the settings file"
    )]
    pub input_dir: Option<PathBuf>,

    #[arg(
        long = "output-dir",
        value_name = "DIR",
        help = "Overrides output_directory from the settings file"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long = "max-rows",
        value_name = "ROWS",
        help = "Overrides max_rows from the settings file"
    )]
    pub max_rows: Option<NonZeroUsize>,

    #[arg(
        long = "log-dir",
        value_name = "DIR",
        default_value = "logs",
        help = "Directory receiving one log file per run"
    )]
    pub log_dir: PathBuf,

    #[arg(
        short,
        long = "quiet",
        help = "Only print warnings and errors to the console",
        action = clap::ArgAction::SetTrue
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn into_settings(self) -> Result<Settings, SplitError> {
        let mut settings = Settings::load(&self.config)?;
        if let Some(dir) = self.input_dir {
            settings.input_directory = dir;
        }
        if let Some(dir) = self.output_dir {
            settings.output_directory = dir;
        }
        if let Some(max_rows) = self.max_rows {
            settings.max_rows = max_rows;
        }
        settings.validate()?;
        Ok(settings)
    }
}
