use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_NAME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

pub fn log_file_name<Tz>(started_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}.log", started_at.format(LOG_NAME_FORMAT))
}

/// Installs the global subscriber: one log file per run plus a console mirror.
///
/// Returns the path of the log file. `quiet` keeps only warnings and errors
/// on the console; the file always gets everything the filter lets through.
pub fn init(log_dir: &Path, quiet: bool) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let path = log_dir.join(log_file_name(&Local::now()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(true);

    let console_level = if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::TRACE
    };
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(console_level);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install logger")?;

    Ok(path)
}
