pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod progress;
mod reader;
pub mod scanner;
pub mod splitter;
mod staging;
pub mod table;
pub mod writer;

pub use config::Settings;
pub use dispatcher::{FileOutcome, FileReport, RunSummary};
pub use error::SplitError;
pub use progress::{LogReporter, RunObserver};

use anyhow::Result;
use std::fs;
use tracing::warn;

pub fn run(settings: &Settings) -> Result<RunSummary> {
    run_with_observer(settings, &LogReporter)
}

pub fn run_with_observer(settings: &Settings, observer: &dyn RunObserver) -> Result<RunSummary> {
    settings.validate()?;
    let files = scanner::collect_input_files(&settings.input_directory)?;
    if let Err(err) = fs::create_dir_all(&settings.output_directory) {
        warn!(
            "Failed to create output directory {}: {}",
            settings.output_directory.display(),
            err
        );
    }

    observer.start_run(&settings.input_directory, files.len());
    let reports = dispatcher::dispatch(&files, settings, observer);
    let summary = RunSummary::from_reports(&reports);
    observer.finish_run(&summary);
    Ok(summary)
}
