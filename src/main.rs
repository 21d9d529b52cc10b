mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use tabsplit::{logging, RunSummary};
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_path = match logging::init(&cli.log_dir, cli.quiet) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    info!("Logging to {}", log_path.display());

    let result = execute(cli);
    if let Err(err) = &result {
        error!("{err:#}");
    }
    ExitCode::from(exit_status(&result))
}

/// Only startup failures reach `Err`; per-file problems live in the summary.
fn exit_status(result: &Result<RunSummary>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn execute(cli: Cli) -> Result<RunSummary> {
    let settings = cli.into_settings()?;
    info!(
        "Splitting {} into {} (max_rows={}, csv={}, excel={})",
        settings.input_directory.display(),
        settings.output_directory.display(),
        settings.max_rows,
        settings.csv_output,
        settings.excel_output
    );
    tabsplit::run(&settings)
}
