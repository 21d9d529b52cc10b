use crate::dispatcher::{FileReport, RunSummary};
use crate::error::SplitError;
use crate::scanner::InputFile;
use crate::writer::WrittenOutput;
use std::path::Path;
use tracing::{error, info, warn};

/// Receives every outcome of a run. Called from worker threads.
pub trait RunObserver: Sync {
    fn start_run(&self, _input_dir: &Path, _file_count: usize) {}
    fn start_file(&self, _input: &InputFile) {}
    fn output_written(&self, _input: &InputFile, _output: &WrittenOutput) {}
    fn output_failed(&self, _input: &InputFile, _error: &SplitError) {}
    fn empty_table(&self, _input: &InputFile) {}
    fn file_skipped(&self, _input: &InputFile, _error: &SplitError) {}
    fn file_failed(&self, _input: &InputFile, _error: &SplitError) {}
    fn finish_file(&self, _report: &FileReport) {}
    fn finish_run(&self, _summary: &RunSummary) {}
}

/// Emits one log line per outcome through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl RunObserver for LogReporter {
    fn start_run(&self, input_dir: &Path, file_count: usize) {
        info!(
            "Found {} file(s) in {}",
            file_count,
            input_dir.display()
        );
    }

    fn start_file(&self, input: &InputFile) {
        info!(file = %input.display_name(), "Processing");
    }

    fn output_written(&self, input: &InputFile, output: &WrittenOutput) {
        info!(
            file = %input.display_name(),
            "Saved {} as {} ({} rows)",
            output.path.display(),
            output.format,
            output.rows
        );
    }

    fn output_failed(&self, input: &InputFile, err: &SplitError) {
        error!(file = %input.display_name(), kind = err.kind(), "{err}");
    }

    fn empty_table(&self, input: &InputFile) {
        warn!(file = %input.display_name(), "No data rows, nothing written");
    }

    fn file_skipped(&self, input: &InputFile, err: &SplitError) {
        warn!(file = %input.display_name(), kind = err.kind(), "Skipped: {err}");
    }

    fn file_failed(&self, input: &InputFile, err: &SplitError) {
        error!(file = %input.display_name(), kind = err.kind(), "{err}");
    }

    fn finish_file(&self, report: &FileReport) {
        if report.outcome.is_success() {
            info!(
                file = %report.input.display_name(),
                "Done: {} rows in {} chunk(s), {} file(s) written",
                report.rows,
                report.chunks,
                report.outputs.len()
            );
        }
    }

    fn finish_run(&self, summary: &RunSummary) {
        info!(
            "Run finished: {} file(s), {} succeeded, {} failed, {} skipped, {} chunk(s), {} output file(s)",
            summary.files_total,
            summary.files_succeeded,
            summary.files_failed,
            summary.files_skipped,
            summary.chunks_written,
            summary.outputs_written
        );
    }
}
