use crate::config::Settings;
use crate::error::SplitError;
use crate::progress::RunObserver;
use crate::reader::read_table;
use crate::scanner::InputFile;
use crate::writer::{ChunkWriter, WrittenOutput};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::num::NonZeroUsize;
use std::thread;
use tracing::warn;

/// Upper bound on the worker pool, whatever the host offers.
pub const MAX_WORKERS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Succeeded,
    Failed,
    Skipped,
}

impl FileOutcome {
    pub fn is_success(self) -> bool {
        self == FileOutcome::Succeeded
    }
}

/// What happened to one input file.
#[derive(Debug)]
pub struct FileReport {
    pub input: InputFile,
    pub outcome: FileOutcome,
    pub rows: usize,
    /// Chunks with at least one output file on disk.
    pub chunks: usize,
    pub outputs: Vec<WrittenOutput>,
    pub errors: Vec<SplitError>,
}

impl FileReport {
    fn new(input: InputFile) -> Self {
        Self {
            input,
            outcome: FileOutcome::Succeeded,
            rows: 0,
            chunks: 0,
            outputs: Vec::new(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files_total: usize,
    pub files_succeeded: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub chunks_written: usize,
    pub outputs_written: usize,
    pub rows_processed: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        reports.iter().fold(
            Self {
                files_total: reports.len(),
                ..Self::default()
            },
            |mut acc, report| {
                match report.outcome {
                    FileOutcome::Succeeded => acc.files_succeeded += 1,
                    FileOutcome::Failed => acc.files_failed += 1,
                    FileOutcome::Skipped => acc.files_skipped += 1,
                }
                acc.chunks_written += report.chunks;
                acc.outputs_written += report.outputs.len();
                acc.rows_processed += report.rows;
                acc
            },
        )
    }
}

pub fn worker_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(MAX_WORKERS)
}

/// Runs every file through read, split and write on a bounded pool.
///
/// Reports come back in the order of `files`.
pub fn dispatch(
    files: &[InputFile],
    settings: &Settings,
    observer: &dyn RunObserver,
) -> Vec<FileReport> {
    let writer = ChunkWriter::new(settings);
    let run_one = |input: &InputFile| process_file(input, settings, &writer, observer);

    let workers = worker_count();
    if workers <= 1 || files.len() <= 1 {
        return files.iter().map(run_one).collect();
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("tabsplit-worker-{idx}"))
        .build();
    let Ok(pool) = pool else {
        warn!(
            "Failed to start worker pool (workers={}), processing files serially",
            workers
        );
        return files.iter().map(run_one).collect();
    };

    pool.install(|| files.par_iter().map(run_one).collect())
}

/// Read, split and write a single file. Never fails: every error ends up in
/// the returned report and is sent to the observer exactly once.
pub fn process_file(
    input: &InputFile,
    settings: &Settings,
    writer: &ChunkWriter,
    observer: &dyn RunObserver,
) -> FileReport {
    let mut report = FileReport::new(input.clone());
    observer.start_file(input);

    let table = match read_table(input) {
        Ok(table) => table,
        Err(err) => {
            if matches!(err, SplitError::UnsupportedFormat { .. }) {
                observer.file_skipped(input, &err);
                report.outcome = FileOutcome::Skipped;
            } else {
                observer.file_failed(input, &err);
                report.outcome = FileOutcome::Failed;
            }
            report.errors.push(err);
            observer.finish_file(&report);
            return report;
        }
    };

    report.rows = table.row_count();
    if table.is_empty() {
        observer.empty_table(input);
    }

    let stem = input.stem();
    for chunk in table.chunks(settings.max_rows) {
        let mut chunk_written = false;
        for result in writer.write(&stem, &chunk) {
            match result {
                Ok(output) => {
                    observer.output_written(input, &output);
                    report.outputs.push(output);
                    chunk_written = true;
                }
                Err(err) => {
                    observer.output_failed(input, &err);
                    report.errors.push(err);
                }
            }
        }
        if chunk_written {
            report.chunks += 1;
        }
    }

    if !report.errors.is_empty() {
        report.outcome = FileOutcome::Failed;
    }
    observer.finish_file(&report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl RunObserver for Recorder {
        fn output_written(&self, input: &InputFile, output: &WrittenOutput) {
            self.push(format!("written {} {}", input.display_name(), output.rows));
        }
        fn output_failed(&self, input: &InputFile, err: &SplitError) {
            self.push(format!("{} {}", err.kind(), input.display_name()));
        }
        fn empty_table(&self, input: &InputFile) {
            self.push(format!("empty {}", input.display_name()));
        }
        fn file_skipped(&self, input: &InputFile, err: &SplitError) {
            self.push(format!("{} {}", err.kind(), input.display_name()));
        }
        fn file_failed(&self, input: &InputFile, err: &SplitError) {
            self.push(format!("{} {}", err.kind(), input.display_name()));
        }
    }

    fn settings_for(root: &Path, max_rows: usize) -> Settings {
        Settings {
            input_directory: root.join("in"),
            output_directory: root.join("out"),
            max_rows: NonZeroUsize::new(max_rows).unwrap(),
            csv_output: true,
            excel_output: false,
        }
    }

    fn write_rows(path: &Path, rows: usize) {
        let mut text = String::from("id,value\n");
        for n in 0..rows {
            text.push_str(&format!("{n},v{n}\n"));
        }
        fs::write(path, text).unwrap();
    }

    #[test]
    fn empty_table_warns_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let settings = settings_for(dir.path(), 10);
        fs::create_dir_all(&settings.output_directory).unwrap();
        let path = dir.path().join("header_only.csv");
        write_rows(&path, 0);

        let recorder = Recorder::default();
        let writer = ChunkWriter::new(&settings);
        let report = process_file(&InputFile::new(path), &settings, &writer, &recorder);

        assert_eq!(report.outcome, FileOutcome::Succeeded);
        assert_eq!(report.chunks, 0);
        assert_eq!(recorder.events(), vec!["empty header_only.csv"]);
        assert_eq!(fs::read_dir(&settings.output_directory).unwrap().count(), 0);
    }

    #[test]
    fn write_failures_mark_file_failed_but_all_chunks_are_attempted() {
        let dir = tempdir().unwrap();
        let settings = settings_for(dir.path(), 2);
        let path = dir.path().join("five.csv");
        write_rows(&path, 5);

        let recorder = Recorder::default();
        let writer = ChunkWriter::new(&settings);
        let report = process_file(&InputFile::new(path), &settings, &writer, &recorder);

        assert_eq!(report.outcome, FileOutcome::Failed);
        assert_eq!(report.rows, 5);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(
            recorder.events(),
            vec!["WriteError five.csv"; 3]
        );
    }

    #[test]
    fn dispatch_keeps_file_order_and_isolates_failures() {
        let dir = tempdir().unwrap();
        let settings = settings_for(dir.path(), 3);
        fs::create_dir_all(&settings.output_directory).unwrap();

        let good_a = dir.path().join("a.csv");
        let bad = dir.path().join("b.csv");
        let skipped = dir.path().join("c.txt");
        let good_d = dir.path().join("d.csv");
        write_rows(&good_a, 7);
        fs::write(&bad, "x,y\n1\n").unwrap();
        fs::write(&skipped, "whatever").unwrap();
        write_rows(&good_d, 3);

        let files: Vec<InputFile> = [good_a, bad, skipped, good_d]
            .into_iter()
            .map(InputFile::new)
            .collect();
        let recorder = Recorder::default();
        let reports = dispatch(&files, &settings, &recorder);

        let outcomes: Vec<FileOutcome> = reports.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                FileOutcome::Succeeded,
                FileOutcome::Failed,
                FileOutcome::Skipped,
                FileOutcome::Succeeded
            ]
        );

        let summary = RunSummary::from_reports(&reports);
        assert_eq!(
            summary,
            RunSummary {
                files_total: 4,
                files_succeeded: 2,
                files_failed: 1,
                files_skipped: 1,
                chunks_written: 4,
                outputs_written: 4,
                rows_processed: 10,
            }
        );

        let events = recorder.events();
        assert_eq!(events.iter().filter(|e| e.starts_with("CorruptFileError")).count(), 1);
        assert_eq!(events.iter().filter(|e| e.starts_with("UnsupportedFormatError")).count(), 1);
    }

    #[test]
    fn worker_count_is_bounded() {
        let workers = worker_count();
        assert!((1..=MAX_WORKERS).contains(&workers));
    }
}
