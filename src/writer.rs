use crate::config::Settings;
use crate::error::SplitError;
use crate::splitter::Chunk;
use crate::staging::write_atomically;
use crate::table::Cell;
use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{ColNum, ExcelDateTime, Format, RowNum, Workbook, XlsxError};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Csv,
    Excel,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Excel => "xlsx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => f.write_str("CSV"),
            OutputFormat::Excel => f.write_str("Excel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutput {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub rows: usize,
}

/// Serializes chunks into the output directory, once per enabled format.
#[derive(Debug, Clone)]
pub struct ChunkWriter {
    output_dir: PathBuf,
    formats: Vec<OutputFormat>,
}

impl ChunkWriter {
    pub fn new(settings: &Settings) -> Self {
        let mut formats = Vec::with_capacity(2);
        if settings.csv_output {
            formats.push(OutputFormat::Csv);
        }
        if settings.excel_output {
            formats.push(OutputFormat::Excel);
        }
        Self {
            output_dir: settings.output_directory.clone(),
            formats,
        }
    }

    pub fn output_path(&self, stem: &str, index: usize, format: OutputFormat) -> PathBuf {
        self.output_dir
            .join(format!("{stem}_part{index}.{}", format.extension()))
    }

    /// Writes one file per enabled format. A failure in one format does not
    /// stop the others; each gets its own result.
    pub fn write(&self, stem: &str, chunk: &Chunk<'_>) -> Vec<Result<WrittenOutput, SplitError>> {
        self.formats
            .iter()
            .map(|&format| {
                let path = self.output_path(stem, chunk.index, format);
                write_chunk(&path, format, chunk)
                    .map(|()| WrittenOutput {
                        path: path.clone(),
                        format,
                        rows: chunk.row_count(),
                    })
                    .map_err(|e| SplitError::write(&path, e))
            })
            .collect()
    }
}

fn write_chunk(path: &Path, format: OutputFormat, chunk: &Chunk<'_>) -> io::Result<()> {
    match format {
        OutputFormat::Csv => write_atomically(path, |file| write_csv(chunk, file)),
        OutputFormat::Excel => {
            let buffer = build_workbook(chunk).map_err(|e| io::Error::other(e.to_string()))?;
            write_atomically(path, |file| file.write_all(&buffer))
        }
    }
}

fn write_csv<W: Write>(chunk: &Chunk<'_>, out: W) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(chunk.columns)?;
    for row in chunk.rows {
        writer.write_record(row.iter().map(Cell::to_string))?;
    }
    writer.flush()
}

/// Largest integer magnitude an Excel number (an f64) holds exactly.
const EXCEL_MAX_EXACT_INT: i64 = 1 << 53;

fn build_workbook(chunk: &Chunk<'_>) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let sheet = workbook.add_worksheet();

    for (col_idx, name) in chunk.columns.iter().enumerate() {
        sheet.write_string_with_format(0, col_num(col_idx)?, name, &header)?;
    }

    for (row_idx, row) in chunk.rows.iter().enumerate() {
        let row_num = row_num(row_idx + 1)?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_num(col_idx)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(text) => {
                    sheet.write_string(row_num, col, text)?;
                }
                Cell::Int(value) if value.unsigned_abs() > EXCEL_MAX_EXACT_INT as u64 => {
                    sheet.write_string(row_num, col, value.to_string())?;
                }
                Cell::Int(value) => {
                    sheet.write_number(row_num, col, *value as f64)?;
                }
                Cell::Float(value) | Cell::Number { value, .. } => {
                    sheet.write_number(row_num, col, *value)?;
                }
                Cell::DateTime(value) => match excel_datetime(value) {
                    Some(stamp) => {
                        let format = if value.time() == chrono::NaiveTime::MIN {
                            &date_format
                        } else {
                            &datetime_format
                        };
                        sheet.write_datetime_with_format(row_num, col, &stamp, format)?;
                    }
                    // outside Excel's 1900..=9999 calendar
                    None => {
                        sheet.write_string(row_num, col, cell.to_string())?;
                    }
                },
                Cell::Bool(value) => {
                    sheet.write_boolean(row_num, col, *value)?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

fn excel_datetime(value: &NaiveDateTime) -> Option<ExcelDateTime> {
    let year = u16::try_from(value.year()).ok()?;
    let seconds = f64::from(value.second()) + f64::from(value.nanosecond()) / 1e9;
    ExcelDateTime::from_ymd(year, value.month() as u8, value.day() as u8)
        .and_then(|date| date.and_hms(value.hour() as u16, value.minute() as u8, seconds))
        .ok()
}

fn row_num(idx: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(idx: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}
