use crate::error::SplitError;
use crate::scanner::{FileFormat, InputFile};
use crate::table::{Cell, Table};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::Path;

/// Loads a whole input file into memory.
///
/// Unsupported files are rejected from their format tag alone; the file is
/// never opened.
pub fn read_table(input: &InputFile) -> Result<Table, SplitError> {
    match input.format {
        FileFormat::Csv => read_csv(&input.path),
        FileFormat::Excel => read_excel(&input.path),
        FileFormat::Unsupported => Err(SplitError::UnsupportedFormat {
            path: input.path.clone(),
        }),
    }
}

fn read_csv(path: &Path) -> Result<Table, SplitError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| SplitError::corrupt(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| SplitError::corrupt(path, e))?
        .clone();
    let mut table = Table::new(headers.iter().map(str::to_string).collect());

    for (idx, record) in reader.records().enumerate() {
        // +2: one for the header line, one for 1-based numbering
        let record =
            record.map_err(|e| SplitError::corrupt(path, format!("line {}: {e}", idx + 2)))?;
        table.push_row(record.iter().map(Cell::infer).collect());
    }

    Ok(table)
}

fn read_excel(path: &Path) -> Result<Table, SplitError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| SplitError::corrupt(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SplitError::corrupt(path, "workbook has no worksheet"))?
        .map_err(|e| SplitError::corrupt(path, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, value)| match value.to_string() {
            name if name.trim().is_empty() => format!("column_{}", idx + 1),
            name => name,
        })
        .collect();

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(cell_from_excel).collect());
    }
    Ok(table)
}

fn cell_from_excel(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(text) if text.is_empty() => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Int(value) => Cell::Int(*value),
        Data::Float(value) => Cell::Float(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(_) | Data::DateTimeIso(_) => value
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(value.to_string())),
        other => Cell::Text(other.to_string()),
    }
}
