use chrono::{NaiveDateTime, Timelike};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    /// Numeric CSV field whose spelling (`19.90`, `1e3`) is kept for CSV output.
    Number { value: f64, raw: String },
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Types a raw CSV field. Rendering the result gives back `raw`.
    ///
    /// Integers with a leading zero (`007`) stay text: they are identifiers,
    /// not quantities.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Cell::Empty;
        }
        if has_leading_zero(raw) {
            return Cell::Text(raw.to_string());
        }
        if let Ok(value) = raw.parse::<i64>() {
            if value.to_string() == raw {
                return Cell::Int(value);
            }
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value.to_string() == raw => Cell::Float(value),
            Ok(value) if value.is_finite() && looks_numeric(raw) => Cell::Number {
                value,
                raw: raw.to_string(),
            },
            _ => Cell::Text(raw.to_string()),
        }
    }
}

fn has_leading_zero(raw: &str) -> bool {
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    digits.len() > 1 && digits.starts_with('0') && digits.as_bytes()[1].is_ascii_digit()
}

/// `f64::from_str` also takes `inf`/`nan` spellings; only plain decimals count.
fn looks_numeric(raw: &str) -> bool {
    raw.bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(text) => f.write_str(text),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value}"),
            Cell::Number { raw, .. } => f.write_str(raw),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::DateTime(value) if value.time() == chrono::NaiveTime::MIN => {
                write!(f, "{}", value.format("%Y-%m-%d"))
            }
            Cell::DateTime(value) if value.nanosecond() == 0 => {
                write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S"))
            }
            Cell::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}

pub type Row = Vec<Cell>;

/// One input file held fully in memory. Every row has `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
