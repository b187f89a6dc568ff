// Plain tabular dataset: ordered named columns plus positionally aligned rows.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("row {row} has {found} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),

    #[error("missing column `{0}`")]
    MissingColumn(String),

    #[error("non-numeric value in column `{column}` at row {row}: {value}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("invalid player id at row {row}: {value}")]
    InvalidPlayerId { row: usize, value: String },

    #[error("duplicate player id {0}")]
    DuplicatePlayer(i64),
}

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

pub const PLAYER_ID: &str = "PLAYER_ID";
pub const PLAYER_NAME: &str = "PLAYER_NAME";
pub const AGE: &str = "AGE";
pub const GAMES_PLAYED: &str = "GP";
pub const MINUTES: &str = "MIN";
pub const COMPOSITE: &str = "ZSCORE";

/// Name of the derived z-score column for a statistical column.
pub fn zscore_column(column: &str) -> String {
    format!("{column}_ZSCORE")
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// An immutable table. Every row has exactly one cell per column and column
/// names are unique; both are checked on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DatasetError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(DatasetError::RowLength {
                    row,
                    expected: columns.len(),
                    found: values.len(),
                });
            }
        }
        Ok(Self {
            columns,
            rows,
            index,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DatasetError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Read a column as finite `f64` values. Nulls, strings and non-finite
    /// numbers are rejected with the offending row.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, DatasetError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                let cell = &values[idx];
                cell.as_f64()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DatasetError::NonNumeric {
                        column: name.to_string(),
                        row,
                        value: cell.to_string(),
                    })
            })
            .collect()
    }

    /// Read a column as display text. Strings are returned unquoted, nulls as
    /// empty strings, numbers in their JSON form.
    pub fn text_column(&self, name: &str) -> Result<Vec<String>, DatasetError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|values| cell_text(&values[idx])).collect())
    }

    /// Read the `PLAYER_ID` column. Ids must be integers and unique.
    pub fn player_ids(&self) -> Result<Vec<i64>, DatasetError> {
        let idx = self.column_index(PLAYER_ID)?;
        let mut seen = HashSet::with_capacity(self.rows.len());
        let mut ids = Vec::with_capacity(self.rows.len());
        for (row, values) in self.rows.iter().enumerate() {
            let cell = &values[idx];
            let id = player_id(cell).ok_or_else(|| DatasetError::InvalidPlayerId {
                row,
                value: cell.to_string(),
            })?;
            if !seen.insert(id) {
                return Err(DatasetError::DuplicatePlayer(id));
            }
            ids.push(id);
        }
        Ok(ids)
    }

    /// Return a new dataset with `values` appended as column `name`.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Self, DatasetError> {
        if self.has_column(name) {
            return Err(DatasetError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.rows.len() {
            return Err(DatasetError::RowLength {
                row: values.len().min(self.rows.len()),
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row.push(value);
                row
            })
            .collect();
        Self::new(columns, rows)
    }

    /// Return a new dataset with a numeric column appended.
    pub fn with_numeric_column(&self, name: &str, values: &[f64]) -> Result<Self, DatasetError> {
        self.with_column(name, values.iter().map(|v| Value::from(*v)).collect())
    }
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

/// Text form of a cell as written to CSV.
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a CSV field into a cell: empty → null, numeric → number, else string.
pub fn parse_cell(field: &str) -> Value {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(field.to_string()),
    }
}

fn player_id(cell: &Value) -> Option<i64> {
    if let Some(id) = cell.as_i64() {
        return Some(id);
    }
    // Whole floats show up when ids round-trip through other tools.
    cell.as_f64()
        .filter(|f| f.fract() == 0.0 && f.is_finite())
        .map(|f| f as i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
