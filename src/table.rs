use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

use crate::errors::DatasetError;

/// Column names the pipeline reads or derives
pub mod columns {
    pub const ID: &str = "ID";
    pub const NAME: &str = "Name";
    pub const GENDER: &str = "Gender";
    pub const GENDER_LABEL: &str = "Gender_Str";
    pub const ALLEGIANCES: &str = "Allegiances";
    pub const NOBILITY: &str = "Nobility";
    pub const DEATH_YEAR: &str = "Death_Year";
    pub const BOOK_OF_DEATH: &str = "Book of Death";
    pub const DEATH_CHAPTER: &str = "Death Chapter";
    pub const BOOK_INTRO_CHAPTER: &str = "Book Intro Chapter";
    pub const DIED: &str = "Morreu";

    /// Book appearance flags, one per novel
    pub const BOOK_APPEARANCES: [&str; 5] = ["GoT", "CoK", "SoS", "FfC", "DwD"];
}

/// A single cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Build a numeric cell, keeping integral values as integers
    pub fn number(n: f64) -> Self {
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
            Value::Int(n as i64)
        } else {
            Value::Float(n)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Empty or whitespace-only text
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }

    /// Numeric reading of the cell; `None` when it has no finite number
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Value::Missing => return None,
            Value::Int(v) => *v as f64,
            Value::Float(v) => *v,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            other => other.as_f64().map(|n| n as i64),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Missing => serializer.serialize_none(),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Value::Float(_) => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One row keyed by column name, in column order
pub type Row = IndexMap<String, Value>;

/// Row-major table with named columns
///
/// Every row holds exactly one cell per header; short rows are padded with
/// [`Value::Missing`] on insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.headers.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate one column top to bottom
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        self.rows.iter().map(|row| row.as_slice())
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Materialize a row as a name → value map
    pub fn row(&self, idx: usize) -> Option<Row> {
        let cells = self.rows.get(idx)?;
        Some(
            self.headers
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
        )
    }

    /// Replace a column's values, appending the column when absent
    pub fn set_column(&mut self, name: &str, mut values: Vec<Value>) {
        values.resize(self.rows.len(), Value::Missing);
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Rewrite every cell of a column in place; returns false when the column is absent
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&Value) -> Value,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        true
    }

    /// Rewrite every cell of the table in place
    pub fn map_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        for cell in self.rows.iter_mut().flat_map(|row| row.iter_mut()) {
            if let Some(replacement) = f(cell) {
                *cell = replacement;
            }
        }
    }

    /// Copy of the table restricted to the given row positions
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Copy of the table restricted to the given columns, in the given order
    pub fn select_columns(&self, names: &[String]) -> Result<Table, DatasetError> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| DatasetError::MissingColumn(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Table {
            headers: names.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Look a row up by the synthetic `ID` column
    pub fn find_by_id(&self, id: i64) -> Result<Option<Row>, DatasetError> {
        let idx = self
            .column_index(columns::ID)
            .ok_or_else(|| DatasetError::MissingColumn(columns::ID.to_string()))?;

        Ok(self
            .rows
            .iter()
            .position(|row| row[idx].as_i64() == Some(id))
            .and_then(|pos| self.row(pos)))
    }
}
