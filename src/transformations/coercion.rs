//! Shared coerce-or-default helper used by every normalization step

use tracing::debug;

use crate::table::{Table, Value};

/// How one column's cells are brought into their semantic type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coercion {
    /// Parse as a number; anything unparseable or missing becomes `default`
    Numeric { default: i64 },
    /// Parse as a number and truncate to an integer; failures become `default`
    Integer { default: i64 },
    /// Fill missing cells with a number, leaving present cells untouched
    FillNumber(i64),
    /// Fill missing cells with text, leaving present cells untouched
    FillText(&'static str),
}

/// Outcome of coercing a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoercionReport {
    /// Cells replaced by the column default
    pub defaulted: usize,
    /// Cells whose representation changed without defaulting
    pub converted: usize,
}

/// Coerce a single value. Returns the new value and whether it was defaulted.
pub fn coerce_value(value: &Value, coercion: Coercion) -> (Value, bool) {
    match coercion {
        Coercion::Numeric { default } => match value.as_f64() {
            Some(n) => (Value::number(n), false),
            None => (Value::Int(default), true),
        },
        Coercion::Integer { default } => match value.as_f64() {
            Some(n) => (Value::Int(n.trunc() as i64), false),
            None => (Value::Int(default), true),
        },
        Coercion::FillNumber(default) if value.is_missing() => (Value::Int(default), true),
        Coercion::FillText(default) if value.is_missing() => {
            (Value::Text(default.to_string()), true)
        }
        Coercion::FillNumber(_) | Coercion::FillText(_) => (value.clone(), false),
    }
}

/// Coerce every cell of `column` in place.
///
/// Returns `None` without touching the table when the column is absent.
pub fn coerce_column(table: &mut Table, column: &str, coercion: Coercion) -> Option<CoercionReport> {
    let mut report = CoercionReport::default();
    let present = table.map_column(column, |value| {
        let (coerced, defaulted) = coerce_value(value, coercion);
        if defaulted {
            report.defaulted += 1;
        } else if &coerced != value {
            report.converted += 1;
        }
        coerced
    });

    if !present {
        debug!("Column '{}' not present, skipping {:?}", column, coercion);
        return None;
    }

    if report.defaulted > 0 {
        debug!(
            "Column '{}': {} cells defaulted, {} converted",
            column, report.defaulted, report.converted
        );
    }
    Some(report)
}
