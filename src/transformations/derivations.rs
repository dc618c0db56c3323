//! Derived columns: the gender label and the died indicator

use indexmap::IndexMap;
use tracing::{info, warn};

use super::coercion::{coerce_column, Coercion};
use crate::table::{columns, Table, Value};

/// Row count per gender label, largest group first
pub type GenderCounts = IndexMap<String, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenderLabel {
    Male,
    Female,
    Unknown,
}

impl GenderLabel {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => GenderLabel::Male,
            0 => GenderLabel::Female,
            _ => GenderLabel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenderLabel::Male => "Male",
            GenderLabel::Female => "Female",
            GenderLabel::Unknown => "Unknown",
        }
    }
}

/// Coerce `Gender` to an integer code and add `Gender_Str`.
///
/// Returns empty counts and leaves the table untouched when `Gender` is absent.
pub fn derive_gender(table: &mut Table) -> GenderCounts {
    if coerce_column(table, columns::GENDER, Coercion::Integer { default: -1 }).is_none() {
        warn!("Column '{}' not found; no gender labels derived", columns::GENDER);
        return GenderCounts::new();
    }

    let labels: Vec<GenderLabel> = table
        .column(columns::GENDER)
        .map(|values| {
            values
                .map(|v| GenderLabel::from_code(v.as_i64().unwrap_or(-1)))
                .collect()
        })
        .unwrap_or_default();

    let mut counts = GenderCounts::new();
    for label in &labels {
        *counts.entry(label.as_str().to_string()).or_insert(0) += 1;
    }
    counts.sort_by(|_, a, _, b| b.cmp(a));

    table.set_column(
        columns::GENDER_LABEL,
        labels
            .into_iter()
            .map(|label| Value::Text(label.as_str().to_string()))
            .collect(),
    );
    info!("Column '{}' created", columns::GENDER_LABEL);
    counts
}

/// Coerce `Death_Year` and add `Morreu` (1 iff the year is strictly positive).
///
/// `Morreu` is always added; without `Death_Year` every row is 0.
pub fn derive_deaths(table: &mut Table) {
    let died: Vec<Value> =
        match coerce_column(table, columns::DEATH_YEAR, Coercion::Numeric { default: 0 }) {
            Some(_) => table
                .column(columns::DEATH_YEAR)
                .map(|values| {
                    values
                        .map(|v| died_flag(v.as_f64().unwrap_or(0.0)))
                        .collect()
                })
                .unwrap_or_default(),
            None => {
                warn!(
                    "Column '{}' not found; '{}' defaults to 0",
                    columns::DEATH_YEAR,
                    columns::DIED
                );
                vec![Value::Int(0); table.len()]
            }
        };

    table.set_column(columns::DIED, died);
    info!("Column '{}' created", columns::DIED);
}

fn died_flag(death_year: f64) -> Value {
    Value::Int(i64::from(death_year > 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn gender_codes_map_to_labels() {
        assert_eq!(GenderLabel::from_code(1), GenderLabel::Male);
        assert_eq!(GenderLabel::from_code(0), GenderLabel::Female);
        assert_eq!(GenderLabel::from_code(-1), GenderLabel::Unknown);
        assert_eq!(GenderLabel::from_code(2), GenderLabel::Unknown);
    }

    #[test]
    fn gender_counts_are_sorted_by_size() {
        let mut table = Table::from_rows(
            vec!["Gender".to_string()],
            vec![
                vec![text("0")],
                vec![text("1")],
                vec![text("1")],
                vec![Value::Missing],
            ],
        );

        let counts = derive_gender(&mut table);
        let order: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(order, vec![("Male", 2), ("Female", 1), ("Unknown", 1)]);
        assert_eq!(table.value(3, "Gender"), Some(&Value::Int(-1)));
        assert_eq!(table.value(3, "Gender_Str"), Some(&text("Unknown")));
    }

    #[test]
    fn absent_gender_yields_no_counts() {
        let mut table = Table::from_rows(vec!["Name".to_string()], vec![vec![text("Hodor")]]);
        assert!(derive_gender(&mut table).is_empty());
        assert!(!table.has_column("Gender_Str"));
    }

    #[test]
    fn deaths_follow_positive_years() {
        let mut table = Table::from_rows(
            vec!["Death_Year".to_string()],
            vec![
                vec![text("299")],
                vec![text("0")],
                vec![Value::Missing],
                vec![text("-3")],
            ],
        );
        derive_deaths(&mut table);

        let died: Vec<&Value> = table.column("Morreu").unwrap().collect();
        assert_eq!(
            died,
            vec![&Value::Int(1), &Value::Int(0), &Value::Int(0), &Value::Int(0)]
        );
    }

    #[test]
    fn deaths_default_without_death_year() {
        let mut table = Table::from_rows(vec!["Name".to_string()], vec![vec![text("Hodor")]]);
        derive_deaths(&mut table);
        assert_eq!(table.value(0, "Morreu"), Some(&Value::Int(0)));
    }
}
