use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

use crate::errors::DatasetError;
use crate::table::{columns, Row, Table, Value};

/// Alive/dead filter over `Morreu`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifeStatus {
    #[default]
    All,
    Alive,
    Dead,
}

impl FromStr for LifeStatus {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(LifeStatus::All),
            "alive" => Ok(LifeStatus::Alive),
            "dead" => Ok(LifeStatus::Dead),
            other => Err(DatasetError::InvalidFilter(format!(
                "status must be all, alive or dead, got '{}'",
                other
            ))),
        }
    }
}

/// Noble/common filter over `Nobility`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NobilityStatus {
    #[default]
    All,
    Noble,
    Common,
}

impl FromStr for NobilityStatus {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(NobilityStatus::All),
            "noble" => Ok(NobilityStatus::Noble),
            "common" => Ok(NobilityStatus::Common),
            other => Err(DatasetError::InvalidFilter(format!(
                "nobility must be all, noble or common, got '{}'",
                other
            ))),
        }
    }
}

/// Columns returned when a query names none, in display order
pub const DEFAULT_COLUMNS: [&str; 7] = [
    columns::NAME,
    columns::ALLEGIANCES,
    columns::GENDER_LABEL,
    columns::NOBILITY,
    columns::DEATH_YEAR,
    columns::DIED,
    columns::BOOK_OF_DEATH,
];

/// Row filter and column projection over a normalized table.
///
/// Each filter only applies when its column exists. Empty `genders` means
/// every gender; empty `columns` means the [`DEFAULT_COLUMNS`] the table
/// carries, or every column when it carries none of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub genders: Vec<String>,
    pub status: LifeStatus,
    pub nobility: NobilityStatus,
    pub columns: Vec<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordQueryResult {
    /// Rows in the unfiltered table
    pub total: usize,
    /// Rows passing the filters, before `limit`
    pub matched: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Every gender label in the table, for building filter choices
    pub available_genders: Vec<String>,
}

impl RecordFilter {
    /// Split a comma-separated list, dropping empty entries
    pub fn parse_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Positions of the rows passing every filter
    pub fn matching_rows(&self, table: &Table) -> Vec<usize> {
        let gender_idx = table
            .column_index(columns::GENDER_LABEL)
            .filter(|_| !self.genders.is_empty());
        let died_idx = table
            .column_index(columns::DIED)
            .filter(|_| self.status != LifeStatus::All);
        let nobility_idx = table
            .column_index(columns::NOBILITY)
            .filter(|_| self.nobility != NobilityStatus::All);

        table
            .rows()
            .enumerate()
            .filter(|(_, row)| {
                gender_idx.map_or(true, |i| {
                    row[i]
                        .as_text()
                        .is_some_and(|label| self.genders.iter().any(|g| g == label))
                })
            })
            .filter(|(_, row)| {
                died_idx.map_or(true, |i| match self.status {
                    LifeStatus::All => true,
                    LifeStatus::Alive => row[i].as_i64() == Some(0),
                    LifeStatus::Dead => row[i].as_i64() == Some(1),
                })
            })
            .filter(|(_, row)| {
                nobility_idx.map_or(true, |i| match self.nobility {
                    NobilityStatus::All => true,
                    NobilityStatus::Noble => row[i].as_i64() == Some(1),
                    NobilityStatus::Common => row[i].as_i64() == Some(0),
                })
            })
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Filtered copy of the table with the selected columns
    pub fn apply(&self, table: &Table) -> Result<Table, DatasetError> {
        let mut rows = self.matching_rows(table);
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        table.select_rows(&rows).select_columns(&self.projection(table))
    }

    /// Column names the query returns
    pub fn projection(&self, table: &Table) -> Vec<String> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }

        let defaults: Vec<String> = DEFAULT_COLUMNS
            .iter()
            .filter(|name| table.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if defaults.is_empty() {
            table.headers().to_vec()
        } else {
            defaults
        }
    }

    pub fn query(&self, table: &Table) -> Result<RecordQueryResult, DatasetError> {
        let matched = self.matching_rows(table).len();
        let view = self.apply(table)?;
        debug!(
            "Record query matched {} of {} rows, returning {}",
            matched,
            table.len(),
            view.len()
        );

        Ok(RecordQueryResult {
            total: table.len(),
            matched,
            columns: view.headers().to_vec(),
            rows: (0..view.len()).filter_map(|i| view.row(i)).collect(),
            available_genders: gender_labels(table),
        })
    }
}

/// Distinct gender labels present in the table, in first-seen order
pub fn gender_labels(table: &Table) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    if let Some(values) = table.column(columns::GENDER_LABEL) {
        for label in values.filter_map(Value::as_text) {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformations::normalize;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn normalized() -> Table {
        let raw = Table::from_rows(
            vec![
                "Name".to_string(),
                "Gender".to_string(),
                "Nobility".to_string(),
                "Death_Year".to_string(),
                "ID".to_string(),
            ],
            vec![
                vec![text("Arya Stark"), text("0"), text("1"), text("0"), Value::Int(0)],
                vec![text("Jon Snow"), text("1"), text("1"), text("0"), Value::Int(1)],
                vec![text("Robb Stark"), text("1"), text("1"), text("299"), Value::Int(2)],
                vec![text("Hodor"), text("1"), text("0"), text("300"), Value::Int(3)],
                vec![text("Nobody"), text(""), text(""), text(""), Value::Int(4)],
            ],
        );
        normalize(&raw).0
    }

    fn names(table: &Table) -> Vec<String> {
        table
            .column("Name")
            .unwrap()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn default_filter_keeps_rows_and_display_columns() {
        let table = normalized();
        let view = RecordFilter::default().apply(&table).unwrap();

        assert_eq!(view.len(), table.len());
        assert_eq!(
            view.headers(),
            ["Name", "Gender_Str", "Nobility", "Death_Year", "Morreu"]
        );
    }

    #[test]
    fn tables_without_display_columns_keep_every_column() {
        let table = Table::from_rows(
            vec!["House".to_string(), "Seat".to_string()],
            vec![vec![text("Stark"), text("Winterfell")]],
        );
        let view = RecordFilter::default().apply(&table).unwrap();
        assert_eq!(view, table);
    }

    #[test]
    fn filters_combine() {
        let table = normalized();
        let filter = RecordFilter {
            genders: vec!["Male".to_string()],
            status: LifeStatus::Dead,
            nobility: NobilityStatus::Noble,
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(&table).unwrap()), vec!["Robb Stark"]);
    }

    #[test]
    fn unknown_nobility_matches_neither_side() {
        let table = normalized();
        let common = RecordFilter {
            nobility: NobilityStatus::Common,
            ..Default::default()
        };
        assert_eq!(names(&common.apply(&table).unwrap()), vec!["Hodor"]);
    }

    #[test]
    fn projection_and_limit() {
        let table = normalized();
        let filter = RecordFilter {
            status: LifeStatus::Alive,
            columns: vec!["Name".to_string(), "Morreu".to_string()],
            limit: Some(2),
            ..Default::default()
        };

        let result = filter.query(&table).unwrap();
        assert_eq!(result.total, 5);
        assert_eq!(result.matched, 3);
        assert_eq!(result.columns, vec!["Name", "Morreu"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[1]["Name"], text("Jon Snow"));
        assert_eq!(result.available_genders, vec!["Female", "Male", "Unknown"]);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let table = normalized();
        let filter = RecordFilter {
            columns: vec!["House".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            filter.apply(&table),
            Err(DatasetError::MissingColumn(c)) if c == "House"
        ));
    }

    #[test]
    fn parses_filter_values() {
        assert_eq!("Dead".parse::<LifeStatus>().unwrap(), LifeStatus::Dead);
        assert_eq!("".parse::<NobilityStatus>().unwrap(), NobilityStatus::All);
        assert!("zombie".parse::<LifeStatus>().is_err());
        assert_eq!(
            RecordFilter::parse_list("Male, Female,,"),
            vec!["Male", "Female"]
        );
    }

    #[test]
    fn lists_gender_labels() {
        assert_eq!(gender_labels(&normalized()), vec!["Female", "Male", "Unknown"]);
    }
}
