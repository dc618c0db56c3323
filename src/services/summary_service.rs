use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::services::dataset_service::Dataset;
use crate::table::columns;

/// Headline metrics over a processed dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_characters: usize,
    pub total_deaths: i64,
    /// Largest gender group; `None` without gender data
    pub predominant_gender: Option<String>,
    /// Most frequent death year among dead characters, smallest year on ties
    pub deadliest_year: Option<i64>,
    /// Percentage of all characters per gender label, 1 decimal
    pub gender_share: IndexMap<String, f64>,
    pub deaths_by_year: BTreeMap<i64, usize>,
}

pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let total_characters = dataset.len();
    let deaths_by_year = deaths_by_year(dataset);

    let deadliest_year = deaths_by_year
        .iter()
        .fold(None, |best: Option<(i64, usize)>, (&year, &count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((year, count)),
        })
        .map(|(year, _)| year);

    let gender_share = dataset
        .gender_counts()
        .iter()
        .map(|(label, &count)| (label.clone(), share(count, total_characters)))
        .collect();

    DatasetSummary {
        total_characters,
        total_deaths: dataset.count_deaths(),
        predominant_gender: dataset.gender_counts().keys().next().cloned(),
        deadliest_year,
        gender_share,
        deaths_by_year,
    }
}

/// Dead characters per death year
pub fn deaths_by_year(dataset: &Dataset) -> BTreeMap<i64, usize> {
    let table = dataset.table();
    let mut years = BTreeMap::new();

    let (Some(died_idx), Some(year_idx)) = (
        table.column_index(columns::DIED),
        table.column_index(columns::DEATH_YEAR),
    ) else {
        return years;
    };

    for row in table.rows() {
        if row[died_idx].as_i64() != Some(1) {
            continue;
        }
        if let Some(year) = row[year_idx].as_i64() {
            *years.entry(year).or_insert(0) += 1;
        }
    }
    years
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Table, Value};

    fn dataset(rows: &[(&str, &str, &str)]) -> Dataset {
        let raw = Table::from_rows(
            vec![
                "Name".to_string(),
                "Gender".to_string(),
                "Death_Year".to_string(),
            ],
            rows.iter()
                .map(|(name, gender, year)| {
                    vec![
                        Value::Text(name.to_string()),
                        Value::Text(gender.to_string()),
                        Value::Text(year.to_string()),
                    ]
                })
                .collect(),
        );
        Dataset::from_table(&raw, "test")
    }

    #[test]
    fn summarizes_headline_metrics() {
        let summary = summarize(&dataset(&[
            ("Ned Stark", "1", "299"),
            ("Robb Stark", "1", "299"),
            ("Catelyn Stark", "0", "299"),
            ("Joffrey", "1", "300"),
            ("Arya Stark", "0", ""),
            ("Jon Snow", "1", "0"),
        ]));

        assert_eq!(summary.total_characters, 6);
        assert_eq!(summary.total_deaths, 4);
        assert_eq!(summary.predominant_gender.as_deref(), Some("Male"));
        assert_eq!(summary.deadliest_year, Some(299));
        assert_eq!(summary.gender_share["Male"], 66.7);
        assert_eq!(summary.gender_share["Female"], 33.3);
        assert_eq!(
            summary.deaths_by_year.into_iter().collect::<Vec<_>>(),
            vec![(299, 3), (300, 1)]
        );
    }

    #[test]
    fn deadliest_year_prefers_earliest_on_ties() {
        let summary = summarize(&dataset(&[
            ("Viserys", "1", "298"),
            ("Drogo", "1", "298"),
            ("Renly", "1", "299"),
            ("Balon", "1", "299"),
        ]));
        assert_eq!(summary.deadliest_year, Some(298));
    }

    #[test]
    fn no_deaths_has_no_deadliest_year() {
        let summary = summarize(&dataset(&[("Arya Stark", "0", "")]));
        assert_eq!(summary.total_deaths, 0);
        assert_eq!(summary.deadliest_year, None);
        assert!(summary.deaths_by_year.is_empty());
    }
}
