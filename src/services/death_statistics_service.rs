use serde::Serialize;
use tracing::{debug, info, warn};

use crate::table::{columns, Table, Value};

/// Result of [`DeathCounter::death_statistics`].
///
/// Serialized untagged so each variant reads as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeathStatistics {
    /// `Morreu` or `Death_Year` is absent from the table
    MissingColumns { error: String },
    /// No row is marked as dead
    NoDeaths { total_deaths: i64, message: String },
    /// Deaths exist but none carries a usable year
    NoValidYears { total_deaths: i64, message: String },
    Computed(YearStatistics),
}

impl DeathStatistics {
    pub fn is_error(&self) -> bool {
        matches!(self, DeathStatistics::MissingColumns { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearStatistics {
    pub total_deaths: i64,
    /// Rounded to 2 decimals
    pub mean_death_year: f64,
    pub median_death_year: f64,
    /// Sample standard deviation rounded to 2 decimals; NaN below two years
    pub std_death_year: f64,
    pub min_death_year: i64,
    pub max_death_year: i64,
}

/// Descriptive statistics over a non-empty series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub sample_std: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesSummary {
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };
        let sample_std = if count < 2 {
            f64::NAN
        } else {
            let variance =
                sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        };

        Some(Self {
            count,
            mean,
            median,
            sample_std,
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Death counts and year statistics over a table.
///
/// Works on any table, normalized or not; absent columns are reported in the
/// result rather than raised.
pub struct DeathCounter<'a> {
    table: &'a Table,
}

impl<'a> DeathCounter<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Sum of `Morreu`; 0 when the column is absent
    pub fn count_deaths(&self) -> i64 {
        let Some(died) = self.table.column(columns::DIED) else {
            warn!("Column '{}' not found; death count is 0", columns::DIED);
            return 0;
        };
        let total = died.filter_map(|v| v.as_i64()).sum();
        debug!("Total deaths counted: {}", total);
        total
    }

    pub fn death_statistics(&self) -> DeathStatistics {
        let (Some(died_idx), Some(year_idx)) = (
            self.table.column_index(columns::DIED),
            self.table.column_index(columns::DEATH_YEAR),
        ) else {
            return DeathStatistics::MissingColumns {
                error: format!(
                    "Columns '{}' or '{}' not found.",
                    columns::DIED,
                    columns::DEATH_YEAR
                ),
            };
        };

        let dead: Vec<&[Value]> = self
            .table
            .rows()
            .filter(|row| row[died_idx].as_f64() == Some(1.0))
            .collect();

        if dead.is_empty() {
            info!("No deaths recorded, no statistics to compute");
            return DeathStatistics::NoDeaths {
                total_deaths: 0,
                message: "No deaths recorded.".to_string(),
            };
        }

        let years: Vec<f64> = dead.iter().filter_map(|row| row[year_idx].as_f64()).collect();
        let Some(summary) = SeriesSummary::compute(&years) else {
            info!("No death with a valid year, no statistics to compute");
            return DeathStatistics::NoValidYears {
                total_deaths: self.count_deaths(),
                message: "No deaths with a valid year to compute statistics.".to_string(),
            };
        };

        let stats = YearStatistics {
            total_deaths: self.count_deaths(),
            mean_death_year: round2(summary.mean),
            median_death_year: summary.median,
            std_death_year: round2(summary.sample_std),
            min_death_year: summary.min as i64,
            max_death_year: summary.max as i64,
        };
        info!("Death statistics computed: {:?}", stats);
        DeathStatistics::Computed(stats)
    }
}
