pub mod to_csv_records;
pub mod to_json_records;

use std::str::FromStr;

use crate::table::Table;

/// Output formats for record exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => anyhow::bail!("Unsupported export format: {}", other),
        }
    }
}

pub fn render(table: &Table, format: ExportFormat, delimiter: u8) -> anyhow::Result<String> {
    match format {
        ExportFormat::Csv => to_csv_records::render(table, delimiter),
        ExportFormat::Json => to_json_records::render(table),
    }
}
