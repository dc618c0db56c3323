use anyhow::Result;

use crate::table::{Row, Table};

pub fn render(table: &Table) -> Result<String> {
    let rows: Vec<Row> = (0..table.len()).filter_map(|i| table.row(i)).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}
