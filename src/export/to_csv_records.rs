use anyhow::Result;
use csv::WriterBuilder;

use crate::table::Table;

/// Write the table back out as delimited text, missing cells left empty.
pub fn render(table: &Table, delimiter: u8) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(vec![]);

    wtr.write_record(table.headers())?;

    for row in table.rows() {
        wtr.write_record(row.iter().map(|value| value.to_string()))?;
    }

    let data = wtr.into_inner()?;
    let csv_string = String::from_utf8(data)?;

    Ok(csv_string)
}
