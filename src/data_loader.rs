use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, error, info};

use crate::errors::DatasetError;
use crate::table::{columns, Table, Value};

pub const DEFAULT_DELIMITER: u8 = b';';

/// Load a delimited file into a [`Table`] and append the `ID` column.
///
/// Short records are padded with missing cells; a record with more fields
/// than the header is a load error.
pub fn load_delimited(path: &Path, delimiter: u8) -> Result<Table, DatasetError> {
    if !path.is_file() {
        error!("Data file not found: {}", path.display());
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    load_delimited_from_reader(file, delimiter, &path.display().to_string())
}

/// Same contract as [`load_delimited`] over any reader; `origin` names the
/// source in diagnostics.
pub fn load_delimited_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
    origin: &str,
) -> Result<Table, DatasetError> {
    let mut table = match read_table(reader, delimiter) {
        Ok(table) => table,
        Err(source) => {
            error!("Error loading {}: {}", origin, source);
            return Err(DatasetError::Load {
                origin: origin.to_string(),
                source,
            });
        }
    };

    if table.headers().is_empty() {
        error!("Error loading {}: no header row", origin);
        return Err(DatasetError::EmptySource(origin.to_string()));
    }

    assign_ids(&mut table);
    info!(
        "Loaded {} rows from {}. Columns: {:?}",
        table.len(),
        origin,
        table.headers()
    );
    Ok(table)
}

fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Table, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers);
    let width = table.headers().len();

    for (line_num, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(csv::Error::from(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "line {}: expected {} fields, saw {}",
                    line_num + 2,
                    width,
                    record.len()
                ),
            )));
        }
        table.push_row(
            record
                .iter()
                .map(|field| Value::Text(field.to_string()))
                .collect(),
        );
    }

    debug!("Parsed {} records", table.len());
    Ok(table)
}

/// Number every row by its zero-based position, overwriting any existing `ID`.
fn assign_ids(table: &mut Table) {
    let ids = (0..table.len()).map(|i| Value::Int(i as i64)).collect();
    table.set_column(columns::ID, ids);
}
