//! Normalization pipeline
//!
//! Turns a freshly loaded table into the cleaned table the statistics and the
//! API read from. The steps run in a fixed order because later steps assume
//! the coercions done by earlier ones:
//!
//! 1. blank text cells become missing
//! 2. numeric columns are parsed, failures become 0
//! 3. categorical columns get their defaults
//! 4. `Gender_Str` is derived and counted
//! 5. `Morreu` is derived from `Death_Year`
//!
//! No step fails. Malformed cells are replaced by their column default.

pub mod coercion;
pub mod derivations;

pub use coercion::{coerce_column, coerce_value, Coercion, CoercionReport};
pub use derivations::{derive_deaths, derive_gender, GenderCounts, GenderLabel};

use tracing::{debug, info};

use crate::table::{columns, Table, Value};

/// Columns parsed as numbers in step 2, all defaulting to 0
pub const NUMERIC_COLUMNS: [&str; 9] = [
    columns::DEATH_YEAR,
    columns::BOOK_OF_DEATH,
    columns::DEATH_CHAPTER,
    columns::BOOK_INTRO_CHAPTER,
    columns::BOOK_APPEARANCES[0],
    columns::BOOK_APPEARANCES[1],
    columns::BOOK_APPEARANCES[2],
    columns::BOOK_APPEARANCES[3],
    columns::BOOK_APPEARANCES[4],
];

pub const UNKNOWN_ALLEGIANCE: &str = "Unknown";

/// Run the whole pipeline on a copy of `table`.
pub fn normalize(table: &Table) -> (Table, GenderCounts) {
    info!("Starting normalization of {} rows", table.len());
    let mut table = table.clone();

    eliminate_blanks(&mut table);
    coerce_numeric_columns(&mut table);
    fill_categorical_defaults(&mut table);
    let gender_counts = derive_gender(&mut table);
    derive_deaths(&mut table);

    info!("Normalization finished");
    (table, gender_counts)
}

/// Step 1: empty or whitespace-only text is treated as missing.
pub fn eliminate_blanks(table: &mut Table) -> usize {
    let mut blanks = 0;
    table.map_cells(|cell| {
        cell.is_blank().then(|| {
            blanks += 1;
            Value::Missing
        })
    });
    debug!("Replaced {} blank cells", blanks);
    blanks
}

/// Step 2
pub fn coerce_numeric_columns(table: &mut Table) {
    for column in NUMERIC_COLUMNS {
        coerce_column(table, column, Coercion::Numeric { default: 0 });
    }
}

/// Step 3
pub fn fill_categorical_defaults(table: &mut Table) {
    coerce_column(
        table,
        columns::ALLEGIANCES,
        Coercion::FillText(UNKNOWN_ALLEGIANCE),
    );
    coerce_column(table, columns::GENDER, Coercion::FillNumber(-1));
    coerce_column(table, columns::NOBILITY, Coercion::Numeric { default: -1 });
}
