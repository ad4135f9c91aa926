//! CSV loader for batches of [`CalculationInput`].
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column                  | Required | Type    | Notes |
//! |-------------------------|----------|---------|-------|
//! | `monthly_income`        | yes      | decimal | e.g. `5000.00` |
//! | `trailing_12mo_income`  | yes      | decimal | e.g. `60000.00` |
//! | `is_export`             | no       | bool    | `true`/`false`; empty means `false` |
//! | `dependents`            | no       | integer | empty means `0` |
//! | `fixed_personal_income` | no       | decimal | empty or `0` uses each regime's default |
//!
//! ```csv
//! monthly_income,trailing_12mo_income,is_export,dependents,fixed_personal_income
//! 5000.00,60000.00,false,0,
//! 12000.00,150000.00,true,2,3000.00
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use simples_core::{CalculationInput, InputError};
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct CsvRow {
    monthly_income: Decimal,
    trailing_12mo_income: Decimal,
    is_export: Option<bool>,
    dependents: Option<u32>,
    fixed_personal_income: Option<Decimal>,
}

/// Errors that can occur while loading calculation inputs.
#[derive(Debug, Error)]
pub enum InputLoadError {
    /// Bad structure, missing required column, or a cell of the wrong type
    /// (including a negative dependent count).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row parsed but holds a value the engine rejects. `row` is
    /// 1-based, not counting the header.
    #[error("invalid input on row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: InputError,
    },

    #[error("cannot read inputs from '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<CalculationInput, InputLoadError> {
    let input = CalculationInput {
        monthly_income: row.monthly_income,
        trailing_12mo_income: row.trailing_12mo_income,
        is_export: row.is_export.unwrap_or(false),
        dependents: row.dependents.unwrap_or(0),
        fixed_personal_income: row.fixed_personal_income,
    };
    input
        .validate()
        .map_err(|source| InputLoadError::InvalidRow {
            row: row_number,
            source,
        })?;
    Ok(input)
}

/// Parses CSV from any reader. Rows are returned in file order.
pub fn load_inputs<R: Read>(reader: R) -> Result<Vec<CalculationInput>, InputLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

pub fn load_inputs_from_str(input: &str) -> Result<Vec<CalculationInput>, InputLoadError> {
    load_inputs(input.as_bytes())
}

pub fn load_inputs_from_file(path: &Path) -> Result<Vec<CalculationInput>, InputLoadError> {
    let file = std::fs::File::open(path).map_err(|source| InputLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_inputs(file)
}
