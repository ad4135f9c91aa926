use thiserror::Error;

use crate::models::{InputError, TableError};

/// Errors that can stop a regime calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("invalid tax tables: {0}")]
    Table(#[from] TableError),
}
