use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a command-line amount cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and removes the comma thousands separator.
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses an amount such as `"5,000.00"` into a [`Decimal`].
///
/// Used as a clap value parser. Empty input is zero.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|source| ParseDecimalError {
        input: s.to_string(),
        source,
    })
}
