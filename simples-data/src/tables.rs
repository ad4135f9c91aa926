//! Loading alternate [`TaxTables`] from TOML.
//!
//! The file mirrors the fields of [`TaxTables`]. Scalars come first, then
//! one array of tables per schedule. Amounts may be written as numbers or
//! as strings; strings keep every digit exactly.
//!
//! ```toml
//! minimum_wage = "1212.00"
//! r_factor_threshold = "0.28"
//! dependent_deduction = "189.59"
//! social_security_ceiling = "6433.57"
//!
//! [[income_tax]]
//! lower_bound = "0"
//! upper_bound = "1903.98"
//! rate = "0"
//!
//! # ... remaining income_tax, social_security and revenue rows ...
//! # A row with no upper_bound is unbounded.
//!
//! [[attachment_3]]
//! combined_rate = "0.06"
//! fixed_deduction = "0"
//!
//! [attachment_3.component_rates]
//! cpp = "0.434"
//! iss = "0.335"
//! csll = "0.035"
//! irpj = "0.04"
//! cofins = "0.128"
//! pis_pasep = "0.0278"
//! ```
//!
//! Loaded tables are validated before they are returned, so a misaligned
//! regime table is rejected here rather than at calculation time.

use std::path::{Path, PathBuf};

use simples_core::{TableError, TaxTables};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading tax tables.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("cannot read tax tables from '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tax tables: {0}")]
    Invalid(#[from] TableError),
}

/// Loader for [`TaxTables`] files.
pub struct TaxTablesLoader;

impl TaxTablesLoader {
    /// Parses and validates TOML text.
    pub fn parse(input: &str) -> Result<TaxTables, TableLoadError> {
        let tables: TaxTables = toml::from_str(input)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Reads a file from disk and delegates to [`parse`](Self::parse).
    pub fn load_file(path: &Path) -> Result<TaxTables, TableLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TableLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::parse(&contents)?;
        info!(
            path = %path.display(),
            income_tax_rows = tables.income_tax.len(),
            social_security_rows = tables.social_security.len(),
            "loaded tax tables"
        );
        Ok(tables)
    }
}
