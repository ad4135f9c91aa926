mod bracket;
mod calculation;
mod regime;
mod tax_tables;

pub use bracket::{BracketBounds, BracketRow, RevenueBracketRow};
pub use calculation::{CalculationInput, CalculationResult, InputError};
pub use regime::{EXPORT_COMPONENTS, Regime, RegimeTable, RegimeTaxRow, TaxComponent};
pub use tax_tables::{REVENUE_BRACKET_COUNT, TableError, TaxTables, builtin_tables};
