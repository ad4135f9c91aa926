//! Regime calculations over a set of [`TaxTables`](crate::TaxTables).
//!
//! Leaf first: [`resolver`] finds bracket rows, [`withholding`] and
//! [`entity_tax`] compute the personal and entity sides, [`regime`] turns
//! them into a net figure and [`selector`] compares the two regimes.

pub mod common;
pub mod entity_tax;
mod error;
pub mod regime;
pub mod resolver;
pub mod selector;
pub mod trace;
pub mod withholding;

pub use entity_tax::{EntityTax, EntityTaxResult};
pub use error::CalculationError;
pub use regime::{PersonalIncomeRule, RegimeEvaluator};
pub use resolver::{MissPolicy, Resolution, resolve};
pub use selector::{RegimeSelector, select_best_regime, select_best_regime_traced};
pub use trace::{PersonalIncomeSource, RegimeTrace, SelectionTrace};
pub use withholding::{PersonalWithholding, WithholdingResult};
