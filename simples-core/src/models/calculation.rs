use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Regime;

/// Rejected caller input. Raised before any table lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// The scalars supplied for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Gross monthly income billed through the entity.
    pub monthly_income: Decimal,

    /// Entity revenue over the preceding twelve months.
    pub trailing_12mo_income: Decimal,

    /// Whether the service is rendered to a foreign client.
    #[serde(default)]
    pub is_export: bool,

    #[serde(default)]
    pub dependents: u32,

    /// Salary paid out as personal income. `None` or zero selects each
    /// regime's default rule.
    #[serde(default)]
    pub fixed_personal_income: Option<Decimal>,
}

impl CalculationInput {
    pub fn new(
        monthly_income: Decimal,
        trailing_12mo_income: Decimal,
    ) -> Self {
        Self {
            monthly_income,
            trailing_12mo_income,
            is_export: false,
            dependents: 0,
            fixed_personal_income: None,
        }
    }

    pub fn with_export(
        mut self,
        is_export: bool,
    ) -> Self {
        self.is_export = is_export;
        self
    }

    pub fn with_dependents(
        mut self,
        dependents: u32,
    ) -> Self {
        self.dependents = dependents;
        self
    }

    pub fn with_personal_income(
        mut self,
        personal_income: Decimal,
    ) -> Self {
        self.fixed_personal_income = Some(personal_income);
        self
    }

    /// The caller's salary override, if it is positive.
    pub fn personal_income_override(&self) -> Option<Decimal> {
        self.fixed_personal_income
            .filter(|amount| *amount > Decimal::ZERO)
    }

    /// Checks that every currency amount is non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NegativeAmount`] naming the first offending field.
    pub fn validate(&self) -> Result<(), InputError> {
        let amounts = [
            ("monthly_income", Some(self.monthly_income)),
            ("trailing_12mo_income", Some(self.trailing_12mo_income)),
            ("fixed_personal_income", self.fixed_personal_income),
        ];
        for (field, value) in amounts {
            match value {
                Some(value) if value < Decimal::ZERO => {
                    return Err(InputError::NegativeAmount { field, value });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Net monthly income under the better regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub net_monthly_income: Decimal,
    pub winning_regime: Regime,
}
