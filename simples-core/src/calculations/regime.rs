//! Net monthly income under a single regime.
//!
//! One evaluator serves both regimes; the regime table and the default
//! salary rule are parameters.
//!
//! ```text
//! net = monthly_income
//!     − personal_income
//!     + net_personal_income
//!     − monthly_income × entity_rate
//!     + entity_deduction_per_month
//! ```
//!
//! Only `net` is rounded to cents; every term keeps full precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CalculationError;
use super::common::{percentage_of, round_half_up};
use super::entity_tax::EntityTax;
use super::trace::{PersonalIncomeSource, RegimeTrace};
use super::withholding::PersonalWithholding;
use crate::models::{CalculationInput, Regime, RegimeTable, TaxTables};

/// How a regime picks the salary share when the caller gives none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalIncomeRule {
    /// `monthly_income × r_factor_threshold`. Scales with income.
    RFactorShare,
    /// The statutory minimum wage, whatever the income.
    MinimumWage,
}

impl PersonalIncomeRule {
    pub fn for_regime(regime: Regime) -> Self {
        match regime {
            Regime::Attachment3 => Self::RFactorShare,
            Regime::Attachment5 => Self::MinimumWage,
        }
    }

    /// Salary this rule assigns for `monthly_income`.
    pub fn personal_income(
        &self,
        monthly_income: Decimal,
        tables: &TaxTables,
    ) -> Decimal {
        match self {
            Self::RFactorShare => monthly_income * tables.r_factor_threshold,
            Self::MinimumWage => tables.minimum_wage,
        }
    }
}

/// Combines personal withholding and entity tax into one net figure.
#[derive(Debug, Clone, Copy)]
pub struct RegimeEvaluator<'a> {
    tables: &'a TaxTables,
    withholding: PersonalWithholding<'a>,
    entity: EntityTax<'a>,
}

impl<'a> RegimeEvaluator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self {
            tables,
            withholding: PersonalWithholding::new(tables),
            entity: EntityTax::new(tables),
        }
    }

    /// Evaluates `regime` with its own table and default salary rule.
    pub fn evaluate(
        &self,
        input: &CalculationInput,
        regime: Regime,
    ) -> Result<RegimeTrace, CalculationError> {
        self.evaluate_with(
            input,
            regime,
            self.tables.regime_table(regime),
            PersonalIncomeRule::for_regime(regime),
        )
    }

    /// Evaluates an arbitrary regime table and salary rule. `regime` only
    /// tags the result.
    ///
    /// # Errors
    ///
    /// - [`CalculationError::InvalidInput`] if any input amount is negative.
    /// - [`CalculationError::Table`] if a table lookup cannot be satisfied.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use simples_core::{CalculationInput, Regime, TaxTables};
    /// use simples_core::calculations::{PersonalIncomeRule, RegimeEvaluator};
    ///
    /// let tables = TaxTables::default();
    /// let evaluator = RegimeEvaluator::new(&tables);
    /// let input = CalculationInput::new(dec!(5000), dec!(60000));
    ///
    /// // Attachment 5 rates with the Attachment 3 salary rule.
    /// let trace = evaluator
    ///     .evaluate_with(
    ///         &input,
    ///         Regime::Attachment5,
    ///         &tables.attachment_5,
    ///         PersonalIncomeRule::RFactorShare,
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(trace.personal_income, dec!(1400.00));
    /// assert_eq!(trace.net_income, dec!(4099.00));
    /// ```
    pub fn evaluate_with(
        &self,
        input: &CalculationInput,
        regime: Regime,
        regime_table: &RegimeTable,
        rule: PersonalIncomeRule,
    ) -> Result<RegimeTrace, CalculationError> {
        input.validate()?;

        let (personal_income, personal_income_source) = match input.personal_income_override() {
            Some(amount) => (amount, PersonalIncomeSource::Override),
            None => (
                rule.personal_income(input.monthly_income, self.tables),
                PersonalIncomeSource::Default(rule),
            ),
        };

        let withholding = self
            .withholding
            .calculate(personal_income, input.dependents)?;
        let entity = self.entity.calculate(
            input.trailing_12mo_income,
            regime,
            regime_table,
            input.is_export,
        )?;

        let entity_tax = input.monthly_income * entity.rate;
        let net_income = round_half_up(
            input.monthly_income - personal_income + withholding.net_personal_income - entity_tax
                + entity.deduction_per_month,
        );
        let percentage_discounted = percentage_of(withholding.total_discounts, personal_income);

        debug!(
            regime = regime.as_str(),
            personal_income = %personal_income,
            percentage_discounted = %percentage_discounted,
            entity_tax = %entity_tax,
            net_income = %net_income,
            "regime evaluated"
        );

        Ok(RegimeTrace {
            regime,
            personal_income,
            personal_income_source,
            withholding,
            percentage_discounted,
            entity,
            entity_tax,
            net_income,
        })
    }
}
