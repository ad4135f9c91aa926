//! Picks the regime that leaves the higher net monthly income.
//!
//! Both regimes are evaluated in [`Regime::ALL`] order. On equal net
//! income Attachment 3 wins.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use simples_core::{CalculationInput, Regime, select_best_regime};
//!
//! let input = CalculationInput::new(dec!(5000), dec!(60000));
//!
//! let result = select_best_regime(&input).unwrap();
//!
//! assert_eq!(result.winning_regime, Regime::Attachment3);
//! assert_eq!(result.net_monthly_income, dec!(4574.00));
//! ```

use tracing::debug;

use super::CalculationError;
use super::regime::RegimeEvaluator;
use super::trace::{RegimeTrace, SelectionTrace};
use crate::models::{
    CalculationInput, CalculationResult, Regime, TableError, TaxTables, builtin_tables,
};

/// Regime comparison over a validated set of [`TaxTables`].
#[derive(Debug, Clone, Copy)]
pub struct RegimeSelector<'a> {
    evaluator: RegimeEvaluator<'a>,
}

impl<'a> RegimeSelector<'a> {
    /// Validates `tables` once and binds the selector to them.
    ///
    /// # Errors
    ///
    /// Returns the [`TableError`] from [`TaxTables::validate`].
    pub fn new(tables: &'a TaxTables) -> Result<Self, TableError> {
        tables.validate()?;
        Ok(Self {
            evaluator: RegimeEvaluator::new(tables),
        })
    }

    /// Evaluates every regime, Attachment 3 first.
    pub fn evaluate_all(
        &self,
        input: &CalculationInput,
    ) -> Result<[RegimeTrace; 2], CalculationError> {
        input.validate()?;
        let [first, second] = Regime::ALL;
        Ok([
            self.evaluator.evaluate(input, first)?,
            self.evaluator.evaluate(input, second)?,
        ])
    }

    pub fn select(
        &self,
        input: &CalculationInput,
    ) -> Result<CalculationResult, CalculationError> {
        let evaluations = self.evaluate_all(input)?;
        Ok(choose(&evaluations))
    }

    /// Like [`select`](Self::select), also returning every intermediate figure.
    pub fn select_traced(
        &self,
        input: &CalculationInput,
    ) -> Result<(CalculationResult, SelectionTrace), CalculationError> {
        let evaluations = self.evaluate_all(input)?;
        let result = choose(&evaluations);
        let trace = SelectionTrace {
            input: input.clone(),
            evaluations,
            result,
        };
        Ok((result, trace))
    }
}

/// Later evaluations must be strictly better to displace an earlier one.
fn choose(evaluations: &[RegimeTrace; 2]) -> CalculationResult {
    let [first, second] = evaluations;
    let best = if second.net_income > first.net_income {
        second
    } else {
        first
    };

    debug!(
        winner = best.regime.as_str(),
        net_income = %best.net_income,
        "regime selected"
    );

    CalculationResult {
        net_monthly_income: best.net_income,
        winning_regime: best.regime,
    }
}

/// Selects the better regime using the built-in tables.
///
/// # Errors
///
/// Returns [`CalculationError::InvalidInput`] for negative amounts.
pub fn select_best_regime(input: &CalculationInput) -> Result<CalculationResult, CalculationError> {
    RegimeSelector::new(builtin_tables())?.select(input)
}

/// [`select_best_regime`] with the full [`SelectionTrace`].
pub fn select_best_regime_traced(
    input: &CalculationInput,
) -> Result<(CalculationResult, SelectionTrace), CalculationError> {
    RegimeSelector::new(builtin_tables())?.select_traced(input)
}
