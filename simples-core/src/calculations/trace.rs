//! Structured record of every intermediate figure behind a result.
//!
//! Building a trace has no side effects; callers that want the detail ask
//! for it through [`RegimeSelector::select_traced`](super::RegimeSelector::select_traced)
//! and decide how to present it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity_tax::EntityTaxResult;
use super::regime::PersonalIncomeRule;
use super::withholding::WithholdingResult;
use crate::models::{CalculationInput, CalculationResult, Regime};

/// Where the salary share of a regime evaluation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalIncomeSource {
    /// The caller supplied a positive salary.
    Override,
    /// The regime's default rule produced it.
    Default(PersonalIncomeRule),
}

/// Evaluation of one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeTrace {
    pub regime: Regime,
    pub personal_income: Decimal,
    pub personal_income_source: PersonalIncomeSource,
    pub withholding: WithholdingResult,

    /// Personal discounts as a percentage of the salary, unrounded.
    pub percentage_discounted: Decimal,

    pub entity: EntityTaxResult,

    /// Monthly income × entity rate.
    pub entity_tax: Decimal,

    pub net_income: Decimal,
}

/// Both regime evaluations and the choice made between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTrace {
    pub input: CalculationInput,

    /// In evaluation order: Attachment 3, then Attachment 5.
    pub evaluations: [RegimeTrace; 2],

    pub result: CalculationResult,
}

impl SelectionTrace {
    pub fn evaluation(
        &self,
        regime: Regime,
    ) -> Option<&RegimeTrace> {
        self.evaluations.iter().find(|e| e.regime == regime)
    }
}
