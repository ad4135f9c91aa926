//! Personal withholding on the salary share of monthly income.
//!
//! Two deductions are taken from the salary:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Social-security cut: bracket rate × salary, or ceiling × top rate at the ceiling |
//! | 2    | Income-tax base: salary − social-security cut − dependents × per-dependent deduction |
//! | 3    | Income tax: base × bracket rate − bracket deduction, bracket resolved from the base |
//! | 4    | Net salary: salary − (income tax + social-security cut) |
//!
//! Neither table is applied marginally. The resolved rate covers the whole
//! amount. Figures are not rounded, so a salary that falls between two
//! rows by a fraction of a cent still takes the fallback row.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use simples_core::TaxTables;
//! use simples_core::calculations::PersonalWithholding;
//!
//! let tables = TaxTables::default();
//! let withholding = PersonalWithholding::new(&tables);
//!
//! let result = withholding.calculate(dec!(1400.00), 0).unwrap();
//!
//! assert_eq!(result.social_security_cut, dec!(126.00));
//! assert_eq!(result.income_tax, dec!(0.00));
//! assert_eq!(result.net_personal_income, dec!(1274.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::CalculationError;
use super::resolver::{INCOME_TAX_MISS, SOCIAL_SECURITY_MISS, resolve};
use crate::models::{BracketRow, InputError, TableError, TaxTables};

/// Every figure produced while withholding from one salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingResult {
    pub personal_income: Decimal,

    /// Rate applied for social security. The top rate when capped.
    pub social_security_rate: Decimal,

    pub social_security_cut: Decimal,

    /// `true` when the salary reached the ceiling and the cut was capped.
    pub social_security_capped: bool,

    /// Base the income-tax bracket was resolved from. May be negative
    /// when dependent deductions exceed the salary.
    pub income_tax_base: Decimal,

    pub income_tax_rate: Decimal,
    pub income_tax_deduction: Decimal,

    /// `base × rate − deduction`.
    pub income_tax: Decimal,

    /// Income tax plus social-security cut.
    pub total_discounts: Decimal,

    pub net_personal_income: Decimal,
}

/// Social-security cut and the bracket it came from.
struct SocialSecurityCut {
    rate: Decimal,
    amount: Decimal,
    capped: bool,
}

/// Calculator for personal withholding against a set of [`TaxTables`].
#[derive(Debug, Clone, Copy)]
pub struct PersonalWithholding<'a> {
    tables: &'a TaxTables,
}

impl<'a> PersonalWithholding<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Runs steps 1 to 4 for `personal_income` and `dependents`.
    ///
    /// # Errors
    ///
    /// - [`CalculationError::InvalidInput`] if `personal_income` is negative.
    /// - [`CalculationError::Table`] if a withholding table is empty.
    pub fn calculate(
        &self,
        personal_income: Decimal,
        dependents: u32,
    ) -> Result<WithholdingResult, CalculationError> {
        if personal_income < Decimal::ZERO {
            return Err(InputError::NegativeAmount {
                field: "personal_income",
                value: personal_income,
            }
            .into());
        }

        let social_security = self.social_security_cut(personal_income)?;
        let income_tax_base =
            self.income_tax_base(personal_income, social_security.amount, dependents);
        let bracket = self.income_tax_bracket(income_tax_base)?;
        let income_tax = income_tax_base * bracket.rate - bracket.fixed_deduction;

        let total_discounts = income_tax + social_security.amount;
        let net_personal_income = personal_income - total_discounts;

        debug!(
            personal_income = %personal_income,
            social_security_cut = %social_security.amount,
            income_tax_base = %income_tax_base,
            income_tax_rate = %bracket.rate,
            income_tax = %income_tax,
            net_personal_income = %net_personal_income,
            "personal withholding"
        );

        Ok(WithholdingResult {
            personal_income,
            social_security_rate: social_security.rate,
            social_security_cut: social_security.amount,
            social_security_capped: social_security.capped,
            income_tax_base,
            income_tax_rate: bracket.rate,
            income_tax_deduction: bracket.fixed_deduction,
            income_tax,
            total_discounts,
            net_personal_income,
        })
    }

    /// Step 1. The ceiling check runs before any table lookup.
    fn social_security_cut(
        &self,
        personal_income: Decimal,
    ) -> Result<SocialSecurityCut, TableError> {
        let empty = TableError::EmptyTable {
            table: "social_security",
        };

        if personal_income >= self.tables.social_security_ceiling {
            let top_rate = self.tables.social_security_top_rate().ok_or(empty)?;
            return Ok(SocialSecurityCut {
                rate: top_rate,
                amount: self.tables.social_security_ceiling * top_rate,
                capped: true,
            });
        }

        let resolution = resolve(
            personal_income,
            &self.tables.social_security,
            SOCIAL_SECURITY_MISS,
        )
        .ok_or(empty)?;
        if !resolution.matched {
            warn!(
                personal_income = %personal_income,
                row = resolution.index,
                "salary outside every social-security bracket; using last row"
            );
        }

        let rate = resolution.row.rate;
        Ok(SocialSecurityCut {
            rate,
            amount: rate * personal_income,
            capped: false,
        })
    }

    /// Step 2.
    fn income_tax_base(
        &self,
        personal_income: Decimal,
        social_security_cut: Decimal,
        dependents: u32,
    ) -> Decimal {
        let dependent_deductions = Decimal::from(dependents) * self.tables.dependent_deduction;
        let base = personal_income - social_security_cut - dependent_deductions;
        if base < Decimal::ZERO {
            debug!(
                base = %base,
                dependents,
                "income-tax base is negative"
            );
        }
        base
    }

    /// Bracket for step 3.
    fn income_tax_bracket(
        &self,
        base: Decimal,
    ) -> Result<&'a BracketRow, TableError> {
        let resolution = resolve(base, &self.tables.income_tax, INCOME_TAX_MISS).ok_or(
            TableError::EmptyTable {
                table: "income_tax",
            },
        )?;
        if !resolution.matched {
            warn!(
                base = %base,
                "income-tax base outside every bracket; using first row"
            );
        }
        Ok(resolution.row)
    }
}
