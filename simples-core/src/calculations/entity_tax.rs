//! Gross-receipts tax owed by the entity under one regime schedule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::common::monthly_share;
use super::resolver::{REVENUE_MISS, resolve};
use crate::models::{EXPORT_COMPONENTS, Regime, RegimeTable, RegimeTaxRow, TableError, TaxTables};

/// Effective entity rate and monthly deduction for one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTaxResult {
    /// Revenue tier the trailing income resolved to.
    pub bracket_index: usize,

    /// `false` when the tier came from the first-row fallback.
    pub bracket_matched: bool,

    /// Nominal rate of the tier.
    pub combined_rate: Decimal,

    /// Rate charged on monthly income. Equal to `combined_rate` unless
    /// the service is exported.
    pub rate: Decimal,

    /// The tier's annual deduction spread over twelve months.
    pub deduction_per_month: Decimal,
}

/// Calculator for the entity side of a regime.
#[derive(Debug, Clone, Copy)]
pub struct EntityTax<'a> {
    tables: &'a TaxTables,
}

impl<'a> EntityTax<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Resolves the revenue tier for `trailing_12mo_income` and reads the
    /// matching row of `regime_table`.
    ///
    /// For exported services only the [`EXPORT_COMPONENTS`] remain taxed:
    /// the rate becomes `combined_rate × (cpp + csll + irpj)`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the revenue table is empty, `regime_table`
    /// has no row at the resolved index, or an export component is missing.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use simples_core::{Regime, TaxTables};
    /// use simples_core::calculations::EntityTax;
    ///
    /// let tables = TaxTables::default();
    /// let entity = EntityTax::new(&tables);
    ///
    /// let result = entity
    ///     .calculate(
    ///         dec!(250000),
    ///         Regime::Attachment3,
    ///         tables.regime_table(Regime::Attachment3),
    ///         false,
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(result.bracket_index, 1);
    /// assert_eq!(result.rate, dec!(0.112));
    /// assert_eq!(result.deduction_per_month, dec!(780.00));
    /// ```
    pub fn calculate(
        &self,
        trailing_12mo_income: Decimal,
        regime: Regime,
        regime_table: &RegimeTable,
        is_export: bool,
    ) -> Result<EntityTaxResult, TableError> {
        let resolution = resolve(trailing_12mo_income, &self.tables.revenue, REVENUE_MISS)
            .ok_or(TableError::EmptyTable { table: "revenue" })?;
        if !resolution.matched {
            warn!(
                trailing_12mo_income = %trailing_12mo_income,
                "trailing revenue outside every tier; using first tier"
            );
        }

        let row = regime_table
            .row(resolution.index)
            .ok_or(TableError::RegimeRowCount {
                regime,
                expected: self.tables.revenue.len(),
                found: regime_table.len(),
            })?;

        let rate = if is_export {
            export_rate(regime, resolution.index, row)?
        } else {
            row.combined_rate
        };
        let deduction_per_month = monthly_share(row.fixed_deduction);

        debug!(
            regime = regime.as_str(),
            bracket = resolution.index,
            is_export,
            rate = %rate,
            deduction_per_month = %deduction_per_month,
            "entity tax"
        );

        Ok(EntityTaxResult {
            bracket_index: resolution.index,
            bracket_matched: resolution.matched,
            combined_rate: row.combined_rate,
            rate,
            deduction_per_month,
        })
    }
}

fn export_rate(
    regime: Regime,
    index: usize,
    row: &RegimeTaxRow,
) -> Result<Decimal, TableError> {
    let mut share = Decimal::ZERO;
    for component in EXPORT_COMPONENTS {
        share += row
            .component_rate(component)
            .ok_or(TableError::MissingExportComponent {
                regime,
                row: index,
                component,
            })?;
    }
    Ok(row.combined_rate * share)
}
