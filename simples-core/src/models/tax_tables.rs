//! Rate tables and scalar constants the engine runs against.
//!
//! [`TaxTables::default`] carries the built-in schedules. Alternate tables
//! (another tax year, test fixtures) are plain values of the same type and
//! must pass [`TaxTables::validate`] before use.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    BracketBounds, BracketRow, EXPORT_COMPONENTS, Regime, RegimeTable, RegimeTaxRow,
    RevenueBracketRow, TaxComponent,
};

/// Number of trailing revenue tiers every regime table must line up with.
pub const REVENUE_BRACKET_COUNT: usize = 6;

/// A table set that cannot be used for calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("{table} table has no rows")]
    EmptyTable { table: &'static str },

    #[error("{table} row {row} has an upper bound below its lower bound")]
    InvertedBounds { table: &'static str, row: usize },

    #[error("{table} row {row} is unbounded but is not the last row")]
    UnboundedInnerRow { table: &'static str, row: usize },

    #[error("{table} row {row} starts below the end of the previous row")]
    OverlappingRows { table: &'static str, row: usize },

    #[error("{table} row {row} has rate {rate} outside [0, 1]")]
    RateOutOfRange {
        table: &'static str,
        row: usize,
        rate: Decimal,
    },

    #[error("{table} row {row} has negative deduction {value}")]
    NegativeDeduction {
        table: &'static str,
        row: usize,
        value: Decimal,
    },

    #[error("revenue table must have {expected} rows, found {found}")]
    RevenueRowCount { expected: usize, found: usize },

    #[error("{regime} table must have {expected} rows to match the revenue table, found {found}")]
    RegimeRowCount {
        regime: Regime,
        expected: usize,
        found: usize,
    },

    #[error("{regime} row {row} is missing the {component} component")]
    MissingExportComponent {
        regime: Regime,
        row: usize,
        component: TaxComponent,
    },

    #[error("{field} has invalid value {value}")]
    InvalidScalar { field: &'static str, value: Decimal },
}

/// Every table and constant needed to evaluate both regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    /// Statutory monthly minimum wage. Default salary under Attachment 5.
    pub minimum_wage: Decimal,

    /// Payroll-to-revenue ratio. Default salary share under Attachment 3.
    pub r_factor_threshold: Decimal,

    /// Income-tax base reduction per dependent.
    pub dependent_deduction: Decimal,

    /// Salary at or above which the social-security cut is capped.
    pub social_security_ceiling: Decimal,

    pub income_tax: Vec<BracketRow>,
    pub social_security: Vec<BracketRow>,
    pub revenue: Vec<RevenueBracketRow>,
    pub attachment_3: RegimeTable,
    pub attachment_5: RegimeTable,
}

impl TaxTables {
    pub fn regime_table(
        &self,
        regime: Regime,
    ) -> &RegimeTable {
        match regime {
            Regime::Attachment3 => &self.attachment_3,
            Regime::Attachment5 => &self.attachment_5,
        }
    }

    /// Rate of the last social-security row, used for the capped cut.
    pub fn social_security_top_rate(&self) -> Option<Decimal> {
        self.social_security.last().map(|row| row.rate)
    }

    /// Checks table shape, rates and the regime/revenue alignment.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] found. Checks run in field order:
    /// scalars, income tax, social security, revenue, then each regime.
    pub fn validate(&self) -> Result<(), TableError> {
        validate_scalar("minimum_wage", self.minimum_wage, |v| v > Decimal::ZERO)?;
        validate_scalar("r_factor_threshold", self.r_factor_threshold, is_fraction)?;
        validate_scalar("dependent_deduction", self.dependent_deduction, |v| {
            v >= Decimal::ZERO
        })?;
        validate_scalar("social_security_ceiling", self.social_security_ceiling, |v| {
            v > Decimal::ZERO
        })?;

        validate_rated_brackets("income_tax", &self.income_tax)?;
        validate_rated_brackets("social_security", &self.social_security)?;

        validate_bounds("revenue", &self.revenue)?;
        if self.revenue.len() != REVENUE_BRACKET_COUNT {
            return Err(TableError::RevenueRowCount {
                expected: REVENUE_BRACKET_COUNT,
                found: self.revenue.len(),
            });
        }

        for regime in Regime::ALL {
            self.validate_regime(regime)?;
        }
        Ok(())
    }

    fn validate_regime(
        &self,
        regime: Regime,
    ) -> Result<(), TableError> {
        let table = self.regime_table(regime);
        if table.len() != self.revenue.len() {
            return Err(TableError::RegimeRowCount {
                regime,
                expected: self.revenue.len(),
                found: table.len(),
            });
        }

        let name = regime.as_str();
        for (index, row) in table.rows().iter().enumerate() {
            validate_rate(name, index, row.combined_rate)?;
            validate_deduction(name, index, row.fixed_deduction)?;
            for rate in row.component_rates.values() {
                validate_rate(name, index, *rate)?;
            }
            if let Some(component) = EXPORT_COMPONENTS
                .into_iter()
                .find(|c| !row.component_rates.contains_key(c))
            {
                return Err(TableError::MissingExportComponent {
                    regime,
                    row: index,
                    component,
                });
            }
        }
        Ok(())
    }
}

fn is_fraction(value: Decimal) -> bool {
    (Decimal::ZERO..=Decimal::ONE).contains(&value)
}

fn validate_scalar(
    field: &'static str,
    value: Decimal,
    is_valid: impl Fn(Decimal) -> bool,
) -> Result<(), TableError> {
    if is_valid(value) {
        Ok(())
    } else {
        Err(TableError::InvalidScalar { field, value })
    }
}

fn validate_rate(
    table: &'static str,
    row: usize,
    rate: Decimal,
) -> Result<(), TableError> {
    if is_fraction(rate) {
        Ok(())
    } else {
        Err(TableError::RateOutOfRange { table, row, rate })
    }
}

fn validate_deduction(
    table: &'static str,
    row: usize,
    value: Decimal,
) -> Result<(), TableError> {
    if value < Decimal::ZERO {
        return Err(TableError::NegativeDeduction { table, row, value });
    }
    Ok(())
}

/// Rows must be non-empty, ascending and non-overlapping. A row may start
/// exactly where the previous one ends; the earlier row wins that value.
fn validate_bounds<R: BracketBounds>(
    table: &'static str,
    rows: &[R],
) -> Result<(), TableError> {
    if rows.is_empty() {
        return Err(TableError::EmptyTable { table });
    }

    let mut previous_upper: Option<Decimal> = None;
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            match previous_upper {
                None => {
                    return Err(TableError::UnboundedInnerRow {
                        table,
                        row: index - 1,
                    });
                }
                Some(upper) if row.lower_bound() < upper => {
                    return Err(TableError::OverlappingRows { table, row: index });
                }
                Some(_) => {}
            }
        }
        if let Some(upper) = row.upper_bound() {
            if upper < row.lower_bound() {
                return Err(TableError::InvertedBounds { table, row: index });
            }
        }
        previous_upper = row.upper_bound();
    }
    Ok(())
}

fn validate_rated_brackets(
    table: &'static str,
    rows: &[BracketRow],
) -> Result<(), TableError> {
    validate_bounds(table, rows)?;
    for (index, row) in rows.iter().enumerate() {
        validate_rate(table, index, row.rate)?;
        validate_deduction(table, index, row.fixed_deduction)?;
    }
    Ok(())
}

static BUILTIN: LazyLock<TaxTables> = LazyLock::new(TaxTables::default);

/// Process-wide read-only copy of [`TaxTables::default`].
pub fn builtin_tables() -> &'static TaxTables {
    &BUILTIN
}

impl Default for TaxTables {
    fn default() -> Self {
        Self {
            minimum_wage: dec!(1212.00),
            r_factor_threshold: dec!(0.28),
            dependent_deduction: dec!(189.59),
            social_security_ceiling: dec!(6433.57),
            income_tax: vec![
                BracketRow::new(dec!(0), Some(dec!(1903.98)), dec!(0), dec!(0)),
                BracketRow::new(dec!(1903.98), Some(dec!(2826.65)), dec!(0.075), dec!(142.80)),
                BracketRow::new(dec!(2826.66), Some(dec!(3751.05)), dec!(0.15), dec!(354.80)),
                BracketRow::new(dec!(3751.06), Some(dec!(4664.68)), dec!(0.225), dec!(636.13)),
                BracketRow::new(dec!(4664.69), None, dec!(0.275), dec!(869.36)),
            ],
            social_security: vec![
                BracketRow::new(dec!(0), Some(dec!(1100.00)), dec!(0.075), dec!(0)),
                BracketRow::new(dec!(1100.01), Some(dec!(2203.48)), dec!(0.09), dec!(0)),
                BracketRow::new(dec!(2203.49), Some(dec!(3305.22)), dec!(0.12), dec!(0)),
                BracketRow::new(dec!(3305.23), Some(dec!(6433.57)), dec!(0.14), dec!(0)),
            ],
            revenue: vec![
                RevenueBracketRow::new(dec!(0), Some(dec!(180000))),
                RevenueBracketRow::new(dec!(180000.01), Some(dec!(360000))),
                RevenueBracketRow::new(dec!(360000.01), Some(dec!(720000))),
                RevenueBracketRow::new(dec!(720000.01), Some(dec!(1800000))),
                RevenueBracketRow::new(dec!(1800000.01), Some(dec!(3600000))),
                RevenueBracketRow::new(dec!(3600000.01), Some(dec!(4800000))),
            ],
            attachment_3: RegimeTable::new(vec![
                RegimeTaxRow::new(
                    dec!(0.06),
                    dec!(0),
                    [
                        dec!(0.434),
                        dec!(0.335),
                        dec!(0.035),
                        dec!(0.04),
                        dec!(0.128),
                        dec!(0.0278),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.112),
                    dec!(9360),
                    [
                        dec!(0.434),
                        dec!(0.32),
                        dec!(0.035),
                        dec!(0.04),
                        dec!(0.128),
                        dec!(0.0305),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.135),
                    dec!(17640),
                    [
                        dec!(0.434),
                        dec!(0.325),
                        dec!(0.035),
                        dec!(0.04),
                        dec!(0.128),
                        dec!(0.0296),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.16),
                    dec!(35640),
                    [
                        dec!(0.434),
                        dec!(0.325),
                        dec!(0.035),
                        dec!(0.04),
                        dec!(0.128),
                        dec!(0.0296),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.21),
                    dec!(125640),
                    [
                        dec!(0.434),
                        dec!(0.335),
                        dec!(0.035),
                        dec!(0.04),
                        dec!(0.128),
                        dec!(0.0278),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.33),
                    dec!(648000),
                    [
                        dec!(0.434),
                        dec!(0),
                        dec!(0.15),
                        dec!(0.35),
                        dec!(0.1603),
                        dec!(0.0347),
                    ],
                ),
            ]),
            attachment_5: RegimeTable::new(vec![
                RegimeTaxRow::new(
                    dec!(0.155),
                    dec!(0),
                    [
                        dec!(0.2885),
                        dec!(0.14),
                        dec!(0.15),
                        dec!(0.25),
                        dec!(0.141),
                        dec!(0.0305),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.18),
                    dec!(4500),
                    [
                        dec!(0.2785),
                        dec!(0.17),
                        dec!(0.15),
                        dec!(0.23),
                        dec!(0.141),
                        dec!(0.0305),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.195),
                    dec!(9900),
                    [
                        dec!(0.2385),
                        dec!(0.19),
                        dec!(0.15),
                        dec!(0.24),
                        dec!(0.1492),
                        dec!(0.0323),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.205),
                    dec!(17100),
                    [
                        dec!(0.2385),
                        dec!(0.21),
                        dec!(0.15),
                        dec!(0.21),
                        dec!(0.1574),
                        dec!(0.0341),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.23),
                    dec!(62100),
                    [
                        dec!(0.2385),
                        dec!(0.235),
                        dec!(0.125),
                        dec!(0.23),
                        dec!(0.141),
                        dec!(0.0305),
                    ],
                ),
                RegimeTaxRow::new(
                    dec!(0.305),
                    dec!(540000),
                    [
                        dec!(0.295),
                        dec!(0),
                        dec!(0.155),
                        dec!(0.35),
                        dec!(0.1644),
                        dec!(0.0356),
                    ],
                ),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // Built-in tables
    // =========================================================================

    #[test]
    fn default_tables_are_valid() {
        let tables = TaxTables::default();

        assert_eq!(tables.validate(), Ok(()));
    }

    #[test]
    fn builtin_tables_match_default() {
        assert_eq!(builtin_tables(), &TaxTables::default());
    }

    #[test]
    fn social_security_top_rate_is_last_row_rate() {
        let tables = TaxTables::default();

        assert_eq!(tables.social_security_top_rate(), Some(dec!(0.14)));
    }

    #[test]
    fn regime_tables_line_up_with_revenue_table() {
        let tables = TaxTables::default();

        assert_eq!(tables.attachment_3.len(), REVENUE_BRACKET_COUNT);
        assert_eq!(tables.attachment_5.len(), REVENUE_BRACKET_COUNT);
    }

    // =========================================================================
    // validate: regime alignment
    // =========================================================================

    #[test]
    fn validate_rejects_short_regime_table() {
        let mut tables = TaxTables::default();
        let mut rows = tables.attachment_5.rows().to_vec();
        rows.pop();
        tables.attachment_5 = RegimeTable::new(rows);

        assert_eq!(
            tables.validate(),
            Err(TableError::RegimeRowCount {
                regime: Regime::Attachment5,
                expected: 6,
                found: 5,
            })
        );
    }

    #[test]
    fn validate_rejects_revenue_table_with_wrong_row_count() {
        let mut tables = TaxTables::default();
        tables.revenue.push(RevenueBracketRow::new(dec!(4800000.01), None));

        assert_eq!(
            tables.validate(),
            Err(TableError::RevenueRowCount {
                expected: 6,
                found: 7,
            })
        );
    }

    #[test]
    fn validate_rejects_regime_row_without_export_component() {
        let mut tables = TaxTables::default();
        let mut rows = tables.attachment_3.rows().to_vec();
        rows[2].component_rates.remove(&TaxComponent::Csll);
        tables.attachment_3 = RegimeTable::new(rows);

        assert_eq!(
            tables.validate(),
            Err(TableError::MissingExportComponent {
                regime: Regime::Attachment3,
                row: 2,
                component: TaxComponent::Csll,
            })
        );
    }

    #[test]
    fn validate_rejects_component_rate_above_one() {
        let mut tables = TaxTables::default();
        let mut rows = tables.attachment_5.rows().to_vec();
        rows[0].component_rates.insert(TaxComponent::Iss, dec!(1.4));
        tables.attachment_5 = RegimeTable::new(rows);

        assert_eq!(
            tables.validate(),
            Err(TableError::RateOutOfRange {
                table: "attachment_5",
                row: 0,
                rate: dec!(1.4),
            })
        );
    }

    // =========================================================================
    // validate: bracket shape
    // =========================================================================

    #[test]
    fn validate_rejects_empty_income_tax_table() {
        let tables = TaxTables {
            income_tax: Vec::new(),
            ..TaxTables::default()
        };

        assert_eq!(
            tables.validate(),
            Err(TableError::EmptyTable { table: "income_tax" })
        );
    }

    #[test]
    fn validate_rejects_overlapping_rows() {
        let mut tables = TaxTables::default();
        tables.social_security[1].lower_bound = dec!(1000.00);

        assert_eq!(
            tables.validate(),
            Err(TableError::OverlappingRows {
                table: "social_security",
                row: 1,
            })
        );
    }

    #[test]
    fn validate_accepts_rows_sharing_a_boundary() {
        let tables = TaxTables::default();

        // Row 1 of the income-tax table starts where row 0 ends.
        assert_eq!(tables.income_tax[0].upper_bound, Some(tables.income_tax[1].lower_bound));
        assert_eq!(tables.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_unbounded_inner_row() {
        let mut tables = TaxTables::default();
        tables.income_tax[2].upper_bound = None;

        assert_eq!(
            tables.validate(),
            Err(TableError::UnboundedInnerRow {
                table: "income_tax",
                row: 2,
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let mut tables = TaxTables::default();
        tables.revenue[0].upper_bound = Some(dec!(-1));

        assert_eq!(
            tables.validate(),
            Err(TableError::InvertedBounds {
                table: "revenue",
                row: 0,
            })
        );
    }

    #[test]
    fn validate_rejects_negative_bracket_deduction() {
        let mut tables = TaxTables::default();
        tables.income_tax[3].fixed_deduction = dec!(-636.13);

        assert_eq!(
            tables.validate(),
            Err(TableError::NegativeDeduction {
                table: "income_tax",
                row: 3,
                value: dec!(-636.13),
            })
        );
    }

    // =========================================================================
    // validate: scalars
    // =========================================================================

    #[test]
    fn validate_rejects_zero_minimum_wage() {
        let tables = TaxTables {
            minimum_wage: dec!(0),
            ..TaxTables::default()
        };

        assert_eq!(
            tables.validate(),
            Err(TableError::InvalidScalar {
                field: "minimum_wage",
                value: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_r_factor_above_one() {
        let tables = TaxTables {
            r_factor_threshold: dec!(1.28),
            ..TaxTables::default()
        };

        assert_eq!(
            tables.validate(),
            Err(TableError::InvalidScalar {
                field: "r_factor_threshold",
                value: dec!(1.28),
            })
        );
    }
}
