use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive lower and upper bounds shared by every bracket-shaped row.
///
/// An upper bound of `None` is unbounded.
pub trait BracketBounds {
    fn lower_bound(&self) -> Decimal;

    fn upper_bound(&self) -> Option<Decimal>;

    /// Returns `true` when `lower_bound <= value <= upper_bound`.
    fn contains(
        &self,
        value: Decimal,
    ) -> bool {
        self.lower_bound() <= value && self.upper_bound().is_none_or(|upper| value <= upper)
    }
}

/// A personal withholding bracket (income tax or social security).
///
/// `rate` applies to the whole amount resolved into this row, not just the
/// slice above `lower_bound`. `fixed_deduction` is zero for social security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRow {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    #[serde(default)]
    pub fixed_deduction: Decimal,
}

impl BracketRow {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
        fixed_deduction: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
            fixed_deduction,
        }
    }
}

impl BracketBounds for BracketRow {
    fn lower_bound(&self) -> Decimal {
        self.lower_bound
    }

    fn upper_bound(&self) -> Option<Decimal> {
        self.upper_bound
    }
}

/// A trailing twelve-month revenue range. Carries no rate of its own; its
/// index selects the row of a [`RegimeTable`](crate::RegimeTable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBracketRow {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
}

impl RevenueBracketRow {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
        }
    }
}

impl BracketBounds for RevenueBracketRow {
    fn lower_bound(&self) -> Decimal {
        self.lower_bound
    }

    fn upper_bound(&self) -> Option<Decimal> {
        self.upper_bound
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn contains_includes_both_bounds() {
        let row = BracketRow::new(dec!(100.00), Some(dec!(200.00)), dec!(0.10), dec!(0));

        assert!(row.contains(dec!(100.00)));
        assert!(row.contains(dec!(200.00)));
        assert!(!row.contains(dec!(99.99)));
        assert!(!row.contains(dec!(200.01)));
    }

    #[test]
    fn contains_treats_missing_upper_bound_as_unbounded() {
        let row = RevenueBracketRow::new(dec!(0), None);

        assert!(row.contains(dec!(999999999999)));
        assert!(!row.contains(dec!(-0.01)));
    }
}
