//! Bracket lookup shared by the social-security, income-tax and revenue
//! tables.
//!
//! Rows are scanned in ascending order and the first row whose inclusive
//! bounds contain the value wins, so a value sitting exactly on a boundary
//! shared by two rows always resolves to the earlier row.
//!
//! A value that falls in no row (negative, or inside a gap between two
//! rows such as `1100.005` in the social-security table) does not fail.
//! It resolves to the row named by the table's [`MissPolicy`]. The
//! policies differ per table and must stay that way: social security falls
//! back to the last row, income tax and revenue fall back to the first.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BracketBounds;

/// Which row a lookup returns when no row contains the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissPolicy {
    FirstRow,
    LastRow,
}

/// Fallback used for the social-security table.
pub const SOCIAL_SECURITY_MISS: MissPolicy = MissPolicy::LastRow;

/// Fallback used for the income-tax table.
pub const INCOME_TAX_MISS: MissPolicy = MissPolicy::FirstRow;

/// Fallback used for the trailing revenue table.
pub const REVENUE_MISS: MissPolicy = MissPolicy::FirstRow;

/// The row a value resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a, R> {
    pub index: usize,
    pub row: &'a R,
    /// `false` when the row came from the [`MissPolicy`] fallback.
    pub matched: bool,
}

/// Finds the row of `table` that contains `value`.
///
/// Returns `None` only when `table` is empty.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::TaxTables;
/// use simples_core::calculations::resolver::{MissPolicy, resolve};
///
/// let tables = TaxTables::default();
///
/// // 1903.98 closes row 0 and opens row 1; the earlier row wins.
/// let hit = resolve(dec!(1903.98), &tables.income_tax, MissPolicy::FirstRow).unwrap();
/// assert_eq!(hit.index, 0);
///
/// // 1100.005 sits in the gap between rows 0 and 1.
/// let miss = resolve(dec!(1100.005), &tables.social_security, MissPolicy::LastRow).unwrap();
/// assert_eq!(miss.index, 3);
/// assert!(!miss.matched);
/// ```
pub fn resolve<R: BracketBounds>(
    value: Decimal,
    table: &[R],
    on_miss: MissPolicy,
) -> Option<Resolution<'_, R>> {
    if let Some((index, row)) = table.iter().enumerate().find(|(_, row)| row.contains(value)) {
        return Some(Resolution {
            index,
            row,
            matched: true,
        });
    }

    let index = match on_miss {
        MissPolicy::FirstRow => 0,
        MissPolicy::LastRow => table.len().checked_sub(1)?,
    };
    table.get(index).map(|row| Resolution {
        index,
        row,
        matched: false,
    })
}
