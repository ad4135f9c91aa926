//! Shared arithmetic for the withholding and regime calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of months an annual table amount is spread over.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Rounds a currency amount to cents, half away from zero.
///
/// Applied once, to the final net income. Intermediate figures keep full
/// precision so bracket lookups see the exact value.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(900.6998)), dec!(900.70));
/// assert_eq!(round_half_up(dec!(533.5875)), dec!(533.59));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Spreads an annual amount evenly across twelve months.
pub fn monthly_share(annual: Decimal) -> Decimal {
    annual / MONTHS_PER_YEAR
}

/// `part` as a percentage of `whole`.
///
/// Returns zero when `whole` is zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::calculations::common::percentage_of;
///
/// assert_eq!(percentage_of(dec!(126.00), dec!(1400.00)), dec!(9));
/// assert_eq!(percentage_of(dec!(10), dec!(0)), dec!(0));
/// ```
pub fn percentage_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part / whole * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(204.8845));

        assert_eq!(result, dec!(204.88));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(29682.945));

        assert_eq!(result, dec!(29682.95));
    }

    #[test]
    fn round_half_up_handles_zero() {
        let result = round_half_up(dec!(0));

        assert_eq!(result, dec!(0.00));
    }

    // =========================================================================
    // monthly_share tests
    // =========================================================================

    #[test]
    fn monthly_share_divides_annual_deduction() {
        let result = monthly_share(dec!(9360));

        assert_eq!(result, dec!(780.00));
    }

    #[test]
    fn monthly_share_keeps_fraction_of_a_cent() {
        let result = monthly_share(dec!(100));

        assert_eq!(result.round_dp(6), dec!(8.333333));
        assert!(result > dec!(8.33));
    }

    #[test]
    fn months_per_year_is_twelve() {
        assert_eq!(MONTHS_PER_YEAR, dec!(12));
    }

    // =========================================================================
    // percentage_of tests
    // =========================================================================

    #[test]
    fn percentage_of_scales_to_hundred() {
        let result = percentage_of(dec!(1), dec!(8));

        assert_eq!(result, dec!(12.5));
    }

    #[test]
    fn percentage_of_zero_whole_is_zero() {
        let result = percentage_of(dec!(50), dec!(0));

        assert_eq!(result, Decimal::ZERO);
    }
}
