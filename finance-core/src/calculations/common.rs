//! Shared helpers for derived-metric calculations.
//!
//! Rounding lives here so that every display path rounds the same way. The
//! calculator itself never rounds: formulas recombine full-precision terms
//! and only the final value is rounded, by whoever displays it.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, the usual convention
/// for currency amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use finance_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(714.285714)), dec!(714.29));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for display: rounded half-up and always showing two
/// decimal places, with no currency symbol or thousands separator.
///
/// ```
/// use rust_decimal_macros::dec;
/// use finance_core::calculations::common::display_amount;
///
/// assert_eq!(display_amount(dec!(400)), "400.00");
/// assert_eq!(display_amount(dec!(0.0225)), "0.02");
/// ```
pub fn display_amount(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
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
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_long_quotients() {
        // 500 / 0.70
        let result = round_half_up(dec!(714.28571428571428571428571429));

        assert_eq!(result, dec!(714.29));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        let result = round_half_up(dec!(999999.999));

        assert_eq!(result, dec!(1000000.00));
    }

    // =========================================================================
    // display_amount tests
    // =========================================================================

    #[test]
    fn display_amount_pads_whole_numbers() {
        assert_eq!(display_amount(dec!(900)), "900.00");
    }

    #[test]
    fn display_amount_pads_single_decimal() {
        assert_eq!(display_amount(dec!(12.5)), "12.50");
    }

    #[test]
    fn display_amount_keeps_sign() {
        assert_eq!(display_amount(dec!(-0.005)), "-0.01");
    }

    #[test]
    fn display_amount_has_no_separators() {
        assert_eq!(display_amount(dec!(1234567.891)), "1234567.89");
    }
}
