//! Rounding policy for rates and monetary amounts.
//!
//! Every published figure in the engine is rounded half-up
//! (midpoint away from zero): buy/sell rates to [`RATE_SCALE`] places,
//! intermediate cross-rate quotients to [`CROSS_SCALE`] places, and
//! monetary conversion results to [`MONEY_SCALE`] places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for published buy/sell rates.
pub const RATE_SCALE: u32 = 4;

/// Decimal places for intermediate cross-rate quotients.
pub const CROSS_SCALE: u32 = 6;

/// Decimal places for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Round half-up to the given number of decimal places.
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a rate to the published rate scale.
pub fn round_rate(value: Decimal) -> Decimal {
    round_half_up(value, RATE_SCALE)
}

/// Round an intermediate cross-rate quotient.
pub fn round_cross(value: Decimal) -> Decimal {
    round_half_up(value, CROSS_SCALE)
}

/// Round a monetary amount.
pub fn round_amount(value: Decimal) -> Decimal {
    round_half_up(value, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_up_at_midpoint() {
        // Banker's rounding would give 0.1184; half-up must give 0.1185.
        assert_eq!(round_half_up(dec!(0.11845), 4), dec!(0.1185));
        assert_eq!(round_half_up(dec!(2.345), 2), dec!(2.35));
    }

    #[test]
    fn test_cross_scale() {
        let quotient = dec!(90.0) / dec!(76.0);
        assert_eq!(round_cross(quotient), dec!(1.184211));
    }

    #[test]
    fn test_amount_scale() {
        assert_eq!(round_amount(dec!(7500.004)), dec!(7500.00));
        assert_eq!(round_amount(dec!(7500.005)), dec!(7500.01));
    }
}
