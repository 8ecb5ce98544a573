//! Exchange rate and conversion value types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::currency::CurrencyCode;
use crate::rounding::round_half_up;

/// Two-sided exchange rate for a currency pair.
///
/// `buy_rate` is what the institution pays when buying the base currency,
/// `sell_rate` what it charges when selling it. Invariant: both rates are
/// positive and `buy_rate <= sell_rate`, except the identity rate where
/// both are exactly 1. Immutable once constructed; derived rates are new
/// values, never mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Base currency (the one being priced).
    pub base: CurrencyCode,
    /// Target currency (the pricing currency).
    pub target: CurrencyCode,
    /// Rate at which the institution buys the base currency.
    pub buy_rate: Decimal,
    /// Rate at which the institution sells the base currency.
    pub sell_rate: Decimal,
}

impl ExchangeRate {
    /// Create a new exchange rate.
    pub fn new(
        base: CurrencyCode,
        target: CurrencyCode,
        buy_rate: Decimal,
        sell_rate: Decimal,
    ) -> Self {
        Self {
            base,
            target,
            buy_rate,
            sell_rate,
        }
    }

    /// The identity rate for a self-pair: buy = sell = 1.
    pub fn identity(code: CurrencyCode) -> Self {
        Self {
            base: code.clone(),
            target: code,
            buy_rate: Decimal::ONE,
            sell_rate: Decimal::ONE,
        }
    }

    /// Derive the `target -> base` rate from this one.
    ///
    /// Buy and sell swap because the spread direction reverses: the
    /// inverted buy is `1 / sell` and the inverted sell is `1 / buy`,
    /// each rounded half-up to `scale` places. Requires both sides of
    /// this rate to be positive.
    pub fn inverted(&self, scale: u32) -> Self {
        Self {
            base: self.target.clone(),
            target: self.base.clone(),
            buy_rate: round_half_up(Decimal::ONE / self.sell_rate, scale),
            sell_rate: round_half_up(Decimal::ONE / self.buy_rate, scale),
        }
    }

    /// Check the buy/sell ordering invariant.
    pub fn spread_is_coherent(&self) -> bool {
        self.buy_rate > Decimal::ZERO
            && self.sell_rate > Decimal::ZERO
            && self.buy_rate <= self.sell_rate
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}/{}",
            self.base, self.target, self.buy_rate, self.sell_rate
        )
    }
}

/// Which side of a two-sided rate a conversion uses.
///
/// An explicit input to every conversion call, never inferred from the
/// currencies involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    /// The caller sells the source currency; the buy rate applies.
    Buy,
    /// The caller acquires the source currency; the sell rate applies.
    Sell,
}

impl OperationKind {
    /// Pick the applicable side of a rate.
    pub fn pick(&self, rate: &ExchangeRate) -> Decimal {
        match self {
            OperationKind::Buy => rate.buy_rate,
            OperationKind::Sell => rate.sell_rate,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Buy => write!(f, "BUY"),
            OperationKind::Sell => write!(f, "SELL"),
        }
    }
}

/// Numeric outcome of a single conversion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Input amount.
    pub amount: Decimal,
    /// Converted amount, rounded to the monetary scale.
    pub converted_amount: Decimal,
    /// Rate factor that was applied.
    pub rate: Decimal,
}

/// Best-effort audit record handed to the operation sink after a conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Unique record ID.
    pub id: Uuid,
    /// Source currency.
    pub from: CurrencyCode,
    /// Target currency.
    pub to: CurrencyCode,
    /// Which rate side was applied.
    pub operation: OperationKind,
    /// The numeric outcome.
    pub result: ConversionResult,
    /// When the conversion was executed.
    pub executed_at: DateTime<Utc>,
}

impl ConversionRecord {
    /// Create a new record for a completed conversion.
    pub fn new(
        from: CurrencyCode,
        to: CurrencyCode,
        operation: OperationKind,
        result: ConversionResult,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            from,
            to,
            operation,
            result,
            executed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_identity_rate() {
        let rate = ExchangeRate::identity(CurrencyCode::usd());
        assert_eq!(rate.buy_rate, Decimal::ONE);
        assert_eq!(rate.sell_rate, Decimal::ONE);
        assert_eq!(rate.base, rate.target);
    }

    #[test]
    fn test_inversion_swaps_sides() {
        let rate = ExchangeRate::new(
            CurrencyCode::usd(),
            CurrencyCode::rub(),
            dec!(75.0),
            dec!(76.0),
        );

        let inverted = rate.inverted(4);

        assert_eq!(inverted.base, CurrencyCode::rub());
        assert_eq!(inverted.target, CurrencyCode::usd());
        // buy = 1/76, sell = 1/75
        assert_eq!(inverted.buy_rate, dec!(0.0132));
        assert_eq!(inverted.sell_rate, dec!(0.0133));
        assert!(inverted.spread_is_coherent());
    }

    #[test]
    fn test_operation_kind_picks_side() {
        let rate = ExchangeRate::new(
            CurrencyCode::usd(),
            CurrencyCode::rub(),
            dec!(75.0),
            dec!(76.0),
        );

        assert_eq!(OperationKind::Buy.pick(&rate), dec!(75.0));
        assert_eq!(OperationKind::Sell.pick(&rate), dec!(76.0));
    }

    #[test]
    fn test_spread_coherence() {
        let bad = ExchangeRate::new(
            CurrencyCode::usd(),
            CurrencyCode::rub(),
            dec!(76.0),
            dec!(75.0),
        );
        assert!(!bad.spread_is_coherent());
    }
}
