//! Rate engine error types.

use bankfx_common::CurrencyCode;
use thiserror::Error;

/// Errors surfaced to rate and conversion callers.
///
/// Generation-side failures never appear here; they are contained in the
/// generator and the resolver keeps serving its last consistent snapshot.
#[derive(Debug, Error)]
pub enum RateError {
    /// The referenced currency is outside the resolver's current known set.
    #[error(
        "unsupported currency {code}; known currencies: [{}]",
        .known.iter().map(CurrencyCode::as_str).collect::<Vec<_>>().join(", ")
    )]
    UnsupportedCurrency {
        code: CurrencyCode,
        known: Vec<CurrencyCode>,
    },

    /// The currency is known but no pivot-relative rate is currently cached.
    #[error("no rate cached for {0}")]
    RateNotFound(CurrencyCode),
}

/// Result type for resolver queries.
pub type RateResult<T> = Result<T, RateError>;
