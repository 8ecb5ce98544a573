//! Currency code type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Short uppercase currency identifier (ISO 4217 style).
///
/// Codes are normalized to ASCII uppercase at construction, so two codes
/// that differ only in case compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a new currency code from any case.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Get the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Common currencies
    pub fn rub() -> Self {
        Self::new("RUB")
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn cny() -> Self {
        Self::new("CNY")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_to_uppercase() {
        assert_eq!(CurrencyCode::new("usd"), CurrencyCode::new("USD"));
        assert_eq!(CurrencyCode::new("Eur").as_str(), "EUR");
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(CurrencyCode::new("EUR") < CurrencyCode::new("USD"));
    }
}
