//! BankFX Common Types
//!
//! Shared value types for the BankFX exchange rate engine: currency codes,
//! two-sided exchange rates, conversion results, and the rounding policy
//! used everywhere rates and amounts are published.

pub mod currency;
pub mod rate;
pub mod rounding;

pub use currency::*;
pub use rate::*;
pub use rounding::*;
