//! Currency directory port.
//!
//! The directory is an external collaborator that owns the universe of
//! supported currencies. The generator consults it every cycle; a failing
//! directory degrades that cycle, never the resolver's existing snapshot.

use async_trait::async_trait;
use bankfx_common::CurrencyCode;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from the currency directory collaborator.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory service could not be reached.
    #[error("currency directory unavailable: {0}")]
    Unavailable(String),

    /// The code is not part of the supported universe.
    #[error("unknown currency: {0}")]
    UnknownCurrency(CurrencyCode),
}

/// Directory of supported currencies.
#[async_trait]
pub trait CurrencyDirectory: Send + Sync {
    /// List every supported currency code.
    async fn list_supported(&self) -> Result<Vec<CurrencyCode>, DirectoryError>;

    /// Check whether a code is part of the supported universe.
    async fn is_valid(&self, code: &CurrencyCode) -> Result<bool, DirectoryError>;
}

/// Fixed in-memory directory.
#[derive(Debug, Clone)]
pub struct StaticCurrencyDirectory {
    supported: BTreeSet<CurrencyCode>,
}

impl StaticCurrencyDirectory {
    /// Create a directory over a fixed set of codes.
    pub fn new(codes: impl IntoIterator<Item = CurrencyCode>) -> Self {
        Self {
            supported: codes.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CurrencyDirectory for StaticCurrencyDirectory {
    async fn list_supported(&self) -> Result<Vec<CurrencyCode>, DirectoryError> {
        Ok(self.supported.iter().cloned().collect())
    }

    async fn is_valid(&self, code: &CurrencyCode) -> Result<bool, DirectoryError> {
        Ok(self.supported.contains(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_directory() {
        let directory = StaticCurrencyDirectory::new([
            CurrencyCode::usd(),
            CurrencyCode::eur(),
        ]);

        let listed = directory.list_supported().await.unwrap();
        assert_eq!(listed, vec![CurrencyCode::eur(), CurrencyCode::usd()]);

        assert!(directory.is_valid(&CurrencyCode::usd()).await.unwrap());
        assert!(!directory.is_valid(&CurrencyCode::new("ZZZ")).await.unwrap());
    }
}
