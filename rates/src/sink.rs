//! Best-effort operation logging.
//!
//! After a conversion produces its numeric result, an external sink is
//! notified with a [`ConversionRecord`]. Sink failures are logged and
//! swallowed: they must never invalidate a result that was already
//! computed correctly.

use std::sync::Arc;

use async_trait::async_trait;
use bankfx_common::{ConversionRecord, ConversionResult, CurrencyCode, OperationKind};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::RateResult;
use crate::resolver::RateResolver;

/// Downstream sink for completed conversions.
#[async_trait]
pub trait OperationSink: Send + Sync {
    /// Record a completed conversion.
    async fn record(&self, record: &ConversionRecord) -> anyhow::Result<()>;
}

/// Sink that discards records.
pub struct NoopSink;

#[async_trait]
impl OperationSink for NoopSink {
    async fn record(&self, _record: &ConversionRecord) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Sink that emits each record as structured JSON at info level.
pub struct TracingSink;

#[async_trait]
impl OperationSink for TracingSink {
    async fn record(&self, record: &ConversionRecord) -> anyhow::Result<()> {
        let payload = serde_json::to_string(record)?;
        info!(operation = %payload, "conversion recorded");
        Ok(())
    }
}

/// Conversion front-end that notifies the operation sink.
pub struct ConversionService {
    resolver: Arc<RateResolver>,
    sink: Arc<dyn OperationSink>,
}

impl ConversionService {
    /// Create a service over a resolver and sink.
    pub fn new(resolver: Arc<RateResolver>, sink: Arc<dyn OperationSink>) -> Self {
        Self { resolver, sink }
    }

    /// Convert an amount and record the operation downstream.
    ///
    /// The numeric result is computed first; a failing sink is logged and
    /// ignored.
    pub async fn convert(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
        kind: OperationKind,
    ) -> RateResult<ConversionResult> {
        let result = self.resolver.convert(from, to, amount, kind)?;

        let record = ConversionRecord::new(from.clone(), to.clone(), kind, result.clone());
        if let Err(e) = self.sink.record(&record).await {
            warn!(
                record_id = %record.id,
                error = %e,
                "operation sink failed, keeping conversion result"
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankfx_common::ExchangeRate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FailingSink {
        calls: AtomicU32,
    }

    #[async_trait]
    impl OperationSink for FailingSink {
        async fn record(&self, _record: &ConversionRecord) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("operation store unreachable"))
        }
    }

    fn seeded_resolver() -> Arc<RateResolver> {
        let resolver = Arc::new(RateResolver::new(CurrencyCode::rub()));
        resolver.apply_snapshot(vec![ExchangeRate::new(
            CurrencyCode::usd(),
            CurrencyCode::rub(),
            dec!(75.0),
            dec!(76.0),
        )]);
        resolver
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_conversion() {
        let sink = Arc::new(FailingSink {
            calls: AtomicU32::new(0),
        });
        let service = ConversionService::new(seeded_resolver(), sink.clone());

        let result = service
            .convert(
                &CurrencyCode::usd(),
                &CurrencyCode::rub(),
                dec!(100.00),
                OperationKind::Buy,
            )
            .await
            .unwrap();

        assert_eq!(result.converted_amount, dec!(7500.00));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolver_error_skips_sink() {
        let sink = Arc::new(FailingSink {
            calls: AtomicU32::new(0),
        });
        let service = ConversionService::new(seeded_resolver(), sink.clone());

        let result = service
            .convert(
                &CurrencyCode::new("ZZZ"),
                &CurrencyCode::rub(),
                dec!(100.00),
                OperationKind::Buy,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }
}
