//! Snapshot feed between generator and resolver.
//!
//! One-way, at-least-once, latest-wins: the resolver only ever replaces its
//! table with whatever batch arrives, so duplicated or dropped batches are
//! harmless as long as each one is internally consistent.

use std::sync::Arc;

use async_trait::async_trait;
use bankfx_common::ExchangeRate;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::resolver::RateResolver;

/// Sink for generated rate batches.
#[async_trait]
pub trait SnapshotFeed: Send + Sync {
    /// Publish a complete batch.
    async fn publish(&self, batch: Vec<ExchangeRate>);
}

/// Channel-backed feed.
pub struct ChannelFeed {
    tx: mpsc::Sender<Vec<ExchangeRate>>,
}

impl ChannelFeed {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::Sender<Vec<ExchangeRate>>) -> Self {
        Self { tx }
    }

    /// Create a bounded feed together with its receiving end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Vec<ExchangeRate>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SnapshotFeed for ChannelFeed {
    async fn publish(&self, batch: Vec<ExchangeRate>) {
        if self.tx.send(batch).await.is_err() {
            warn!("snapshot receiver dropped, discarding batch");
        }
    }
}

/// Feed that applies batches straight into a resolver.
pub struct DirectFeed {
    resolver: Arc<RateResolver>,
}

impl DirectFeed {
    /// Create a feed over the given resolver.
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl SnapshotFeed for DirectFeed {
    async fn publish(&self, batch: Vec<ExchangeRate>) {
        self.resolver.apply_snapshot(batch);
    }
}

/// Spawn the resolver-side apply loop for a channel feed.
///
/// Batches are applied in arrival order; the task ends when the sending
/// side is dropped.
pub fn spawn_apply_loop(
    resolver: Arc<RateResolver>,
    mut rx: mpsc::Receiver<Vec<ExchangeRate>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(batch) = rx.recv().await {
            resolver.apply_snapshot(batch);
        }
        debug!("snapshot feed closed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankfx_common::CurrencyCode;
    use rust_decimal_macros::dec;

    fn usd_batch() -> Vec<ExchangeRate> {
        vec![ExchangeRate::new(
            CurrencyCode::usd(),
            CurrencyCode::rub(),
            dec!(75.0),
            dec!(76.0),
        )]
    }

    #[tokio::test]
    async fn test_channel_feed_reaches_resolver() {
        let resolver = Arc::new(RateResolver::new(CurrencyCode::rub()));
        let (feed, rx) = ChannelFeed::channel(4);
        let apply = spawn_apply_loop(resolver.clone(), rx);

        feed.publish(usd_batch()).await;
        drop(feed);
        apply.await.unwrap();

        let rate = resolver
            .get_rate(&CurrencyCode::usd(), &CurrencyCode::rub())
            .unwrap();
        assert_eq!(rate.buy_rate, dec!(75.0));
    }

    #[tokio::test]
    async fn test_direct_feed_applies_immediately() {
        let resolver = Arc::new(RateResolver::new(CurrencyCode::rub()));
        let feed = DirectFeed::new(resolver.clone());

        feed.publish(usd_batch()).await;

        assert_eq!(resolver.current_rates().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_to_dropped_receiver_is_harmless() {
        let (feed, rx) = ChannelFeed::channel(1);
        drop(rx);

        feed.publish(usd_batch()).await;
    }
}
