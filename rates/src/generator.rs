//! Periodic rate generation against the pivot currency.
//!
//! Every cycle produces one pivot-relative rate per supported non-pivot
//! currency: a deterministic base rate perturbed by bounded random jitter,
//! with a symmetric spread around the resulting mid. The whole batch is
//! handed to the snapshot feed; the resolver replaces its table with it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bankfx_common::{round_rate, CurrencyCode, ExchangeRate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

use crate::directory::CurrencyDirectory;
use crate::feed::SnapshotFeed;

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// The pivot currency every rate is quoted against.
    pub pivot: CurrencyCode,
    /// Base rates to the pivot for known currencies.
    pub base_rates: HashMap<CurrencyCode, Decimal>,
    /// Base rate used for currencies absent from the table.
    pub fallback_rate: Decimal,
    /// Spread fraction applied symmetrically around the mid rate.
    pub spread: Decimal,
    /// Jitter bound: the mid multiplier is uniform in [1 - b, 1 + b].
    pub jitter_bound: f64,
    /// Interval between generation cycles.
    pub cycle_interval: Duration,
    /// Directory listing attempts per cycle.
    pub max_attempts: u32,
    /// Backoff between directory retries, scaled linearly by attempt.
    pub retry_backoff: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pivot: CurrencyCode::rub(),
            base_rates: default_base_rates(),
            fallback_rate: Decimal::ONE,
            spread: Decimal::new(5, 3), // 0.5%
            jitter_bound: 0.01,
            cycle_interval: Duration::from_secs(5),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// Default base rates to the ruble pivot.
pub fn default_base_rates() -> HashMap<CurrencyCode, Decimal> {
    HashMap::from([
        (CurrencyCode::usd(), Decimal::new(75, 0)),
        (CurrencyCode::eur(), Decimal::new(90, 0)),
        (CurrencyCode::new("GBP"), Decimal::new(105, 0)),
        (CurrencyCode::cny(), Decimal::new(115, 1)),
        (CurrencyCode::new("KZT"), Decimal::new(17, 2)),
    ])
}

/// Source of bounded uniform jitter.
///
/// Injectable so generation is deterministically testable with a seeded or
/// fixed-sequence source.
pub trait JitterSource: Send {
    /// Sample uniformly from [-bound, bound].
    fn sample(&mut self, bound: f64) -> f64;
}

/// Jitter backed by the standard RNG.
pub struct StdJitter(StdRng);

impl StdJitter {
    /// Entropy-seeded jitter.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Deterministically seeded jitter.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl JitterSource for StdJitter {
    fn sample(&mut self, bound: f64) -> f64 {
        if bound <= 0.0 {
            return 0.0;
        }
        self.0.gen_range(-bound..=bound)
    }
}

/// Periodic rate generator.
pub struct RateGenerator<J = StdJitter> {
    config: GeneratorConfig,
    directory: Arc<dyn CurrencyDirectory>,
    jitter: J,
}

impl RateGenerator<StdJitter> {
    /// Create a generator with entropy-backed jitter.
    pub fn new(config: GeneratorConfig, directory: Arc<dyn CurrencyDirectory>) -> Self {
        Self::with_jitter(config, directory, StdJitter::from_entropy())
    }
}

impl<J: JitterSource> RateGenerator<J> {
    /// Create a generator with an explicit jitter source.
    pub fn with_jitter(
        config: GeneratorConfig,
        directory: Arc<dyn CurrencyDirectory>,
        jitter: J,
    ) -> Self {
        Self {
            config,
            directory,
            jitter,
        }
    }

    /// Produce one pivot-relative rate for a single currency.
    pub fn rate_for(&mut self, code: &CurrencyCode) -> ExchangeRate {
        let base = self
            .config
            .base_rates
            .get(code)
            .copied()
            .unwrap_or(self.config.fallback_rate);

        let jitter = self.jitter.sample(self.config.jitter_bound);
        let factor = Decimal::ONE + Decimal::from_f64_retain(jitter).unwrap_or_default();

        let mid = round_rate(base * factor);
        let spread_amount = mid * self.config.spread;

        ExchangeRate::new(
            code.clone(),
            self.config.pivot.clone(),
            round_rate(mid - spread_amount),
            round_rate(mid + spread_amount),
        )
    }

    /// Produce one full generation batch.
    ///
    /// The directory listing is retried with bounded backoff; on exhaustion
    /// the cycle degrades to an empty batch so the scheduler never stalls.
    /// Unrecognized currencies are skipped for the cycle; partial batches
    /// are valid.
    pub async fn generate_batch(&mut self) -> Vec<ExchangeRate> {
        let Some(currencies) = self.list_currencies().await else {
            return Vec::new();
        };

        let mut batch = Vec::with_capacity(currencies.len());
        for code in currencies {
            if code == self.config.pivot {
                continue;
            }
            match self.directory.is_valid(&code).await {
                Ok(true) => batch.push(self.rate_for(&code)),
                Ok(false) => {
                    warn!(currency = %code, "directory rejected currency, skipping for this cycle");
                }
                Err(e) => {
                    warn!(currency = %code, error = %e, "currency validation failed, skipping for this cycle");
                }
            }
        }
        batch
    }

    /// Run the generation loop, publishing a batch every cycle.
    ///
    /// Cycles are serialized: each tick awaits generation and publication
    /// before the next may fire, so snapshot publications never race.
    pub async fn run(mut self, feed: impl SnapshotFeed) {
        let mut ticker = tokio::time::interval(self.config.cycle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let batch = self.generate_batch().await;
            debug!(rates = batch.len(), "generated rate batch");
            feed.publish(batch).await;
        }
    }

    async fn list_currencies(&self) -> Option<Vec<CurrencyCode>> {
        for attempt in 1..=self.config.max_attempts {
            match self.directory.list_supported().await {
                Ok(currencies) => return Some(currencies),
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        error = %e,
                        "currency directory listing failed"
                    );
                    if attempt < self.config.max_attempts {
                        tokio::time::sleep(self.config.retry_backoff * attempt).await;
                    }
                }
            }
        }
        error!(
            attempts = self.config.max_attempts,
            "currency directory unavailable, emitting empty batch"
        );
        None
    }
}
