//! Rate cache and query engine.
//!
//! The resolver owns the pivot-relative rate table fed by the generator and
//! answers direct, inverted, and cross-pair rate queries plus amount
//! conversions. The table is published as a whole: every snapshot replaces
//! the previous one atomically, so concurrent readers always see one
//! internally consistent batch.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use bankfx_common::{
    round_amount, round_cross, round_half_up, ConversionResult, CurrencyCode, ExchangeRate,
    OperationKind, RATE_SCALE,
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{RateError, RateResult};

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// The pivot currency all cached rates are quoted against.
    pub pivot: CurrencyCode,
    /// Extra spread fraction applied to each direction of a cross rate.
    pub cross_spread: Decimal,
    /// Decimal places for published rates.
    pub rate_scale: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            pivot: CurrencyCode::rub(),
            cross_spread: Decimal::new(5, 3), // 0.5%
            rate_scale: RATE_SCALE,
        }
    }
}

/// One published generation of the rate table.
///
/// Immutable once swapped in; readers hold an `Arc` to it and are unaffected
/// by later snapshots.
#[derive(Debug)]
struct TableSnapshot {
    pivot_rates: HashMap<CurrencyCode, ExchangeRate>,
    known: BTreeSet<CurrencyCode>,
}

impl TableSnapshot {
    fn empty(pivot: &CurrencyCode) -> Self {
        let mut known = BTreeSet::new();
        known.insert(pivot.clone());
        Self {
            pivot_rates: HashMap::new(),
            known,
        }
    }
}

/// Thread-safe rate resolver with atomic snapshot replacement.
pub struct RateResolver {
    config: ResolverConfig,
    table: RwLock<Arc<TableSnapshot>>,
}

impl RateResolver {
    /// Create a resolver for the given pivot with default spread and scale.
    pub fn new(pivot: CurrencyCode) -> Self {
        Self::with_config(ResolverConfig {
            pivot,
            ..ResolverConfig::default()
        })
    }

    /// Create a resolver with custom configuration.
    pub fn with_config(config: ResolverConfig) -> Self {
        let initial = Arc::new(TableSnapshot::empty(&config.pivot));
        Self {
            config,
            table: RwLock::new(initial),
        }
    }

    /// The pivot currency.
    pub fn pivot(&self) -> &CurrencyCode {
        &self.config.pivot
    }

    /// Replace the whole rate table with a new batch.
    ///
    /// Only entries quoted against the pivot are cached, keyed by base
    /// currency. The known set is rebuilt as the union of every base and
    /// target in the batch, plus the pivot unconditionally. An empty batch
    /// is valid and collapses the known set to just the pivot.
    pub fn apply_snapshot(&self, batch: Vec<ExchangeRate>) {
        let mut pivot_rates = HashMap::with_capacity(batch.len());
        let mut known = BTreeSet::new();
        known.insert(self.config.pivot.clone());

        for rate in batch {
            known.insert(rate.base.clone());
            known.insert(rate.target.clone());
            if rate.target == self.config.pivot {
                pivot_rates.insert(rate.base.clone(), rate);
            }
        }

        let next = Arc::new(TableSnapshot { pivot_rates, known });
        debug!(
            currencies = next.known.len(),
            rates = next.pivot_rates.len(),
            "applied rate snapshot"
        );
        *self.table.write() = next;
    }

    /// Resolve the rate for an arbitrary currency pair.
    ///
    /// Direct pivot pairs come straight from the cache, `pivot -> X` pairs
    /// are derived by inversion, and non-pivot pairs are composed through
    /// the pivot with an extra spread on top. The whole resolution runs
    /// against a single snapshot, so a concurrent swap cannot mix
    /// generations. Note that `A -> B` and `B -> A` each gain their own
    /// cross spread and are not exact reciprocals.
    pub fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> RateResult<ExchangeRate> {
        let snapshot = self.snapshot();
        self.rate_in(&snapshot, from, to)
    }

    /// Convert an amount between two currencies.
    ///
    /// The operation kind selects which side of the rate applies; the
    /// monetary result is rounded to 2 places half-up. A self-pair
    /// short-circuits to the rounded amount at rate 1 without touching the
    /// cache. Amount sign is not validated here; callers own that check.
    pub fn convert(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
        kind: OperationKind,
    ) -> RateResult<ConversionResult> {
        if from == to {
            return Ok(ConversionResult {
                amount,
                converted_amount: round_amount(amount),
                rate: Decimal::ONE,
            });
        }

        let rate = self.get_rate(from, to)?;
        let factor = kind.pick(&rate);

        Ok(ConversionResult {
            amount,
            converted_amount: round_amount(amount * factor),
            rate: factor,
        })
    }

    /// Point-in-time listing of all cached pivot-relative rates.
    ///
    /// Empty before the first snapshot. Sorted by base currency for stable
    /// output.
    pub fn current_rates(&self) -> Vec<ExchangeRate> {
        let snapshot = self.snapshot();
        let mut rates: Vec<ExchangeRate> = snapshot.pivot_rates.values().cloned().collect();
        rates.sort_by(|a, b| a.base.cmp(&b.base));
        rates
    }

    /// Sorted listing of all currently known currencies.
    pub fn available_currencies(&self) -> Vec<CurrencyCode> {
        self.snapshot().known.iter().cloned().collect()
    }

    fn snapshot(&self) -> Arc<TableSnapshot> {
        self.table.read().clone()
    }

    fn rate_in(
        &self,
        snapshot: &TableSnapshot,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> RateResult<ExchangeRate> {
        for code in [from, to] {
            if !snapshot.known.contains(code) {
                return Err(RateError::UnsupportedCurrency {
                    code: code.clone(),
                    known: snapshot.known.iter().cloned().collect(),
                });
            }
        }

        if from == to {
            return Ok(ExchangeRate::identity(from.clone()));
        }

        let pivot = &self.config.pivot;

        if to == pivot {
            return snapshot
                .pivot_rates
                .get(from)
                .cloned()
                .ok_or_else(|| RateError::RateNotFound(from.clone()));
        }

        if from == pivot {
            return snapshot
                .pivot_rates
                .get(to)
                .map(|rate| rate.inverted(self.config.rate_scale))
                .ok_or_else(|| RateError::RateNotFound(to.clone()));
        }

        // Cross rate through the pivot, within the same snapshot.
        let from_rate = self.rate_in(snapshot, from, pivot)?;
        let to_rate = self.rate_in(snapshot, to, pivot)?;

        let cross_buy = round_cross(from_rate.buy_rate / to_rate.sell_rate);
        let cross_sell = round_cross(from_rate.sell_rate / to_rate.buy_rate);

        let spread = self.config.cross_spread;
        let buy = round_half_up(cross_buy * (Decimal::ONE - spread), self.config.rate_scale);
        let sell = round_half_up(cross_sell * (Decimal::ONE + spread), self.config.rate_scale);

        Ok(ExchangeRate::new(from.clone(), to.clone(), buy, sell))
    }
}
