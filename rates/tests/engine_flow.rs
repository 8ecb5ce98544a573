//! End-to-end flow: generator -> channel feed -> resolver.

use std::sync::Arc;
use std::time::Duration;

use bankfx_common::{CurrencyCode, OperationKind};
use bankfx_rates::{
    spawn_apply_loop, ChannelFeed, GeneratorConfig, RateGenerator, RateResolver,
    StaticCurrencyDirectory,
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn generator_feeds_resolver_end_to_end() {
    let directory = Arc::new(StaticCurrencyDirectory::new([
        CurrencyCode::rub(),
        CurrencyCode::usd(),
        CurrencyCode::eur(),
    ]));

    let config = GeneratorConfig {
        cycle_interval: Duration::from_millis(10),
        ..GeneratorConfig::default()
    };

    let resolver = Arc::new(RateResolver::new(CurrencyCode::rub()));
    let (feed, rx) = ChannelFeed::channel(8);
    let _apply = spawn_apply_loop(resolver.clone(), rx);
    let _generator = tokio::spawn(RateGenerator::new(config, directory).run(feed));

    // Wait for the first snapshot to land.
    let mut ready = false;
    for _ in 0..200 {
        if resolver.available_currencies().len() == 3 {
            ready = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(ready, "no snapshot applied within the deadline");

    let rate = resolver
        .get_rate(&CurrencyCode::usd(), &CurrencyCode::eur())
        .unwrap();
    assert!(rate.spread_is_coherent());

    let conversion = resolver
        .convert(
            &CurrencyCode::usd(),
            &CurrencyCode::rub(),
            dec!(100.00),
            OperationKind::Buy,
        )
        .unwrap();
    assert!(conversion.converted_amount > dec!(0));

    // Jitter is bounded at 1%, so the USD mid stays near its base of 75.
    assert!(rate.buy_rate > dec!(0));
    let usd_rub = resolver
        .get_rate(&CurrencyCode::usd(), &CurrencyCode::rub())
        .unwrap();
    assert!(usd_rub.buy_rate > dec!(73) && usd_rub.sell_rate < dec!(77));
}
