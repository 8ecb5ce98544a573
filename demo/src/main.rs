//! BankFX Demo Runner
//!
//! Wires the rate generator, snapshot feed, and resolver together and
//! periodically logs the live rate table.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankfx_common::CurrencyCode;
use bankfx_rates::{
    spawn_apply_loop, ChannelFeed, GeneratorConfig, RateGenerator, RateResolver,
    StaticCurrencyDirectory, StdJitter,
};

#[derive(Parser, Debug)]
#[command(name = "bankfx-demo", about = "BankFX exchange rate engine demo")]
struct Args {
    /// Generation cycle interval in milliseconds.
    #[arg(long, default_value_t = 5000)]
    interval_ms: u64,

    /// Pivot currency code.
    #[arg(long, default_value = "RUB")]
    pivot: String,

    /// Supported currencies (pivot included automatically).
    #[arg(long, value_delimiter = ',', default_value = "USD,EUR,GBP,CNY,KZT")]
    currencies: Vec<String>,

    /// Seed for the jitter source; entropy-backed when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// How often to print the rate table, in milliseconds.
    #[arg(long, default_value_t = 10000)]
    print_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let pivot = CurrencyCode::new(&args.pivot);

    let mut universe: Vec<CurrencyCode> =
        args.currencies.iter().map(CurrencyCode::new).collect();
    universe.push(pivot.clone());
    let directory = Arc::new(StaticCurrencyDirectory::new(universe));

    let config = GeneratorConfig {
        pivot: pivot.clone(),
        cycle_interval: Duration::from_millis(args.interval_ms),
        ..GeneratorConfig::default()
    };

    let jitter = match args.seed {
        Some(seed) => StdJitter::seeded(seed),
        None => StdJitter::from_entropy(),
    };

    let resolver = Arc::new(RateResolver::new(pivot.clone()));
    let (feed, rx) = ChannelFeed::channel(8);
    spawn_apply_loop(resolver.clone(), rx);
    tokio::spawn(RateGenerator::with_jitter(config, directory, jitter).run(feed));

    info!(pivot = %pivot, interval_ms = args.interval_ms, "rate engine running");

    let printer = {
        let resolver = resolver.clone();
        let print_interval = Duration::from_millis(args.print_ms);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(print_interval);
            loop {
                ticker.tick().await;
                for rate in resolver.current_rates() {
                    info!(rate = %rate, "current rate");
                }
            }
        })
    };

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    printer.abort();

    Ok(())
}
