//! BankFX Rate Engine
//!
//! Live exchange rate generation and resolution for the BankFX demo bank.
//!
//! # Features
//!
//! - Periodic rate generation against a single pivot currency with
//!   random-walk jitter and a configurable spread
//! - Atomic snapshot publication into the resolver cache
//! - Direct, inverted, and cross-pair rate resolution through the pivot
//! - Amount conversion with best-effort operation logging
//!
//! # Example
//!
//! ```rust,ignore
//! use bankfx_rates::{RateGenerator, GeneratorConfig, RateResolver, DirectFeed};
//! use bankfx_common::{CurrencyCode, OperationKind};
//! use std::sync::Arc;
//!
//! let resolver = Arc::new(RateResolver::new(CurrencyCode::rub()));
//! let generator = RateGenerator::new(GeneratorConfig::default(), directory);
//!
//! tokio::spawn(generator.run(DirectFeed::new(resolver.clone())));
//!
//! let rate = resolver.get_rate(&"USD".into(), &"EUR".into())?;
//! let result = resolver.convert(&"USD".into(), &"RUB".into(), amount, OperationKind::Buy)?;
//! ```

pub mod directory;
pub mod error;
pub mod feed;
pub mod generator;
pub mod resolver;
pub mod sink;

pub use directory::{CurrencyDirectory, DirectoryError, StaticCurrencyDirectory};
pub use error::{RateError, RateResult};
pub use feed::{spawn_apply_loop, ChannelFeed, DirectFeed, SnapshotFeed};
pub use generator::{GeneratorConfig, JitterSource, RateGenerator, StdJitter};
pub use resolver::{ResolverConfig, RateResolver};
pub use sink::{ConversionService, NoopSink, OperationSink, TracingSink};
