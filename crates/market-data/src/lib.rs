//! # market-data
//!
//! Cached, rate-limited CoinGecko client and the live `MarketDataSource`
//! used by the advisor.
//!
//! ## Layers
//!
//! - [`Transport`]: raw HTTP GET and JSON decode (reqwest)
//! - [`DataFetcher`]: TTL response cache, one-call-per-interval throttle,
//!   stale fallback, typed endpoint methods
//! - [`CoinGeckoSource`]: wire models mapped onto domain types

pub mod cache;
pub mod coingecko;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod throttle;
pub mod transport;
pub mod wire;

pub use cache::{CacheStats, ResponseCache};
pub use coingecko::CoinGeckoSource;
pub use config::FetcherConfig;
pub use error::{FetchError, Result};
pub use fetcher::DataFetcher;
pub use throttle::Throttle;
pub use transport::{ReqwestTransport, Transport};
