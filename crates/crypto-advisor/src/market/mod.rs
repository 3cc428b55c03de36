//! Market Data Sources
//!
//! Abstraction over where prices, history and market statistics come from.

mod mock;

pub use mock::MockMarketData;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{CryptoAsset, MarketOverview, PriceHistory, TrendingCoin};

/// Market data source trait (Strategy pattern)
///
/// Implemented by the live CoinGecko source and by the mock.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Current snapshot for a coin id
    async fn asset(&self, coin_id: &str) -> Result<CryptoAsset>;

    /// Snapshots for several coin ids, skipping the ones that fail
    async fn assets(&self, coin_ids: &[&str]) -> Result<Vec<CryptoAsset>> {
        let mut assets = Vec::new();
        for id in coin_ids {
            match self.asset(id).await {
                Ok(asset) => assets.push(asset),
                Err(e) => tracing::debug!(coin = %id, error = %e, "Skipping asset"),
            }
        }
        Ok(assets)
    }

    /// Daily price history over the last `days`
    async fn price_history(&self, coin_id: &str, days: u32) -> Result<PriceHistory>;

    /// Top assets by market cap
    async fn top_assets(&self, limit: usize) -> Result<Vec<CryptoAsset>>;

    /// Global market statistics
    async fn market_overview(&self) -> Result<MarketOverview>;

    /// Currently trending coins
    async fn trending(&self) -> Result<Vec<TrendingCoin>>;

    /// Check if the source is reachable
    async fn health_check(&self) -> bool;

    /// Source name
    fn name(&self) -> &str;
}
