//! Mock Market Data
//!
//! For testing and demo purposes. Returns realistic static snapshots and a
//! deterministic synthetic price history.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use super::MarketDataSource;
use crate::error::{AdvisorError, Result};
use crate::model::{CryptoAsset, MarketOverview, PriceHistory, PricePoint, TrendingCoin};

/// Mock source with static prices
pub struct MockMarketData {
    /// Daily swing of the synthetic history (%)
    swing_percent: f64,

    /// Per-coin replacements, for tests
    overrides: HashMap<String, CryptoAsset>,

    /// Fail every call as if the upstream were down
    offline: bool,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            swing_percent: 1.0,
            overrides: HashMap::new(),
            offline: false,
        }
    }

    /// Create with a larger daily swing (drives volatility up)
    pub fn with_swing(swing_percent: f64) -> Self {
        Self {
            swing_percent,
            ..Self::new()
        }
    }

    /// Replace or add the snapshot for one coin
    pub fn with_asset(mut self, asset: CryptoAsset) -> Self {
        self.overrides.insert(asset.id.clone(), asset);
        self
    }

    /// A source whose every call fails with `DataUnavailable`
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }

    /// (symbol, name, price, 24h, 7d, 30d, rank, market cap in billions)
    #[allow(clippy::type_complexity)]
    fn base_asset(id: &str) -> Option<(&'static str, &'static str, Decimal, f64, f64, f64, u32, Decimal)> {
        match id {
            "bitcoin" => Some(("BTC", "Bitcoin", dec!(97500), 2.5, 6.1, 12.4, 1, dec!(1930))),
            "ethereum" => Some(("ETH", "Ethereum", dec!(3450), 1.8, 4.2, 9.0, 2, dec!(415))),
            "solana" => Some(("SOL", "Solana", dec!(195), 4.2, 9.5, 21.0, 5, dec!(94))),
            "cardano" => Some(("ADA", "Cardano", dec!(0.95), -1.2, 3.4, 15.2, 9, dec!(33))),
            "avalanche-2" => Some(("AVAX", "Avalanche", dec!(42.00), 5.5, 8.0, 18.3, 12, dec!(17))),
            "chainlink" => Some(("LINK", "Chainlink", dec!(24.50), 3.1, 5.6, 11.7, 13, dec!(15))),
            "polkadot" => Some(("DOT", "Polkadot", dec!(7.20), 0.8, -2.1, 4.5, 15, dec!(11))),
            "litecoin" => Some(("LTC", "Litecoin", dec!(105), 1.5, 2.0, 3.3, 19, dec!(8))),
            "matic-network" => Some(("MATIC", "Polygon", dec!(0.52), -0.5, -3.8, -6.0, 24, dec!(5))),
            "algorand" => Some(("ALGO", "Algorand", dec!(0.36), 2.2, 1.1, 8.4, 48, dec!(3))),
            "dogecoin" => Some(("DOGE", "Dogecoin", dec!(0.38), 12.0, 18.5, 40.2, 7, dec!(56))),
            _ => None,
        }
    }

    fn lookup(&self, coin_id: &str) -> Result<CryptoAsset> {
        if self.offline {
            return Err(AdvisorError::DataUnavailable("mock source is offline".into()));
        }

        let id = coin_id.to_lowercase();
        if let Some(asset) = self.overrides.get(&id) {
            return Ok(asset.clone());
        }

        let (symbol, name, price, c24, c7, c30, rank, cap_billions) =
            Self::base_asset(&id).ok_or_else(|| AdvisorError::NotFound(coin_id.to_string()))?;

        let market_cap = cap_billions * dec!(1000000000);
        Ok(CryptoAsset::new(id, symbol, name, price)
            .with_changes(c24, c7, c30)
            .with_rank(rank)
            .with_market(market_cap / dec!(20), market_cap))
    }

    fn all_ids() -> [&'static str; 11] {
        [
            "bitcoin",
            "ethereum",
            "solana",
            "dogecoin",
            "cardano",
            "avalanche-2",
            "chainlink",
            "polkadot",
            "litecoin",
            "matic-network",
            "algorand",
        ]
    }
}

#[async_trait]
impl MarketDataSource for MockMarketData {
    async fn asset(&self, coin_id: &str) -> Result<CryptoAsset> {
        self.lookup(coin_id)
    }

    async fn price_history(&self, coin_id: &str, days: u32) -> Result<PriceHistory> {
        let asset = self.lookup(coin_id)?;
        let current = asset.price_usd.to_f64().unwrap_or_default();

        // Walk backwards from the current price along the 30d trend, with
        // an alternating swing so volatility is non-zero
        let n = days.max(1) as usize + 1;
        let daily_trend = asset.change_30d / 30.0 / 100.0;
        let swing = self.swing_percent / 100.0;
        let now = Utc::now();

        let points = (0..n)
            .map(|i| {
                let back = (n - 1 - i) as i32;
                let base = current / (1.0 + daily_trend).powi(back);
                let wobble = if back == 0 {
                    1.0
                } else if back % 2 == 0 {
                    1.0 + swing
                } else {
                    1.0 - swing
                };
                PricePoint {
                    timestamp: now - Duration::days(i64::from(back)),
                    price: base * wobble,
                }
            })
            .collect();

        Ok(PriceHistory::new(asset.id, days, points))
    }

    async fn top_assets(&self, limit: usize) -> Result<Vec<CryptoAsset>> {
        let mut assets = Self::all_ids()
            .iter()
            .map(|id| self.lookup(id))
            .collect::<Result<Vec<_>>>()?;
        for extra in self.overrides.values() {
            if !assets.iter().any(|a| a.id == extra.id) {
                assets.push(extra.clone());
            }
        }
        assets.sort_by_key(CryptoAsset::effective_rank);
        assets.truncate(limit);
        Ok(assets)
    }

    async fn market_overview(&self) -> Result<MarketOverview> {
        if self.offline {
            return Err(AdvisorError::DataUnavailable("mock source is offline".into()));
        }
        Ok(MarketOverview {
            total_market_cap_billions: 3420.5,
            total_volume_billions: 128.3,
            market_cap_change_24h: 1.6,
            btc_dominance: 56.4,
            eth_dominance: 12.1,
        })
    }

    async fn trending(&self) -> Result<Vec<TrendingCoin>> {
        if self.offline {
            return Err(AdvisorError::DataUnavailable("mock source is offline".into()));
        }
        Ok(["solana", "dogecoin", "algorand"]
            .iter()
            .filter_map(|id| self.lookup(id).ok())
            .map(|a| TrendingCoin {
                id: a.id,
                name: a.name,
                symbol: a.symbol,
                market_cap_rank: a.market_cap_rank,
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        !self.offline
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TechnicalMetrics;

    #[tokio::test]
    async fn test_mock_asset() {
        let source = MockMarketData::new();

        let btc = source.asset("bitcoin").await.unwrap();
        assert_eq!(btc.symbol, "BTC");
        assert!(btc.price_usd > Decimal::ZERO);
        assert_eq!(btc.market_cap_rank, Some(1));
    }

    #[tokio::test]
    async fn test_unknown_coin_not_found() {
        let source = MockMarketData::new();
        let result = source.asset("notreal").await;
        assert!(matches!(result, Err(AdvisorError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_history_ends_at_current_price() {
        let source = MockMarketData::new();
        let history = source.price_history("ethereum", 30).await.unwrap();
        assert_eq!(history.len(), 31);
        assert_eq!(history.latest(), Some(3450.0));

        let metrics = TechnicalMetrics::from_history(&history);
        assert!(metrics.volatility > 0.0);
        assert!(metrics.momentum_30d > 0.0);
    }

    #[tokio::test]
    async fn test_swing_drives_volatility() {
        let calm = MockMarketData::new().price_history("bitcoin", 30).await.unwrap();
        let wild = MockMarketData::with_swing(30.0).price_history("bitcoin", 30).await.unwrap();
        let calm = TechnicalMetrics::from_history(&calm).volatility;
        let wild = TechnicalMetrics::from_history(&wild).volatility;
        assert!(wild > calm * 5.0);
    }

    #[tokio::test]
    async fn test_top_assets_sorted_by_rank() {
        let top = MockMarketData::new().top_assets(3).await.unwrap();
        let ranks: Vec<_> = top.iter().map(|a| a.effective_rank()).collect();
        assert_eq!(ranks, vec![1, 2, 5]);
    }

    #[tokio::test]
    async fn test_offline() {
        let source = MockMarketData::offline();
        assert!(!source.health_check().await);
        assert!(source.asset("bitcoin").await.unwrap_err().is_unavailable());
    }
}
