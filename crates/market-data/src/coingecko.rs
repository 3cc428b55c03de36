//! CoinGecko Market Data Source
//!
//! Maps the fetcher's wire models onto the advisor's domain types.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crypto_advisor::model::{CryptoAsset, MarketOverview, PriceHistory, PricePoint, TrendingCoin};
use crypto_advisor::{AdvisorError, MarketDataSource};

use crate::error::FetchError;
use crate::fetcher::DataFetcher;
use crate::wire::{CoinDetail, GlobalData, MarketChart, MarketEntry, MarketsQuery};

const VS_CURRENCY: &str = "usd";
const BILLION: f64 = 1e9;

fn money(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Not-found errors name the coin rather than the endpoint path
fn for_coin(err: FetchError, coin_id: &str) -> AdvisorError {
    if err.is_not_found() {
        AdvisorError::NotFound(coin_id.to_string())
    } else {
        err.into()
    }
}

/// A 404 on a market-wide endpoint means the upstream moved, not a missing coin
fn market_wide(err: FetchError) -> AdvisorError {
    if err.is_not_found() {
        AdvisorError::DataUnavailable(err.to_string())
    } else {
        err.into()
    }
}

fn asset_from_detail(detail: CoinDetail) -> Result<CryptoAsset, AdvisorError> {
    let market = detail
        .market_data
        .ok_or_else(|| AdvisorError::DataUnavailable(format!("no market data for {}", detail.id)))?;

    let price = market
        .current_price
        .get(VS_CURRENCY)
        .copied()
        .ok_or_else(|| AdvisorError::DataUnavailable(format!("no USD price for {}", detail.id)))?;

    let mut asset = CryptoAsset::new(detail.id, detail.symbol, detail.name, money(price)).with_changes(
        market.price_change_percentage_24h.unwrap_or_default(),
        market.price_change_percentage_7d.unwrap_or_default(),
        market.price_change_percentage_30d.unwrap_or_default(),
    );

    asset.volume_24h = market.total_volume.get(VS_CURRENCY).copied().map(money).unwrap_or_default();
    asset.market_cap = market.market_cap.get(VS_CURRENCY).copied().map(money);
    asset.market_cap_rank = market.market_cap_rank.or(detail.market_cap_rank);
    Ok(asset)
}

fn asset_from_market(entry: MarketEntry) -> CryptoAsset {
    let change_24h = entry
        .price_change_percentage_24h_in_currency
        .or(entry.price_change_percentage_24h)
        .unwrap_or_default();

    let mut asset = CryptoAsset::new(
        entry.id,
        entry.symbol,
        entry.name,
        money(entry.current_price.unwrap_or_default()),
    )
    .with_changes(
        change_24h,
        entry.price_change_percentage_7d_in_currency.unwrap_or_default(),
        entry.price_change_percentage_30d_in_currency.unwrap_or_default(),
    );

    asset.volume_24h = entry.total_volume.map(money).unwrap_or_default();
    asset.market_cap = entry.market_cap.map(money);
    asset.market_cap_rank = entry.market_cap_rank;
    asset
}

fn history_from_chart(coin_id: &str, days: u32, chart: &MarketChart) -> PriceHistory {
    #[allow(clippy::cast_possible_truncation)]
    let points = chart
        .prices
        .iter()
        .filter_map(|[ms, price]| {
            DateTime::<Utc>::from_timestamp_millis(*ms as i64).map(|timestamp| PricePoint {
                timestamp,
                price: *price,
            })
        })
        .collect();

    PriceHistory::new(coin_id, days, points)
}

fn overview_from_global(data: &GlobalData) -> MarketOverview {
    let usd = |map: &std::collections::HashMap<String, f64>| map.get(VS_CURRENCY).copied().unwrap_or_default();
    let share = |key: &str| data.market_cap_percentage.get(key).copied().unwrap_or_default();

    MarketOverview {
        total_market_cap_billions: usd(&data.total_market_cap) / BILLION,
        total_volume_billions: usd(&data.total_volume) / BILLION,
        market_cap_change_24h: data.market_cap_change_percentage_24h_usd,
        btc_dominance: share("btc"),
        eth_dominance: share("eth"),
    }
}

/// Live source backed by the cached CoinGecko fetcher
#[derive(Debug, Clone)]
pub struct CoinGeckoSource {
    fetcher: Arc<DataFetcher>,
}

impl CoinGeckoSource {
    pub const fn new(fetcher: Arc<DataFetcher>) -> Self {
        Self { fetcher }
    }

    /// Underlying fetcher, for cache maintenance
    pub fn fetcher(&self) -> Arc<DataFetcher> {
        Arc::clone(&self.fetcher)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoSource {
    async fn asset(&self, coin_id: &str) -> crypto_advisor::Result<CryptoAsset> {
        let detail = self
            .fetcher
            .coin(coin_id)
            .await
            .map_err(|e| for_coin(e, coin_id))?;
        asset_from_detail(detail)
    }

    async fn price_history(&self, coin_id: &str, days: u32) -> crypto_advisor::Result<PriceHistory> {
        let chart = self
            .fetcher
            .market_chart(coin_id, VS_CURRENCY, days)
            .await
            .map_err(|e| for_coin(e, coin_id))?;
        Ok(history_from_chart(coin_id, days, &chart))
    }

    async fn top_assets(&self, limit: usize) -> crypto_advisor::Result<Vec<CryptoAsset>> {
        let entries = self
            .fetcher
            .coins_markets(&MarketsQuery::top(limit))
            .await
            .map_err(market_wide)?;
        Ok(entries.into_iter().map(asset_from_market).collect())
    }

    async fn market_overview(&self) -> crypto_advisor::Result<MarketOverview> {
        let global = self.fetcher.global().await.map_err(market_wide)?;
        Ok(overview_from_global(&global.data))
    }

    async fn trending(&self) -> crypto_advisor::Result<Vec<TrendingCoin>> {
        let trending = self.fetcher.trending().await.map_err(market_wide)?;
        Ok(trending
            .coins
            .into_iter()
            .map(|entry| TrendingCoin {
                id: entry.item.id,
                name: entry.item.name,
                symbol: entry.item.symbol.to_uppercase(),
                market_cap_rank: entry.item.market_cap_rank,
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        self.fetcher.ping().await
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::tests::fetcher;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn source() -> (Arc<crate::fetcher::tests::FakeTransport>, CoinGeckoSource) {
        let (transport, fetcher) = fetcher();
        (transport, CoinGeckoSource::new(Arc::new(fetcher)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_asset_from_coin_detail() {
        let (transport, source) = source();
        transport.respond(
            "coins/cardano",
            json!({
                "id": "cardano",
                "symbol": "ada",
                "name": "Cardano",
                "market_cap_rank": 9,
                "market_data": {
                    "current_price": {"usd": 0.95},
                    "market_cap": {"usd": 33_500_000_000.0},
                    "total_volume": {"usd": 900_000_000.0},
                    "price_change_percentage_24h": 3.2,
                    "price_change_percentage_7d": 8.5,
                    "price_change_percentage_30d": -4.0
                }
            }),
        );

        let asset = source.asset("cardano").await.unwrap();
        assert_eq!(asset.symbol, "ADA");
        assert_eq!(asset.price_usd, dec!(0.95));
        assert_eq!(asset.market_cap_rank, Some(9));
        assert_eq!(asset.volume_24h, dec!(900000000));
        assert!((asset.change_7d - 8.5).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_coin_not_found() {
        let (_, source) = source();
        let err = source.asset("notacoin").await.unwrap_err();
        assert!(matches!(err, AdvisorError::NotFound(ref c) if c == "notacoin"));
        assert!(err.user_message().contains("notacoin"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_down_is_unavailable() {
        let (transport, source) = source();
        transport.fail_with(FetchError::Connect("refused".into()));

        let err = source.market_overview().await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(!source.health_check().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_market_wide_404_is_unavailable() {
        let (_, source) = source();
        assert!(matches!(
            source.market_overview().await,
            Err(AdvisorError::DataUnavailable(_))
        ));
        assert!(matches!(
            source.top_assets(5).await,
            Err(AdvisorError::DataUnavailable(_))
        ));
        assert!(matches!(
            source.trending().await,
            Err(AdvisorError::DataUnavailable(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_market_data() {
        let (transport, source) = source();
        transport.respond("coins/ghost", json!({"id": "ghost", "symbol": "gst", "name": "Ghost"}));
        assert!(matches!(
            source.asset("ghost").await,
            Err(AdvisorError::DataUnavailable(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_price_history() {
        let (transport, source) = source();
        transport.respond(
            "coins/bitcoin/market_chart",
            json!({"prices": [[1_700_000_000_000.0, 95000.0], [1_700_086_400_000.0, 97500.0]]}),
        );

        let history = source.price_history("bitcoin", 30).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), Some(97500.0));
        assert!(history.points[0].timestamp < history.points[1].timestamp);
    }

    #[tokio::test(start_paused = true)]
    async fn test_top_assets_and_overview() {
        let (transport, source) = source();
        transport.respond(
            "coins/markets",
            json!([
                {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 97500.0,
                 "market_cap_rank": 1, "price_change_percentage_24h_in_currency": 2.5,
                 "price_change_percentage_7d_in_currency": 5.0},
                {"id": "ethereum", "symbol": "eth", "name": "Ethereum", "current_price": 3400.0,
                 "market_cap_rank": 2, "price_change_percentage_24h": -1.0}
            ]),
        );
        transport.respond(
            "global",
            json!({"data": {
                "total_market_cap": {"usd": 3_420_500_000_000.0},
                "total_volume": {"usd": 125_000_000_000.0},
                "market_cap_percentage": {"btc": 56.4, "eth": 12.1},
                "market_cap_change_percentage_24h_usd": 1.6
            }}),
        );

        let top = source.top_assets(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert!((top[0].change_24h - 2.5).abs() < f64::EPSILON);
        assert!((top[1].change_24h + 1.0).abs() < f64::EPSILON);

        let overview = source.market_overview().await.unwrap();
        assert!((overview.total_market_cap_billions - 3420.5).abs() < 1e-6);
        assert!((overview.btc_dominance - 56.4).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trending() {
        let (transport, source) = source();
        transport.respond(
            "search/trending",
            json!({"coins": [{"item": {"id": "solana", "name": "Solana", "symbol": "sol", "market_cap_rank": 5}}]}),
        );

        let trending = source.trending().await.unwrap();
        assert_eq!(trending[0].symbol, "SOL");
        assert_eq!(source.name(), "CoinGecko");
    }
}
