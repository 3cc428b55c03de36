//! Data Fetcher
//!
//! Cached, throttled access to the CoinGecko REST endpoints.
//!
//! ```text
//! request ──▶ fresh cache hit? ──yes──▶ value
//!                  │ no
//!                  ▼
//!             throttle (≥ min_interval since last call)
//!                  ▼
//!             filled meanwhile? ──yes──▶ value
//!                  │ no
//!                  ▼
//!             transport GET ──ok, decodes──▶ store with endpoint TTL ──▶ value
//!                  │ err
//!                  ▼
//!             stale entry for same signature? ──yes──▶ value (warn)
//!                  │ no
//!                  ▼
//!                error
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::{CacheStats, ResponseCache, request_signature};
use crate::config::FetcherConfig;
use crate::error::Result;
use crate::throttle::Throttle;
use crate::transport::{ReqwestTransport, Transport};
use crate::wire::{
    CoinDetail, CoinHistorySnapshot, CoinListEntry, ExchangeEntry, ExchangeRatesResponse,
    GlobalResponse, MarketChart, MarketEntry, MarketsQuery, SearchResponse, SimplePriceOptions,
    SimplePrices, TrendingResponse,
};

const COIN_LIST_TTL: Duration = Duration::from_secs(3600);
const COIN_DETAIL_TTL: Duration = Duration::from_secs(600);
const COIN_HISTORY_TTL: Duration = Duration::from_secs(3600);
const CHART_INTRADAY_TTL: Duration = Duration::from_secs(300);
const CHART_TTL: Duration = Duration::from_secs(600);
const EXCHANGES_TTL: Duration = Duration::from_secs(3600);
const SIMPLE_PRICE_TTL: Duration = Duration::from_secs(60);

/// Default lookback for `market_chart_range`
const DEFAULT_RANGE_DAYS: i64 = 30;

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(T::deserialize(value)?)
}

fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

pub struct DataFetcher {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    throttle: Throttle,
    default_ttl: Duration,
}

impl DataFetcher {
    /// Fetcher talking to the real API
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config)?);
        Ok(Self::with_transport(transport, config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: &FetcherConfig) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(),
            throttle: Throttle::new(config.min_interval),
            default_ttl: config.default_ttl,
        }
    }

    /// Cached GET. `ttl = None` bypasses the cache on the way in and out.
    /// Only bodies that decode as `T` are cached.
    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        ttl: Option<Duration>,
    ) -> Result<T> {
        let key = request_signature(endpoint, params);

        if ttl.is_some() {
            if let Some(value) = self.cache.get_fresh(&key) {
                tracing::debug!(key = %key, "Cache hit");
                return decode(&value);
            }
            tracing::debug!(key = %key, "Cache miss");
        }

        self.throttle.acquire().await;

        // Filled by a concurrent caller while this one waited for its slot
        if ttl.is_some() {
            if let Some(value) = self.cache.get_fresh(&key) {
                tracing::debug!(key = %key, "Cache hit after throttle wait");
                return decode(&value);
            }
        }

        let fetched = match self.transport.get_json(endpoint, params).await {
            Ok(value) => decode::<T>(&value).map(|decoded| (value, decoded)),
            Err(e) => Err(e),
        };

        match fetched {
            Ok((value, decoded)) => {
                if let Some(ttl) = ttl {
                    self.cache.insert(key, value, ttl);
                }
                Ok(decoded)
            }
            Err(e) if e.is_not_found() => Err(e),
            Err(e) => match self.cache.get_stale(&key) {
                Some(stale) => {
                    tracing::warn!(key = %key, error = %e, "Upstream failed, serving stale cache");
                    decode(&stale)
                }
                None => Err(e),
            },
        }
    }

    /// All coin ids, symbols and names
    pub async fn coin_list(&self) -> Result<Vec<CoinListEntry>> {
        self.request("coins/list", &[], Some(COIN_LIST_TTL)).await
    }

    pub async fn global(&self) -> Result<GlobalResponse> {
        self.request("global", &[], Some(self.default_ttl)).await
    }

    pub async fn coins_markets(&self, query: &MarketsQuery) -> Result<Vec<MarketEntry>> {
        self.request("coins/markets", &query.params(), Some(self.default_ttl))
            .await
    }

    /// Coin detail with market data only
    pub async fn coin(&self, coin_id: &str) -> Result<CoinDetail> {
        let params = [
            param("localization", false),
            param("tickers", false),
            param("market_data", true),
            param("community_data", false),
            param("developer_data", false),
        ];
        self.request(&format!("coins/{coin_id}"), &params, Some(COIN_DETAIL_TTL))
            .await
    }

    /// Snapshot of a coin on a past date
    pub async fn coin_history(&self, coin_id: &str, date: NaiveDate) -> Result<CoinHistorySnapshot> {
        let params = [
            param("date", date.format("%d-%m-%Y")),
            param("localization", false),
        ];
        self.request(
            &format!("coins/{coin_id}/history"),
            &params,
            Some(COIN_HISTORY_TTL),
        )
        .await
    }

    /// Price, market cap and volume series. Daily granularity beyond one day.
    pub async fn market_chart(&self, coin_id: &str, vs_currency: &str, days: u32) -> Result<MarketChart> {
        let mut params = vec![param("vs_currency", vs_currency), param("days", days)];
        if days > 1 {
            params.push(param("interval", "daily"));
        }

        let ttl = if days <= 1 { CHART_INTRADAY_TTL } else { CHART_TTL };
        self.request(&format!("coins/{coin_id}/market_chart"), &params, Some(ttl))
            .await
    }

    /// Series between two instants; defaults to the last 30 days
    pub async fn market_chart_range(
        &self,
        coin_id: &str,
        vs_currency: &str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<MarketChart> {
        let (from, to) = range.unwrap_or_else(|| {
            let to = Utc::now();
            (to - TimeDelta::days(DEFAULT_RANGE_DAYS), to)
        });

        let params = [
            param("vs_currency", vs_currency),
            param("from", from.timestamp()),
            param("to", to.timestamp()),
        ];
        self.request(
            &format!("coins/{coin_id}/market_chart/range"),
            &params,
            Some(CHART_TTL),
        )
        .await
    }

    pub async fn trending(&self) -> Result<TrendingResponse> {
        self.request("search/trending", &[], Some(self.default_ttl))
            .await
    }

    /// Free-text search, never cached
    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        self.request("search", &[param("query", query)], None).await
    }

    pub async fn exchanges(&self) -> Result<Vec<ExchangeEntry>> {
        self.request("exchanges", &[], Some(EXCHANGES_TTL)).await
    }

    pub async fn exchange_rates(&self) -> Result<ExchangeRatesResponse> {
        self.request("exchange_rates", &[], Some(self.default_ttl))
            .await
    }

    pub async fn simple_price(
        &self,
        ids: &[&str],
        vs_currencies: &[&str],
        options: SimplePriceOptions,
    ) -> Result<SimplePrices> {
        let mut params = vec![
            param("ids", ids.join(",")),
            param("vs_currencies", vs_currencies.join(",")),
        ];
        params.extend(options.params());

        self.request("simple/price", &params, Some(SIMPLE_PRICE_TTL))
            .await
    }

    /// True when the API answers `ping` with 200
    pub async fn ping(&self) -> bool {
        self.throttle.acquire().await;
        self.transport.ping().await
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("Response cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl std::fmt::Debug for DataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFetcher")
            .field("throttle", &self.throttle)
            .field("default_ttl", &self.default_ttl)
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}
