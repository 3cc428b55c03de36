//! CoinGecko Wire Models
//!
//! Only the fields the advisor reads. Everything optional upstream is
//! optional here so partial payloads still decode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `coins/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinListEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// `coins/markets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d_in_currency: Option<f64>,
}

/// Query for `coins/markets`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsQuery {
    pub vs_currency: String,
    pub order: String,
    pub per_page: usize,
    pub page: u32,
    pub sparkline: bool,
    pub price_change_percentage: String,
}

impl Default for MarketsQuery {
    fn default() -> Self {
        Self {
            vs_currency: "usd".into(),
            order: "market_cap_desc".into(),
            per_page: 100,
            page: 1,
            sparkline: false,
            price_change_percentage: "24h".into(),
        }
    }
}

impl MarketsQuery {
    pub fn top(per_page: usize) -> Self {
        Self {
            per_page,
            price_change_percentage: "24h,7d,30d".into(),
            ..Self::default()
        }
    }

    pub(crate) fn params(&self) -> Vec<(String, String)> {
        vec![
            ("vs_currency".into(), self.vs_currency.clone()),
            ("order".into(), self.order.clone()),
            ("per_page".into(), self.per_page.to_string()),
            ("page".into(), self.page.to_string()),
            ("sparkline".into(), self.sparkline.to_string()),
            ("price_change_percentage".into(), self.price_change_percentage.clone()),
        ]
    }
}

/// `coins/{id}` market block; maps are keyed by currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinMarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<f64>,
}

/// `coins/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_data: Option<CoinMarketData>,
}

/// `coins/{id}/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinHistorySnapshot {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub market_data: Option<CoinMarketData>,
}

/// `coins/{id}/market_chart` and `.../range`; rows are `[unix_ms, value]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<[f64; 2]>,
    #[serde(default)]
    pub market_caps: Vec<[f64; 2]>,
    #[serde(default)]
    pub total_volumes: Vec<[f64; 2]>,
}

/// `global`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalResponse {
    pub data: GlobalData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalData {
    #[serde(default)]
    pub total_market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h_usd: f64,
    #[serde(default)]
    pub active_cryptocurrencies: Option<u64>,
}

/// `search/trending`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub item: SearchCoin,
}

/// `search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

/// `exchanges`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub year_established: Option<u32>,
    #[serde(default)]
    pub trust_score: Option<u32>,
    #[serde(default)]
    pub trust_score_rank: Option<u32>,
    #[serde(default)]
    pub trade_volume_24h_btc: Option<f64>,
}

/// `exchange_rates`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRatesResponse {
    #[serde(default)]
    pub rates: HashMap<String, ExchangeRate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub name: String,
    pub unit: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Optional extras for `simple/price`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplePriceOptions {
    pub include_market_cap: bool,
    pub include_24hr_vol: bool,
    pub include_24hr_change: bool,
}

impl SimplePriceOptions {
    pub(crate) fn params(self) -> Vec<(String, String)> {
        vec![
            ("include_market_cap".into(), self.include_market_cap.to_string()),
            ("include_24hr_vol".into(), self.include_24hr_vol.to_string()),
            ("include_24hr_change".into(), self.include_24hr_change.to_string()),
        ]
    }
}

/// `simple/price`: coin id -> field (`usd`, `usd_24h_change`, ...) -> value
pub type SimplePrices = HashMap<String, HashMap<String, Option<f64>>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_market_entry_partial_payload() {
        let entry: MarketEntry = serde_json::from_value(json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "current_price": 97500.0,
            "market_cap_rank": 1,
            "price_change_percentage_7d_in_currency": null
        }))
        .unwrap();

        assert_eq!(entry.market_cap_rank, Some(1));
        assert_eq!(entry.price_change_percentage_7d_in_currency, None);
        assert_eq!(entry.total_volume, None);
    }

    #[test]
    fn test_market_chart_rows() {
        let chart: MarketChart = serde_json::from_value(json!({
            "prices": [[1_700_000_000_000_i64, 100.5], [1_700_086_400_000_i64, 101.0]]
        }))
        .unwrap();

        assert_eq!(chart.prices.len(), 2);
        assert!((chart.prices[1][1] - 101.0).abs() < f64::EPSILON);
        assert!(chart.market_caps.is_empty());
    }

    #[test]
    fn test_exchange_rate_type_field() {
        let rates: ExchangeRatesResponse = serde_json::from_value(json!({
            "rates": {"usd": {"name": "US Dollar", "unit": "$", "value": 97500.0, "type": "fiat"}}
        }))
        .unwrap();
        assert_eq!(rates.rates["usd"].kind, "fiat");
    }

    #[test]
    fn test_top_query_params() {
        let params = MarketsQuery::top(20).params();
        assert!(params.contains(&("per_page".into(), "20".into())));
        assert!(params.contains(&("price_change_percentage".into(), "24h,7d,30d".into())));
        assert!(params.contains(&("sparkline".into(), "false".into())));
    }
}
