//! Application State

use std::sync::Arc;

use crypto_advisor::{Advisor, MarketDataSource, MockMarketData};
use market_data::{CoinGeckoSource, DataFetcher};

use crate::config::{ServerConfig, SourceKind};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analysis entry point
    pub advisor: Arc<Advisor>,

    /// Live fetcher (None when running on mock data)
    pub fetcher: Option<Arc<DataFetcher>>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        match config.source {
            SourceKind::CoinGecko => {
                let fetcher = Arc::new(DataFetcher::new(&config.fetcher)?);
                let source: Arc<dyn MarketDataSource> =
                    Arc::new(CoinGeckoSource::new(Arc::clone(&fetcher)));
                Ok(Self {
                    advisor: Arc::new(Advisor::new(source)),
                    fetcher: Some(fetcher),
                })
            }
            SourceKind::Mock => Ok(Self::with_source(Arc::new(MockMarketData::new()))),
        }
    }

    /// State around any source, without cache endpoints
    pub fn with_source(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            advisor: Arc::new(Advisor::new(source)),
            fetcher: None,
        }
    }
}
