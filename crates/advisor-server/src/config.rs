//! Server Configuration

use std::str::FromStr;

use anyhow::{Context, bail};
use market_data::FetcherConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Where market data comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    #[default]
    CoinGecko,
    Mock,
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "coingecko" => Ok(Self::CoinGecko),
            "mock" => Ok(Self::Mock),
            other => bail!("unknown MARKET_DATA_SOURCE '{other}' (expected coingecko or mock)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub source: SourceKind,
    pub fetcher: FetcherConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let source = lookup("MARKET_DATA_SOURCE")
            .map(|s| s.parse::<SourceKind>())
            .transpose()
            .context("invalid market data source")?
            .unwrap_or_default();

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            source,
            fetcher: FetcherConfig::from_lookup(&lookup),
        })
    }
}
