//! HTTP Transport
//!
//! The only place that touches the network. `DataFetcher` layers caching
//! and throttling on top of whatever `Transport` it is given.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::FetcherConfig;
use crate::error::{FetchError, Result};

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `{base}/{path}` with query params and decode the JSON body
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value>;

    /// Lightweight reachability probe
    async fn ping(&self) -> bool;
}

/// reqwest-backed transport for the public CoinGecko API
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    const PING_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn check_status(status: StatusCode, path: &str) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound(path.to_string())),
        s => Err(FetchError::Status(s.as_u16())),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        tracing::info!(path = %path, "Fetching from CoinGecko");

        let response = self
            .client
            .get(self.url(path))
            .query(params)
            .send()
            .await?;

        if let Err(e) = check_status(response.status(), path) {
            tracing::warn!(path = %path, error = %e, "Upstream request failed");
            return Err(e);
        }

        Ok(response.json::<Value>().await?)
    }

    async fn ping(&self) -> bool {
        match self
            .client
            .get(self.url("ping"))
            .timeout(Self::PING_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!(error = %e, "Ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK, "global").is_ok());
        assert_eq!(
            check_status(StatusCode::TOO_MANY_REQUESTS, "global"),
            Err(FetchError::RateLimited)
        );
        assert_eq!(
            check_status(StatusCode::NOT_FOUND, "coins/zork"),
            Err(FetchError::NotFound("coins/zork".into()))
        );
        assert_eq!(
            check_status(StatusCode::BAD_GATEWAY, "global"),
            Err(FetchError::Status(502))
        );
    }

    #[test]
    fn test_url_joins_path() {
        let config = FetcherConfig {
            base_url: "http://localhost:9999/api/v3".into(),
            ..FetcherConfig::default()
        };
        let transport = ReqwestTransport::new(&config).unwrap();
        assert_eq!(transport.url("/coins/bitcoin"), "http://localhost:9999/api/v3/coins/bitcoin");
        assert_eq!(transport.url("global"), "http://localhost:9999/api/v3/global");
    }
}
