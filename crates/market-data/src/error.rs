//! Error Types for Market Data

use crypto_advisor::AdvisorError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Upstream answered 429
    #[error("rate limited by upstream API")]
    RateLimited,

    /// Upstream answered 404 for this path
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    /// Body was not the JSON we expected
    #[error("invalid response: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl FetchError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<FetchError> for AdvisorError {
    fn from(err: FetchError) -> Self {
        let message = err.to_string();
        match err {
            FetchError::NotFound(what) => Self::NotFound(what),
            FetchError::RateLimited => Self::RateLimited(message),
            _ => Self::DataUnavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_advisor_error() {
        let err: AdvisorError = FetchError::NotFound("zork".into()).into();
        assert!(matches!(err, AdvisorError::NotFound(ref c) if c == "zork"));

        let err: AdvisorError = FetchError::RateLimited.into();
        assert!(matches!(err, AdvisorError::RateLimited(_)));
        assert!(err.is_unavailable());

        let err: AdvisorError = FetchError::Timeout.into();
        assert!(matches!(err, AdvisorError::DataUnavailable(_)));
        assert!(err.user_message().contains("unavailable"));
    }
}
