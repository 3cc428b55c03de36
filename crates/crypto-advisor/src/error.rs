//! Error Types for Crypto Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Coin is neither in the catalog nor known to the data source
    #[error("Cryptocurrency not found: {0}")]
    NotFound(String),

    /// Upstream failed and nothing usable was cached
    #[error("Market data unavailable: {0}")]
    DataUnavailable(String),

    /// Upstream API answered 429
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdvisorError {
    /// Message shown to dashboard users
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(coin) => format!(
                "I couldn't find information about {coin}. Please check the spelling or try a different cryptocurrency."
            ),
            Self::DataUnavailable(_) => {
                "Market data is currently unavailable. Please try again later.".into()
            }
            Self::RateLimited(_) => {
                "API rate limit reached. Please wait a moment and try again.".into()
            }
            Self::InvalidInput(msg) => format!("Invalid input: {msg}"),
            Self::Config(_) | Self::Serialization(_) => "An unexpected error occurred.".into(),
        }
    }

    /// True when the failure came from the upstream data provider
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable(_) | Self::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AdvisorError::NotFound("notacoin".into());
        assert!(err.user_message().contains("couldn't find"));
        assert!(!err.is_unavailable());

        let err = AdvisorError::DataUnavailable("timeout".into());
        assert!(err.user_message().contains("unavailable"));
        assert!(err.is_unavailable());
    }
}
