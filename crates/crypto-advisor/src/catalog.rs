//! Coin Catalog
//!
//! Fixed table of coins the advisor recognises by name or ticker, mapped to
//! the data source's coin ids.

use serde::Serialize;

/// A coin the advisor can resolve from user input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CoinRef {
    /// Data source id (e.g., "matic-network")
    pub id: &'static str,

    /// Display name
    pub name: &'static str,

    /// Ticker symbol
    pub symbol: &'static str,
}

impl CoinRef {
    /// "Bitcoin (BTC)"
    pub fn display(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

const fn coin(id: &'static str, name: &'static str, symbol: &'static str) -> CoinRef {
    CoinRef { id, name, symbol }
}

/// Every coin the advisor knows by name
pub const KNOWN_COINS: &[CoinRef] = &[
    coin("bitcoin", "Bitcoin", "BTC"),
    coin("ethereum", "Ethereum", "ETH"),
    coin("cardano", "Cardano", "ADA"),
    coin("polkadot", "Polkadot", "DOT"),
    coin("solana", "Solana", "SOL"),
    coin("chainlink", "Chainlink", "LINK"),
    coin("litecoin", "Litecoin", "LTC"),
    coin("dogecoin", "Dogecoin", "DOGE"),
    coin("matic-network", "Polygon", "MATIC"),
    coin("avalanche-2", "Avalanche", "AVAX"),
    coin("algorand", "Algorand", "ALGO"),
];

/// Look up a coin by name, ticker or id (case-insensitive)
pub fn resolve(input: &str) -> Option<CoinRef> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    KNOWN_COINS.iter().copied().find(|c| {
        c.id == needle || c.name.eq_ignore_ascii_case(&needle) || c.symbol.eq_ignore_ascii_case(&needle)
    })
}

/// Lowercased id to try against the data source for coins outside the catalog
pub fn passthrough_id(input: &str) -> Option<String> {
    let candidate = input.trim().to_lowercase();
    let valid = !candidate.is_empty()
        && candidate.len() <= 64
        && candidate
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    valid.then_some(candidate)
}

/// Coins mentioned in free text, whole words only, in order of first mention
pub fn extract_mentions(text: &str) -> Vec<CoinRef> {
    let mut found: Vec<CoinRef> = Vec::new();

    for word in text
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty())
    {
        if let Some(coin) = resolve(word) {
            if !found.iter().any(|c| c.id == coin.id) {
                found.push(coin);
            }
        }
    }

    found
}
