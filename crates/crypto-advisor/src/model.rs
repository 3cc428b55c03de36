//! Domain Models
//!
//! Core data types for market snapshots, user preferences and recommendations.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!
//! Percent changes and statistics stay in f64.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

/// A cryptocurrency market snapshot. Refetched for every query, never stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CryptoAsset {
    /// Data source identifier (e.g., "bitcoin", "matic-network")
    pub id: String,

    /// Ticker symbol (e.g., "BTC", "ETH")
    pub symbol: String,

    /// Full name (e.g., "Bitcoin", "Ethereum")
    pub name: String,

    /// Current price in USD
    pub price_usd: Decimal,

    /// 24-hour price change percentage
    pub change_24h: f64,

    /// 7-day price change percentage
    pub change_7d: f64,

    /// 30-day price change percentage
    pub change_30d: f64,

    /// 24-hour trading volume in USD
    pub volume_24h: Decimal,

    /// Market capitalization in USD
    pub market_cap: Option<Decimal>,

    /// Rank by market capitalization (1 = largest)
    pub market_cap_rank: Option<u32>,

    /// Last price update
    pub updated_at: DateTime<Utc>,
}

impl CryptoAsset {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        price_usd: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            price_usd,
            change_24h: 0.0,
            change_7d: 0.0,
            change_30d: 0.0,
            volume_24h: Decimal::ZERO,
            market_cap: None,
            market_cap_rank: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_changes(mut self, change_24h: f64, change_7d: f64, change_30d: f64) -> Self {
        self.change_24h = change_24h;
        self.change_7d = change_7d;
        self.change_30d = change_30d;
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.market_cap_rank = Some(rank);
        self
    }

    pub fn with_market(mut self, volume_24h: Decimal, market_cap: Decimal) -> Self {
        self.volume_24h = volume_24h;
        self.market_cap = Some(market_cap);
        self
    }

    /// Rank used by the rules engine; unranked coins count as small caps
    pub fn effective_rank(&self) -> u32 {
        self.market_cap_rank.filter(|r| *r > 0).unwrap_or(100)
    }
}

/// A single price observation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Ordered price series for one coin
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceHistory {
    pub coin_id: String,

    /// Window requested from the data source
    pub days: u32,

    /// Oldest first
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new(coin_id: impl Into<String>, days: u32, points: Vec<PricePoint>) -> Self {
        Self {
            coin_id: coin_id.into(),
            days,
            points,
        }
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The trailing `days` daily points (all points when shorter)
    pub fn tail(&self, days: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(days);
        &self.points[start..]
    }
}

/// Global market statistics
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarketOverview {
    /// Total market capitalization in billions of USD
    pub total_market_cap_billions: f64,

    /// Total 24h volume in billions of USD
    pub total_volume_billions: f64,

    /// 24h change of total market capitalization (%)
    pub market_cap_change_24h: f64,

    /// Bitcoin share of total market cap (%)
    pub btc_dominance: f64,

    /// Ethereum share of total market cap (%)
    pub eth_dominance: f64,
}

/// A coin from the data source's trending list
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
}

/// The three risk categories a user can pick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    pub const ALL: [Self; 3] = [Self::Conservative, Self::Moderate, Self::Aggressive];

    pub fn profile(self) -> RiskProfile {
        match self {
            Self::Conservative => RiskProfile::conservative(),
            Self::Moderate => RiskProfile::moderate(),
            Self::Aggressive => RiskProfile::aggressive(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTolerance {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" | "low" => Ok(Self::Conservative),
            "moderate" | "medium" => Ok(Self::Moderate),
            "aggressive" | "high" => Ok(Self::Aggressive),
            other => Err(AdvisorError::InvalidInput(format!(
                "unknown risk tolerance '{other}' (expected conservative, moderate or aggressive)"
            ))),
        }
    }
}

/// Thresholds and weights attached to a risk tolerance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskProfile {
    pub tolerance: RiskTolerance,

    /// Highest acceptable daily volatility (%)
    pub max_volatility: f64,

    /// Market cap ranks at or below this count as established
    pub preferred_market_cap_rank: u32,

    /// Weight of the sustainability sub-score in the combined score
    pub sustainability_weight: f64,

    /// Weight of the profitability sub-score in the combined score
    pub profitability_weight: f64,

    /// Starting single-position size (% of portfolio)
    pub base_position_percent: f64,

    /// Cap on any single position (% of portfolio)
    pub max_position_percent: f64,

    /// Cap on total crypto exposure (% of portfolio)
    pub max_crypto_allocation: Decimal,
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self::moderate()
    }
}

impl RiskProfile {
    /// Very conservative - prioritize capital preservation
    pub fn conservative() -> Self {
        Self {
            tolerance: RiskTolerance::Conservative,
            max_volatility: 15.0,
            preferred_market_cap_rank: 10,
            sustainability_weight: 0.4,
            profitability_weight: 0.6,
            base_position_percent: 5.0,
            max_position_percent: 10.0,
            max_crypto_allocation: dec!(70),
        }
    }

    /// Moderate - balanced approach
    pub fn moderate() -> Self {
        Self {
            tolerance: RiskTolerance::Moderate,
            max_volatility: 25.0,
            preferred_market_cap_rank: 25,
            sustainability_weight: 0.3,
            profitability_weight: 0.7,
            base_position_percent: 10.0,
            max_position_percent: 20.0,
            max_crypto_allocation: dec!(80),
        }
    }

    /// Aggressive - higher risk for higher potential returns
    pub fn aggressive() -> Self {
        Self {
            tolerance: RiskTolerance::Aggressive,
            max_volatility: 50.0,
            preferred_market_cap_rank: 100,
            sustainability_weight: 0.2,
            profitability_weight: 0.8,
            base_position_percent: 20.0,
            max_position_percent: 30.0,
            max_crypto_allocation: dec!(90),
        }
    }
}

/// Smallest portfolio the advisor sizes positions for (USD)
pub const MIN_PORTFOLIO_SIZE: Decimal = dec!(100);

/// Largest portfolio the advisor sizes positions for (USD)
pub const MAX_PORTFOLIO_SIZE: Decimal = dec!(1000000);

pub const DEFAULT_PORTFOLIO_SIZE: Decimal = dec!(10000);

/// Reject portfolio sizes outside 100..=1,000,000 USD
pub fn validate_portfolio_size(size: Decimal) -> Result<Decimal, AdvisorError> {
    if (MIN_PORTFOLIO_SIZE..=MAX_PORTFOLIO_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(AdvisorError::InvalidInput(format!(
            "portfolio size must be between ${MIN_PORTFOLIO_SIZE} and ${MAX_PORTFOLIO_SIZE}, got ${size}"
        )))
    }
}

/// Investment time horizon
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeHorizon {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

impl TimeHorizon {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShortTerm => "Short-term (< 1 year)",
            Self::MediumTerm => "Medium-term (1-3 years)",
            Self::LongTerm => "Long-term (> 3 years)",
        }
    }
}

impl fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeHorizon {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "short" | "short_term" => Ok(Self::ShortTerm),
            "medium" | "medium_term" => Ok(Self::MediumTerm),
            "long" | "long_term" => Ok(Self::LongTerm),
            other => Err(AdvisorError::InvalidInput(format!(
                "unknown time horizon '{other}' (expected short, medium or long)"
            ))),
        }
    }
}

/// Recommendation labels, most bullish first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLabel {
    StrongBuy,
    Buy,
    Consider,
    SpeculativeBuy,
    Hold,
    Caution,
    Avoid,
}

impl RecommendationLabel {
    pub const fn is_positive(self) -> bool {
        matches!(
            self,
            Self::StrongBuy | Self::Buy | Self::Consider | Self::SpeculativeBuy
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Consider => "CONSIDER",
            Self::SpeculativeBuy => "SPECULATIVE BUY",
            Self::Hold => "HOLD",
            Self::Caution => "CAUTION",
            Self::Avoid => "AVOID",
        }
    }

    pub const fn indicator(self) -> &'static str {
        match self {
            Self::StrongBuy | Self::Buy => "🟢",
            Self::Consider | Self::SpeculativeBuy | Self::Hold => "🟡",
            Self::Caution => "🟠",
            Self::Avoid => "🔴",
        }
    }
}

impl fmt::Display for RecommendationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the rules engine. Purely computed, never stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recommendation {
    pub coin_id: String,

    pub label: RecommendationLabel,

    /// Price-trend driven score (0-100)
    pub profitability_score: f64,

    /// Sustainability total (0-100)
    pub sustainability_score: f64,

    /// Risk-weighted blend of both sub-scores
    pub combined_score: f64,

    /// Whether a sustainability profile backed the score
    pub has_sustainability_data: bool,

    /// Canned explanation of how the label was reached
    pub explanation: String,
}

/// An allocation recommendation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Allocation {
    /// Asset symbol
    pub symbol: String,

    /// Display name (e.g., "Bitcoin (BTC)")
    pub name: String,

    /// Allocation percentage
    pub percent: Decimal,

    /// Dollar amount
    pub amount_usd: Decimal,

    /// Rationale for this allocation
    pub rationale: String,
}

impl Allocation {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        percent: Decimal,
        portfolio_size: Decimal,
    ) -> Self {
        let mut alloc = Self {
            symbol: symbol.into(),
            name: name.into(),
            percent,
            amount_usd: Decimal::ZERO,
            rationale: String::new(),
        };
        alloc.recompute_amount(portfolio_size);
        alloc
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    /// Refresh the dollar amount after the percentage changed
    pub fn recompute_amount(&mut self, portfolio_size: Decimal) {
        self.amount_usd = (portfolio_size * self.percent / dec!(100)).round_dp(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tolerance_parse() {
        assert_eq!("Conservative".parse::<RiskTolerance>().unwrap(), RiskTolerance::Conservative);
        assert_eq!(" aggressive ".parse::<RiskTolerance>().unwrap(), RiskTolerance::Aggressive);
        assert!("yolo".parse::<RiskTolerance>().is_err());
    }

    #[test]
    fn test_time_horizon_parse() {
        assert_eq!("short-term".parse::<TimeHorizon>().unwrap(), TimeHorizon::ShortTerm);
        assert_eq!("Long Term".parse::<TimeHorizon>().unwrap(), TimeHorizon::LongTerm);
        assert_eq!("medium".parse::<TimeHorizon>().unwrap(), TimeHorizon::MediumTerm);
        assert!("forever".parse::<TimeHorizon>().is_err());
    }

    #[test]
    fn test_profiles_ordered_by_risk() {
        let c = RiskTolerance::Conservative.profile();
        let m = RiskTolerance::Moderate.profile();
        let a = RiskTolerance::Aggressive.profile();
        assert!(c.max_volatility < m.max_volatility && m.max_volatility < a.max_volatility);
        assert!(c.max_crypto_allocation < a.max_crypto_allocation);
        for p in [c, m, a] {
            assert!((p.sustainability_weight + p.profitability_weight - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_allocation_amount() {
        let alloc = Allocation::new("BTC", "Bitcoin (BTC)", dec!(40), dec!(10000));
        assert_eq!(alloc.amount_usd, dec!(4000));
    }

    #[test]
    fn test_portfolio_size_bounds() {
        assert!(validate_portfolio_size(dec!(100)).is_ok());
        assert!(validate_portfolio_size(dec!(1000000)).is_ok());
        assert!(validate_portfolio_size(dec!(99.99)).is_err());
        assert!(validate_portfolio_size(dec!(1000000.01)).is_err());
    }

    #[test]
    fn test_effective_rank() {
        let asset = CryptoAsset::new("foo", "foo", "Foo", dec!(1));
        assert_eq!(asset.effective_rank(), 100);
        assert_eq!(asset.with_rank(3).effective_rank(), 3);
    }
}
