//! # crypto-advisor
//!
//! Educational cryptocurrency advisor that weighs price trends against
//! sustainability and maps both onto buy / hold / avoid recommendations.
//!
//! ## Philosophy
//!
//! - **Rules, not predictions** - Every label comes from a readable if/else chain
//! - **Sustainability counts** - Energy use and governance weigh in next to returns
//! - **Risk-adjusted sizing** - Position sizes shrink with volatility and small caps
//! - **Cash is a position** - Crypto exposure is capped per risk tolerance
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ Market data  │──▶│   Analysis   │──▶│                  │
//! │ (snapshot +  │   │ volatility,  │   │   Rules engine   │──▶ label, scores,
//! │  history)    │   │ RSI, momentum│   │                  │    position size,
//! └──────────────┘   └──────────────┘   │                  │    explanation
//!                    ┌──────────────┐   │                  │
//!                    │Sustainability│──▶│                  │
//!                    │   scorer     │   └──────────────────┘
//!                    └──────────────┘
//! ```

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod market;
pub mod model;
pub mod query;
pub mod strategy;
pub mod sustainability;
pub mod svckit;

pub use error::{AdvisorError, Result};
pub use market::{MarketDataSource, MockMarketData};
pub use model::{
    Allocation, CryptoAsset, MarketOverview, PriceHistory, PricePoint, Recommendation,
    RecommendationLabel, RiskProfile, RiskTolerance, TimeHorizon, TrendingCoin,
};
pub use query::{Advisor, QueryIntent};
pub use strategy::{AllocationPlan, PortfolioStrategy, RulesEngine};
pub use sustainability::{SustainabilityScore, SustainabilityScorer};

/// Appended to every investment answer
pub const DISCLAIMER: &str = "This is educational analysis only. Cryptocurrency investments are \
    highly risky and volatile. Never invest more than you can afford to lose.";
