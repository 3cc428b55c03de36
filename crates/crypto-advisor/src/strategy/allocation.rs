//! Portfolio Allocation Strategy
//!
//! Splits a portfolio into core, growth and speculative holdings by risk
//! tolerance, caps total crypto exposure and keeps the rest in cash.
//!
//! ```text
//! ┌───────────────┬──────────┬──────────────────┬────────────────┐
//! │               │ Core     │ Growth           │ Speculative    │
//! ├───────────────┼──────────┼──────────────────┼────────────────┤
//! │ Conservative  │ BTC ETH  │ -                │ -              │
//! │ Moderate      │ BTC ETH  │ ADA DOT SOL      │ -              │
//! │ Aggressive    │ -        │ ADA DOT SOL      │ LINK MATIC     │
//! └───────────────┴──────────┴──────────────────┴────────────────┘
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::{Allocation, CryptoAsset, RiskProfile, RiskTolerance, TimeHorizon};

struct Holding {
    symbol: &'static str,
    name: &'static str,
    percent: Decimal,
    rationale: &'static str,
}

const fn holding(
    symbol: &'static str,
    name: &'static str,
    percent: Decimal,
    rationale: &'static str,
) -> Holding {
    Holding { symbol, name, percent, rationale }
}

const BTC_RATIONALE: &str =
    "Digital gold, most established cryptocurrency with institutional adoption";
const ETH_RATIONALE: &str = "Leading smart contract platform with strong developer ecosystem";

const GROWTH: [Holding; 3] = [
    holding("ADA", "Cardano (ADA)", dec!(10), "Sustainable PoS blockchain with academic approach"),
    holding("DOT", "Polkadot (DOT)", dec!(8), "Interoperability-focused with parachain technology"),
    holding("SOL", "Solana (SOL)", dec!(7), "High-performance blockchain for DeFi and NFTs"),
];

const SPECULATIVE: [Holding; 2] = [
    holding("LINK", "Chainlink (LINK)", dec!(5), "Leading oracle network for smart contracts"),
    holding("MATIC", "Polygon (MATIC)", dec!(5), "Ethereum scaling solution with growing adoption"),
];

/// Builds allocation plans for a risk profile
pub struct PortfolioStrategy {
    profile: RiskProfile,
}

impl PortfolioStrategy {
    pub const fn new(profile: RiskProfile) -> Self {
        Self { profile }
    }

    /// Build a plan for `portfolio_size` USD.
    ///
    /// Core holdings are only included when the coin shows up in `market`
    /// (the current top assets).
    pub fn plan(
        &self,
        portfolio_size: Decimal,
        horizon: TimeHorizon,
        market: &[CryptoAsset],
    ) -> AllocationPlan {
        let tolerance = self.profile.tolerance;
        let listed = |symbol: &str| market.iter().any(|a| a.symbol.eq_ignore_ascii_case(symbol));

        let mut holdings: Vec<Holding> = Vec::new();

        let core = match tolerance {
            RiskTolerance::Conservative => Some((dec!(40), dec!(30))),
            RiskTolerance::Moderate => Some((dec!(30), dec!(25))),
            RiskTolerance::Aggressive => None,
        };
        if let Some((btc, eth)) = core {
            if listed("BTC") {
                holdings.push(holding("BTC", "Bitcoin (BTC)", btc, BTC_RATIONALE));
            }
            if listed("ETH") {
                holdings.push(holding("ETH", "Ethereum (ETH)", eth, ETH_RATIONALE));
            }
        }

        if tolerance != RiskTolerance::Conservative {
            holdings.extend(
                GROWTH
                    .into_iter()
                    .filter(|h| tolerance == RiskTolerance::Aggressive || h.percent <= dec!(10)),
            );
        }

        if tolerance == RiskTolerance::Aggressive {
            holdings.extend(SPECULATIVE);
        }

        // Scale down proportionally when over the crypto cap
        let total: Decimal = holdings.iter().map(|h| h.percent).sum();
        let cap = self.profile.max_crypto_allocation;
        if total > cap {
            let factor = cap / total;
            for h in &mut holdings {
                h.percent = (h.percent * factor).round();
            }
        }

        let allocations = holdings
            .into_iter()
            .map(|h| {
                Allocation::new(h.symbol, h.name, h.percent, portfolio_size).with_rationale(h.rationale)
            })
            .collect();

        AllocationPlan::new(tolerance, horizon, portfolio_size, allocations)
    }
}

/// A complete allocation plan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Risk tolerance used
    pub risk: RiskTolerance,

    pub horizon: TimeHorizon,

    /// Total portfolio size (USD)
    pub portfolio_size: Decimal,

    /// Individual crypto allocations
    pub allocations: Vec<Allocation>,

    /// Share kept in cash or stablecoins (%)
    pub cash_percent: Decimal,

    /// Cash amount (USD)
    pub cash_amount: Decimal,
}

impl AllocationPlan {
    /// Create from allocations; cash takes whatever is left
    pub fn new(
        risk: RiskTolerance,
        horizon: TimeHorizon,
        portfolio_size: Decimal,
        allocations: Vec<Allocation>,
    ) -> Self {
        let crypto: Decimal = allocations.iter().map(|a| a.percent).sum();
        let cash_percent = (dec!(100) - crypto).max(Decimal::ZERO);

        Self {
            risk,
            horizon,
            portfolio_size,
            allocations,
            cash_percent,
            cash_amount: (portfolio_size * cash_percent / dec!(100)).round_dp(2),
        }
    }

    /// Total crypto exposure (%)
    pub fn crypto_percent(&self) -> Decimal {
        self.allocations.iter().map(|a| a.percent).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}
