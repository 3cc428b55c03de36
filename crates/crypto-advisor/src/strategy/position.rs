//! Position Sizing
//!
//! Suggested single-position size as a share of the portfolio.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::RiskProfile;

/// Suggested position for one asset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSize {
    /// Share of the portfolio (%)
    pub percent: f64,

    /// Dollar amount for the given portfolio size
    pub amount_usd: Decimal,
}

/// Size a position from volatility, market position and sustainability.
///
/// Starts at the profile's base size, applies multipliers and caps at the
/// profile's maximum.
pub fn position_size(
    profile: &RiskProfile,
    volatility: f64,
    market_cap_rank: u32,
    sustainability_score: f64,
    portfolio_size: Decimal,
) -> PositionSize {
    let mut percent = profile.base_position_percent;

    if volatility > 40.0 {
        percent *= 0.5;
    } else if volatility > 25.0 {
        percent *= 0.7;
    } else if volatility < 15.0 {
        percent *= 1.2;
    }

    if market_cap_rank <= 5 {
        percent *= 1.3;
    } else if market_cap_rank <= 20 {
        percent *= 1.1;
    } else if market_cap_rank > 50 {
        percent *= 0.7;
    }

    if sustainability_score >= 80.0 {
        percent *= 1.1;
    } else if sustainability_score < 40.0 {
        percent *= 0.9;
    }

    let percent = (percent.min(profile.max_position_percent) * 100.0).round() / 100.0;
    let amount_usd = Decimal::from_f64(percent)
        .map(|p| (portfolio_size * p / dec!(100)).round_dp(2))
        .unwrap_or(Decimal::ZERO);

    PositionSize { percent, amount_usd }
}
