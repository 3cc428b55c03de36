//! Service Kit - Report Services
//!
//! Composes market data, analysis, sustainability and the rules engine into
//! structured reports with Markdown renderings for the dashboard and the
//! query router.

mod comparison;
mod guidance;
mod investment;
mod overview;
mod portfolio;
mod sustainability;
mod technical;

pub use comparison::{ComparisonEntry, ComparisonReport, ComparisonService, MAX_COMPARED};
pub use guidance::{beginner_guidance, capabilities_help, risk_management_advice};
pub use investment::{InvestmentReport, InvestmentService};
pub use overview::{DominanceRegime, MarketSentiment, render_overview};
pub use portfolio::{PortfolioService, render_plan};
pub use sustainability::{general_sustainability_info, render_report, render_scores};
pub use technical::{TechnicalReport, TechnicalService};

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// "$12,345.67"
pub fn usd(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (int, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}${grouped}.{frac}")
}

/// Prices below a dollar keep four decimals
pub fn usd_price(value: f64) -> String {
    if value.abs() < 1.0 {
        return format!("${value:.4}");
    }
    Decimal::from_f64(value).map_or_else(|| format!("${value:.2}"), usd)
}

/// 🟢 / 🔴 / 🟡 for a signed change
pub fn change_indicator(change: f64) -> &'static str {
    if change > 0.0 {
        "🟢"
    } else if change < 0.0 {
        "🔴"
    } else {
        "🟡"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_usd_grouping() {
        assert_eq!(usd(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(usd(dec!(100)), "$100.00");
        assert_eq!(usd(dec!(0)), "$0.00");
        assert_eq!(usd(dec!(-4500.5)), "-$4,500.50");
    }

    #[test]
    fn test_usd_price() {
        assert_eq!(usd_price(0.52), "$0.5200");
        assert_eq!(usd_price(97500.0), "$97,500.00");
    }
}
