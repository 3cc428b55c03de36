//! Portfolio Recommendation
//!
//! Builds an allocation plan against the current top assets and renders it.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::usd;
use crate::error::Result;
use crate::market::MarketDataSource;
use crate::model::{RiskTolerance, TimeHorizon};
use crate::strategy::{AllocationPlan, PortfolioStrategy};

/// How many top assets the core holdings are checked against
const TOP_ASSETS: usize = 20;

pub struct PortfolioService {
    source: Arc<dyn MarketDataSource>,
}

impl PortfolioService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    pub async fn recommend(
        &self,
        portfolio_size: Decimal,
        risk: RiskTolerance,
        horizon: TimeHorizon,
    ) -> Result<AllocationPlan> {
        let market = self.source.top_assets(TOP_ASSETS).await?;
        let plan = PortfolioStrategy::new(risk.profile()).plan(portfolio_size, horizon, &market);

        tracing::debug!(
            risk = %risk,
            holdings = plan.allocations.len(),
            cash = %plan.cash_percent,
            "Portfolio plan built"
        );

        Ok(plan)
    }
}

/// Markdown rendering of a plan
pub fn render_plan(plan: &AllocationPlan) -> String {
    let mut s = String::from("## 💼 Portfolio Allocation Recommendation\n\n");

    if plan.is_empty() {
        s.push_str("Unable to generate portfolio recommendations at this time. Please try again later.");
        return s;
    }

    s.push_str(&format!(
        "**Based on your {} risk profile and {} portfolio ({}):**\n\n",
        plan.risk.as_str().to_lowercase(),
        usd(plan.portfolio_size),
        plan.horizon.label()
    ));

    for alloc in &plan.allocations {
        s.push_str(&format!("**{}: {}%**\n", alloc.name, alloc.percent.normalize()));
        s.push_str(&format!("- Reasoning: {}\n", alloc.rationale));
        s.push_str(&format!("- Estimated Amount: {}\n\n", usd(alloc.amount_usd)));
    }

    if plan.cash_percent > Decimal::ZERO {
        s.push_str(&format!("**Cash/Stablecoins: {}%**\n", plan.cash_percent.normalize()));
        s.push_str(&format!(
            "- Keep {} in cash for opportunities and risk management\n\n",
            usd(plan.cash_amount)
        ));
    }

    s.push_str("**⚠️ Important Reminders:**\n");
    s.push_str("- This is educational guidance, not financial advice\n");
    s.push_str("- Consider dollar-cost averaging for entry positions\n");
    s.push_str("- Set stop-losses and take-profit levels\n");
    s.push_str("- Review and rebalance regularly\n");

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::market::MockMarketData;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_moderate_plan_rendering() {
        let service = PortfolioService::new(Arc::new(MockMarketData::new()));
        let plan = service
            .recommend(dec!(10000), RiskTolerance::Moderate, TimeHorizon::MediumTerm)
            .await
            .unwrap();

        assert_eq!(plan.crypto_percent(), dec!(80));
        let md = render_plan(&plan);
        assert!(md.contains("**Bitcoin (BTC): 30%**"));
        assert!(md.contains("- Estimated Amount: $3,000.00"));
        assert!(md.contains("**Cash/Stablecoins: 20%**"));
        assert!(md.contains("Keep $2,000.00 in cash"));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let service = PortfolioService::new(Arc::new(MockMarketData::offline()));
        let err = service
            .recommend(dec!(10000), RiskTolerance::Moderate, TimeHorizon::MediumTerm)
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::DataUnavailable(_)));
    }

    #[test]
    fn test_empty_plan_message() {
        let plan = AllocationPlan::new(RiskTolerance::Conservative, TimeHorizon::LongTerm, dec!(500), Vec::new());
        assert!(render_plan(&plan).contains("Unable to generate portfolio recommendations"));
    }
}
