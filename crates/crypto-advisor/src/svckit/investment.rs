//! Investment Analysis
//!
//! Full single-coin analysis: market metrics, risk assessment, technical and
//! sustainability signals, the rules engine's label and a suggested position.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::{change_indicator, usd, usd_price};
use crate::analysis::{RiskLevel, RsiSignal, TechnicalMetrics};
use crate::error::Result;
use crate::market::MarketDataSource;
use crate::model::{CryptoAsset, Recommendation, RiskTolerance, TimeHorizon};
use crate::strategy::{PositionSize, RulesEngine, position_size};
use crate::sustainability::{SustainabilityScore, SustainabilityScorer};
use crate::DISCLAIMER;

/// History window used for volatility and RSI
pub const ANALYSIS_DAYS: u32 = 30;

/// Everything known about one coin for one investor
#[derive(Clone, Debug, Serialize)]
pub struct InvestmentReport {
    pub asset: CryptoAsset,
    pub metrics: TechnicalMetrics,
    pub sustainability: SustainabilityScore,
    pub recommendation: Recommendation,
    pub risk_level: RiskLevel,
    pub position: PositionSize,
    pub risk: RiskTolerance,
    pub horizon: TimeHorizon,
    pub portfolio_size: Decimal,

    /// False when the history fetch failed and metrics are neutral defaults
    pub has_history: bool,
}

impl InvestmentReport {
    /// Whether the coin's volatility is above what the investor accepts
    pub fn exceeds_tolerance(&self) -> bool {
        self.metrics.volatility > self.risk.profile().max_volatility
    }

    /// Compact block used inside comparisons
    pub fn summary_markdown(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("**Current Price:** {}\n", usd_price(self.metrics_price())));
        s.push_str(&format!(
            "**24h Change:** {:+.2}% {}\n",
            self.asset.change_24h,
            change_indicator(self.asset.change_24h)
        ));
        s.push_str(&format!("**Market Cap Rank:** #{}\n", self.asset.effective_rank()));
        s.push_str(&format!("**30-day Volatility:** {:.1}%\n", self.metrics.volatility));
        s.push_str(&format!("**RSI (14):** {:.1}\n", self.metrics.rsi));
        s.push_str(&format!(
            "**Recommendation:** {} {}\n",
            self.recommendation.label.indicator(),
            self.recommendation.label
        ));
        s
    }

    pub fn to_markdown(&self) -> String {
        let a = &self.asset;
        let profile = self.risk.profile();
        let tolerance = self.risk.as_str().to_lowercase();
        let mut s = String::new();

        s.push_str("**Current Metrics:**\n");
        s.push_str(&format!("- Price: {}\n", usd_price(self.metrics_price())));
        s.push_str(&format!(
            "- 24h: {:+.2}%, 7d: {:+.2}%, 30d: {:+.2}%\n",
            a.change_24h, a.change_7d, a.change_30d
        ));
        s.push_str(&format!("- Market Cap Rank: #{}\n", a.effective_rank()));
        s.push_str(&format!("- Volatility: {:.1}%\n", self.metrics.volatility));
        s.push_str(&format!("- RSI: {:.1}\n", self.metrics.rsi));
        s.push_str(&format!("- Sustainability Score: {}/100\n\n", self.sustainability.total));

        s.push_str(&format!("**Risk Assessment:** {}\n\n", self.risk_level.as_str()));

        s.push_str("**Investment Recommendation:**\n");
        s.push_str(&format!(
            "{} **{}** (profitability {:.1}/100, combined {:.1}/100)\n",
            self.recommendation.label.indicator(),
            self.recommendation.label,
            self.recommendation.profitability_score,
            self.recommendation.combined_score
        ));

        if self.exceeds_tolerance() {
            s.push_str(&format!(
                "⚠️ **CAUTION**: This crypto's volatility ({:.1}%) exceeds your {tolerance} risk tolerance.\n",
                self.metrics.volatility
            ));
        }

        if a.effective_rank() <= profile.preferred_market_cap_rank {
            s.push_str("✅ **POSITIVE**: Well-established cryptocurrency with good market position.\n");
        } else {
            s.push_str("⚠️ **CAUTION**: Lower market cap cryptocurrency with higher risk.\n");
        }

        match self.metrics.rsi_signal() {
            RsiSignal::Oversold => s.push_str(
                "📈 **TECHNICAL**: Potentially oversold (RSI < 30) - possible buying opportunity.\n",
            ),
            RsiSignal::Overbought => s.push_str(
                "📉 **TECHNICAL**: Potentially overbought (RSI > 70) - consider waiting.\n",
            ),
            RsiSignal::Neutral => s.push_str("📊 **TECHNICAL**: Neutral technical indicators.\n"),
        }

        let sustainability = self.sustainability.total;
        if !self.sustainability.has_profile {
            s.push_str("⚠️ **SUSTAINABILITY**: No sustainability profile available for this asset.\n");
        } else if sustainability >= 70.0 {
            s.push_str(
                "🌱 **SUSTAINABILITY**: High sustainability score - good for ESG-conscious investors.\n",
            );
        } else if sustainability >= 50.0 {
            s.push_str("🌱 **SUSTAINABILITY**: Moderate sustainability score.\n");
        } else {
            s.push_str(
                "⚠️ **SUSTAINABILITY**: Low sustainability score - consider environmental impact.\n",
            );
        }

        s.push_str(&format!("\n_{}_\n", self.recommendation.explanation));

        s.push_str(&format!(
            "\n**Suggested Position Size:** {:.2}% of portfolio ({})\n\n",
            self.position.percent,
            usd(self.position.amount_usd)
        ));

        s.push_str(&format!("**{} Considerations:**\n", self.horizon.label()));
        for line in horizon_considerations(self.horizon) {
            s.push_str(&format!("- {line}\n"));
        }

        s.push_str(&format!("\n**⚠️ Risk Disclaimer:** {DISCLAIMER}"));
        s
    }

    fn metrics_price(&self) -> f64 {
        self.asset.price_usd.to_f64().unwrap_or(self.metrics.current_price)
    }
}

fn horizon_considerations(horizon: TimeHorizon) -> [&'static str; 3] {
    match horizon {
        TimeHorizon::ShortTerm => [
            "Focus on technical indicators and market sentiment",
            "Consider taking profits at resistance levels",
            "Monitor closely for volatility",
        ],
        TimeHorizon::MediumTerm => [
            "Balance technical and fundamental analysis",
            "Consider dollar-cost averaging for entry",
            "Monitor project development and adoption",
        ],
        TimeHorizon::LongTerm => [
            "Focus on fundamental strength and adoption potential",
            "Consider sustainability and regulatory outlook",
            "Regular rebalancing recommended",
        ],
    }
}

/// Builds investment reports from a market data source
pub struct InvestmentService {
    source: Arc<dyn MarketDataSource>,
    scorer: SustainabilityScorer,
}

impl InvestmentService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            scorer: SustainabilityScorer::new(),
        }
    }

    pub async fn analyze(
        &self,
        coin_id: &str,
        risk: RiskTolerance,
        portfolio_size: Decimal,
        horizon: TimeHorizon,
    ) -> Result<InvestmentReport> {
        let asset = self.source.asset(coin_id).await?;

        // Missing history degrades to neutral metrics rather than failing
        let (metrics, has_history) = match self.source.price_history(&asset.id, ANALYSIS_DAYS).await {
            Ok(history) if !history.is_empty() => (TechnicalMetrics::from_history(&history), true),
            Ok(_) => (TechnicalMetrics::neutral(), false),
            Err(e) => {
                tracing::warn!(coin = %asset.id, error = %e, "Price history unavailable, using neutral metrics");
                (TechnicalMetrics::neutral(), false)
            }
        };

        let sustainability = self.scorer.score(&asset.id);
        let engine = RulesEngine::for_tolerance(risk);
        let recommendation = engine.recommend(&asset, &metrics, &sustainability);
        let position = position_size(
            engine.profile(),
            metrics.volatility,
            asset.effective_rank(),
            sustainability.total,
            portfolio_size,
        );

        tracing::debug!(
            coin = %asset.id,
            label = %recommendation.label,
            combined = recommendation.combined_score,
            "Investment analysis complete"
        );

        Ok(InvestmentReport {
            risk_level: metrics.risk_level(),
            asset,
            metrics,
            sustainability,
            recommendation,
            position,
            risk,
            horizon,
            portfolio_size,
            has_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::market::MockMarketData;
    use crate::model::RecommendationLabel;
    use rust_decimal_macros::dec;

    fn service(source: MockMarketData) -> InvestmentService {
        InvestmentService::new(Arc::new(source))
    }

    #[tokio::test]
    async fn test_analyze_known_coin() {
        let report = service(MockMarketData::new())
            .analyze("cardano", RiskTolerance::Moderate, dec!(10000), TimeHorizon::LongTerm)
            .await
            .unwrap();

        assert!(report.has_history);
        assert!(report.sustainability.has_profile);
        assert!(report.position.percent > 0.0);
        assert!(report.position.amount_usd > Decimal::ZERO);

        let md = report.to_markdown();
        assert!(md.contains("**Current Metrics:**"));
        assert!(md.contains("Long-term (> 3 years) Considerations"));
        assert!(md.contains("Risk Disclaimer"));
    }

    #[tokio::test]
    async fn test_rising_pos_coin_is_positive() {
        let rising = CryptoAsset::new("cardano", "ada", "Cardano", dec!(0.95))
            .with_rank(9)
            .with_changes(3.0, 4.0, 10.0);
        let report = service(MockMarketData::new().with_asset(rising))
            .analyze("cardano", RiskTolerance::Conservative, dec!(10000), TimeHorizon::MediumTerm)
            .await
            .unwrap();
        assert!(report.recommendation.label.is_positive());
    }

    #[tokio::test]
    async fn test_volatile_unprofiled_coin_is_avoided() {
        let pump = CryptoAsset::new("pumpcoin", "pump", "PumpCoin", dec!(0.01))
            .with_rank(400)
            .with_changes(25.0, 60.0, 200.0);
        let report = service(MockMarketData::with_swing(40.0).with_asset(pump))
            .analyze("pumpcoin", RiskTolerance::Moderate, dec!(10000), TimeHorizon::ShortTerm)
            .await
            .unwrap();

        assert!(!report.sustainability.has_profile);
        assert!(report.exceeds_tolerance());
        assert!(matches!(
            report.recommendation.label,
            RecommendationLabel::Avoid | RecommendationLabel::Caution
        ));
        assert!(report.to_markdown().contains("exceeds your moderate risk tolerance"));
    }

    #[tokio::test]
    async fn test_unknown_coin() {
        let err = service(MockMarketData::new())
            .analyze("notacoin", RiskTolerance::Moderate, dec!(1000), TimeHorizon::MediumTerm)
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::NotFound(_)));
    }
}
