//! Technical Analysis
//!
//! Price range, momentum, RSI and support/resistance for one coin.

use std::sync::Arc;

use serde::Serialize;

use super::investment::ANALYSIS_DAYS;
use super::usd_price;
use crate::analysis::{RsiSignal, TechnicalMetrics};
use crate::error::{AdvisorError, Result};
use crate::market::MarketDataSource;

#[derive(Clone, Debug, Serialize)]
pub struct TechnicalReport {
    pub coin_id: String,
    pub days: u32,
    pub metrics: TechnicalMetrics,
    pub signals: Vec<&'static str>,
}

impl TechnicalReport {
    pub fn to_markdown(&self) -> String {
        let m = &self.metrics;
        let mut s = String::new();

        s.push_str(&format!("**📊 Price Analysis ({} days):**\n", self.days));
        s.push_str(&format!("- Current Price: {}\n", usd_price(m.current_price)));
        s.push_str(&format!("- {}-day High: {}\n", self.days, usd_price(m.high)));
        s.push_str(&format!("- {}-day Low: {}\n", self.days, usd_price(m.low)));
        s.push_str(&format!("- Price Range: {:.1}% of range\n\n", m.range_position));

        s.push_str("**📈 Momentum Indicators:**\n");
        s.push_str(&format!("- 7-day Momentum: {:+.2}%\n", m.momentum_7d));
        s.push_str(&format!("- 30-day Momentum: {:+.2}%\n", m.momentum_30d));
        s.push_str(&format!("- {}-day Volatility: {:.1}%\n\n", self.days, m.volatility));

        s.push_str("**⚖️ RSI Analysis:**\n");
        s.push_str(&format!("- Current RSI: {:.1}\n", m.rsi));
        s.push_str(match m.rsi_signal() {
            RsiSignal::Oversold => "- Signal: **OVERSOLD** - Potential buying opportunity\n",
            RsiSignal::Overbought => "- Signal: **OVERBOUGHT** - Consider taking profits\n",
            RsiSignal::Neutral => "- Signal: **NEUTRAL** - No extreme conditions\n",
        });

        s.push_str("\n**🎯 Technical Signals:**\n");
        s.push_str(&format!("- **Resistance Level:** {}\n", usd_price(m.resistance)));
        s.push_str(&format!("- **Support Level:** {}\n", usd_price(m.support)));

        if !self.signals.is_empty() {
            s.push_str("\n**Key Signals:**\n");
            for signal in &self.signals {
                s.push_str(&format!("- {signal}\n"));
            }
        }

        s.push_str(
            "\n**⚠️ Technical Analysis Disclaimer:** Technical analysis is not predictive and should be \
             combined with fundamental analysis. Past performance does not guarantee future results.",
        );
        s
    }
}

pub struct TechnicalService {
    source: Arc<dyn MarketDataSource>,
}

impl TechnicalService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    pub async fn analyze(&self, coin_id: &str) -> Result<TechnicalReport> {
        let history = self.source.price_history(coin_id, ANALYSIS_DAYS).await?;
        if history.is_empty() {
            return Err(AdvisorError::DataUnavailable(format!(
                "insufficient price data for {coin_id}"
            )));
        }

        let metrics = TechnicalMetrics::from_history(&history);
        Ok(TechnicalReport {
            coin_id: history.coin_id.clone(),
            days: history.days,
            signals: metrics.key_signals(),
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketData;

    #[tokio::test]
    async fn test_technical_report() {
        let service = TechnicalService::new(Arc::new(MockMarketData::new()));
        let report = service.analyze("solana").await.unwrap();

        assert_eq!(report.days, ANALYSIS_DAYS);
        assert!(report.metrics.resistance < report.metrics.high);
        assert!(report.metrics.support > report.metrics.low);

        let md = report.to_markdown();
        assert!(md.contains("**⚖️ RSI Analysis:**"));
        assert!(md.contains("Resistance Level"));
        assert!(md.contains("Low volatility (stable conditions)"));
    }

    #[tokio::test]
    async fn test_unknown_coin() {
        let service = TechnicalService::new(Arc::new(MockMarketData::new()));
        assert!(matches!(
            service.analyze("notacoin").await,
            Err(AdvisorError::NotFound(_))
        ));
    }
}
