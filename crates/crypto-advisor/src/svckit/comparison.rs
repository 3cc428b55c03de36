//! Coin Comparison
//!
//! Side-by-side analysis of up to three coins with rankings by market
//! position, 24h performance and sustainability.

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::InvestmentService;
use super::change_indicator;
use crate::error::{AdvisorError, Result};
use crate::market::MarketDataSource;
use crate::model::{RecommendationLabel, RiskTolerance, TimeHorizon};
use crate::sustainability::sustainability_badge;

/// Most coins compared at once
pub const MAX_COMPARED: usize = 3;

/// One coin's line in a comparison
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonEntry {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: u32,
    pub change_24h: f64,
    pub volatility: f64,
    pub rsi: f64,
    pub sustainability_score: f64,
    pub label: RecommendationLabel,
    pub combined_score: f64,

    /// Markdown summary block
    pub summary: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComparisonReport {
    pub risk: RiskTolerance,

    /// Entries in request order
    pub entries: Vec<ComparisonEntry>,

    /// Coins that could not be analyzed, with the reason
    pub skipped: Vec<(String, String)>,
}

impl ComparisonReport {
    /// Entries ordered by market cap rank (most established first)
    pub fn by_market_position(&self) -> Vec<&ComparisonEntry> {
        let mut v: Vec<_> = self.entries.iter().collect();
        v.sort_by_key(|e| e.market_cap_rank);
        v
    }

    /// Entries ordered by 24h change, best first
    pub fn by_performance(&self) -> Vec<&ComparisonEntry> {
        let mut v: Vec<_> = self.entries.iter().collect();
        v.sort_by(|a, b| b.change_24h.total_cmp(&a.change_24h));
        v
    }

    /// Entries ordered by sustainability score, best first
    pub fn by_sustainability(&self) -> Vec<&ComparisonEntry> {
        let mut v: Vec<_> = self.entries.iter().collect();
        v.sort_by(|a, b| b.sustainability_score.total_cmp(&a.sustainability_score));
        v
    }

    /// The most established coin in the comparison
    pub fn recommended(&self) -> Option<&ComparisonEntry> {
        self.by_market_position().into_iter().next()
    }

    pub fn to_markdown(&self) -> String {
        let mut s = String::from("## 🔍 Cryptocurrency Comparison\n\n");

        for entry in &self.entries {
            s.push_str(&format!("### {} ({})\n{}\n", entry.name, entry.symbol, entry.summary));
        }

        for (coin, reason) in &self.skipped {
            s.push_str(&format!("_{coin}: {reason}_\n\n"));
        }

        s.push_str("### 📋 Comparison Summary\n\n");

        s.push_str("**Market Position Ranking:**\n");
        for (i, e) in self.by_market_position().iter().enumerate() {
            s.push_str(&format!("{}. {} (Rank #{})\n", i + 1, e.name, e.market_cap_rank));
        }

        s.push_str("\n**24h Performance:**\n");
        for (i, e) in self.by_performance().iter().enumerate() {
            s.push_str(&format!(
                "{}. {}: {:+.2}% {}\n",
                i + 1,
                e.name,
                e.change_24h,
                change_indicator(e.change_24h)
            ));
        }

        s.push_str("\n**Sustainability Ranking:**\n");
        for (i, e) in self.by_sustainability().iter().enumerate() {
            s.push_str(&format!(
                "{}. {}: {}/100 {}\n",
                i + 1,
                e.name,
                e.sustainability_score,
                sustainability_badge(e.sustainability_score)
            ));
        }

        if let Some(best) = self.recommended() {
            s.push_str(&format!("\n**For {} Risk Profile:**\n", self.risk));
            s.push_str(&format!(
                "**Recommended:** {} - Most established with lowest risk\n",
                best.name
            ));
        }

        s
    }
}

/// Compares coins using the investment service
pub struct ComparisonService {
    investment: InvestmentService,
}

impl ComparisonService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            investment: InvestmentService::new(source),
        }
    }

    /// Compare two or three coins (extra ids are ignored)
    pub async fn compare(&self, coin_ids: &[String], risk: RiskTolerance) -> Result<ComparisonReport> {
        if coin_ids.len() < 2 {
            return Err(AdvisorError::InvalidInput(
                "Please specify at least two cryptocurrencies to compare".into(),
            ));
        }

        let ids = &coin_ids[..coin_ids.len().min(MAX_COMPARED)];
        let analyses = join_all(ids.iter().map(|id| {
            self.investment
                .analyze(id, risk, dec!(10000), TimeHorizon::default())
        }))
        .await;

        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        let mut first_error = None;

        for (id, result) in ids.iter().zip(analyses) {
            match result {
                Ok(report) => entries.push(ComparisonEntry {
                    coin_id: report.asset.id.clone(),
                    name: report.asset.name.clone(),
                    symbol: report.asset.symbol.clone(),
                    market_cap_rank: report.asset.effective_rank(),
                    change_24h: report.asset.change_24h,
                    volatility: report.metrics.volatility,
                    rsi: report.metrics.rsi,
                    sustainability_score: report.sustainability.total,
                    label: report.recommendation.label,
                    combined_score: report.recommendation.combined_score,
                    summary: report.summary_markdown(),
                }),
                Err(e) => {
                    tracing::warn!(coin = %id, error = %e, "Comparison skipped coin");
                    skipped.push((id.clone(), e.user_message()));
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if entries.is_empty() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        Ok(ComparisonReport { risk, entries, skipped })
    }
}
