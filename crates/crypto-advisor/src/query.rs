//! Query Router
//!
//! Keyword classification of free-text questions and the `Advisor` facade
//! that answers them with Markdown. Matching is plain keyword lookup; there
//! is no language model behind it.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::analysis::ChartSeries;
use crate::catalog::{self, CoinRef};
use crate::error::{AdvisorError, Result};
use crate::market::MarketDataSource;
use crate::model::{RiskTolerance, TimeHorizon};
use crate::strategy::AllocationPlan;
use crate::sustainability::{SustainabilityReport, SustainabilityScore, SustainabilityScorer};
use crate::svckit::{
    ComparisonReport, ComparisonService, InvestmentReport, InvestmentService, PortfolioService,
    TechnicalReport, TechnicalService, beginner_guidance, capabilities_help,
    general_sustainability_info, render_overview, render_plan, render_scores,
    risk_management_advice,
};

/// Longest chart window accepted
pub const MAX_CHART_DAYS: u32 = 365;

/// What a question is about, checked in this order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    Comparison,
    Investment,
    Portfolio,
    Sustainability,
    PriceAnalysis,
    General,
}

const COMPARISON_WORDS: &[&str] = &["compare", "vs", "versus", "between"];
const INVESTMENT_WORDS: &[&str] = &["should i invest", "buy", "recommend"];
const PORTFOLIO_WORDS: &[&str] = &["portfolio", "allocation", "diversify"];
const SUSTAINABILITY_WORDS: &[&str] = &["sustainability", "environment", "green", "energy"];
const PRICE_WORDS: &[&str] = &["price", "trend", "analysis", "technical"];

/// Words after which an unknown coin id is likely to follow
const COIN_LEAD_WORDS: &[&str] = &["in", "about", "buy", "analyze", "analyse", "on", "of"];

impl QueryIntent {
    pub fn classify(query: &str) -> Self {
        let words = tokenize(query);
        let has = |keywords: &[&str]| keywords.iter().any(|k| contains_keyword(&words, k));

        if has(COMPARISON_WORDS) {
            Self::Comparison
        } else if has(INVESTMENT_WORDS) {
            Self::Investment
        } else if has(PORTFOLIO_WORDS) {
            Self::Portfolio
        } else if has(SUSTAINABILITY_WORDS) {
            Self::Sustainability
        } else if has(PRICE_WORDS) {
            Self::PriceAnalysis
        } else {
            Self::General
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whole-word match; multi-word keywords must appear as a consecutive run
fn contains_keyword(words: &[String], keyword: &str) -> bool {
    let parts: Vec<&str> = keyword.split_whitespace().collect();
    if parts.is_empty() {
        return false;
    }
    words
        .windows(parts.len())
        .any(|w| w.iter().zip(&parts).all(|(a, b)| a == b))
}

/// A coin named in a question: either from the catalog or a raw id to try
#[derive(Clone, Debug, PartialEq, Eq)]
struct Mention {
    id: String,
    display: String,
}

impl From<CoinRef> for Mention {
    fn from(coin: CoinRef) -> Self {
        Self {
            id: coin.id.to_string(),
            display: coin.name.to_string(),
        }
    }
}

fn mentions(query: &str) -> Vec<Mention> {
    let known: Vec<Mention> = catalog::extract_mentions(query).into_iter().map(Mention::from).collect();
    if !known.is_empty() {
        return known;
    }

    // Fall back to the word after "in", "about" etc. and let the source decide
    let words = tokenize(query);
    words
        .windows(2)
        .filter(|w| COIN_LEAD_WORDS.contains(&w[0].as_str()))
        .filter_map(|w| catalog::passthrough_id(&w[1]))
        .filter(|id| !is_stopword(id))
        .map(|id| Mention {
            display: id.clone(),
            id,
        })
        .take(1)
        .collect()
}

fn is_stopword(word: &str) -> bool {
    matches!(
        word,
        "a" | "an" | "the" | "it" | "crypto" | "cryptocurrency" | "cryptocurrencies" | "my" | "this"
            | "that" | "now" | "today" | "some" | "more" | "price" | "trends" | "trend"
    )
}

fn title_case(text: &str) -> String {
    let mut chars = text.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Entry point for every dashboard operation
pub struct Advisor {
    source: Arc<dyn MarketDataSource>,
    investment: InvestmentService,
    comparison: ComparisonService,
    portfolio: PortfolioService,
    technical: TechnicalService,
    scorer: SustainabilityScorer,
}

impl Advisor {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            investment: InvestmentService::new(Arc::clone(&source)),
            comparison: ComparisonService::new(Arc::clone(&source)),
            portfolio: PortfolioService::new(Arc::clone(&source)),
            technical: TechnicalService::new(Arc::clone(&source)),
            scorer: SustainabilityScorer::new(),
            source,
        }
    }

    pub fn source(&self) -> &Arc<dyn MarketDataSource> {
        &self.source
    }

    /// Map user input (name, ticker or id) to a data source id
    pub fn resolve_coin(&self, input: &str) -> Result<String> {
        catalog::resolve(input)
            .map(|c| c.id.to_string())
            .or_else(|| catalog::passthrough_id(input))
            .ok_or_else(|| AdvisorError::NotFound(input.trim().to_string()))
    }

    pub async fn investment_report(
        &self,
        coin: &str,
        risk: RiskTolerance,
        portfolio_size: Decimal,
        horizon: TimeHorizon,
    ) -> Result<InvestmentReport> {
        let id = self.resolve_coin(coin)?;
        self.investment.analyze(&id, risk, portfolio_size, horizon).await
    }

    pub async fn technical_report(&self, coin: &str) -> Result<TechnicalReport> {
        let id = self.resolve_coin(coin)?;
        self.technical.analyze(&id).await
    }

    pub async fn compare(&self, coins: &[&str], risk: RiskTolerance) -> Result<ComparisonReport> {
        let mut ids: Vec<String> = Vec::new();
        for coin in coins {
            let id = self.resolve_coin(coin)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        self.comparison.compare(&ids, risk).await
    }

    pub async fn portfolio_plan(
        &self,
        portfolio_size: Decimal,
        risk: RiskTolerance,
        horizon: TimeHorizon,
    ) -> Result<AllocationPlan> {
        self.portfolio.recommend(portfolio_size, risk, horizon).await
    }

    /// Price series with moving averages for the last `days` (1..=365)
    pub async fn chart(&self, coin: &str, days: u32) -> Result<ChartSeries> {
        if !(1..=MAX_CHART_DAYS).contains(&days) {
            return Err(AdvisorError::InvalidInput(format!(
                "days must be between 1 and {MAX_CHART_DAYS}, got {days}"
            )));
        }
        let id = self.resolve_coin(coin)?;
        let history = self.source.price_history(&id, days).await?;
        Ok(ChartSeries::from_history(&history))
    }

    /// Score a catalog coin. Unlisted input is not found rather than
    /// scored against the default profile.
    pub fn sustainability(&self, coin: &str) -> Result<SustainabilityScore> {
        let coin_ref = catalog::resolve(coin)
            .ok_or_else(|| AdvisorError::NotFound(coin.trim().to_string()))?;
        Ok(self.scorer.score(coin_ref.id))
    }

    pub fn sustainability_report(&self) -> SustainabilityReport {
        self.scorer.report()
    }

    pub fn sustainability_recommendations(&self, risk: RiskTolerance) -> Vec<SustainabilityScore> {
        self.scorer.recommendations(risk)
    }

    /// Answer a free-text question. Failures become user-facing text.
    pub async fn process_query(
        &self,
        query: &str,
        portfolio_size: Decimal,
        risk: RiskTolerance,
        horizon: TimeHorizon,
    ) -> String {
        let intent = QueryIntent::classify(query);
        tracing::info!(?intent, risk = %risk, "Processing query");

        match intent {
            QueryIntent::Comparison => self.answer_comparison(query, risk).await,
            QueryIntent::Investment => self.answer_investment(query, portfolio_size, risk, horizon).await,
            QueryIntent::Portfolio => self.answer_portfolio(portfolio_size, risk, horizon).await,
            QueryIntent::Sustainability => self.answer_sustainability(query),
            QueryIntent::PriceAnalysis => self.answer_price_analysis(query).await,
            QueryIntent::General => self.answer_general(query, risk).await,
        }
    }

    async fn answer_comparison(&self, query: &str, risk: RiskTolerance) -> String {
        let coins = mentions(query);
        if coins.len() < 2 {
            return "Please specify at least two cryptocurrencies to compare. For example: 'Compare Bitcoin vs Ethereum'".into();
        }

        let ids: Vec<String> = coins.into_iter().map(|m| m.id).collect();
        match self.comparison.compare(&ids, risk).await {
            Ok(report) => report.to_markdown(),
            Err(e) => e.user_message(),
        }
    }

    async fn answer_investment(
        &self,
        query: &str,
        portfolio_size: Decimal,
        risk: RiskTolerance,
        horizon: TimeHorizon,
    ) -> String {
        let Some(coin) = mentions(query).into_iter().next() else {
            return "Please specify which cryptocurrency you're asking about. For example: 'Should I invest in Bitcoin?'".into();
        };

        match self.investment.analyze(&coin.id, risk, portfolio_size, horizon).await {
            Ok(report) => format!(
                "## 💰 Investment Analysis for {}\n\n{}",
                report.asset.name,
                report.to_markdown()
            ),
            Err(AdvisorError::NotFound(_)) => {
                AdvisorError::NotFound(title_case(&coin.display)).user_message()
            }
            Err(e) => e.user_message(),
        }
    }

    async fn answer_portfolio(
        &self,
        portfolio_size: Decimal,
        risk: RiskTolerance,
        horizon: TimeHorizon,
    ) -> String {
        match self.portfolio.recommend(portfolio_size, risk, horizon).await {
            Ok(plan) => render_plan(&plan),
            Err(e) => format!(
                "## 💼 Portfolio Allocation Recommendation\n\n{}",
                e.user_message()
            ),
        }
    }

    fn answer_sustainability(&self, query: &str) -> String {
        // Scores come from the static table, so only catalog coins count here
        let coins = catalog::extract_mentions(query);
        if coins.is_empty() {
            return format!("## 🌱 Sustainability Analysis\n\n{}", general_sustainability_info());
        }

        let scores: Vec<SustainabilityScore> = coins.iter().map(|c| self.scorer.score(c.id)).collect();
        render_scores(&scores)
    }

    async fn answer_price_analysis(&self, query: &str) -> String {
        let Some(coin) = mentions(query).into_iter().next() else {
            return "Please specify which cryptocurrency you'd like me to analyze. For example: 'Analyze Bitcoin price trends'".into();
        };

        match self.technical.analyze(&coin.id).await {
            Ok(report) => format!(
                "## 📈 Technical Analysis for {}\n\n{}",
                title_case(&coin.display),
                report.to_markdown()
            ),
            Err(AdvisorError::NotFound(_)) => format!(
                "I couldn't find price data for {}. Please check the spelling.",
                title_case(&coin.display)
            ),
            Err(e) => e.user_message(),
        }
    }

    async fn answer_general(&self, query: &str, risk: RiskTolerance) -> String {
        let words = tokenize(query);
        let mut s = String::from("## 💡 General Cryptocurrency Guidance\n\n");

        if contains_keyword(&words, "beginner") || contains_keyword(&words, "start") {
            s.push_str(&beginner_guidance(risk));
        } else if contains_keyword(&words, "market") {
            match self.source.market_overview().await {
                Ok(overview) => s.push_str(&render_overview(&overview)),
                Err(e) => s.push_str(&e.user_message()),
            }
        } else if contains_keyword(&words, "risk") {
            s.push_str(risk_management_advice());
        } else {
            s.push_str(capabilities_help());
        }

        s
    }
}
