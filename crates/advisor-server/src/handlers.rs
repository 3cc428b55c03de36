//! HTTP Handlers

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crypto_advisor::analysis::ChartSeries;
use crypto_advisor::model::{DEFAULT_PORTFOLIO_SIZE, validate_portfolio_size};
use crypto_advisor::svckit::{
    ComparisonReport, DominanceRegime, InvestmentReport, MarketSentiment, TechnicalReport,
    render_overview, render_plan, render_report,
};
use crypto_advisor::sustainability::{SustainabilityReport, SustainabilityScore};
use crypto_advisor::{
    AdvisorError, AllocationPlan, CryptoAsset, MarketOverview, QueryIntent, RiskTolerance,
    TimeHorizon, TrendingCoin,
};
use market_data::CacheStats;

use crate::state::AppState;

const DEFAULT_TOP_LIMIT: usize = 10;
const MAX_TOP_LIMIT: usize = 100;
const DEFAULT_CHART_DAYS: u32 = 30;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub data_source: String,
    pub upstream_connected: bool,
}

#[derive(Serialize)]
pub struct OverviewResponse {
    pub overview: MarketOverview,
    pub sentiment: MarketSentiment,
    pub dominance: DominanceRegime,
    pub text: String,
}

/// Structured report plus its Markdown rendering
#[derive(Serialize)]
pub struct ReportResponse<T> {
    pub report: T,
    pub text: String,
}

#[derive(Serialize)]
pub struct AdviceResponse {
    pub intent: QueryIntent,
    pub answer: String,
}

#[derive(Serialize)]
pub struct CacheStatsResponse {
    pub enabled: bool,
    #[serde(flatten)]
    pub stats: CacheStats,
}

#[derive(Serialize)]
pub struct CacheClearResponse {
    pub cleared: bool,
}

// ============================================================================
// Request Types
// ============================================================================

/// Dashboard form inputs; all optional
#[derive(Debug, Default, Deserialize)]
pub struct AdvisorParams {
    pub risk: Option<String>,
    pub portfolio: Option<String>,
    pub horizon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    pub coins: Option<String>,
    pub risk: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub query: String,
    #[serde(default)]
    pub portfolio_size: Option<Decimal>,
    #[serde(default)]
    pub risk_tolerance: Option<String>,
    #[serde(default)]
    pub time_horizon: Option<String>,
}

// ============================================================================
// Input Parsing
// ============================================================================

fn api_error(err: &AdvisorError) -> ApiError {
    let (status, code) = match err {
        AdvisorError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        AdvisorError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        AdvisorError::DataUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "DATA_UNAVAILABLE"),
        AdvisorError::RateLimited(_) => (StatusCode::SERVICE_UNAVAILABLE, "RATE_LIMITED"),
        AdvisorError::Config(_) | AdvisorError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    if status.is_server_error() {
        tracing::warn!(error = %err, "Request failed");
    }

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

fn bad_request(message: impl Into<String>) -> ApiError {
    api_error(&AdvisorError::InvalidInput(message.into()))
}

fn parse_or_default<T: FromStr<Err = AdvisorError> + Default>(value: Option<&str>) -> Result<T, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse().map_err(|e| api_error(&e)),
        None => Ok(T::default()),
    }
}

fn parse_portfolio(value: Option<&str>) -> Result<Decimal, ApiError> {
    let size = match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Decimal::from_str(v).map_err(|_| bad_request(format!("portfolio size '{v}' is not a number")))?,
        None => DEFAULT_PORTFOLIO_SIZE,
    };
    validate_portfolio_size(size).map_err(|e| api_error(&e))
}

impl AdvisorParams {
    fn parse(&self) -> Result<(RiskTolerance, Decimal, TimeHorizon), ApiError> {
        Ok((
            parse_or_default(self.risk.as_deref())?,
            parse_portfolio(self.portfolio.as_deref())?,
            parse_or_default(self.horizon.as_deref())?,
        ))
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let source = state.advisor.source();
    let upstream_connected = source.health_check().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        data_source: source.name().to_string(),
        upstream_connected,
    })
}

pub async fn market_overview(State(state): State<AppState>) -> ApiResult<OverviewResponse> {
    let overview = state
        .advisor
        .source()
        .market_overview()
        .await
        .map_err(|e| api_error(&e))?;

    Ok(Json(OverviewResponse {
        sentiment: MarketSentiment::from_change(overview.market_cap_change_24h),
        dominance: DominanceRegime::from_dominance(overview.btc_dominance),
        text: render_overview(&overview),
        overview,
    }))
}

pub async fn top_assets(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> ApiResult<Vec<CryptoAsset>> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    if !(1..=MAX_TOP_LIMIT).contains(&limit) {
        return Err(bad_request(format!("limit must be between 1 and {MAX_TOP_LIMIT}")));
    }

    let assets = state
        .advisor
        .source()
        .top_assets(limit)
        .await
        .map_err(|e| api_error(&e))?;
    Ok(Json(assets))
}

pub async fn trending(State(state): State<AppState>) -> ApiResult<Vec<TrendingCoin>> {
    let coins = state
        .advisor
        .source()
        .trending()
        .await
        .map_err(|e| api_error(&e))?;
    Ok(Json(coins))
}

pub async fn coin_analysis(
    State(state): State<AppState>,
    Path(coin): Path<String>,
    Query(params): Query<AdvisorParams>,
) -> ApiResult<ReportResponse<InvestmentReport>> {
    let (risk, portfolio, horizon) = params.parse()?;

    let report = state
        .advisor
        .investment_report(&coin, risk, portfolio, horizon)
        .await
        .map_err(|e| api_error(&e))?;

    Ok(Json(ReportResponse {
        text: report.to_markdown(),
        report,
    }))
}

pub async fn coin_chart(
    State(state): State<AppState>,
    Path(coin): Path<String>,
    Query(params): Query<ChartParams>,
) -> ApiResult<ChartSeries> {
    let days = params.days.unwrap_or(DEFAULT_CHART_DAYS);
    let series = state
        .advisor
        .chart(&coin, days)
        .await
        .map_err(|e| api_error(&e))?;
    Ok(Json(series))
}

pub async fn coin_technical(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> ApiResult<ReportResponse<TechnicalReport>> {
    let report = state
        .advisor
        .technical_report(&coin)
        .await
        .map_err(|e| api_error(&e))?;

    Ok(Json(ReportResponse {
        text: report.to_markdown(),
        report,
    }))
}

pub async fn compare(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> ApiResult<ReportResponse<ComparisonReport>> {
    let risk = parse_or_default(params.risk.as_deref())?;
    let raw = params.coins.unwrap_or_default();
    let coins: Vec<&str> = raw.split(',').map(str::trim).filter(|c| !c.is_empty()).collect();

    let report = state
        .advisor
        .compare(&coins, risk)
        .await
        .map_err(|e| api_error(&e))?;

    Ok(Json(ReportResponse {
        text: report.to_markdown(),
        report,
    }))
}

pub async fn portfolio(
    State(state): State<AppState>,
    Query(params): Query<AdvisorParams>,
) -> ApiResult<ReportResponse<AllocationPlan>> {
    let (risk, portfolio, horizon) = params.parse()?;

    let plan = state
        .advisor
        .portfolio_plan(portfolio, risk, horizon)
        .await
        .map_err(|e| api_error(&e))?;

    Ok(Json(ReportResponse {
        text: render_plan(&plan),
        report: plan,
    }))
}

pub async fn sustainability_report(
    State(state): State<AppState>,
) -> Json<ReportResponse<SustainabilityReport>> {
    let report = state.advisor.sustainability_report();
    Json(ReportResponse {
        text: render_report(&report),
        report,
    })
}

pub async fn sustainability_recommendations(
    State(state): State<AppState>,
    Query(params): Query<AdvisorParams>,
) -> ApiResult<Vec<SustainabilityScore>> {
    let risk = parse_or_default(params.risk.as_deref())?;
    Ok(Json(state.advisor.sustainability_recommendations(risk)))
}

pub async fn coin_sustainability(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> ApiResult<SustainabilityScore> {
    let score = state.advisor.sustainability(&coin).map_err(|e| api_error(&e))?;
    Ok(Json(score))
}

/// Keyword-routed free-text question
pub async fn advice(
    State(state): State<AppState>,
    Json(payload): Json<AdviceRequest>,
) -> ApiResult<AdviceResponse> {
    if payload.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let risk = parse_or_default(payload.risk_tolerance.as_deref())?;
    let horizon = parse_or_default(payload.time_horizon.as_deref())?;
    let portfolio = validate_portfolio_size(payload.portfolio_size.unwrap_or(DEFAULT_PORTFOLIO_SIZE))
        .map_err(|e| api_error(&e))?;

    let answer = state
        .advisor
        .process_query(&payload.query, portfolio, risk, horizon)
        .await;

    Ok(Json(AdviceResponse {
        intent: QueryIntent::classify(&payload.query),
        answer,
    }))
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        enabled: state.fetcher.is_some(),
        stats: state
            .fetcher
            .as_ref()
            .map(|f| f.cache_stats())
            .unwrap_or_default(),
    })
}

pub async fn cache_clear(State(state): State<AppState>) -> Json<CacheClearResponse> {
    let cleared = if let Some(fetcher) = &state.fetcher {
        fetcher.clear_cache();
        true
    } else {
        false
    };
    Json(CacheClearResponse { cleared })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_defaults() {
        let params = AdvisorParams::default();
        let (risk, portfolio, horizon) = params.parse().unwrap();
        assert_eq!(risk, RiskTolerance::Moderate);
        assert_eq!(portfolio, dec!(10000));
        assert_eq!(horizon, TimeHorizon::MediumTerm);
    }

    #[test]
    fn test_parse_values() {
        let params = AdvisorParams {
            risk: Some("Aggressive".into()),
            portfolio: Some("2500.50".into()),
            horizon: Some("long-term".into()),
        };
        let (risk, portfolio, horizon) = params.parse().unwrap();
        assert_eq!(risk, RiskTolerance::Aggressive);
        assert_eq!(portfolio, dec!(2500.50));
        assert_eq!(horizon, TimeHorizon::LongTerm);
    }

    #[test]
    fn test_parse_rejects_bad_portfolio() {
        for bad in ["50", "2000000", "lots"] {
            let params = AdvisorParams {
                portfolio: Some(bad.into()),
                ..AdvisorParams::default()
            };
            let (status, body) = params.parse().unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.code, "INVALID_INPUT");
        }
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(api_error(&AdvisorError::NotFound("x".into())).0, StatusCode::NOT_FOUND);
        assert_eq!(
            api_error(&AdvisorError::DataUnavailable("down".into())).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        let (status, body) = api_error(&AdvisorError::RateLimited("429".into()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "RATE_LIMITED");
    }
}
