//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    advice, cache_clear, cache_stats, coin_analysis, coin_chart, coin_sustainability,
    coin_technical, compare, health_check, market_overview, portfolio, sustainability_recommendations,
    sustainability_report, top_assets, trending,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))
        // Market
        .route("/api/market/overview", get(market_overview))
        .route("/api/market/top", get(top_assets))
        .route("/api/market/trending", get(trending))
        // Per-coin
        .route("/api/coins/{coin}/analysis", get(coin_analysis))
        .route("/api/coins/{coin}/chart", get(coin_chart))
        .route("/api/coins/{coin}/technical", get(coin_technical))
        // Portfolio
        .route("/api/compare", get(compare))
        .route("/api/portfolio", get(portfolio))
        // Sustainability
        .route("/api/sustainability/report", get(sustainability_report))
        .route("/api/sustainability/recommendations", get(sustainability_recommendations))
        .route("/api/sustainability/{coin}", get(coin_sustainability))
        // Free-text advice
        .route("/api/advice", post(advice))
        // Cache maintenance
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/cache/clear", post(cache_clear))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use crypto_advisor::MockMarketData;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::with_source(Arc::new(MockMarketData::new())))
    }

    fn offline_app() -> Router {
        build_router(AppState::with_source(Arc::new(MockMarketData::offline())))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["data_source"], "MockMarketData");
        assert_eq!(body["upstream_connected"], true);
    }

    #[tokio::test]
    async fn test_market_endpoints() {
        let (status, body) = get_json(app(), "/api/market/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().contains("Market Overview"));

        let (status, body) = get_json(app(), "/api/market/top?limit=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["id"], "bitcoin");

        let (status, _) = get_json(app(), "/api/market/top?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_json(app(), "/api/market/trending").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_coin_analysis_by_ticker() {
        let (status, body) =
            get_json(app(), "/api/coins/ADA/analysis?risk=conservative&portfolio=5000&horizon=long").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["asset"]["id"], "cardano");
        assert_eq!(body["report"]["risk"], "conservative");
        assert!(body["text"].as_str().unwrap().contains("Risk Disclaimer"));
    }

    #[tokio::test]
    async fn test_unknown_coin_is_404() {
        let (status, body) = get_json(app(), "/api/coins/notacoin/analysis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body["error"].as_str().unwrap().contains("couldn't find"));
    }

    #[tokio::test]
    async fn test_invalid_inputs_are_400() {
        let (status, _) = get_json(app(), "/api/coins/bitcoin/analysis?portfolio=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(), "/api/coins/bitcoin/analysis?risk=yolo").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(), "/api/coins/bitcoin/chart?days=400").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(), "/api/compare?coins=bitcoin").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_down_is_503() {
        let (status, body) = get_json(offline_app(), "/api/coins/bitcoin/analysis").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("unavailable"));

        let (status, body) = get_json(offline_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["upstream_connected"], false);
    }

    #[tokio::test]
    async fn test_chart_series() {
        let (status, body) = get_json(app(), "/api/coins/bitcoin/chart?days=60").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"], 60);
        let points = body["points"].as_array().unwrap().len();
        assert_eq!(body["sma_short"].as_array().unwrap().len(), points);
        assert!(body["sma_long"][0].is_null());
    }

    #[tokio::test]
    async fn test_technical() {
        let (status, body) = get_json(app(), "/api/coins/eth/technical").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["coin_id"], "ethereum");
    }

    #[tokio::test]
    async fn test_compare() {
        let (status, body) = get_json(app(), "/api/compare?coins=bitcoin,%20ethereum,cardano&risk=moderate").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["entries"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_portfolio() {
        let (status, body) = get_json(app(), "/api/portfolio?risk=conservative&portfolio=10000").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().contains("Bitcoin (BTC)"));
        assert!(!body["report"]["allocations"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sustainability_endpoints() {
        let (status, body) = get_json(app(), "/api/sustainability/cardano").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_profile"], true);

        let (status, body) = get_json(app(), "/api/sustainability/recommendations?risk=aggressive").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 8);

        let (status, body) = get_json(app(), "/api/sustainability/report").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].is_string());
    }

    #[tokio::test]
    async fn test_sustainability_unknown_coin_is_404() {
        let (status, body) = get_json(app(), "/api/sustainability/zorkcoin").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_advice() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/advice")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "query": "Should I invest in Cardano?",
                    "portfolio_size": 5000,
                    "risk_tolerance": "conservative",
                    "time_horizon": "long_term"
                })
                .to_string(),
            ))
            .unwrap();

        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], "investment");
        assert!(body["answer"].as_str().unwrap().contains("Cardano"));
    }

    #[tokio::test]
    async fn test_advice_rejects_empty_query() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/advice")
            .header("content-type", "application/json")
            .body(Body::from(json!({"query": "  "}).to_string()))
            .unwrap();

        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cache_endpoints_without_fetcher() {
        let (status, body) = get_json(app(), "/api/cache/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enabled"], false);
        assert_eq!(body["total_items"], 0);

        let request = Request::builder()
            .method("POST")
            .uri("/api/cache/clear")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cleared"], false);
    }
}
