//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Product search
        .route("/products/search", get(handlers::search_all))
        .route("/products/search/:provider", get(handlers::search_provider))
        .route("/products/city/:city", get(handlers::search_city))
        // Introspection
        .route("/providers", get(handlers::providers))
        .route("/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        // Add middleware
        .layer(CompressionLayer::new())
        .layer(cors)
        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::providers::mock::MockProvider;
    use crate::providers::{CityRouter, ProviderRegistry};
    use crate::search::Search;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let mut registry = ProviderRegistry::new();
        for mock in [
            MockProvider::new("sagosa").returns(10),
            MockProvider::new("forte").returns(10),
            MockProvider::new("perren").fails(),
        ] {
            registry.register(mock.key(), mock.capability(), Duration::from_secs(5));
        }
        let cities = CityRouter::new([("trelew", ["sagosa", "perren"])], &registry).unwrap();

        let search = Search::new(Arc::new(registry), Arc::new(cities));
        create_router(AppState::with_search(Settings::default(), search))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_search_all() {
        let (status, body) = get_json("/products/search?search=cemento&limit=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "cemento");
        assert_eq!(body["total"], 10);
        assert_eq!(body["items"][0]["name"], "sagosa-0");
        assert_eq!(body["items"][7]["name"], "forte-0");
        assert!(body.get("city").is_none());
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let (status, body) = get_json("/products/search?limit=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("search"));
    }

    #[tokio::test]
    async fn test_search_limit_out_of_range() {
        let (status, _) = get_json("/products/search?search=cal&limit=101").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json("/products/search?search=cal&limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_provider() {
        let (status, body) = get_json("/products/search/Forte?search=cal").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 10);

        let (status, body) = get_json("/products/search/perren?search=cal").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);

        let (status, _) = get_json("/products/search/easy?search=cal").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_city() {
        let (status, body) = get_json("/products/city/Trelew?search=cal&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "trelew");
        assert_eq!(body["total"], 5);

        let (status, _) = get_json("/products/city/rawson?search=cal").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_providers_listing() {
        let (status, body) = get_json("/providers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["providers"].as_array().unwrap().len(), 3);
        assert_eq!(body["providers"][0]["name"], "sagosa");
        assert_eq!(body["providers"][0]["kind"], "suspending");
        assert_eq!(body["cities"]["trelew"][1], "perren");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = get_json("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Route not found");
    }
}
