//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Geocoding
        .route("/api/geocode", post(handlers::geocode))
        .route("/api/geocode/stats", get(handlers::cache_stats))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use cymru_geocoder::GeocoderConfig;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::state::ApiConfig;

    struct TestApp {
        router: Router,
        _dir: TempDir,
    }

    fn test_app(api_url: &str, api_key: Option<&str>) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let config = ApiConfig {
            api_key: api_key.map(String::from),
            geocoder: GeocoderConfig::with_cache_file(dir.path().join("cache.json")).api_url(api_url),
        };
        let state = Arc::new(AppState::new(config).unwrap());
        TestApp {
            router: create_router(state),
            _dir: dir,
        }
    }

    async fn mock_provider() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("address", "Cardiff RFC, Wales, UK"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [{ "geometry": { "location": { "lat": 51.4816, "lng": -3.1791 } } }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("address", "Unknown FC, Wales, UK"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })))
            .mount(&server)
            .await;
        server
    }

    async fn post_json(app: &Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/geocode")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app("http://127.0.0.1:9", Some("key"));

        let response = app
            .router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_single_name() {
        let server = mock_provider().await;
        let app = test_app(&server.uri(), Some("key"));

        let (status, body) = post_json(&app.router, json!({ "organizationName": "Cardiff RFC" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "lat": 51.4816, "lng": -3.1791 }));
    }

    #[tokio::test]
    async fn test_single_name_not_found_is_null() {
        let server = mock_provider().await;
        let app = test_app(&server.uri(), Some("key"));

        let (status, body) = post_json(&app.router, json!({ "organizationName": "Unknown FC" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_batch_names() {
        let server = mock_provider().await;
        let app = test_app(&server.uri(), Some("key"));

        let (status, body) = post_json(
            &app.router,
            json!({ "organizationNames": ["Cardiff RFC", "Unknown FC", "Cardiff RFC"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "results": {
                "Cardiff RFC": { "lat": 51.4816, "lng": -3.1791 },
                "Unknown FC": null
            }})
        );
    }

    #[tokio::test]
    async fn test_repeat_request_served_from_cache() {
        let server = mock_provider().await;
        let app = test_app(&server.uri(), Some("key"));

        post_json(&app.router, json!({ "organizationNames": ["Cardiff RFC", "Unknown FC"] })).await;
        post_json(&app.router, json!({ "organizationNames": ["Cardiff RFC", "Unknown FC"] })).await;

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_names_rejected() {
        let app = test_app("http://127.0.0.1:9", Some("key"));

        let (status, body) = post_json(&app.router, json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let (status, _) = post_json(&app.router, json!({ "organizationNames": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(&app.router, json!({ "organizationNames": ["Neath RFC", "  "] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let app = test_app("http://127.0.0.1:9", Some("key"));

        let (status, body) = post_json(&app.router, json!({ "organizationNames": "Neath RFC" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let server = mock_provider().await;
        let app = test_app(&server.uri(), None);

        let (status, body) = post_json(&app.router, json!({ "organizationName": "Cardiff RFC" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "CONFIG_ERROR");
        assert_eq!(body["error"]["message"], "Google Maps API key not configured");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let server = mock_provider().await;
        let app = test_app(&server.uri(), Some("key"));

        post_json(&app.router, json!({ "organizationNames": ["Cardiff RFC", "Unknown FC"] })).await;

        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/api/geocode/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let stats: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(stats["total_entries"], 2);
        assert_eq!(stats["positive_entries"], 1);
        assert_eq!(stats["negative_entries"], 1);
        assert_eq!(stats["dirty"], false);
    }
}
