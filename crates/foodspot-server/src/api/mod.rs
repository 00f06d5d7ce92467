mod foodspots;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use foodspot_search::{FoodSearch, SearchError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<FoodSearch>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    geoapify: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "validation_error" => StatusCode::BAD_REQUEST,
            "service_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a search failure to its public error. Upstream details stay in the logs.
pub(super) fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    match error {
        SearchError::InvalidCoordinates(e) => {
            ApiError::new(request_id, "validation_error", e.to_string())
        }
        SearchError::Configuration(reason) => {
            tracing::error!(reason = %reason, "food search is not configured");
            ApiError::new(
                request_id,
                "service_unavailable",
                "Location services are temporarily unavailable",
            )
        }
        SearchError::Internal(reason) => {
            tracing::error!(reason = %reason, "food search failed");
            ApiError::new(request_id, "internal_error", "Failed to search for food places")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/foodspots", post(foodspots::search_foodspots))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    if state.search.is_configured() {
        (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    geoapify: "configured",
                },
                meta,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                data: HealthData {
                    status: "degraded",
                    geoapify: "missing_api_key",
                },
                meta,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use foodspot_geoapify::{ClientSettings, GeoapifyClient};
    use foodspot_search::{SearchCaches, SearchSettings};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_with(client: Option<GeoapifyClient>) -> Router {
        let settings = SearchSettings::default();
        let search = FoodSearch::new(client, SearchCaches::new(&settings), settings);
        build_app(AppState {
            search: Arc::new(search),
        })
    }

    fn unconfigured_app() -> Router {
        app_with(None)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/foodspots")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    #[test]
    fn api_error_codes_map_to_status() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("service_unavailable", StatusCode::SERVICE_UNAVAILABLE),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
            ("not_found", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = map_search_error(
            "req-1".to_string(),
            &SearchError::Internal("task panicked at secret.rs:12".to_string()),
        );
        assert_eq!(err.error.code, "internal_error");
        assert!(!err.error.message.contains("secret"));
    }

    #[tokio::test]
    async fn health_reports_missing_api_key() {
        let response = unconfigured_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "degraded");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let response = unconfigured_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).map(|v| v.to_str().unwrap()),
            Some("abc-123")
        );
        let json = body_json(response).await;
        assert_eq!(json["meta"]["request_id"], "abc-123");
    }

    #[tokio::test]
    async fn out_of_range_latitude_is_bad_request() {
        let response = unconfigured_app()
            .oneshot(post_json(r#"{"latitude": 500, "longitude": 77.2}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
        assert_eq!(json["error"]["message"], "Latitude must be between -90 and 90");
    }

    #[tokio::test]
    async fn missing_fields_are_bad_request() {
        let response = unconfigured_app()
            .oneshot(post_json(r#"{"latitude": 28.6}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Invalid coordinates format");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let response = unconfigured_app()
            .oneshot(post_json("{not json"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_api_key_is_service_unavailable() {
        let response = unconfigured_app()
            .oneshot(post_json(r#"{"latitude": "28.6139", "longitude": "77.2090"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "service_unavailable");
        assert_eq!(
            json["error"]["message"],
            "Location services are temporarily unavailable"
        );
    }

    #[tokio::test]
    async fn search_returns_every_category_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/places"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/geocode/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "features": [{ "properties": { "formatted": "MG Road, Bengaluru" } }]
            })))
            .mount(&server)
            .await;

        let settings = ClientSettings {
            base_url: server.uri(),
            ..ClientSettings::default()
        };
        let client = GeoapifyClient::new("test-key", &settings).expect("client");

        let response = app_with(Some(client))
            .oneshot(post_json(r#"{"latitude": 12.9716, "longitude": 77.5946}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["current_location"], "MG Road, Bengaluru");
        assert_eq!(json["location_details"]["total_restaurants"], 0);
        assert_eq!(json["location_details"]["search_radius"], "5km");
        for key in ["ice_cream", "chaat", "south_indian", "north_indian", "desserts"] {
            assert_eq!(json[key], json!([]), "key {key}");
        }
    }
}
