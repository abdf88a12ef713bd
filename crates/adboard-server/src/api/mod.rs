mod abtest;
mod content;
mod reports;

use std::sync::Arc;

use adboard_content::HostedModelClient;
use axum::{
    extract::{
        rejection::{BytesRejection, JsonRejection},
        DefaultBodyLimit,
    },
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<HostedModelClient>,
    pub max_upload_bytes: usize,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    version: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
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
                details: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "parse_error" => StatusCode::BAD_REQUEST,
            "validation_error" => StatusCode::UNPROCESSABLE_ENTITY,
            "payload_too_large" => StatusCode::PAYLOAD_TOO_LARGE,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn body_rejection(request_id: String, status: StatusCode, message: String) -> ApiError {
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "payload_too_large"
    } else {
        "bad_request"
    };
    ApiError::new(request_id, code, message)
}

/// Maps a rejected JSON body onto the API error envelope.
pub(super) fn map_json_rejection(request_id: String, rejection: &JsonRejection) -> ApiError {
    body_rejection(request_id, rejection.status(), rejection.body_text())
}

/// Maps a body that could not be buffered (usually over the size limit).
pub(super) fn map_bytes_rejection(request_id: String, rejection: &BytesRejection) -> ApiError {
    body_rejection(request_id, rejection.status(), rejection.body_text())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            REQUEST_ID_HEADER,
        ])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/reports/import", post(reports::import_report))
        .route("/api/v1/reports/analyze", post(reports::analyze_report))
        .route("/api/v1/reports/template", get(reports::download_template))
        .route("/api/v1/reports/format-guide", get(reports::format_guide))
        .route("/api/v1/content/generate", post(content::generate_content))
        .route("/api/v1/abtest/simulate", post(abtest::simulate_campaign))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
        req_id.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE: &str = "date,platform,impressions,clicks,conversions,spend,revenue\n\
                          01-01-2024,Facebook,10000,500,50,1000,2500\n\
                          01-01-2024,Instagram,8000,400,40,800,2000\n";

    fn test_state(model_url: &str) -> AppState {
        let client = HostedModelClient::with_base_url(None, 5, model_url).expect("client");
        AppState {
            content: Arc::new(client),
            max_upload_bytes: 64 * 1024,
        }
    }

    fn test_app() -> Router {
        build_app(
            test_state("http://127.0.0.1:9/unused"),
            RateLimitState::per_minute(100),
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn post_text(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "text/csv")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("parse_error", StatusCode::BAD_REQUEST),
            ("validation_error", StatusCode::UNPROCESSABLE_ENTITY),
            ("upstream_error", StatusCode::BAD_GATEWAY),
            ("anything_else", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[tokio::test]
    async fn health_echoes_request_id() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], "req-abc");
    }

    #[tokio::test]
    async fn import_returns_records_cards_and_tips() {
        let (status, json) = send(test_app(), post_text("/api/v1/reports/import", SAMPLE)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["records"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["data"]["cards"][0]["value"], "$4,500");
        assert_eq!(json["data"]["cards"][1]["value"], "150.00%");
        assert!(json["data"]["tips"].is_array());
    }

    #[tokio::test]
    async fn oversized_import_gets_error_envelope() {
        let mut state = test_state("http://127.0.0.1:9/unused");
        state.max_upload_bytes = 64;
        let app = build_app(state, RateLimitState::per_minute(100));
        let body = SAMPLE.repeat(4);
        assert!(body.len() > 64);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/reports/import")
            .header("content-type", "text/csv")
            .header("x-request-id", "req-big")
            .body(Body::from(body))
            .expect("request");
        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["error"]["code"], "payload_too_large");
        assert_eq!(json["meta"]["request_id"], "req-big");
    }

    #[tokio::test]
    async fn import_missing_header_is_parse_error() {
        let (status, json) = send(
            test_app(),
            post_text("/api/v1/reports/import", "date,platform\n01-01-2024,Facebook"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "parse_error");
        assert!(json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("revenue")));
    }

    #[tokio::test]
    async fn import_violations_are_listed_in_details() {
        let body = SAMPLE.replace("8000,400", "8000,9000").replace("Facebook", "MySpace");
        let (status, json) = send(test_app(), post_text("/api/v1/reports/import", &body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "validation_error");
        let details = json["error"]["details"].as_array().expect("details");
        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["row"], 1);
        assert_eq!(details[0]["column"], "platform");
        assert_eq!(details[1]["row"], 2);
        assert_eq!(details[1]["column"], "clicks");
    }

    #[tokio::test]
    async fn analyze_accepts_parsed_rows() {
        let body = serde_json::json!({
            "records": [{
                "date": "01-01-2024",
                "platform": "Twitter",
                "impressions": "1000",
                "clicks": "20",
                "conversions": "2",
                "spend": "50",
                "revenue": "40"
            }]
        });
        let (status, json) = send(test_app(), post_json("/api/v1/reports/analyze", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["cards"][3]["value"], "2.00%");
    }

    #[tokio::test]
    async fn analyze_rejects_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/reports/analyze")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let (status, json) = send(test_app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn template_is_a_csv_attachment() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/reports/template")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        assert!(response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("campaign_data_template.csv")));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"date,platform,impressions"));
    }

    #[tokio::test]
    async fn content_requires_prompt_and_platform() {
        let body = serde_json::json!({ "platform": "twitter" });
        let (status, json) = send(test_app(), post_json("/api/v1/content/generate", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"]["message"],
            "Missing required fields: prompt and platform"
        );
    }

    #[tokio::test]
    async fn content_is_generated_through_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "generated_text": "Fresh beans daily" }])),
            )
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri()), RateLimitState::per_minute(10));
        let body = serde_json::json!({ "prompt": "coffee", "platform": "twitter" });
        let (status, json) = send(app, post_json("/api/v1/content/generate", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["data"]["content"],
            "Fresh beans daily\n\n#marketing #digital #growth"
        );
    }

    #[tokio::test]
    async fn model_failure_maps_to_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri()), RateLimitState::per_minute(10));
        let body = serde_json::json!({ "prompt": "coffee", "platform": "twitter" });
        let (status, json) = send(app, post_json("/api/v1/content/generate", &body)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "upstream_error");
        assert_eq!(json["error"]["details"]["status"], 401);
    }

    #[tokio::test]
    async fn abtest_returns_three_sorted_variations() {
        let body = serde_json::json!({
            "business_type": "Bakery",
            "campaign_type": "Social",
            "target_audience": "Gen Z",
            "channel": "TikTok",
            "clicks": 500
        });
        let (status, json) = send(test_app(), post_json("/api/v1/abtest/simulate", &body)).await;

        assert_eq!(status, StatusCode::OK);
        let variations = json["data"]["variations"].as_array().expect("variations");
        assert_eq!(variations.len(), 3);
        assert_eq!(json["data"]["best_variation"], variations[0]);
    }

    #[tokio::test]
    async fn abtest_blank_field_is_bad_request() {
        let body = serde_json::json!({
            "business_type": "",
            "campaign_type": "Social",
            "target_audience": "Gen Z",
            "channel": "TikTok"
        });
        let (status, json) = send(test_app(), post_json("/api/v1/abtest/simulate", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "missing required field: business_type");
    }

    #[tokio::test]
    async fn rate_limit_rejects_excess_requests() {
        let app = build_app(
            test_state("http://127.0.0.1:9/unused"),
            RateLimitState::per_minute(1),
        );
        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/reports/format-guide")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::OK);

        let (status, json) = send(
            app,
            Request::builder()
                .uri("/api/v1/reports/format-guide")
                .header("x-request-id", "req-limited")
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(json["error"]["message"], "rate limit exceeded");
        assert_eq!(json["meta"]["request_id"], "req-limited");
        assert!(json["meta"]["timestamp"].is_string());
    }
}
