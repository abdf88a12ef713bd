use adboard_content::{generate_post, ContentError, ContentRequest, GeneratedPost};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::middleware::RequestId;

use super::{map_json_rejection, ApiError, ApiResponse, AppState};

fn map_content_error(request_id: String, error: &ContentError) -> ApiError {
    match error {
        ContentError::Validation(message) => ApiError::new(request_id, "bad_request", message),
        ContentError::Api { status, body } => {
            tracing::warn!(status, "model endpoint rejected request");
            ApiError::new(request_id, "upstream_error", "Failed to generate content")
                .with_details(serde_json::json!({ "status": status, "body": body }))
        }
        other => {
            tracing::error!(error = %other, "content generation failed");
            ApiError::new(request_id, "upstream_error", "Failed to generate content")
                .with_details(serde_json::json!({ "message": other.to_string() }))
        }
    }
}

pub(super) async fn generate_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<GeneratedPost>>, ApiError> {
    let Json(request) = payload.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let post = generate_post(&state.content, &request)
        .await
        .map_err(|e| map_content_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(post, req_id.0)))
}
