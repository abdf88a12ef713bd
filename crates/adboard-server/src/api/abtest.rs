use adboard_abtest::{simulate, AbTestInput, SimulationResult};
use axum::{extract::rejection::JsonRejection, Extension, Json};

use crate::middleware::RequestId;

use super::{map_json_rejection, ApiError, ApiResponse};

pub(super) async fn simulate_campaign(
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AbTestInput>, JsonRejection>,
) -> Result<Json<ApiResponse<SimulationResult>>, ApiError> {
    let Json(input) = payload.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let result = simulate(&input, &mut rand::rng())
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?;

    tracing::debug!(
        campaign_id = %result.campaign.campaign_id,
        best_channel = %result.best_variation.channel,
        "simulated A/B campaign"
    );
    Ok(Json(ApiResponse::new(result, req_id.0)))
}
