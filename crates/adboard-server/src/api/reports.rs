use adboard_reports::{
    analyze, import_csv, import_rows, template_csv, Analysis, CampaignRecord, ImportError,
    ParsedRow, ValidationError, FORMAT_GUIDE, TEMPLATE_FILE_NAME,
};
use axum::{
    body::Bytes,
    extract::rejection::{BytesRejection, JsonRejection},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_bytes_rejection, map_json_rejection, ApiError, ApiResponse};

#[derive(Debug, Serialize)]
pub(super) struct ImportedReport {
    pub records: Vec<CampaignRecord>,
    #[serde(flatten)]
    pub analysis: Analysis,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub records: Vec<ParsedRow>,
}

fn validation_error(request_id: String, violations: &[ValidationError]) -> ApiError {
    tracing::info!(violations = violations.len(), "campaign data rejected");
    ApiError::new(
        request_id,
        "validation_error",
        format!("{} validation error(s) found", violations.len()),
    )
    .with_details(serde_json::to_value(violations).unwrap_or_default())
}

fn map_import_error(request_id: String, error: &ImportError) -> ApiError {
    match error {
        ImportError::Parse(e) => ApiError::new(request_id, "parse_error", e.to_string()),
        ImportError::Validation(violations) => validation_error(request_id, violations),
    }
}

/// `POST /api/v1/reports/import`: the body is the raw CSV document.
pub(super) async fn import_report(
    Extension(req_id): Extension<RequestId>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse<ImportedReport>>, ApiError> {
    let body = body.map_err(|e| map_bytes_rejection(req_id.0.clone(), &e))?;
    let text = std::str::from_utf8(&body).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "parse_error",
            format!("document is not valid UTF-8: {e}"),
        )
    })?;

    let records = import_csv(text).map_err(|e| map_import_error(req_id.0.clone(), &e))?;
    let analysis = analyze(&records);

    Ok(Json(ApiResponse::new(
        ImportedReport { records, analysis },
        req_id.0,
    )))
}

/// `POST /api/v1/reports/analyze`: validates rows supplied as JSON and
/// returns the derived cards and tips.
pub(super) async fn analyze_report(
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Analysis>>, ApiError> {
    let Json(request) = payload.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let records =
        import_rows(&request.records).map_err(|v| validation_error(req_id.0.clone(), &v))?;

    Ok(Json(ApiResponse::new(analyze(&records), req_id.0)))
}

pub(super) async fn download_template(
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let csv = template_csv().map_err(|e| {
        tracing::error!(error = %e, "template export failed");
        ApiError::new(req_id.0, "internal_error", "template export failed")
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{TEMPLATE_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

pub(super) async fn format_guide() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        FORMAT_GUIDE,
    )
}
