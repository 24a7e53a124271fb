//! Documentation run control.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::RunStatus;
use crate::models::DocLanguage;

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub doc_language: DocLanguage,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub run_id: Uuid,
    pub doc_language: DocLanguage,
}

/// `POST /api/analysis`: start a background run. Returns 202 immediately.
pub async fn start(
    State(ctx): State<ApiContext>,
    Json(request): Json<StartRequest>,
) -> Result<(StatusCode, Json<StartResponse>), ApiError> {
    // The worker thread is detached; progress is read back through `status`.
    let handle = ctx.core.start_analysis(request.doc_language)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(StartResponse {
            run_id: handle.run_id,
            doc_language: request.doc_language,
        }),
    ))
}

/// `GET /api/analysis`
pub async fn status(State(ctx): State<ApiContext>) -> Result<Json<RunStatus>, ApiError> {
    Ok(Json(ctx.core.run_status()?))
}

/// `POST /api/analysis/cancel`
pub async fn cancel(State(ctx): State<ApiContext>) -> Result<StatusCode, ApiError> {
    ctx.core.cancel_analysis()?;
    Ok(StatusCode::ACCEPTED)
}
