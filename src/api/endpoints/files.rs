//! File upload and inclusion toggling.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::parse_grouping;
use crate::api::endpoints::project::FileView;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::RawFile;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub grouping: &'static str,
    pub files: Vec<FileView>,
}

/// `POST /api/files/:grouping`: multipart upload, one part per file.
///
/// The part's `filename` is the file name. Replaces the whole grouping.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Path(grouping): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let grouping = parse_grouping(&grouping)?;

    let mut raw_files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {e}")))?
    {
        let name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("Upload part without a filename".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Cannot read {name}: {e}")))?;
        raw_files.push(RawFile::new(name, bytes.to_vec()));
    }

    let records = ctx.core.upload_files(grouping, raw_files)?;
    Ok(Json(UploadResponse {
        grouping: grouping.as_str(),
        files: records.iter().map(FileView::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub name: String,
    pub is_included: bool,
}

/// `POST /api/files/:grouping/toggle`
pub async fn toggle(
    State(ctx): State<ApiContext>,
    Path(grouping): Path<String>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let grouping = parse_grouping(&grouping)?;
    let is_included = ctx.core.toggle_inclusion(grouping, &request.name)?;
    Ok(Json(ToggleResponse {
        name: request.name,
        is_included,
    }))
}
