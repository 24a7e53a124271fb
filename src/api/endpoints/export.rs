//! Archive download for one grouping.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::api::endpoints::parse_grouping;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::export::{archive_file_name, build_archive, final_contents};

/// `GET /api/export/:grouping`: tar.gz of the grouping's final contents.
pub async fn download(
    State(ctx): State<ApiContext>,
    Path(grouping): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let grouping = parse_grouping(&grouping)?;
    let project = ctx.core.snapshot()?;
    let entries = final_contents(project.files(grouping));
    let archive = build_archive(&entries)?;

    let disposition = format!("attachment; filename=\"{}\"", archive_file_name(grouping));
    Ok((
        [
            (header::CONTENT_TYPE, "application/gzip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive,
    ))
}
