//! Project view and session reset.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{FileStatus, Project, ProjectFile};

/// One file as shown to the front-end.
#[derive(Debug, Serialize)]
pub struct FileView {
    pub name: String,
    pub language: String,
    pub status: FileStatus,
    pub is_included: bool,
    pub size_bytes: usize,
    pub content: String,
    pub documented_content: Option<String>,
    pub error: Option<String>,
}

impl From<&ProjectFile> for FileView {
    fn from(f: &ProjectFile) -> Self {
        Self {
            name: f.name.clone(),
            language: f.language.clone(),
            status: f.status(),
            is_included: f.is_included,
            size_bytes: f.content.len(),
            content: f.content.clone(),
            documented_content: f.documented_content.clone(),
            error: f.error.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectView {
    pub main: Vec<FileView>,
    pub frontend: Vec<FileView>,
}

impl From<&Project> for ProjectView {
    fn from(p: &Project) -> Self {
        Self {
            main: p.main.iter().map(FileView::from).collect(),
            frontend: p.frontend.iter().map(FileView::from).collect(),
        }
    }
}

/// `GET /api/project`
pub async fn show(State(ctx): State<ApiContext>) -> Result<Json<ProjectView>, ApiError> {
    let project = ctx.core.snapshot()?;
    Ok(Json(ProjectView::from(&project)))
}

/// `POST /api/reset`
pub async fn reset(State(ctx): State<ApiContext>) -> Result<StatusCode, ApiError> {
    ctx.core.reset()?;
    Ok(StatusCode::NO_CONTENT)
}
