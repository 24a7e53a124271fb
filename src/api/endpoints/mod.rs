//! HTTP handlers, one module per resource.

pub mod analysis;
pub mod export;
pub mod files;
pub mod health;
pub mod project;

use std::str::FromStr;

use crate::api::error::ApiError;
use crate::models::Grouping;

/// Parse the `:grouping` path segment.
pub(crate) fn parse_grouping(raw: &str) -> Result<Grouping, ApiError> {
    Grouping::from_str(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}
