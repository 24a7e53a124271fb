//! Documentation service: one source file in, the same file with doc
//! comments inserted out.
//!
//! Knows nothing about projects or runs. Unclassified or blank files are
//! returned as-is without contacting the backend.

pub mod failure;
pub mod gemini;
pub mod policy;
pub mod sanitize;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use gemini::GeminiClient;
pub use types::{BackendError, LlmBackend};

use std::sync::Arc;

use thiserror::Error;

use crate::models::DocLanguage;
use crate::pipeline::classify::is_unclassified;

/// The single error kind surfaced by the service. The message is always
/// non-empty and ready to show to the user.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct DocumentationError {
    pub message: String,
}

impl From<BackendError> for DocumentationError {
    fn from(err: BackendError) -> Self {
        Self {
            message: failure::describe_failure(&err),
        }
    }
}

pub struct DocumentationService {
    backend: Arc<dyn LlmBackend>,
    model: String,
}

impl DocumentationService {
    pub fn new(backend: Arc<dyn LlmBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether `document` would contact the backend for this input.
    pub fn needs_backend(content: &str, language: &str) -> bool {
        !is_unclassified(language) && !content.trim().is_empty()
    }

    /// Return `content` with documentation comments inserted.
    pub fn document(
        &self,
        content: &str,
        language: &str,
        project_context: &str,
        doc_language: DocLanguage,
    ) -> Result<String, DocumentationError> {
        if !Self::needs_backend(content, language) {
            return Ok(content.to_string());
        }

        let system = policy::system_instruction(doc_language, language, project_context);
        let raw = self.backend.generate(&self.model, &system, content)?;

        Ok(sanitize::strip_code_fence(&raw))
    }
}
