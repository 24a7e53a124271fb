use thiserror::Error;

/// Failures of the raw call to the generative backend, before they are
/// turned into user-facing messages by `failure::describe_failure`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Cannot reach the AI service: {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("AI service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("AI service returned no text")]
    EmptyResponse,

    #[error("{}", other_message(.0))]
    Other(Option<String>),
}

fn other_message(msg: &Option<String>) -> &str {
    msg.as_deref().unwrap_or("unknown error")
}

impl BackendError {
    /// Raw message carried by the error, if any.
    ///
    /// For HTTP failures this is the response body, which for Gemini is a
    /// JSON payload with a nested `error.message`.
    pub fn message(&self) -> Option<String> {
        let raw = match self {
            Self::Connection(msg) | Self::HttpClient(msg) | Self::ResponseParsing(msg) => {
                msg.clone()
            }
            Self::Timeout(secs) => format!("Request timed out after {secs}s"),
            Self::Status { status, body } => {
                if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.clone()
                }
            }
            Self::EmptyResponse => "AI service returned no text".to_string(),
            Self::Other(msg) => msg.clone()?,
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Transport-level or server-side failure (worth retrying later).
    pub fn is_server_side(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Seam over the external text-generation service.
///
/// One call per file: system instructions plus the raw file content as the
/// user payload; the reply is a single text blob.
pub trait LlmBackend: Send + Sync {
    fn generate(&self, model: &str, system: &str, payload: &str) -> Result<String, BackendError>;
}
