//! Maps backend failures to the single human-readable message stored on a file.
//!
//! Every path yields a non-empty message; raw error objects never reach the
//! file record.

use std::sync::LazyLock;

use regex::Regex;

use super::types::BackendError;

pub const MODEL_ERROR_PREFIX: &str = "The AI model returned an error:";
pub const UNEXPECTED_ERROR_PREFIX: &str = "An unexpected error occurred:";
pub const UNKNOWN_ERROR: &str = "unknown error";
pub const RETRY_HINT: &str = "Please try again later or with fewer files.";

/// Standalone 5xx status codes and RPC/transport failure markers.
static SERVER_FAILURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b5\d\d\b|(?i:rpc failed)|(?i:xhr error)|\bUNAVAILABLE\b|\bINTERNAL\b")
        .expect("valid regex")
});

/// Build the message recorded on a file whose documentation failed.
pub fn describe_failure(err: &BackendError) -> String {
    let mut message = match err.message() {
        Some(raw) => match nested_error_message(&raw) {
            Some(nested) => format!("{MODEL_ERROR_PREFIX} {nested}"),
            None => format!("{UNEXPECTED_ERROR_PREFIX} {raw}"),
        },
        None => format!("{UNEXPECTED_ERROR_PREFIX} {UNKNOWN_ERROR}"),
    };

    if err.is_server_side() || SERVER_FAILURE_RE.is_match(&message) {
        message.push(' ');
        message.push_str(RETRY_HINT);
    }

    message
}

/// Extract `error.message` from a structured error payload.
fn nested_error_message(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let nested = value.get("error")?.get("message")?.as_str()?.trim();
    (!nested.is_empty()).then(|| nested.to_string())
}
