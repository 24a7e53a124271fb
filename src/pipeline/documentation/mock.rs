//! Scripted `LlmBackend` for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::{BackendError, LlmBackend};

type Responder = dyn Fn(usize, &str) -> Result<String, BackendError> + Send + Sync;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub system: String,
    pub payload: String,
}

/// Backend whose replies come from a closure `(call_index, payload) -> result`.
pub struct MockBackend {
    responder: Box<Responder>,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn with(
        responder: impl Fn(usize, &str) -> Result<String, BackendError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Prefixes each payload with a doc comment.
    pub fn documenting() -> Self {
        Self::with(|_, payload| Ok(format!("/** documented */\n{payload}")))
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with(move |_, _| Ok(text.clone()))
    }

    pub fn failing(err: BackendError) -> Self {
        Self::with(move |_, _| Err(err.clone()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.recorded.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl LlmBackend for MockBackend {
    fn generate(&self, model: &str, system: &str, payload: &str) -> Result<String, BackendError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(RecordedCall {
                model: model.to_string(),
                system: system.to_string(),
                payload: payload.to_string(),
            });
        }
        (self.responder)(index, payload)
    }
}
