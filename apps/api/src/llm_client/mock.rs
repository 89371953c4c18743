//! Counting `StructuredGenerator` for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{LlmError, StructuredGenerator, StructuredRequest};

pub enum MockReply {
    Json(Value),
    Timeout,
    ServerError,
}

pub struct MockGenerator {
    reply: MockReply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockGenerator {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredGenerator for MockGenerator {
    async fn generate(&self, request: &StructuredRequest<'_>) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt.to_string());
        match &self.reply {
            MockReply::Json(value) => Ok(value.clone()),
            MockReply::Timeout => Err(LlmError::Timeout),
            MockReply::ServerError => Err(LlmError::Api {
                status: 500,
                message: "internal provider failure".to_string(),
            }),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
