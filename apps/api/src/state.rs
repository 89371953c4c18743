use std::sync::Arc;

use crate::llm_client::StructuredGenerator;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Companies, job postings and applications. Postgres in production.
    pub store: Arc<dyn RecordStore>,
    /// Structured generation backend, chosen at startup via LLM_PROVIDER.
    pub generator: Arc<dyn StructuredGenerator>,
}
