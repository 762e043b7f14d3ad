use std::sync::Arc;

use crate::chat::assistant::ChatAssistant;
use crate::config::Config;
use crate::dse::catalog::Catalog;
use crate::jobs::JobBoard;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `PgStore` when `DATABASE_URL` is set, `MemoryStore` otherwise.
    pub store: Arc<dyn Store>,
    /// Read-only program catalog used by the matcher.
    pub catalog: Arc<Catalog>,
    pub jobs: Arc<JobBoard>,
    /// `LlmAssistant` when `LLM_API_KEY` is set, `CannedAssistant` otherwise.
    pub assistant: Arc<dyn ChatAssistant>,
    pub config: Config,
}
