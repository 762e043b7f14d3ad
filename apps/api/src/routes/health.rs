use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the size of the loaded catalog and job board.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "pathway-api",
        "programs": state.catalog.program_count(),
        "jobs": state.jobs.jobs.len()
    }))
}
