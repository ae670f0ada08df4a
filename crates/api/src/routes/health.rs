use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Full health check, including a database round trip.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(|e| ApiError::Internal(format!("database health check failed: {e}")))?;

    Ok(Json(json!({
        "status": "ok",
        "database": "connected",
        "chartFamilies": state.validator().registry().family_names().len(),
    })))
}

/// Lightweight ping, no database check.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
