pub mod charts;
pub mod dashboards;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(charts::routes())
        .merge(dashboards::routes())
        .with_state(state)
}
