use axum::{extract::State, routing::get, Json, Router};
use dashboard_core::ChartRegistry;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/charts", get(catalog))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCatalog {
    pub families: ChartRegistry,
    pub chart_types: Vec<String>,
}

/// Every chart family the validator accepts, with its chart types and assets.
async fn catalog(State(state): State<AppState>) -> Json<DataResponse<ChartCatalog>> {
    let registry = state.validator().registry();
    Json(DataResponse::new(ChartCatalog {
        families: registry.clone(),
        chart_types: registry.chart_types(),
    }))
}
