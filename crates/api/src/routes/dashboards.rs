use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use dashboard_core::auth::{can_edit, Action, AuthRequest};
use dashboard_core::listing::{categorize, total_modules};
use dashboard_core::pagination::{paginate, PageWindow};
use dashboard_core::registry::Assets;
use dashboard_core::render::{num_rows, resolve_render_order, RenderPlan};
use dashboard_core::{DashboardDocument, DashboardId, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::response::DataResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/dashboards", get(list).post(create))
        .route("/v1/dashboards/{id}", get(view).put(update).delete(remove))
        .route("/v1/dashboards/{id}/clone", post(clone))
}

/// `?page=&per_page=` for the listing. Pages are 1-based.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// `?global=true` asks for the dashboard to be owned by the global user.
#[derive(Debug, Default, Deserialize)]
pub struct SaveParams {
    #[serde(default)]
    pub global: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardListing {
    pub categories: BTreeMap<String, Vec<DashboardDocument>>,
    pub total_modules: usize,
    pub page: PageWindow,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView<'a> {
    pub dashboard: &'a DashboardDocument,
    pub render_plan: RenderPlan<'a>,
    pub num_rows: Option<usize>,
    pub assets: Assets,
    pub can_edit: bool,
    pub is_global: bool,
}

fn authorize(
    state: &AppState,
    action: Action,
    user: &CurrentUser,
    id: Option<&str>,
) -> ApiResult<()> {
    let mut request = AuthRequest::new(action, user.name());
    if let Some(id) = id {
        request = request.on(id);
    }
    if state.authorizer().allows(&request) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!("you may not {action} dashboards")))
    }
}

/// Parse a submitted body into a JSON object.
fn parse_body(raw: &str) -> Result<Value, ValidationError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ValidationError::Malformed(format!("invalid JSON: {e}")))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ValidationError::Malformed(
            "dashboard must be a JSON object".to_string(),
        ))
    }
}

/// Overwrite the server-owned fields of a submitted dashboard.
fn stamp(value: &mut Value, id: &str, owner: Option<&str>) {
    if let Some(object) = value.as_object_mut() {
        object.insert("id".into(), json!(id));
        object.insert("date".into(), json!(Utc::now().to_rfc3339()));
        object.remove("created_by");
        match owner {
            Some(owner) => {
                object.insert("createdBy".into(), json!(owner));
            }
            None => {
                object.remove("createdBy");
            }
        }
    }
}

/// The dashboard a clone starts from: same modules and layout, new name.
fn clone_body(source: &DashboardDocument) -> Value {
    json!({
        "name": format!("Clone of {}", source.name),
        "layout": source.layout,
        "modules": source.modules,
    })
}

/// Owner to record on save: the global user when asked for and permitted,
/// otherwise `fallback`.
fn owner_for(
    state: &AppState,
    user: &CurrentUser,
    global: bool,
    fallback: Option<&str>,
) -> Option<String> {
    let permitted = global
        && state
            .authorizer()
            .allows(&AuthRequest::new(Action::EditGlobal, user.name()));
    state
        .config()
        .global
        .owner_override(global, permitted)
        .or(fallback)
        .map(str::to_string)
}

async fn fetch(state: &AppState, id: &str) -> ApiResult<DashboardDocument> {
    state
        .store()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("dashboard {id} not found")))
}

async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<DataResponse<DashboardListing>>> {
    authorize(&state, Action::View, &user, None)?;

    let config = state.config();
    let owners = config.global.visible_owners(config.filter_users, user.name());
    let count = state.store().count(owners.as_deref()).await?;
    let page = paginate(count, params.page, params.per_page, config.per_page);
    let documents = state
        .store()
        .list(owners.as_deref(), page.limit(), page.skip)
        .await?;

    tracing::debug!(count, page = page.current_page, "listing dashboards");
    Ok(Json(DataResponse::new(DashboardListing {
        total_modules: total_modules(&documents),
        categories: categorize(documents),
        page,
    })))
}

async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<SaveParams>,
    body: String,
) -> ApiResult<Json<DataResponse<DashboardDocument>>> {
    authorize(&state, Action::Create, &user, None)?;

    let mut value = parse_body(&body)?;
    let id = DashboardId::generate();
    let owner = owner_for(&state, &user, params.global, user.name());
    stamp(&mut value, id.as_str(), owner.as_deref());

    let document = state.validator().validate_value(&value)?;
    state.store().create(&document).await?;

    tracing::info!(
        dashboard_id = %document.id,
        modules = document.modules.len(),
        "dashboard created"
    );
    Ok(Json(DataResponse::new(document)))
}

async fn view(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    authorize(&state, Action::View, &user, Some(&id))?;

    let document = fetch(&state, &id).await?;
    let registry = state.validator().registry();
    let view = DashboardView {
        render_plan: resolve_render_order(&document),
        num_rows: num_rows(&document),
        assets: registry.active_assets(document.families()),
        can_edit: can_edit(state.authorizer(), user.name(), &document),
        is_global: state.config().global.is_global(&document),
        dashboard: &document,
    };
    let body = serde_json::to_value(DataResponse::new(view))
        .map_err(|e| ApiError::Internal(format!("could not encode dashboard view: {e}")))?;
    Ok(Json(body))
}

async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Query(params): Query<SaveParams>,
    body: String,
) -> ApiResult<Json<DataResponse<DashboardDocument>>> {
    authorize(&state, Action::Update, &user, Some(&id))?;

    let existing = fetch(&state, &id).await?;
    if !can_edit(state.authorizer(), user.name(), &existing) {
        return Err(ApiError::Forbidden(format!("you may not edit dashboard {id}")));
    }

    let mut value = parse_body(&body)?;
    let owner = owner_for(&state, &user, params.global, existing.created_by.as_deref());
    stamp(&mut value, &existing.id, owner.as_deref());

    let document = state.validator().validate_value(&value)?;
    if !state.store().update(&document).await? {
        return Err(ApiError::NotFound(format!("dashboard {id} not found")));
    }

    tracing::info!(
        dashboard_id = %document.id,
        modules = document.modules.len(),
        "dashboard updated"
    );
    Ok(Json(DataResponse::new(document)))
}

async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    authorize(&state, Action::Delete, &user, Some(&id))?;

    let existing = fetch(&state, &id).await?;
    if !can_edit(state.authorizer(), user.name(), &existing) {
        return Err(ApiError::Forbidden(format!("you may not delete dashboard {id}")));
    }
    if !state.store().delete(&id).await? {
        return Err(ApiError::NotFound(format!("dashboard {id} not found")));
    }

    tracing::info!(dashboard_id = %id, "dashboard deleted");
    Ok(Json(json!({ "data": { "id": id, "deleted": true } })))
}

async fn clone(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<DashboardDocument>>> {
    authorize(&state, Action::Clone, &user, Some(&id))?;

    let source = fetch(&state, &id).await?;
    let mut value = clone_body(&source);
    let new_id = DashboardId::generate();
    stamp(&mut value, new_id.as_str(), user.name());

    let document = state.validator().validate_value(&value)?;
    state.store().create(&document).await?;

    tracing::info!(dashboard_id = %document.id, source_id = %id, "dashboard cloned");
    Ok(Json(DataResponse::new(document)))
}
