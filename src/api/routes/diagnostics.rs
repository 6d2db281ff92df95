use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};
use crate::adapter::DiagnosticReport;
use crate::api::models::PageQuery;
use crate::api::{ApiError, AppState};
use crate::service::{AuthProbe, DEFAULT_PAGE_SIZE};

pub async fn cache(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "cache": state.service.cache_snapshot() }))
}

pub async fn auth(State(state): State<AppState>) -> Json<AuthProbe> {
    Json(state.service.debug_auth().await)
}

pub async fn meta(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "meta": state.service.meta(),
        "variants": state.service.variant_names(),
    }))
}

/// Runs every attack-path variant and reports each outcome.
pub async fn attack_paths(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<DiagnosticReport>, ApiError> {
    state
        .service
        .diagnose_page(&q.op_id, q.page_num.unwrap_or(1), q.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, true))
}
