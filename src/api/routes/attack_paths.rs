use axum::{
    extract::{Query, State},
    Json,
};
use crate::api::models::PageQuery;
use crate::api::{ApiError, AppState};
use crate::models::CanonicalPage;
use crate::service::DEFAULT_PAGE_SIZE;

pub async fn get_attack_paths(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<CanonicalPage>, ApiError> {
    state
        .service
        .get_page(&q.op_id, q.page_num.unwrap_or(1), q.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, q.diagnostic))
}
