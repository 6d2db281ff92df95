use axum::{
    extract::{Query, State},
    Json,
};
use crate::api::models::{TopVulnerabilitiesQuery, TopVulnerabilitiesResponse, VulnerabilityDetailsQuery};
use crate::api::{ApiError, AppState};
use crate::models::VulnerabilityDetails;
use crate::service::DEFAULT_TOP_LIMIT;

pub async fn get_top_vulnerabilities(
    State(state): State<AppState>,
    Query(q): Query<TopVulnerabilitiesQuery>,
) -> Result<Json<TopVulnerabilitiesResponse>, ApiError> {
    let items = state
        .service
        .get_top_vulnerabilities(&q.op_id, q.limit.unwrap_or(DEFAULT_TOP_LIMIT))
        .await
        .map_err(|e| ApiError::new(e, q.diagnostic))?;
    Ok(Json(TopVulnerabilitiesResponse { op_id: q.op_id, items }))
}

pub async fn get_vulnerability_details(
    State(state): State<AppState>,
    Query(q): Query<VulnerabilityDetailsQuery>,
) -> Result<Json<VulnerabilityDetails>, ApiError> {
    state
        .service
        .get_vulnerability_details(&q.op_id, &q.cve)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, q.diagnostic))
}
