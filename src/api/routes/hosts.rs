use axum::{
    extract::{Query, State},
    Json,
};
use crate::api::models::{HostsQuery, HostsResponse, ThreatActorsResponse};
use crate::api::{ApiError, AppState};

pub async fn get_hosts(
    State(state): State<AppState>,
    Query(q): Query<HostsQuery>,
) -> Result<Json<HostsResponse>, ApiError> {
    let hosts = state
        .service
        .get_hosts(&q.op_id)
        .await
        .map_err(|e| ApiError::new(e, q.diagnostic))?;
    Ok(Json(HostsResponse { op_id: q.op_id, hosts }))
}

pub async fn get_threat_actors(
    State(state): State<AppState>,
    Query(q): Query<HostsQuery>,
) -> Result<Json<ThreatActorsResponse>, ApiError> {
    let threat_actors = state
        .service
        .get_threat_actors_for_host(&q.op_id, &q.host_id)
        .await
        .map_err(|e| ApiError::new(e, q.diagnostic))?;
    Ok(Json(ThreatActorsResponse { op_id: q.op_id, host_id: q.host_id, threat_actors }))
}
