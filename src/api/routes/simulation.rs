use axum::{extract::State, Json};
use crate::api::models::SimulateRequest;
use crate::api::{ApiError, AppState};
use crate::models::SimulationReport;

pub async fn simulate_remediation(
    State(state): State<AppState>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulationReport>, ApiError> {
    state
        .service
        .simulate(&req.op_id, &req.vuln_ids)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, req.diagnostic))
}
