pub mod routes;
pub mod models;
pub mod errors;
pub mod auth;

use std::sync::Arc;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::config::CtemConfig;
use crate::errors::CtemError;
use crate::service::CtemService;

pub use errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CtemService>,
    /// Bearer token required on the protected routes; `None` leaves them open.
    pub api_token: Option<String>,
}

impl AppState {
    pub fn new(service: CtemService) -> Self {
        Self { service: Arc::new(service), api_token: None }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.api_token = (!token.is_empty()).then_some(token);
        self
    }
}

pub fn create_app_state(config: &CtemConfig) -> Result<AppState, CtemError> {
    let state = AppState::new(CtemService::from_config(config)?);
    Ok(match auth::api_token_from_env() {
        Some(token) => state.with_api_token(token),
        None => state,
    })
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/h3/attack-paths", get(routes::attack_paths::get_attack_paths))
        .route("/api/h3/top-cves", get(routes::vulnerabilities::get_top_vulnerabilities))
        .route("/api/h3/cve-details", get(routes::vulnerabilities::get_vulnerability_details))
        .route("/api/h3/simulate-remediation", post(routes::simulation::simulate_remediation))
        .route("/api/h3/hosts", get(routes::hosts::get_hosts))
        .route("/api/h3/threat-actors", get(routes::hosts::get_threat_actors))
        .route("/diag/cache", get(routes::diagnostics::cache))
        .route("/diag/auth", get(routes::diagnostics::auth))
        .route("/diag/meta", get(routes::diagnostics::meta))
        .route("/diag/attack-paths", get(routes::diagnostics::attack_paths))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::api_auth_middleware));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/health", get(routes::health::health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
