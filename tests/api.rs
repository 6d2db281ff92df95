use axum::http::StatusCode;
use axum::body::Body;
use http_body_util::BodyExt;
use tower::ServiceExt;
use serde_json::{json, Value};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use ctem::adapter::{QueryAdapter, VariantCache, VariantCatalog};
use ctem::api::{build_router, AppState};
use ctem::errors::CtemError;
use ctem::graph::GraphBuilder;
use ctem::service::CtemService;
use ctem::simulation::SimulationEngine;
use ctem::upstream::Transport;

/// Upstream that only understands the `page` argument shape and the legacy
/// tripwire query.
struct TenantUpstream;

#[async_trait]
impl Transport for TenantUpstream {
    async fn query(&self, query: &str, _variables: &Value) -> Result<Value, CtemError> {
        if query.contains("attack_paths_page(input: $input, page: $page)") {
            return Ok(json!({"attack_paths_page": {
                "page_info": {"page_num": 1, "page_size": 500, "has_next": false, "total": 3},
                "attack_paths": [
                    {"uuid": "p1", "attack_path_title": "Initial access", "impact_description": "Phishing"},
                    {"uuid": "p2", "attack_path_title": "EternalBlue pivot", "impact_description": "CVE-2017-0144 on FS01", "severity": "high"},
                    {"uuid": "p3", "attack_path_title": "Domain controller compromise", "host_name": "DC01"},
                ]
            }}));
        }
        if query.contains("tripwires_page(op_id: $op_id") {
            return Ok(json!({"tripwires_page": {"items": [
                {"id": "t1", "created_at": "2025-01-02T03:04:05Z", "severity": "high", "actor": "APT29", "technique_id": "T1003", "description": "LSASS access"},
                {"id": "t2", "rule_name": "Kerberoast"},
            ]}}));
        }
        if query.contains("__typename") {
            return Ok(json!({"__typename": "query_root"}));
        }
        Err(CtemError::Schema("Cannot query field".into()))
    }
}

fn create_test_state() -> AppState {
    let adapter = QueryAdapter::new(Arc::new(TenantUpstream), VariantCache::new(), Duration::from_secs(5));
    AppState::new(CtemService::new(
        adapter,
        VariantCatalog::builtin(),
        GraphBuilder::default(),
        SimulationEngine::default(),
    ))
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state();
    for uri in ["/health", "/api/health"] {
        let response = app(&state).oneshot(make_request("GET", uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "ctem");
    }
}

#[tokio::test]
async fn test_attack_paths_requires_op_id() {
    let state = create_test_state();
    let response = app(&state).oneshot(make_request("GET", "/api/h3/attack-paths", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Invalid request: op_id required");
}

#[tokio::test]
async fn test_attack_paths_discovers_and_caches_variant() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("GET", "/api/h3/attack-paths?op_id=op-1&page_size=500", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["page_info"]["_variant"], "v4_attack_paths_page_input_page");
    assert_eq!(body["page_info"]["total"], 3);
    assert_eq!(body["attack_paths"].as_array().unwrap().len(), 3);
    assert_eq!(body["attack_paths"][1]["id"], "p2");
    assert_eq!(body["attack_paths"][1]["severity"], "HIGH");

    let response = app(&state).oneshot(make_request("GET", "/diag/cache", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["cache"], json!([{"operation": "attack_paths_page", "variant": "v4_attack_paths_page_input_page"}]));
}

#[tokio::test]
async fn test_top_cves_falls_back_to_text_scan() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("GET", "/api/h3/top-cves?op_id=op-1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["op_id"], "op-1");
    assert_eq!(body["items"], json!([{"id": "CVE-2017-0144", "count": 1}]));
}

#[tokio::test]
async fn test_simulate_remediation() {
    let state = create_test_state();
    let req = make_request("POST", "/api/h3/simulate-remediation", Some(json!({
        "op_id": "op-1",
        "vuln_ids": ["cve-2017-0144"]
    })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["paths_total"], 3);
    assert_eq!(body["paths_disrupted"], 1);
    assert_eq!(body["percent_reduction"], 33.3);
    assert_eq!(body["disrupted_path_ids"], json!(["p2"]));
    assert_eq!(body["reachability"]["reachable"], json!(["p1"]));
    assert_eq!(body["reachability"]["crown_jewels"]["p3"], false);
    assert_eq!(body["chain"], json!(["p1"]));
}

#[tokio::test]
async fn test_cve_details() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("GET", "/api/h3/cve-details?op_id=op-1&cve=CVE-2017-0144", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["summary"]["vuln_id"], "CVE-2017-0144");
    assert_eq!(body["summary"]["occurrence_count"], 1);
    assert_eq!(body["occurrences"][0]["id"], "p2");
    assert_eq!(body["advisory"]["id"], "CVE-2017-0144");

    let response = app(&state)
        .oneshot(make_request("GET", "/api/h3/cve-details?op_id=op-1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_threat_actors_for_host() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("GET", "/api/h3/threat-actors?op_id=op-1&host_id=h-1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let actors = body["threat_actors"].as_array().unwrap();
    assert_eq!(actors.len(), 2);
    assert_eq!(actors[0]["actor"], "APT29");
    assert_eq!(actors[0]["severity"], "HIGH");
    assert_eq!(actors[0]["technique"], "T1003");
    assert_eq!(actors[1]["actor"], "Kerberoast");
    assert_eq!(actors[1]["severity"], "INFO");
}

#[tokio::test]
async fn test_exhausted_error_includes_trace_in_diagnostic_mode() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("GET", "/api/h3/hosts?op_id=op-1&diagnostic=true", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = response_json(response).await;
    assert_eq!(body["_diagnostic"], true);
    let tried = body["tried"].as_array().unwrap();
    assert_eq!(tried.len(), 2);
    assert_eq!(tried[0]["variant"], "v1_hosts_page");
    assert_eq!(tried[1]["variant"], "v2_legacy");

    let response = app(&state)
        .oneshot(make_request("GET", "/api/h3/hosts?op_id=op-1", None))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert!(body.get("tried").is_none());
}

#[tokio::test]
async fn test_diagnostic_attack_paths_probe() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("GET", "/diag/attack-paths?op_id=op-1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["_diagnostic"], true);
    let tried = body["tried"].as_array().unwrap();
    assert_eq!(tried.len(), 8);
    let ok: Vec<&str> = tried
        .iter()
        .filter(|t| t["ok"] == true)
        .map(|t| t["variant"].as_str().unwrap())
        .collect();
    assert_eq!(ok, vec!["v4_attack_paths_page_input_page"]);

    let response = app(&state).oneshot(make_request("GET", "/diag/cache", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["cache"], json!([]));
}

#[tokio::test]
async fn test_diag_auth_and_meta() {
    let state = create_test_state();
    let response = app(&state).oneshot(make_request("GET", "/diag/auth", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["typename"], "query_root");

    let response = app(&state).oneshot(make_request("GET", "/diag/meta", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["meta"]["has_api_key"], false);
    assert_eq!(body["variants"]["tripwires_page"], json!(["v1_tripwires", "v2_legacy"]));
}

fn authed_request(uri: &str, authorization: Option<&str>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_api_token_gates_protected_routes() {
    let state = create_test_state().with_api_token("ops-token-42");

    let response = app(&state).oneshot(authed_request("/diag/cache", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response_json(response).await["error"], "Missing Authorization header");

    let response = app(&state)
        .oneshot(authed_request("/diag/cache", Some("Bearer wrong-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response_json(response).await["error"], "Invalid API token");

    let response = app(&state)
        .oneshot(authed_request("/api/h3/attack-paths?op_id=op-1", Some("ops-token-42")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&state)
        .oneshot(authed_request("/api/h3/attack-paths?op_id=op-1", Some("Bearer ops-token-42")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_stays_open_with_api_token() {
    let state = create_test_state().with_api_token("ops-token-42");
    for uri in ["/health", "/api/health"] {
        let response = app(&state).oneshot(authed_request(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_blank_api_token_leaves_routes_open() {
    let state = create_test_state().with_api_token("");
    let response = app(&state).oneshot(authed_request("/diag/cache", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
