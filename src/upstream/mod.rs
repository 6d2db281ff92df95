pub mod token;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;
use crate::config::UpstreamConfig;
use crate::errors::CtemError;

pub use token::{Credential, HttpMinter, TokenMinter, TokenProvider};
pub use transport::{GraphqlTransport, Transport};

const ATTEMPT_SLACK: Duration = Duration::from_secs(1);

/// Ceiling for one variant attempt. An attempt may mint a token and then run
/// the query, each bounded by the client timeout; the slack lets the client's
/// own error (`Auth` for a stalled mint) surface before the attempt times out.
pub fn attempt_budget(client_timeout: Duration) -> Duration {
    client_timeout * 2 + ATTEMPT_SLACK
}

/// Wire the reqwest-backed minter, token cache and query transport from config.
pub fn connect(config: &UpstreamConfig) -> Result<Arc<dyn Transport>, CtemError> {
    let client = transport::build_client(Duration::from_secs(config.timeout_secs))?;
    let minter = HttpMinter::new(client.clone(), config.auth_url.as_deref(), config.api_key.as_deref());
    let tokens = Arc::new(TokenProvider::new(
        Arc::new(minter),
        config.token_ttl_secs,
        config.refresh_margin_secs,
    ));
    Ok(Arc::new(GraphqlTransport::new(client, config.graphql_url.as_deref(), tokens)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use crate::adapter::{LogicalParams, QueryAdapter, QueryVariant, VariantCache, VariantTable};

    #[test]
    fn test_attempt_budget_exceeds_mint_plus_query() {
        let client = Duration::from_secs(20);
        assert!(attempt_budget(client) > client * 2);
    }

    #[tokio::test]
    async fn test_stalled_mint_is_fatal_auth_error() {
        let hits = Arc::new(AtomicU32::new(0));
        let router = Router::new()
            .route("/auth", post(|State(hits): State<Arc<AtomicU32>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"token": "late"}))
            }))
            .with_state(hits.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let config = UpstreamConfig {
            graphql_url: Some(format!("http://{addr}/graphql")),
            auth_url: Some(format!("http://{addr}/auth")),
            api_key: Some("k-test".into()),
            timeout_secs: 1,
            ..UpstreamConfig::default()
        };
        let adapter = QueryAdapter::new(
            connect(&config).unwrap(),
            VariantCache::new(),
            attempt_budget(Duration::from_secs(config.timeout_secs)),
        );
        let variant = |name: &str| {
            QueryVariant::new(name, "{ __typename }", |_| json!({}), |d: &Value, _: &LogicalParams, _: &str| {
                Ok(d.clone())
            })
        };
        let table = VariantTable::new("typename").with(variant("first")).with(variant("second"));

        let err = adapter.execute(&table, &LogicalParams::for_op("op")).await.unwrap_err();
        assert!(matches!(err, CtemError::Auth(_)), "{err}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(adapter.cache().is_empty());
    }
}
