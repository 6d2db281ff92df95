use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::config::credentials::redact_credentials;
use crate::errors::CtemError;
use crate::utils::truncation::truncate_error;
use super::token::TokenProvider;

/// Executes one query document against the upstream query endpoint and returns its `data`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn query(&self, query: &str, variables: &Value) -> Result<Value, CtemError>;
}

pub struct GraphqlTransport {
    client: Client,
    url: Option<String>,
    tokens: Arc<TokenProvider>,
}

impl GraphqlTransport {
    pub fn new(client: Client, url: Option<&str>, tokens: Arc<TokenProvider>) -> Self {
        Self {
            client,
            url: url.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            tokens,
        }
    }
}

/// HTTP client shared by the minter and the transport.
pub fn build_client(timeout: Duration) -> Result<Client, CtemError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CtemError::Internal(format!("Failed to build HTTP client: {}", e)))
}

#[async_trait]
impl Transport for GraphqlTransport {
    async fn query(&self, query: &str, variables: &Value) -> Result<Value, CtemError> {
        let url = self.url.as_deref()
            .ok_or_else(|| CtemError::Config("H3_GRAPHQL_URL not set".into()))?;
        let bearer = self.tokens.get_token().await?;

        let resp = self.client
            .post(url)
            .header("accept", "application/json")
            .bearer_auth(&bearer)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CtemError::Timeout(format!("Query request timed out: {}", e))
                } else {
                    CtemError::Transport(format!("Query request failed: {}", e))
                }
            })?;

        let status = resp.status();
        let text = resp.text().await
            .map_err(|e| CtemError::Transport(format!("Failed to read query response: {}", e)))?;
        let secrets = [bearer.as_str()];

        if !status.is_success() {
            return Err(CtemError::Transport(format!(
                "GraphQL HTTP {}: {}", status.as_u16(), truncate_error(&redact_credentials(&text, &secrets))
            )));
        }

        let body: Value = serde_json::from_str(&text).map_err(|_| {
            CtemError::Schema(format!(
                "Unparsable query response: {}", truncate_error(&redact_credentials(&text, &secrets))
            ))
        })?;
        unwrap_data(body, &secrets)
    }
}

/// Split a query-protocol response body into `data` or an application-level
/// error. `secrets` are scrubbed from upstream error messages.
pub fn unwrap_data(mut body: Value, secrets: &[&str]) -> Result<Value, CtemError> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages: Vec<&str> = errors.iter()
                .map(|e| e["message"].as_str().unwrap_or("unknown error"))
                .collect();
            let joined = redact_credentials(&messages.join("; "), secrets);
            return Err(CtemError::Schema(truncate_error(&joined)));
        }
    }

    match body.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(CtemError::Schema("Query response carries no data".into())),
    }
}
