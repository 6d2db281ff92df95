use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use crate::config::credentials::redact_credentials;
use crate::errors::CtemError;
use crate::utils::truncation::truncate_error;
use tracing::{debug, info};

/// Bearer token together with its nominal expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchanges the static API key for a fresh bearer token.
#[async_trait]
pub trait TokenMinter: Send + Sync {
    async fn mint(&self) -> Result<String, CtemError>;
}

pub struct HttpMinter {
    client: Client,
    auth_url: Option<String>,
    api_key: String,
}

impl HttpMinter {
    pub fn new(client: Client, auth_url: Option<&str>, api_key: Option<&str>) -> Self {
        Self {
            client,
            auth_url: auth_url.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            api_key: api_key.unwrap_or_default().trim().to_string(),
        }
    }
}

#[async_trait]
impl TokenMinter for HttpMinter {
    async fn mint(&self) -> Result<String, CtemError> {
        let url = self.auth_url.as_deref()
            .ok_or_else(|| CtemError::Auth("H3_AUTH_URL not set".into()))?;

        let resp = self.client
            .post(url)
            .header("accept", "application/json")
            .json(&json!({ "key": self.api_key }))
            .send()
            .await
            .map_err(|e| CtemError::Auth(format!("Auth request failed: {}", e)))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let shown = || truncate_error(&redact_credentials(&text, &[&self.api_key]));

        if !status.is_success() {
            return Err(CtemError::Auth(format!("Auth failed {}: {}", status.as_u16(), shown())));
        }

        let data: Value = serde_json::from_str(&text)
            .map_err(|_| CtemError::Auth(format!("Auth parse error: {}", shown())))?;

        let token = data["token"].as_str().map(str::trim).unwrap_or_default();
        if token.is_empty() {
            return Err(CtemError::Auth("Auth ok but \"token\" missing".into()));
        }
        Ok(token.to_string())
    }
}

/// Caches one credential and re-mints it once `now` passes `expires_at - margin`.
pub struct TokenProvider {
    minter: Arc<dyn TokenMinter>,
    ttl: Duration,
    margin: Duration,
    credential: Mutex<Option<Credential>>,
}

impl TokenProvider {
    pub fn new(minter: Arc<dyn TokenMinter>, ttl_secs: u64, margin_secs: u64) -> Self {
        Self {
            minter,
            ttl: Duration::seconds(ttl_secs as i64),
            margin: Duration::seconds(margin_secs as i64),
            credential: Mutex::new(None),
        }
    }

    pub async fn get_token(&self) -> Result<String, CtemError> {
        self.token_at(Utc::now()).await
    }

    /// Same as [`get_token`](Self::get_token) with an explicit clock reading.
    pub async fn token_at(&self, now: DateTime<Utc>) -> Result<String, CtemError> {
        // Held across the mint so concurrent callers share one exchange.
        let mut guard = self.credential.lock().await;

        if let Some(cred) = guard.as_ref() {
            if now <= cred.expires_at - self.margin {
                debug!(expires_at = %cred.expires_at, "Reusing cached bearer token");
                return Ok(cred.token.clone());
            }
        }

        let token = self.minter.mint().await?;
        let expires_at = now + self.ttl;
        info!(expires_at = %expires_at, "Minted bearer token");
        *guard = Some(Credential { token: token.clone(), expires_at });
        Ok(token)
    }

    pub async fn current(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }
}
