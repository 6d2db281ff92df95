use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CtemConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    pub graphql_url: Option<String>,
    pub auth_url: Option<String>,
    /// Static API key, or `$VAR` to read it from the environment.
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,
}

fn default_timeout_secs() -> u64 { 20 }
fn default_token_ttl_secs() -> u64 { 3600 }
fn default_refresh_margin_secs() -> u64 { 600 }

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            graphql_url: None,
            auth_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            token_ttl_secs: default_token_ttl_secs(),
            refresh_margin_secs: default_refresh_margin_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CrownJewelPattern {
    pub category: String,
    /// Case-insensitive regular expression matched against node text.
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GraphConfig {
    /// Replaces the built-in crown jewel table when set.
    pub crown_jewels: Option<Vec<CrownJewelPattern>>,
    /// Extra aliases merged over the built-in alias table.
    pub aliases: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 4000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}
