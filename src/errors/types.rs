use serde::Serialize;
use thiserror::Error;

/// Outcome of one variant attempt, kept for diagnostics and exhausted-adapter reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantAttempt {
    pub variant: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VariantAttempt {
    pub fn succeeded(variant: &str) -> Self {
        Self { variant: variant.to_string(), ok: true, error: None }
    }

    pub fn failed(variant: &str, error: &CtemError) -> Self {
        Self { variant: variant.to_string(), ok: false, error: Some(error.to_string()) }
    }
}

#[derive(Debug, Error)]
pub enum CtemError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("{operation} failed across variants: {last}")]
    AdapterExhausted {
        operation: String,
        last: Box<CtemError>,
        tried: Vec<VariantAttempt>,
    },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CtemError {
    /// Per-variant trace attached to an exhausted adapter call, if any.
    pub fn tried(&self) -> Option<&[VariantAttempt]> {
        match self {
            CtemError::AdapterExhausted { tried, .. } => Some(tried),
            _ => None,
        }
    }
}
