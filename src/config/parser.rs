use std::path::Path;
use crate::errors::CtemError;
use crate::graph::CrownJewelTable;
use super::credentials::resolve_credential;
use super::types::CtemConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<CtemConfig, CtemError> {
    if !path.exists() {
        return Err(CtemError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(CtemError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: CtemConfig = serde_yaml::from_value(yaml)?;

    validate_semantics(&config)?;

    Ok(config)
}

/// Load the config file when given, otherwise start from defaults; then fill
/// unset upstream settings from `H3_*` environment variables. `PORT` applies
/// only without a file, so a file's `server.port` always wins.
pub async fn load_config(path: Option<&Path>) -> Result<CtemConfig, CtemError> {
    let mut config = match path {
        Some(p) => parse_config(p).await?,
        None => CtemConfig::default(),
    };

    apply_env_fallbacks(&mut config, path.is_none());
    config.upstream.api_key = config.upstream.api_key.as_deref().map(resolve_credential);

    if config.upstream.graphql_url.is_none() {
        warn!("H3_GRAPHQL_URL not set");
    }
    if config.upstream.auth_url.is_none() {
        warn!("H3_AUTH_URL not set");
    }
    if config.upstream.api_key.is_none() {
        warn!("H3_API_KEY not set");
    }

    Ok(config)
}

fn apply_env_fallbacks(config: &mut CtemConfig, port_from_env: bool) {
    let env = |name: &str| {
        std::env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if config.upstream.graphql_url.is_none() {
        config.upstream.graphql_url = env("H3_GRAPHQL_URL");
    }
    if config.upstream.auth_url.is_none() {
        config.upstream.auth_url = env("H3_AUTH_URL");
    }
    if config.upstream.api_key.is_none() {
        config.upstream.api_key = env("H3_API_KEY");
    }
    if port_from_env {
        if let Some(port) = env("PORT").and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }
    }
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), CtemError> {
    // Convert YAML value to JSON for schema validation
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| CtemError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| CtemError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| CtemError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only; typed deserialization decides what is fatal.
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Reject configs that would only fail later at graph-build or mint time.
pub(crate) fn validate_semantics(config: &CtemConfig) -> Result<(), CtemError> {
    if let Some(patterns) = &config.graph.crown_jewels {
        if patterns.iter().any(|p| p.category.trim().is_empty()) {
            return Err(CtemError::Config("Crown jewel pattern with empty category".into()));
        }
        CrownJewelTable::from_patterns(patterns)?;
    }

    if let Some(aliases) = &config.graph.aliases {
        if aliases.keys().any(|k| k.trim().is_empty()) {
            return Err(CtemError::Config("Alias table contains an empty vulnerability id".into()));
        }
    }

    let upstream = &config.upstream;
    if upstream.refresh_margin_secs >= upstream.token_ttl_secs {
        return Err(CtemError::Config(format!(
            "refresh_margin_secs ({}) must be smaller than token_ttl_secs ({})",
            upstream.refresh_margin_secs, upstream.token_ttl_secs
        )));
    }

    Ok(())
}
